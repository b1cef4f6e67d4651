pub mod export;
pub mod species;
pub mod tree;
