//! # Workflows Module
//!
//! The public, user-facing layer: complete export procedures tying the
//! engine and core together behind a single entry point.

pub mod export;
