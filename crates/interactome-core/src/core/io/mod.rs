//! Output encoders.
//!
//! Two formats are produced from one export run: PSI-MITAB 2.7
//! ([`mitab::MitabWriter`]) and a headered tab-delimited file
//! ([`tsv::TsvWriter`]). Both implement [`traits::InteractionWriter`] and are
//! fed record-by-record by the export workflow.

pub mod mitab;
pub mod traits;
pub mod tsv;
