use crate::core::models::interaction::Interaction;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Record serialization error: {0}")]
    Csv(#[from] csv::Error),
}

/// Defines the interface for interaction output encoders.
///
/// A writer receives every unique interaction of one export run exactly
/// once, in no promised order, and owns its underlying byte sink.
pub trait InteractionWriter {
    /// Short format name used in diagnostics and error reports.
    fn format_name(&self) -> &'static str;

    /// Encodes one interaction record.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the underlying write fails; a failed
    /// writer makes the whole run fail.
    fn write(&mut self, interaction: &Interaction) -> Result<(), WriteError>;

    /// Flushes buffered records to the underlying sink.
    fn flush(&mut self) -> Result<(), WriteError>;
}
