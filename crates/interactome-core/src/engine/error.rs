use super::config::ConfigError;
use crate::core::graph::GraphError;
use crate::core::io::traits::WriteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to resolve '{name}': {source}")]
    Resolution { name: String, source: GraphError },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Failed to write {format} output: {source}")]
    Write {
        format: &'static str,
        source: WriteError,
    },
}
