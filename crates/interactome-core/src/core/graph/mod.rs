//! Access boundary to the external entity store.
//!
//! The engine never talks to a database directly: everything goes through
//! the [`EntityGraph`] handle, which is threaded explicitly through the
//! traversal call chain. [`memory::MemoryGraph`] is the in-process
//! implementation used by tests and fixtures.

pub mod memory;

use super::models::entity::{Entity, StId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Object '{id}' does not exist in the entity store")]
    NotFound { id: StId },

    #[error("Species '{name}' is not known to the entity store")]
    UnknownSpecies { name: String },

    #[error("Entity store access failed: {message}")]
    Backend { message: String },
}

/// Resolves stable identifiers and species names into typed entities.
///
/// Implementations own the entities; callers receive value copies and hold
/// them only while processing one container.
pub trait EntityGraph {
    /// Resolves one object identifier into its entity.
    fn entity(&self, id: &StId) -> Result<Entity, GraphError>;

    /// Display names of every species known to the store.
    fn species_names(&self) -> Result<Vec<String>, GraphError>;

    /// Resolves a species argument (display name or alias) into the store's
    /// canonical display name.
    fn species_display_name(&self, name: &str) -> Result<String, GraphError>;

    /// Identifiers of every top-level container reachable under a species.
    fn roots_for_species(&self, species: &str) -> Result<Vec<StId>, GraphError>;
}
