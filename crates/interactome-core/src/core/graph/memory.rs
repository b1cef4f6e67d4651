use super::{EntityGraph, GraphError};
use crate::core::models::entity::{CatalystActivity, Entity, EntityKind, StId};
use slotmap::{SlotMap, new_key_type};
use std::collections::HashMap;

new_key_type! {
    pub struct EntityKey;
}

/// An in-process entity store.
///
/// Backs unit tests and fixtures with the same access contract a remote
/// provider satisfies: primary storage in a slot map, identifier lookups
/// through a secondary index, species mapped to their root containers.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    entities: SlotMap<EntityKey, Entity>,
    id_index: HashMap<StId, EntityKey>,
    species: Vec<SpeciesEntry>,
}

#[derive(Debug, Clone)]
struct SpeciesEntry {
    name: String,
    roots: Vec<StId>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entity, replacing any previous entity with the same
    /// identifier.
    pub fn add_entity(&mut self, entity: Entity) -> StId {
        let id = entity.st_id.clone();
        if let Some(&key) = self.id_index.get(&id) {
            self.entities[key] = entity;
        } else {
            let key = self.entities.insert(entity);
            self.id_index.insert(id.clone(), key);
        }
        id
    }

    pub fn add_simple(&mut self, id: &str, name: &str, reference: Option<&str>) -> StId {
        self.add_entity(Entity::new(
            id,
            name,
            EntityKind::SimpleEntity {
                reference: reference.map(str::to_string),
            },
        ))
    }

    pub fn add_sequence(&mut self, id: &str, name: &str, accession: Option<&str>) -> StId {
        self.add_entity(Entity::new(
            id,
            name,
            EntityKind::AccessionedSequence {
                accession: accession.map(str::to_string),
            },
        ))
    }

    pub fn add_complex(&mut self, id: &str, name: &str, components: &[&str]) -> StId {
        self.add_entity(Entity::new(
            id,
            name,
            EntityKind::Complex {
                components: components.iter().map(|c| StId::from(*c)).collect(),
            },
        ))
    }

    pub fn add_set(&mut self, id: &str, name: &str, members: &[&str]) -> StId {
        self.add_entity(Entity::new(
            id,
            name,
            EntityKind::Set {
                members: members.iter().map(|m| StId::from(*m)).collect(),
            },
        ))
    }

    pub fn add_polymer(&mut self, id: &str, name: &str, repeated_units: &[&str]) -> StId {
        self.add_entity(Entity::new(
            id,
            name,
            EntityKind::Polymer {
                repeated_units: repeated_units.iter().map(|u| StId::from(*u)).collect(),
            },
        ))
    }

    pub fn add_reaction(
        &mut self,
        id: &str,
        name: &str,
        inputs: &[&str],
        catalysts: &[(&str, &[&str])],
    ) -> StId {
        self.add_entity(Entity::new(
            id,
            name,
            EntityKind::Reaction {
                inputs: inputs.iter().map(|i| StId::from(*i)).collect(),
                catalysts: catalysts
                    .iter()
                    .map(|(physical_entity, active_units)| CatalystActivity {
                        physical_entity: StId::from(*physical_entity),
                        active_units: active_units.iter().map(|u| StId::from(*u)).collect(),
                    })
                    .collect(),
            },
        ))
    }

    /// Registers a species and the root containers reachable under it.
    pub fn register_species(&mut self, name: &str, roots: &[&str]) {
        if let Some(entry) = self.species.iter_mut().find(|entry| entry.name == name) {
            entry.roots.extend(roots.iter().map(|r| StId::from(*r)));
        } else {
            self.species.push(SpeciesEntry {
                name: name.to_string(),
                roots: roots.iter().map(|r| StId::from(*r)).collect(),
            });
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityGraph for MemoryGraph {
    fn entity(&self, id: &StId) -> Result<Entity, GraphError> {
        self.id_index
            .get(id)
            .map(|&key| self.entities[key].clone())
            .ok_or_else(|| GraphError::NotFound { id: id.clone() })
    }

    fn species_names(&self) -> Result<Vec<String>, GraphError> {
        Ok(self.species.iter().map(|entry| entry.name.clone()).collect())
    }

    fn species_display_name(&self, name: &str) -> Result<String, GraphError> {
        self.species
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.name.clone())
            .ok_or_else(|| GraphError::UnknownSpecies {
                name: name.to_string(),
            })
    }

    fn roots_for_species(&self, species: &str) -> Result<Vec<StId>, GraphError> {
        self.species
            .iter()
            .find(|entry| entry.name == species)
            .map(|entry| entry.roots.clone())
            .ok_or_else(|| GraphError::UnknownSpecies {
                name: species.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_resolve_by_identifier() {
        let mut graph = MemoryGraph::new();
        graph.add_sequence("R-HSA-1", "KRAS", Some("P01116"));

        let entity = graph.entity(&"R-HSA-1".into()).unwrap();
        assert_eq!(entity.name, "KRAS");
        assert!(matches!(
            graph.entity(&"R-HSA-404".into()),
            Err(GraphError::NotFound { .. })
        ));
    }

    #[test]
    fn reinserting_an_identifier_replaces_the_entity() {
        let mut graph = MemoryGraph::new();
        graph.add_sequence("R-HSA-1", "old", None);
        graph.add_sequence("R-HSA-1", "new", None);

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.entity(&"R-HSA-1".into()).unwrap().name, "new");
    }

    #[test]
    fn species_resolution_is_case_insensitive_on_lookup() {
        let mut graph = MemoryGraph::new();
        graph.register_species("Homo sapiens", &["R-HSA-1"]);

        assert_eq!(
            graph.species_display_name("homo SAPIENS").unwrap(),
            "Homo sapiens"
        );
        assert!(matches!(
            graph.species_display_name("Mus musculus"),
            Err(GraphError::UnknownSpecies { .. })
        ));
    }

    #[test]
    fn species_roots_accumulate_across_registrations() {
        let mut graph = MemoryGraph::new();
        graph.register_species("Homo sapiens", &["R-HSA-1"]);
        graph.register_species("Homo sapiens", &["R-HSA-2"]);

        let roots = graph.roots_for_species("Homo sapiens").unwrap();
        assert_eq!(roots.len(), 2);
    }
}
