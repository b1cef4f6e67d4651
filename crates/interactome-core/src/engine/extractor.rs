use crate::core::models::entity::{Entity, EntityKind};
use crate::core::models::participants::{CatalystParticipants, ParticipantSet, Role};

/// Extracts the role-tagged participant groups of exactly one container.
///
/// Single level only: nested containers are reported as opaque participants
/// and left for the inference engine to expand on its own recursion.
/// Repeated references to the same entity within one role accumulate
/// stoichiometry. Non-containers yield an empty set.
pub fn participants_of(entity: &Entity) -> ParticipantSet {
    let mut set = ParticipantSet::default();
    match &entity.kind {
        EntityKind::Complex { components } => {
            for id in components {
                set.record(Role::Component, id);
            }
        }
        EntityKind::Set { members } => {
            for id in members {
                set.record(Role::Member, id);
            }
        }
        EntityKind::Polymer { repeated_units } => {
            for id in repeated_units {
                set.record(Role::RepeatedUnit, id);
            }
        }
        EntityKind::Reaction { inputs, catalysts } => {
            for id in inputs {
                set.record(Role::Input, id);
            }
            for activity in catalysts {
                set.record(Role::Catalyst, &activity.physical_entity);
                for unit in &activity.active_units {
                    set.record(Role::ActiveUnit, unit);
                }
                set.push_catalyst(CatalystParticipants {
                    physical_entity: activity.physical_entity.clone(),
                    active_units: activity.active_units.clone(),
                });
            }
        }
        _ => {}
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::entity::CatalystActivity;

    #[test]
    fn complex_components_accumulate_stoichiometry() {
        let complex = Entity::new(
            "R-HSA-100",
            "heterotrimer",
            EntityKind::Complex {
                components: vec!["R-HSA-1".into(), "R-HSA-1".into(), "R-HSA-2".into()],
            },
        );

        let set = participants_of(&complex);
        assert_eq!(set.stoichiometry(Role::Component, &"R-HSA-1".into()), 2);
        assert_eq!(set.stoichiometry(Role::Component, &"R-HSA-2".into()), 1);
        assert_eq!(set.roles().collect::<Vec<_>>(), vec![Role::Component]);
    }

    #[test]
    fn reaction_extracts_inputs_catalysts_and_active_units() {
        let reaction = Entity::new(
            "R-HSA-10",
            "kinase reaction",
            EntityKind::Reaction {
                inputs: vec!["R-HSA-11".into(), "R-HSA-12".into()],
                catalysts: vec![CatalystActivity {
                    physical_entity: "R-HSA-13".into(),
                    active_units: vec!["R-HSA-14".into()],
                }],
            },
        );

        let set = participants_of(&reaction);
        assert_eq!(set.group(Role::Input).unwrap().len(), 2);
        assert_eq!(set.stoichiometry(Role::Catalyst, &"R-HSA-13".into()), 1);
        assert_eq!(set.stoichiometry(Role::ActiveUnit, &"R-HSA-14".into()), 1);
        assert_eq!(set.catalysts().len(), 1);
        assert_eq!(set.catalysts()[0].active_units.len(), 1);
    }

    #[test]
    fn empty_relationships_yield_no_role_entry() {
        let reaction = Entity::new(
            "R-HSA-10",
            "spontaneous",
            EntityKind::Reaction {
                inputs: vec![],
                catalysts: vec![],
            },
        );

        let set = participants_of(&reaction);
        assert!(set.is_empty());
        assert!(set.group(Role::Input).is_none());
    }

    #[test]
    fn non_containers_have_no_participants() {
        let simple = Entity::new("R-ALL-1", "ATP", EntityKind::SimpleEntity { reference: None });
        assert!(participants_of(&simple).is_empty());
    }

    #[test]
    fn extraction_is_idempotent() {
        let set_entity = Entity::new(
            "R-HSA-20",
            "paralogs",
            EntityKind::Set {
                members: vec!["R-HSA-21".into(), "R-HSA-22".into()],
            },
        );

        assert_eq!(participants_of(&set_entity), participants_of(&set_entity));
    }
}
