use crate::core::models::entity::StId;
use crate::core::models::interaction::Interaction;
use std::collections::HashSet;

/// Run-scoped collapse of structurally identical pairs.
///
/// The same two entities can be inferred as interacting from several
/// distinct containers; the export contract is one record per unordered
/// entity pair per run, with first-seen provenance winning. The working set
/// lives for one export run and is discarded with the stream.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<(StId, StId)>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` exactly when the interaction's pair has not been seen
    /// before in this run.
    pub fn insert(&mut self, interaction: &Interaction) -> bool {
        self.seen.insert(interaction.pair_key())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::entity::ContainerKind;
    use crate::core::models::interaction::{InteractionType, Participant, Provenance};

    fn pair(a: &str, b: &str, container: &str) -> Interaction {
        let participant = |id: &str| Participant {
            id: id.into(),
            name: id.to_string(),
            class: "EntityWithAccessionedSequence",
            stoichiometry: 1,
        };
        Interaction::between(
            participant(a),
            participant(b),
            Provenance {
                container: container.into(),
                container_kind: ContainerKind::Complex,
                interaction_type: InteractionType::CoComplex,
            },
        )
        .unwrap()
    }

    #[test]
    fn first_occurrence_wins_regardless_of_side_order() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.insert(&pair("R-HSA-1", "R-HSA-2", "R-HSA-100")));
        assert!(!dedup.insert(&pair("R-HSA-2", "R-HSA-1", "R-HSA-200")));
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn distinct_pairs_are_kept() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.insert(&pair("R-HSA-1", "R-HSA-2", "R-HSA-100")));
        assert!(dedup.insert(&pair("R-HSA-1", "R-HSA-3", "R-HSA-100")));
        assert_eq!(dedup.len(), 2);
    }
}
