use super::entity::{ContainerKind, StId};
use std::fmt;

/// Why two participants are considered interacting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionType {
    /// Components of the same complex.
    CoComplex,
    /// Members of the same entity set.
    CoMember,
    /// Repeated units of the same polymer.
    CoPolymer,
    /// Inputs of the same reaction-like event.
    CoInput,
    /// A catalyst (or its active unit) paired with a reaction input.
    CatalystSubstrate,
}

impl InteractionType {
    pub fn descriptor(&self) -> &'static str {
        match self {
            InteractionType::CoComplex => "co-complex",
            InteractionType::CoMember => "co-member",
            InteractionType::CoPolymer => "co-repeated-unit",
            InteractionType::CoInput => "co-input",
            InteractionType::CatalystSubstrate => "catalyst-substrate",
        }
    }

    /// The PSI-MI controlled-vocabulary term for this interaction type.
    pub fn psi_mi(&self) -> (&'static str, &'static str) {
        match self {
            InteractionType::CoMember => ("MI:0914", "association"),
            InteractionType::CatalystSubstrate => ("MI:0407", "direct interaction"),
            _ => ("MI:0915", "physical association"),
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor())
    }
}

/// One side of an interaction record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: StId,
    pub name: String,
    /// Schema-class label of the entity (see `EntityKind::label`).
    pub class: &'static str,
    /// Occurrences of the entity under its role within the provenance
    /// container.
    pub stoichiometry: u32,
}

/// Where an interaction was inferred and under which rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub container: StId,
    pub container_kind: ContainerKind,
    pub interaction_type: InteractionType,
}

/// An inferred, canonically ordered pair of interacting entities.
///
/// The pair is ordered by identifier so that `{A, B}` and `{B, A}` are the
/// same record; self-interactions do not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub a: Participant,
    pub b: Participant,
    pub provenance: Provenance,
}

impl Interaction {
    /// Builds the canonical record for an unordered pair, or `None` when
    /// both sides are the same entity.
    pub fn between(a: Participant, b: Participant, provenance: Provenance) -> Option<Self> {
        match a.id.cmp(&b.id) {
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Less => Some(Self { a, b, provenance }),
            std::cmp::Ordering::Greater => Some(Self { a: b, b: a, provenance }),
        }
    }

    /// The ordered identifier pair used for deduplication.
    pub fn pair_key(&self) -> (StId, StId) {
        (self.a.id.clone(), self.b.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(id: &str) -> Participant {
        Participant {
            id: id.into(),
            name: id.to_string(),
            class: "EntityWithAccessionedSequence",
            stoichiometry: 1,
        }
    }

    fn provenance() -> Provenance {
        Provenance {
            container: "R-HSA-100".into(),
            container_kind: ContainerKind::Complex,
            interaction_type: InteractionType::CoComplex,
        }
    }

    #[test]
    fn pairs_are_canonically_ordered() {
        let forward =
            Interaction::between(participant("R-HSA-1"), participant("R-HSA-2"), provenance())
                .unwrap();
        let reversed =
            Interaction::between(participant("R-HSA-2"), participant("R-HSA-1"), provenance())
                .unwrap();

        assert_eq!(forward.pair_key(), reversed.pair_key());
        assert_eq!(forward.a.id.as_str(), "R-HSA-1");
    }

    #[test]
    fn self_pairs_are_rejected() {
        let pair =
            Interaction::between(participant("R-HSA-1"), participant("R-HSA-1"), provenance());
        assert!(pair.is_none());
    }
}
