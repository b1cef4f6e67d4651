use super::entity::StId;
use std::collections::BTreeMap;
use std::fmt;

/// The semantic relationship under which a child entity is attached to its
/// container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Component,
    Member,
    RepeatedUnit,
    Input,
    Catalyst,
    ActiveUnit,
}

impl Role {
    /// The source relationship this role is extracted from.
    pub fn relationship(&self) -> &'static str {
        match self {
            Role::Component => "hasComponent",
            Role::Member => "hasMember",
            Role::RepeatedUnit => "repeatedUnit",
            Role::Input => "input",
            Role::Catalyst => "catalystActivity/physicalEntity",
            Role::ActiveUnit => "catalystActivity/activeUnit",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Component => "component",
            Role::Member => "member",
            Role::RepeatedUnit => "repeatedUnit",
            Role::Input => "input",
            Role::Catalyst => "catalyst",
            Role::ActiveUnit => "activeUnit",
        };
        f.write_str(label)
    }
}

/// Entity identifiers of one role-group mapped to their strictly positive
/// stoichiometry within that role.
pub type StoichiometryMap = BTreeMap<StId, u32>;

/// One catalyst activity as seen by the inference engine: the catalyzing
/// entity and the active units that take its place in catalyst-substrate
/// pairing when specified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalystParticipants {
    pub physical_entity: StId,
    pub active_units: Vec<StId>,
}

/// The role-tagged participant groups of exactly one container.
///
/// Produced by one-level extraction: nested containers appear as opaque
/// single nodes, and a role is present only when it has at least one
/// participant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantSet {
    roles: BTreeMap<Role, StoichiometryMap>,
    catalysts: Vec<CatalystParticipants>,
}

impl ParticipantSet {
    /// Records one occurrence of `id` under `role`, accumulating
    /// stoichiometry for repeated occurrences.
    pub(crate) fn record(&mut self, role: Role, id: &StId) {
        *self
            .roles
            .entry(role)
            .or_default()
            .entry(id.clone())
            .or_insert(0) += 1;
    }

    pub(crate) fn push_catalyst(&mut self, catalyst: CatalystParticipants) {
        self.catalysts.push(catalyst);
    }

    pub fn group(&self, role: Role) -> Option<&StoichiometryMap> {
        self.roles.get(&role)
    }

    /// Stoichiometry of `id` under `role`; zero when absent.
    pub fn stoichiometry(&self, role: Role, id: &StId) -> u32 {
        self.roles
            .get(&role)
            .and_then(|group| group.get(id))
            .copied()
            .unwrap_or(0)
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.keys().copied()
    }

    /// Per-activity catalyst records, in source order.
    pub fn catalysts(&self) -> &[CatalystParticipants] {
        &self.catalysts
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accumulates_stoichiometry() {
        let mut set = ParticipantSet::default();
        let id: StId = "R-HSA-1".into();
        set.record(Role::Component, &id);
        set.record(Role::Component, &id);
        set.record(Role::Component, &"R-HSA-2".into());

        assert_eq!(set.stoichiometry(Role::Component, &id), 2);
        assert_eq!(set.group(Role::Component).unwrap().len(), 2);
    }

    #[test]
    fn absent_roles_have_no_entry() {
        let mut set = ParticipantSet::default();
        set.record(Role::Input, &"R-HSA-1".into());

        assert!(set.group(Role::Catalyst).is_none());
        assert_eq!(set.stoichiometry(Role::Catalyst, &"R-HSA-1".into()), 0);
        assert_eq!(set.roles().collect::<Vec<_>>(), vec![Role::Input]);
    }
}
