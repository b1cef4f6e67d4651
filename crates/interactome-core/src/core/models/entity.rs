use std::fmt;

/// Stable identifier of an entity in the source store (e.g. `R-HSA-2029128`).
///
/// Identity of every entity is by stable identifier, never by structural
/// equality of its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StId(String);

impl StId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for StId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One catalyst record of a reaction-like event: the catalyzing physical
/// entity and the functional sub-parts (active units) actually responsible
/// for catalysis, when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalystActivity {
    pub physical_entity: StId,
    pub active_units: Vec<StId>,
}

/// The closed set of entity variants the engine dispatches over.
///
/// Child collections are lists of identifiers in which repeated occurrences
/// of the same identifier encode stoichiometry; resolution of the
/// identifiers back into entities goes through
/// [`EntityGraph`](crate::core::graph::EntityGraph).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    /// A small molecule, optionally carrying its reference-database
    /// accession (e.g. `ChEBI:15377`).
    SimpleEntity { reference: Option<String> },
    /// A protein or nucleic-acid product with an accessioned sequence.
    AccessionedSequence { accession: Option<String> },
    Complex { components: Vec<StId> },
    Set { members: Vec<StId> },
    Polymer { repeated_units: Vec<StId> },
    Reaction {
        inputs: Vec<StId>,
        catalysts: Vec<CatalystActivity>,
    },
    /// Any other physical entity the model does not further distinguish.
    Other,
}

impl EntityKind {
    /// The schema-class label used in output records and diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::SimpleEntity { .. } => "SimpleEntity",
            EntityKind::AccessionedSequence { .. } => "EntityWithAccessionedSequence",
            EntityKind::Complex { .. } => "Complex",
            EntityKind::Set { .. } => "EntitySet",
            EntityKind::Polymer { .. } => "Polymer",
            EntityKind::Reaction { .. } => "ReactionLikeEvent",
            EntityKind::Other => "PhysicalEntity",
        }
    }
}

/// The provenance kind of a container that produced an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Complex,
    Set,
    Polymer,
    Reaction,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContainerKind::Complex => "Complex",
            ContainerKind::Set => "EntitySet",
            ContainerKind::Polymer => "Polymer",
            ContainerKind::Reaction => "ReactionLikeEvent",
        };
        f.write_str(label)
    }
}

/// A biological object resolved from the external store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub st_id: StId,
    pub name: String,
    pub compartment: Option<String>,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(st_id: impl Into<StId>, name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            st_id: st_id.into(),
            name: name.into(),
            compartment: None,
            kind,
        }
    }

    pub fn is_simple(&self) -> bool {
        matches!(self.kind, EntityKind::SimpleEntity { .. })
    }

    /// Whether this entity subsumes other entities and is expanded by the
    /// inference engine.
    pub fn is_container(&self) -> bool {
        self.container_kind().is_some()
    }

    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self.kind {
            EntityKind::Complex { .. } => Some(ContainerKind::Complex),
            EntityKind::Set { .. } => Some(ContainerKind::Set),
            EntityKind::Polymer { .. } => Some(ContainerKind::Polymer),
            EntityKind::Reaction { .. } => Some(ContainerKind::Reaction),
            _ => None,
        }
    }

    /// Every directly referenced child identifier, across all roles.
    ///
    /// Repeated references are preserved; callers that need stoichiometry
    /// aggregate them through the participant extractor.
    pub fn child_ids(&self) -> Vec<&StId> {
        match &self.kind {
            EntityKind::Complex { components } => components.iter().collect(),
            EntityKind::Set { members } => members.iter().collect(),
            EntityKind::Polymer { repeated_units } => repeated_units.iter().collect(),
            EntityKind::Reaction { inputs, catalysts } => {
                let mut ids: Vec<&StId> = inputs.iter().collect();
                for activity in catalysts {
                    ids.push(&activity.physical_entity);
                    ids.extend(activity.active_units.iter());
                }
                ids
            }
            _ => Vec::new(),
        }
    }
}
