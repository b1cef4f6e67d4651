use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_MAX_UNIT_SIZE: usize = 4;
pub const DEFAULT_SPECIES: &str = "Homo sapiens";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Unknown simple-entities policy '{0}', expected ALL, NONE or NON_TRIVIAL")]
    UnknownPolicy(String),

    #[error("maxUnitSize must be at least 2, got {0}")]
    MaxUnitSizeTooSmall(usize),

    #[error("Selection contains no objects or species")]
    EmptySelection,
}

/// Whether small molecules survive into interaction output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimpleEntityPolicy {
    /// Every simple entity is admitted.
    All,
    /// Every simple entity is rejected.
    None,
    /// Simple entities classified as trivial cofactors are rejected.
    #[default]
    NonTrivial,
}

impl FromStr for SimpleEntityPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "all" => Ok(SimpleEntityPolicy::All),
            "none" => Ok(SimpleEntityPolicy::None),
            "non_trivial" | "non-trivial" => Ok(SimpleEntityPolicy::NonTrivial),
            _ => Err(ConfigError::UnknownPolicy(value.to_string())),
        }
    }
}

impl fmt::Display for SimpleEntityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SimpleEntityPolicy::All => "ALL",
            SimpleEntityPolicy::None => "NONE",
            SimpleEntityPolicy::NonTrivial => "NON_TRIVIAL",
        };
        f.write_str(label)
    }
}

/// What the traversal roots are resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Explicit object identifiers; species selection is ignored.
    Objects(Vec<String>),
    /// Species names; the single literal `ALL` expands to every known
    /// species.
    Species(Vec<String>),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Species(vec![DEFAULT_SPECIES.to_string()])
    }
}

/// Immutable settings of one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub selection: Selection,
    pub simple_entity_policy: SimpleEntityPolicy,
    /// Maximum admitted participant count of one role-group; larger groups
    /// are skipped, not truncated.
    pub max_unit_size: usize,
}

#[derive(Debug, Default)]
pub struct ExportConfigBuilder {
    selection: Option<Selection>,
    simple_entity_policy: Option<SimpleEntityPolicy>,
    max_unit_size: Option<usize>,
}

impl ExportConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn simple_entity_policy(mut self, policy: SimpleEntityPolicy) -> Self {
        self.simple_entity_policy = Some(policy);
        self
    }

    pub fn max_unit_size(mut self, size: usize) -> Self {
        self.max_unit_size = Some(size);
        self
    }

    pub fn build(self) -> Result<ExportConfig, ConfigError> {
        let selection = self
            .selection
            .ok_or(ConfigError::MissingParameter("selection"))?;
        let empty = match &selection {
            Selection::Objects(ids) => ids.is_empty(),
            Selection::Species(names) => names.is_empty(),
        };
        if empty {
            return Err(ConfigError::EmptySelection);
        }

        let max_unit_size = self.max_unit_size.unwrap_or(DEFAULT_MAX_UNIT_SIZE);
        if max_unit_size < 2 {
            return Err(ConfigError::MaxUnitSizeTooSmall(max_unit_size));
        }

        Ok(ExportConfig {
            selection,
            simple_entity_policy: self.simple_entity_policy.unwrap_or_default(),
            max_unit_size,
        })
    }
}
