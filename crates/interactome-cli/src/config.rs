use crate::cli::ExportArgs;
use crate::error::{CliError, Result};
use interactome::engine::config::{
    DEFAULT_SPECIES, ExportConfig, ExportConfigBuilder, Selection, SimpleEntityPolicy,
};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Export settings loadable from a TOML file; every field is optional and
/// CLI flags take precedence over file values.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct PartialExportConfig {
    #[serde(rename = "max-unit-size")]
    pub max_unit_size: Option<usize>,

    pub species: Option<Vec<String>>,

    #[serde(rename = "simple-entities-policy")]
    pub simple_entities_policy: Option<String>,
}

impl PartialExportConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        let parsed = toml::from_str(&text).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: anyhow::anyhow!(e),
        })?;
        debug!("Loaded configuration file {:?}", path);
        Ok(parsed)
    }

    /// Merges file values under CLI flags and builds the final run
    /// configuration. Explicit objects override any species selection.
    pub fn merge_with_cli(self, args: &ExportArgs) -> Result<ExportConfig> {
        let policy = match args
            .simple_entities_policy
            .as_deref()
            .or(self.simple_entities_policy.as_deref())
        {
            Some(text) => text.parse::<SimpleEntityPolicy>()?,
            None => SimpleEntityPolicy::default(),
        };

        let selection = if !args.object.is_empty() {
            Selection::Objects(args.object.clone())
        } else if !args.species.is_empty() {
            Selection::Species(args.species.clone())
        } else {
            Selection::Species(
                self.species
                    .unwrap_or_else(|| vec![DEFAULT_SPECIES.to_string()]),
            )
        };

        let mut builder = ExportConfigBuilder::new()
            .selection(selection)
            .simple_entity_policy(policy);
        if let Some(size) = args.max_unit_size.or(self.max_unit_size) {
            builder = builder.max_unit_size(size);
        }
        Ok(builder.build()?)
    }
}
