use crate::core::graph::EntityGraph;
use crate::core::io::traits::InteractionWriter;
use crate::core::models::entity::StId;
use crate::engine::config::{ExportConfig, Selection};
use crate::engine::error::ExportError;
use crate::engine::filter::TrivialClassifier;
use crate::engine::inference::TraversalStats;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::stream::InteractionStream;
use std::collections::HashSet;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Unique interactions delivered to every writer.
    pub interactions: u64,
    /// Traversal roots the run expanded.
    pub roots: u64,
    /// Resolved species display names (empty for an object selection).
    pub species: Vec<String>,
    pub stats: TraversalStats,
}

/// Runs one complete export.
///
/// Roots are resolved from the configured selection, then the interaction
/// stream is pulled exactly once and every record fans out to all writers
/// (single-pass-with-fan-out: each encoder sees each unique interaction
/// exactly once without re-traversing). Any writer failure fails the run.
#[instrument(skip_all, name = "export_workflow")]
pub fn run<G: EntityGraph>(
    graph: &G,
    config: &ExportConfig,
    classifier: &dyn TrivialClassifier,
    reporter: &ProgressReporter,
    writers: &mut [&mut dyn InteractionWriter],
) -> Result<ExportSummary, ExportError> {
    reporter.report(Progress::PhaseStart {
        name: "Resolving roots",
    });
    let (roots, species) = resolve_roots(graph, &config.selection)?;
    info!(
        roots = roots.len(),
        species = species.len(),
        policy = %config.simple_entity_policy,
        max_unit_size = config.max_unit_size,
        "Traversal roots resolved."
    );
    reporter.report(Progress::PhaseFinish);

    let root_count = roots.len() as u64;
    reporter.report(Progress::TraversalStart { roots: root_count });

    let mut stream = InteractionStream::over(graph, config, classifier, roots, reporter);
    let mut interactions = 0u64;
    while let Some(interaction) = stream.next() {
        for writer in writers.iter_mut() {
            let format = writer.format_name();
            writer
                .write(&interaction)
                .map_err(|source| ExportError::Write { format, source })?;
        }
        interactions += 1;
    }
    for writer in writers.iter_mut() {
        let format = writer.format_name();
        writer
            .flush()
            .map_err(|source| ExportError::Write { format, source })?;
    }

    let stats = stream.stats();
    info!(
        interactions,
        containers = stats.containers,
        oversized_groups = stats.oversized_groups,
        "Export complete."
    );
    Ok(ExportSummary {
        interactions,
        roots: root_count,
        species,
        stats,
    })
}

/// Resolves the traversal roots.
///
/// Explicit objects are taken verbatim, each failing fast when unknown;
/// otherwise species names resolve through the graph (the single literal
/// `ALL` expands to every known species) and every top-level container under
/// the resolved set becomes a root.
fn resolve_roots<G: EntityGraph>(
    graph: &G,
    selection: &Selection,
) -> Result<(Vec<StId>, Vec<String>), ExportError> {
    match selection {
        Selection::Objects(ids) => {
            let mut roots = Vec::with_capacity(ids.len());
            for id in ids {
                let st_id = StId::from(id.as_str());
                graph
                    .entity(&st_id)
                    .map_err(|source| ExportError::Resolution {
                        name: id.clone(),
                        source,
                    })?;
                roots.push(st_id);
            }
            Ok((roots, Vec::new()))
        }
        Selection::Species(names) => {
            let species = resolve_species_names(graph, names)?;
            let mut roots = Vec::new();
            for name in &species {
                roots.extend(graph.roots_for_species(name)?);
            }
            let mut seen = HashSet::new();
            roots.retain(|root| seen.insert(root.clone()));
            Ok((roots, species))
        }
    }
}

fn resolve_species_names<G: EntityGraph>(
    graph: &G,
    names: &[String],
) -> Result<Vec<String>, ExportError> {
    let resolved = if names.len() == 1 && names[0].eq_ignore_ascii_case("all") {
        graph.species_names()?
    } else {
        names
            .iter()
            .map(|name| {
                graph
                    .species_display_name(name)
                    .map_err(|source| ExportError::Resolution {
                        name: name.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    let mut unique = Vec::with_capacity(resolved.len());
    let mut seen = HashSet::new();
    for name in resolved {
        if seen.insert(name.clone()) {
            unique.push(name);
        }
    }
    Ok(unique)
}
