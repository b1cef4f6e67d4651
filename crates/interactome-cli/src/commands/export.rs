use crate::cli::ExportArgs;
use crate::config::PartialExportConfig;
use crate::error::{CliError, Result};
use crate::graph::RemoteGraph;
use crate::utils::format_elapsed;
use crate::utils::progress::CliProgressHandler;
use interactome::{
    core::io::{mitab::MitabWriter, traits::InteractionWriter, tsv::TsvWriter},
    engine::{filter::ReferenceTrivialSet, progress::ProgressReporter},
    workflows,
    workflows::export::ExportSummary,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

pub async fn run(args: ExportArgs) -> Result<()> {
    let partial = match &args.config {
        Some(path) => PartialExportConfig::from_file(path)?,
        None => PartialExportConfig::default(),
    };
    let config = partial.merge_with_cli(&args)?;

    let mitab_path = output_path(&args.output, "psi-mitab.txt");
    let tsv_path = output_path(&args.output, "tab-delimited.txt");
    info!(
        prefix = %args.output.display(),
        max_unit_size = config.max_unit_size,
        policy = %config.simple_entity_policy,
        "Resolved export settings."
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting interaction export...");
    let started = Instant::now();

    let result = tokio::task::block_in_place(|| -> Result<ExportSummary> {
        let graph = RemoteGraph::connect(
            &args.connection.host,
            &args.connection.user,
            &args.connection.password,
            &args.connection.database,
        )?;

        let mut mitab = MitabWriter::new(BufWriter::new(File::create(&mitab_path)?));
        let mut tsv = TsvWriter::new(BufWriter::new(File::create(&tsv_path)?));
        let mut writers: [&mut dyn InteractionWriter; 2] = [&mut mitab, &mut tsv];

        let classifier = ReferenceTrivialSet;
        workflows::export::run(&graph, &config, &classifier, &reporter, &mut writers)
            .map_err(CliError::from)
    });

    match result {
        Ok(summary) => {
            if summary.stats.oversized_groups > 0 {
                warn!(
                    skipped = summary.stats.oversized_groups,
                    "Role-groups above maxUnitSize were skipped."
                );
            }
            println!(
                "✓ Exported {} interactions from {} roots in {}",
                summary.interactions,
                summary.roots,
                format_elapsed(started.elapsed())
            );
            println!("  {}", mitab_path.display());
            println!("  {}", tsv_path.display());
            Ok(())
        }
        Err(error) => {
            // A failed run must not leave a usable-looking partial pair.
            let _ = std::fs::remove_file(&mitab_path);
            let _ = std::fs::remove_file(&tsv_path);
            Err(error)
        }
    }
}

fn output_path(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = prefix
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{suffix}"));
    prefix.with_file_name(name)
}
