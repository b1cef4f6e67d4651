use crate::cli::SpeciesArgs;
use crate::error::{CliError, Result};
use crate::graph::RemoteGraph;
use interactome::core::graph::EntityGraph;
use tracing::info;

pub async fn run(args: SpeciesArgs) -> Result<()> {
    let names = tokio::task::block_in_place(|| -> Result<Vec<String>> {
        let graph = RemoteGraph::connect(
            &args.connection.host,
            &args.connection.user,
            &args.connection.password,
            &args.connection.database,
        )?;
        graph.species_names().map_err(CliError::Graph)
    })?;

    info!("Found {} species.", names.len());
    for name in names {
        println!("{name}");
    }
    Ok(())
}
