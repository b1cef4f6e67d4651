use crate::cli::TreeArgs;
use crate::error::{CliError, Result};
use crate::graph::RemoteGraph;
use interactome::core::graph::EntityGraph;
use interactome::core::models::entity::{Entity, StId};
use interactome::core::models::participants::Role;
use interactome::engine::extractor::participants_of;
use std::collections::HashSet;
use std::fmt::Write;
use tracing::warn;

pub async fn run(args: TreeArgs) -> Result<()> {
    let rendered = tokio::task::block_in_place(|| -> Result<String> {
        let graph = RemoteGraph::connect(
            &args.connection.host,
            &args.connection.user,
            &args.connection.password,
            &args.connection.database,
        )?;
        let root = StId::from(args.object.as_str());
        let entity = graph.entity(&root).map_err(CliError::Graph)?;

        let mut out = String::new();
        let mut in_path = HashSet::new();
        render(&graph, &entity, 1, 0, None, &mut in_path, &mut out);
        Ok(out)
    })?;

    print!("{rendered}");
    Ok(())
}

/// Renders one entity line and recurses into its participant groups,
/// mirroring the extractor's role table. Identifiers already on the current
/// path are printed but not re-expanded.
fn render<G: EntityGraph>(
    graph: &G,
    entity: &Entity,
    stoichiometry: u32,
    level: usize,
    role: Option<Role>,
    in_path: &mut HashSet<StId>,
    out: &mut String,
) {
    for _ in 0..level {
        out.push_str("|    ");
    }
    let parts = participants_of(entity);
    let marker = match role {
        Some(role) => role.to_string(),
        None if parts.is_empty() => "-".to_string(),
        None => "+".to_string(),
    };
    let _ = writeln!(
        out,
        "{} {}:{}({})",
        marker,
        entity.kind.label(),
        entity.st_id,
        stoichiometry
    );

    if !in_path.insert(entity.st_id.clone()) {
        return;
    }
    for group_role in parts.roles() {
        let Some(group) = parts.group(group_role) else {
            continue;
        };
        for (child_id, &child_stoichiometry) in group {
            match graph.entity(child_id) {
                Ok(child) => render(
                    graph,
                    &child,
                    child_stoichiometry,
                    level + 1,
                    Some(group_role),
                    in_path,
                    out,
                ),
                Err(error) => {
                    warn!(child = %child_id, %error, "Skipping unresolvable child in tree");
                }
            }
        }
    }
    in_path.remove(&entity.st_id);
}
