use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "interactome CLI - Exports pairwise molecular interactions inferred from hierarchical pathway content.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export inferred interactions to PSI-MITAB and tab-delimited files.
    Export(ExportArgs),
    /// List every species known to the entity store.
    Species(SpeciesArgs),
    /// Print the containment tree of one object with roles and stoichiometries.
    Tree(TreeArgs),
}

/// Connection settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// The entity-store host, e.g. http://localhost:7474.
    #[arg(short = 'H', long, required = true, value_name = "URL")]
    pub host: String,

    /// The entity-store user.
    #[arg(short, long, required = true, value_name = "NAME")]
    pub user: String,

    /// The entity-store password.
    #[arg(short, long, required = true, value_name = "SECRET")]
    pub password: String,

    /// The database name inside the store.
    #[arg(long, default_value = "neo4j", value_name = "NAME")]
    pub database: String,
}

/// Arguments for the `export` subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Prefix of the two output files
    /// (writes <PREFIX>.psi-mitab.txt and <PREFIX>.tab-delimited.txt).
    #[arg(short, long, required = true, value_name = "PREFIX")]
    pub output: PathBuf,

    /// Path to an optional configuration file in TOML format.
    /// CLI flags override values from the file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// The maximum size of complexes/sets from which interactions are
    /// considered significant.
    #[arg(short, long, value_name = "INT")]
    pub max_unit_size: Option<usize>,

    /// One or more species to export interactions for.
    /// Pass the literal ALL to export every species.
    #[arg(short, long, value_name = "NAME")]
    pub species: Vec<String>,

    /// Export interactions under these objects only; species are ignored.
    #[arg(short = 'O', long, value_name = "ST_ID")]
    pub object: Vec<String>,

    /// Whether simple entities are exported: ALL, NONE or NON_TRIVIAL.
    #[arg(short = 't', long, value_name = "POLICY")]
    pub simple_entities_policy: Option<String>,
}

/// Arguments for the `species` subcommand.
#[derive(Args, Debug)]
pub struct SpeciesArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Arguments for the `tree` subcommand.
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Stable identifier of the object to print.
    #[arg(required = true, value_name = "ST_ID")]
    pub object: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn export_arguments_parse_with_repeats() {
        let cli = Cli::parse_from([
            "interactome",
            "export",
            "--host",
            "http://localhost:7474",
            "--user",
            "neo4j",
            "--password",
            "secret",
            "--output",
            "out/interactions",
            "--species",
            "Homo sapiens",
            "--species",
            "Mus musculus",
            "-vv",
        ]);

        assert_eq!(cli.verbose, 2);
        let Commands::Export(args) = cli.command else {
            panic!("expected the export subcommand");
        };
        assert_eq!(args.species.len(), 2);
        assert!(args.object.is_empty());
        assert_eq!(args.connection.database, "neo4j");
    }

    #[test]
    fn missing_required_connection_flags_fail() {
        let result = Cli::try_parse_from(["interactome", "export", "--output", "prefix"]);
        assert!(result.is_err());
    }
}
