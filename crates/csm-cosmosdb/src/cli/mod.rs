//! CLI structure and command definitions

use clap::{Parser, Subcommand};

/// Cosmos DB wiring for the Cosmo Tech platform API
#[derive(Parser, Debug)]
#[command(name = "csm-cosmosdb")]
#[command(
    version,
    about = "Conditional Cosmos DB client wiring for the Cosmo Tech platform API"
)]
#[command(long_about = "
Conditional Cosmos DB client wiring for the Cosmo Tech platform API

The Cosmos DB client is only built when platform.cosmosdb.enable is true.
When it is, the core database named by platform.azure.cosmos.core_database.name
must be configured or startup fails.

EXAMPLES:
    # Write a starter configuration file
    csm-cosmosdb config init

    # Check the wiring without contacting the service
    csm-cosmosdb check

    # Check the wiring and read the core database
    csm-cosmosdb check --probe -o json

    # Use an explicit config file (environment overrides are ignored)
    csm-cosmosdb --config-file ./platform.toml check

For more help on a specific command, run:
    csm-cosmosdb <command> --help
")]
pub struct Cli {
    /// Path to alternate configuration file
    #[arg(long, global = true, env = "CSM_COSMOSDB_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Auto,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Wire the Cosmos DB module from configuration and report the result
    #[command(after_help = "EXAMPLES:
    # Resolve the core database without any network call
    csm-cosmosdb check

    # Also read the core database from the service
    csm-cosmosdb check --probe
")]
    Check {
        /// Read the core database to confirm it exists and the key is accepted
        #[arg(long)]
        probe: bool,
    },

    /// Configuration file management
    #[command(subcommand, visible_alias = "cfg")]
    Config(ConfigCommands),

    /// Version information
    #[command(visible_alias = "ver")]
    Version,

    /// Generate shell completions
    #[command(visible_alias = "comp")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Configuration file commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration with the master key masked
    Show,

    /// Show the path to the configuration file
    Path,

    /// Write a starter configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
