use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::{debug, error, info, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bootstrap;
mod cli;
mod commands;
mod error;
mod output;

use bootstrap::AppContext;
use cli::{Cli, Commands};
use error::CliError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level
    init_tracing(cli.verbose);

    if let Err(e) = execute_command(&cli).await {
        e.print_diagnostic();
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "csm_cosmosdb=warn,csm_cosmosdb_core=warn",
            1 => "csm_cosmosdb=info,csm_cosmosdb_core=info",
            2 => "csm_cosmosdb=debug,csm_cosmosdb_core=debug",
            _ => "csm_cosmosdb=trace,csm_cosmosdb_core=trace,reqwest=debug",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

async fn execute_command(cli: &Cli) -> Result<(), CliError> {
    trace!("Executing command: {:?}", cli.command);
    info!("Command: {}", format_command(&cli.command));

    let start = std::time::Instant::now();
    let result = match &cli.command {
        Commands::Version => {
            debug!("Showing version information");
            match output::OutputFormat::from_cli(cli.output) {
                Some(fmt) => {
                    let output_data = serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "name": env!("CARGO_PKG_NAME"),
                    });
                    output::print_output(&output_data, fmt)
                }
                None => {
                    println!("csm-cosmosdb {}", env!("CARGO_PKG_VERSION"));
                    Ok(())
                }
            }
        }
        Commands::Completions { shell } => {
            debug!("Generating completions for {:?}", shell);
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        Commands::Check { probe } => execute_check(cli, *probe).await,
        Commands::Config(config_cmd) => {
            debug!("Executing config command");
            commands::config::handle_config_command(
                config_cmd,
                cli.config_file.as_deref(),
                cli.output,
            )
        }
    };

    let duration = start.elapsed();
    match &result {
        Ok(_) => info!("Command completed successfully in {:?}", duration),
        Err(e) => error!("Command failed after {:?}: {}", duration, e),
    }

    result
}

async fn execute_check(cli: &Cli, probe: bool) -> Result<(), CliError> {
    let ctx = AppContext::load(cli.config_file.as_deref())?;
    commands::check::handle_check(&ctx, probe, cli.output).await
}

/// Format command for human-readable logging
fn format_command(command: &Commands) -> String {
    match command {
        Commands::Version => "version".to_string(),
        Commands::Completions { shell } => format!("completions {:?}", shell),
        Commands::Check { probe } => {
            if *probe {
                "check --probe".to_string()
            } else {
                "check".to_string()
            }
        }
        Commands::Config(cmd) => format!("config {:?}", cmd).to_lowercase(),
    }
}
