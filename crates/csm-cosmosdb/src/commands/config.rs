//! Configuration file commands
//!
//! Only `show` parses the file. `path` and `init` work on the location alone,
//! so a broken file can still be found and replaced.

use std::fs;
use std::path::{Path, PathBuf};

use csm_cosmosdb_core::config::CONFIG_TEMPLATE;
use tracing::{debug, info};

use crate::bootstrap::{AppContext, config_location};
use crate::cli::{ConfigCommands, OutputFormat};
use crate::error::{CliError, Result};
use crate::output;

pub fn handle_config_command(
    config_cmd: &ConfigCommands,
    config_file: Option<&str>,
    output_format: OutputFormat,
) -> Result<()> {
    use ConfigCommands::*;

    let explicit = config_file.map(PathBuf::from);
    match config_cmd {
        Show => handle_show(&AppContext::load(config_file)?, output_format),
        Path => handle_path(&config_location(explicit.as_deref())?, output_format),
        Init { force } => handle_init(&config_location(explicit.as_deref())?, *force),
    }
}

fn handle_show(ctx: &AppContext, output_format: OutputFormat) -> Result<()> {
    let masked = ctx.config.masked();

    match output::OutputFormat::from_cli(output_format) {
        Some(fmt) => output::print_output(&masked, fmt),
        None => {
            print!("{}", toml::to_string_pretty(&masked)?);
            Ok(())
        }
    }
}

fn handle_path(config_path: &Path, output_format: OutputFormat) -> Result<()> {
    match output::OutputFormat::from_cli(output_format) {
        Some(fmt) => {
            let output_data = serde_json::json!({
                "config_path": config_path.to_str(),
                "exists": config_path.exists(),
            });
            output::print_output(&output_data, fmt)
        }
        None => {
            println!("{}", config_path.display());
            Ok(())
        }
    }
}

fn handle_init(config_path: &Path, force: bool) -> Result<()> {
    let path_str = config_path.display().to_string();

    if config_path.exists() && !force {
        return Err(CliError::FileError {
            path: path_str,
            message: "file already exists".to_string(),
        });
    }

    if let Some(parent) = config_path.parent() {
        debug!("Creating config directory {}", parent.display());
        fs::create_dir_all(parent).map_err(|e| CliError::FileError {
            path: parent.display().to_string(),
            message: e.to_string(),
        })?;
    }

    fs::write(config_path, CONFIG_TEMPLATE).map_err(|e| CliError::FileError {
        path: path_str.clone(),
        message: e.to_string(),
    })?;

    info!("Wrote configuration template to {}", path_str);
    println!("Configuration written to {}", path_str);
    println!("Set platform.cosmosdb.enable = true and fill in platform.azure.cosmos to turn the module on.");
    Ok(())
}
