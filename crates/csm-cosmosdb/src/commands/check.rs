//! `check`: wire the module the way the platform API does at startup

use colored::Colorize;
use csm_cosmosdb_core::{CosmosBacked, CosmosClient, CosmosService, HealthReport, check_database};
use serde::Serialize;
use tracing::{debug, info};

use crate::bootstrap::AppContext;
use crate::cli::OutputFormat;
use crate::error::{CliError, Result};
use crate::output;

#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistency_level: Option<String>,
    pub health: HealthReport,
}

/// Minimal service wired from the module, standing in for the platform's
/// own services
struct StartupService {
    cosmos: CosmosService<CosmosClient>,
}

impl CosmosBacked for StartupService {
    type Client = CosmosClient;

    fn cosmos(&self) -> &CosmosService<CosmosClient> {
        &self.cosmos
    }
}

pub async fn handle_check(
    ctx: &AppContext,
    probe: bool,
    output_format: OutputFormat,
) -> Result<()> {
    let Some(module) = ctx.cosmos_module()? else {
        let result = CheckOutput {
            enabled: false,
            endpoint: None,
            consistency_level: None,
            health: HealthReport::disabled(),
        };
        return print_check(&result, output_format);
    };

    let service = StartupService {
        cosmos: module.service()?,
    };
    let client = service.cosmos_client();
    debug!("Client endpoint: {}", client.endpoint());

    let health = if probe {
        info!("Probing core database '{}'", service.core_database().id());
        check_database(service.core_database()).await
    } else {
        HealthReport::resolved(service.core_database().id())
    };

    let result = CheckOutput {
        enabled: true,
        endpoint: Some(client.endpoint().to_string()),
        consistency_level: Some(client.consistency_level().to_string()),
        health,
    };
    print_check(&result, output_format)?;

    if result.health.is_up() {
        Ok(())
    } else {
        Err(CliError::Unhealthy {
            database: service.core_database().id().to_string(),
            detail: result.health.detail.unwrap_or_default(),
        })
    }
}

fn print_check(result: &CheckOutput, output_format: OutputFormat) -> Result<()> {
    if let Some(fmt) = output::OutputFormat::from_cli(output_format) {
        return output::print_output(result, fmt);
    }

    if !result.enabled {
        println!("Cosmos DB: {}", "disabled".yellow());
        println!("  platform.cosmosdb.enable is false, no client was created");
        return Ok(());
    }

    println!("Cosmos DB: {}", "enabled".green());
    if let Some(endpoint) = &result.endpoint {
        println!("  Endpoint:          {}", endpoint);
    }
    if let Some(level) = &result.consistency_level {
        println!("  Consistency level: {}", level);
    }
    if let Some(database) = &result.health.database {
        println!("  Core database:     {}", database);
    }

    let status = if result.health.is_up() {
        "UP".green()
    } else {
        "DOWN".red()
    };
    match &result.health.detail {
        Some(detail) => println!("  Status:            {} ({})", status, detail),
        None => println!("  Status:            {}", status),
    }

    Ok(())
}
