//! Startup health reporting for the core database

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::traits::DatabaseProbe;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
    /// Module switched off by configuration
    Disabled,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    pub fn disabled() -> Self {
        Self {
            status: HealthStatus::Disabled,
            database: None,
            detail: Some("platform.cosmosdb.enable is false".to_string()),
            checked_at: Utc::now(),
        }
    }

    /// Database resolved but not contacted
    pub fn resolved(database: &str) -> Self {
        Self {
            status: HealthStatus::Up,
            database: Some(database.to_string()),
            detail: Some("resolved, not probed".to_string()),
            checked_at: Utc::now(),
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == HealthStatus::Up
    }
}

/// Probe a database and turn the outcome into a report
pub async fn check_database<D>(database: &D) -> HealthReport
where
    D: DatabaseProbe + ?Sized,
{
    let (status, detail) = match database.probe().await {
        Ok(()) => {
            info!("Database '{}' is reachable", database.id());
            (HealthStatus::Up, None)
        }
        Err(e) => {
            warn!("Database '{}' probe failed: {}", database.id(), e);
            (HealthStatus::Down, Some(e.to_string()))
        }
    };

    HealthReport {
        status,
        database: Some(database.id().to_string()),
        detail,
        checked_at: Utc::now(),
    }
}
