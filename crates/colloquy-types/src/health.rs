use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
    Down,
}

/// Response of the agent bridge `/health` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub checkpointer: String,
}

impl HealthReport {
    /// Synthetic report used when the bridge cannot be reached at all
    pub fn down() -> Self {
        Self {
            status: HealthStatus::Down,
            version: "unknown".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            database: "error".to_string(),
            checkpointer: "error".to_string(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status != HealthStatus::Down
    }
}
