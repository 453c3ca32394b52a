use serde::{Deserialize, Serialize};

fn default_history_limit() -> u32 {
    50
}

fn default_reconcile_limit() -> u32 {
    5
}

/// Connection settings for the agent bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Base URL of the bridge, e.g. "https://agent.example.com"
    pub base_url: String,
    /// Entries requested when revalidating a thread transcript
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
    /// Entries inspected after a failed send
    #[serde(default = "default_reconcile_limit")]
    pub reconcile_limit: u32,
    /// Whole-request timeout enforced by the HTTP transport (none by default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}

impl AgentConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            history_limit: default_history_limit(),
            reconcile_limit: default_reconcile_limit(),
            request_timeout_secs: None,
        }
    }

    pub fn with_history_limit(mut self, limit: u32) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_reconcile_limit(mut self, limit: u32) -> Self {
        self.reconcile_limit = limit;
        self
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Base URL without trailing slashes
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_on_deserialize() {
        let config: AgentConfig = serde_json::from_str(r#"{"base_url":"http://localhost:8000/"}"#).unwrap();
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.reconcile_limit, 5);
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.normalized_base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_builder_setters() {
        let config = AgentConfig::new("http://bridge")
            .with_history_limit(10)
            .with_reconcile_limit(3)
            .with_request_timeout(30);
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.reconcile_limit, 3);
        assert_eq!(config.request_timeout_secs, Some(30));
    }
}
