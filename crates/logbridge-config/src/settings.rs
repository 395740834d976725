use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Configuration file is not valid: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Identity of the application publishing log data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublisherSettings {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub application_name: String,
    #[serde(default)]
    pub application_version: String,
}

/// Where and how sessions are sent on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerSettings {
    #[serde(default)]
    pub auto_send_sessions: bool,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub send_all_applications: bool,
    #[serde(default)]
    pub server: String,
}

/// The on-disk configuration document, field names as the agent writes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AgentConfiguration {
    #[serde(default)]
    pub publisher: PublisherSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

impl AgentConfiguration {
    /// Load the configuration from a JSON file.
    ///
    /// A missing file is its own error so callers can distinguish "never
    /// configured" from "configured wrong"; no partial configuration is
    /// constructed in either case.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        debug!(path = %path.display(), "loaded agent configuration");
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        debug!(path = %path.display(), "saved agent configuration");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_field_names_are_pascal_case() {
        let config = AgentConfiguration {
            publisher: PublisherSettings {
                product_name: "Demo".to_string(),
                ..Default::default()
            },
            server: ServerSettings {
                auto_send_sessions: true,
                ..Default::default()
            },
        };

        let json = serde_json::to_value(&config).unwrap();
        assert!(json["Publisher"]["ProductName"].is_string());
        assert_eq!(json["Server"]["AutoSendSessions"], true);
    }

    #[test]
    fn missing_sections_default() {
        let config: AgentConfiguration = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AgentConfiguration::default());
    }
}
