//! Host configuration.
//!
//! Handles loading and validation of the host configuration from TOML
//! files.

use agora_governance::GovernanceConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Host configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Instance name, used in logs
    #[serde(default = "default_name")]
    pub name: String,
    /// Governance parameters
    pub governance: GovernanceConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_name() -> String {
    "agora".to_string()
}

impl HostConfig {
    /// Config with default name and logging.
    pub fn new(governance: GovernanceConfig) -> Self {
        Self {
            name: default_name(),
            governance,
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from file.
    /// Paths containing `..` are rejected.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        check_path(path)?;

        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: HostConfig = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        Ok(config)
    }

    /// Save configuration to file.
    pub fn to_file(&self, path: &Path) -> anyhow::Result<()> {
        check_path(path)?;

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .map_err(|e| anyhow::anyhow!("Failed to write config file '{}': {}", path.display(), e))?;
        Ok(())
    }

    /// Validate configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Host name cannot be empty");
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            anyhow::bail!("Unknown log format '{}'", self.logging.format);
        }
        self.governance.validate()?;
        Ok(())
    }
}

fn check_path(path: &Path) -> anyhow::Result<()> {
    if path.to_string_lossy().contains("..") {
        anyhow::bail!("Invalid path: directory traversal detected");
    }
    Ok(())
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level / filter directive
    pub level: String,
    /// Log to file instead of stdout
    pub log_file: Option<std::path::PathBuf>,
    /// Log format (json|pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_file: None,
            format: "pretty".to_string(),
        }
    }
}
