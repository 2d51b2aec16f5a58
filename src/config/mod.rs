use crate::error::{Result, RewatchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Watcher and supervisor configuration loaded from a config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Command to run after every change. Empty means supervision is
    /// disabled; the supervisor warns once and stops.
    #[serde(default)]
    pub post_change_command: String,

    /// Arguments passed to the post-change command
    #[serde(default)]
    pub post_change_args: Vec<String>,

    /// Directories scanned for changes
    #[serde(default = "default_watch_paths")]
    pub watch_paths: Vec<PathBuf>,

    /// File extensions that count as a change (empty = all files)
    #[serde(default)]
    pub watch_extensions: Vec<String>,

    /// Directory names skipped while scanning
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,

    /// Scan interval in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Name of the file this configuration was loaded from, used in the
    /// missing-command warning
    #[serde(skip, default = "default_config_file")]
    pub config_file_name: String,
}

// Default value functions for serde
fn default_watch_paths() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}

fn default_ignore_dirs() -> Vec<String> {
    vec![
        ".git".to_string(),
        "target".to_string(),
        "node_modules".to_string(),
    ]
}

fn default_poll_interval() -> u64 {
    500
}

fn default_config_file() -> String {
    "rewatch.toml".to_string()
}

impl WatchConfig {
    /// Build a configuration programmatically, with default watch settings
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            post_change_command: command.into(),
            post_change_args: args,
            watch_paths: default_watch_paths(),
            watch_extensions: Vec::new(),
            ignore_dirs: default_ignore_dirs(),
            poll_interval_ms: default_poll_interval(),
            config_file_name: default_config_file(),
        }
    }

    /// Load the configuration from a file (supports TOML and JSON)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RewatchError::ConfigError(format!("Failed to read config file: {}", e)))?;

        // Determine format based on file extension
        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let mut config: WatchConfig = match extension {
            "toml" => toml::from_str(&contents)
                .map_err(|e| RewatchError::InvalidConfig(format!("Failed to parse TOML: {}", e)))?,
            "json" => serde_json::from_str(&contents)
                .map_err(|e| RewatchError::InvalidConfig(format!("Failed to parse JSON: {}", e)))?,
            _ => {
                return Err(RewatchError::InvalidConfig(format!(
                    "Unsupported file format: {}. Use .toml or .json",
                    extension
                )))
            }
        };

        config.config_file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("rewatch.toml")
            .to_string();

        config.validate()?;
        Ok(config)
    }

    /// Validate the watch settings.
    ///
    /// An empty `post_change_command` is deliberately allowed here: the
    /// supervisor loop reports it as its own warning.
    pub fn validate(&self) -> Result<()> {
        if self.watch_paths.is_empty() {
            return Err(RewatchError::ConfigError(
                "watch_paths must not be empty".to_string(),
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(RewatchError::ConfigError(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Command and arguments joined with spaces, as shown in log lines
    pub fn command_line(&self) -> String {
        let mut line = self.post_change_command.clone();
        for arg in &self.post_change_args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}
