//! Configuration management for finreport
//!
//! This module handles loading, validation, and management of
//! finreport configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Report layout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Rendering units emitted per indentation unit
    #[serde(default = "default_indent_scale")]
    pub indent_scale: u32,
    /// Item level that renders without base indentation
    #[serde(default = "default_level_starts_from")]
    pub level_starts_from: u32,
    /// First line number handed out in a report
    #[serde(default = "default_line_number_start")]
    pub line_number_start: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            indent_scale: default_indent_scale(),
            level_starts_from: default_level_starts_from(),
            line_number_start: default_line_number_start(),
        }
    }
}

fn default_indent_scale() -> u32 {
    2
}

fn default_level_starts_from() -> u32 {
    1
}

fn default_line_number_start() -> u32 {
    1
}

/// Display labels used by report headers and entry prefixes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Header of the line number column
    #[serde(default = "default_line_number_label")]
    pub line_number: String,
    /// Prefix shown before the first item of an adding group
    #[serde(default = "default_sum_factor_add")]
    pub sum_factor_add: String,
    /// Prefix shown before the first item of a deducting group
    #[serde(default = "default_sum_factor_deduct")]
    pub sum_factor_deduct: String,
    /// Prefix shown before the first breakdown item of a run
    #[serde(default = "default_breakdown_label")]
    pub breakdown: String,
    /// Amount type key -> column title
    #[serde(default)]
    pub amount_types: HashMap<String, String>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            line_number: default_line_number_label(),
            sum_factor_add: default_sum_factor_add(),
            sum_factor_deduct: default_sum_factor_deduct(),
            breakdown: default_breakdown_label(),
            amount_types: HashMap::new(),
        }
    }
}

impl LabelConfig {
    /// Title for an amount type, falling back to the key itself
    pub fn amount_type_title(&self, key: &str) -> String {
        self.amount_types
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

fn default_line_number_label() -> String {
    "行次".to_string()
}

fn default_sum_factor_add() -> String {
    "加：".to_string()
}

fn default_sum_factor_deduct() -> String {
    "减：".to_string()
}

fn default_breakdown_label() -> String {
    "其中：".to_string()
}

/// What the tree builder does with records whose parent is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Leave orphans out of the forest and report their ids
    Collect,
    /// Promote orphans to roots
    AttachAsRoot,
    /// Fail the whole build
    Reject,
}

impl Default for OrphanPolicy {
    fn default() -> Self {
        OrphanPolicy::Collect
    }
}

impl std::str::FromStr for OrphanPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "collect" => Ok(OrphanPolicy::Collect),
            "attach_as_root" | "root" => Ok(OrphanPolicy::AttachAsRoot),
            "reject" => Ok(OrphanPolicy::Reject),
            _ => Err(format!("Invalid orphan policy: {}", s)),
        }
    }
}

impl std::fmt::Display for OrphanPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrphanPolicy::Collect => write!(f, "collect"),
            OrphanPolicy::AttachAsRoot => write!(f, "attach_as_root"),
            OrphanPolicy::Reject => write!(f, "reject"),
        }
    }
}

/// Tree building settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TreeConfig {
    #[serde(default)]
    pub orphan_policy: OrphanPolicy,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Report layout settings
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Header and prefix labels
    #[serde(default)]
    pub labels: LabelConfig,
    /// Tree building settings
    #[serde(default)]
    pub tree: TreeConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|_| ConfigError::IoError)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document is a valid, all-default config
        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.indent_scale == 0 || self.layout.indent_scale > 8 {
            return Err(ConfigError::InvalidValue {
                field: "layout.indent_scale".to_string(),
                reason: "Indent scale must be between 1 and 8".to_string(),
            });
        }

        if self.layout.level_starts_from == 0 {
            return Err(ConfigError::InvalidValue {
                field: "layout.level_starts_from".to_string(),
                reason: "Levels are 1-based".to_string(),
            });
        }

        if self.layout.line_number_start == 0 {
            return Err(ConfigError::InvalidValue {
                field: "layout.line_number_start".to_string(),
                reason: "Line numbers start at 1 or later".to_string(),
            });
        }

        if self.labels.sum_factor_add == self.labels.sum_factor_deduct {
            return Err(ConfigError::ValidationError {
                message: "labels.sum_factor_add and labels.sum_factor_deduct must differ".to_string(),
            });
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "logging.level".to_string(),
                    reason: format!("Unknown log level '{}'", other),
                })
            }
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}
