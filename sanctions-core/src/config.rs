use crate::error::{SanctionError, SanctionResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "sanctions.yaml";

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_log_file_path() -> String {
    "sanktionen_log.txt".to_string()
}

fn default_export_path() -> String {
    "sanktionen_output.csv".to_string()
}

fn default_input_path() -> String {
    "acp_data.txt".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Append-only action log
    #[serde(default = "default_log_file_path")]
    pub log_file_path: String,
    /// Target of `--save`
    #[serde(default = "default_export_path")]
    pub default_export_path: String,
    /// ACP export read when no input is given on the command line
    #[serde(default = "default_input_path")]
    pub input_path: String,
    /// Pipeline configuration - defines which rules to run and in what order
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub rules: RuleThresholds,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// List of rules to run in order
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Name of the rule
    pub name: String,
    /// Whether this rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                RuleConfig {
                    name: "MultiClub".to_string(),
                    enabled: true,
                },
                RuleConfig {
                    name: "SharedClub".to_string(),
                    enabled: true,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    /// §1.1 applies to accounts with strictly more clubs than this (at least 1)
    pub min_clubs_per_account: usize,
    /// §1.4 applies to clubs with strictly more accounts than this
    pub max_accounts_per_club: usize,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            min_clubs_per_account: 1,
            max_accounts_per_club: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Write the `Benutzername` column. Off reproduces the old four-column sheet.
    #[serde(default = "default_true")]
    pub include_username: bool,
    /// csv or json
    #[serde(default = "default_export_format")]
    pub format: String,
}

fn default_export_format() -> String {
    "csv".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_username: true,
            format: default_export_format(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            log_file_path: default_log_file_path(),
            default_export_path: default_export_path(),
            input_path: default_input_path(),
            pipeline: PipelineConfig::default(),
            rules: RuleThresholds::default(),
            export: ExportConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load config from file path
    pub fn load_from_file(path: impl AsRef<Path>) -> SanctionResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SanctionError::io(path, e))?;
        let config: AnalysisConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                log::warn!("Failed to load config from {p} ({e}), using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Load config, writing the defaults to `path` first if the file does not exist
    pub fn load_or_init(path: impl AsRef<Path>) -> SanctionResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load_from_file(path);
        }
        let config = Self::default();
        config.save_to_file(path)?;
        log::info!("Wrote default config to {}", path.display());
        Ok(config)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> SanctionResult<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml).map_err(|e| SanctionError::io(path, e))
    }
}
