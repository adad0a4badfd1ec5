use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "widgetry.config.json";

/// Widgetry configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory containing widget templates
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    /// Widget definitions manifest
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Where rendered fragments are written
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Deepest widget nesting accepted when rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

fn default_manifest() -> String {
    "widgets.json".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn get_templates_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.templates_dir)
    }

    pub fn get_manifest_path(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.manifest)
    }

    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
            manifest: default_manifest(),
            out_dir: default_out_dir(),
            max_depth: None,
        }
    }
}
