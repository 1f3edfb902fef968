//! Configuration loading from envdoctor.toml.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{EnvDoctorError, EnvDoctorResult};

/// File name looked up in the scan root.
pub const CONFIG_FILE: &str = "envdoctor.toml";

/// Main configuration structure for envdoctor.toml.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct EnvDoctorConfig {
    /// Keys or patterns (`PREFIX*`, `*SUFFIX`) never reported.
    pub ignore: Option<Vec<String>>,
    /// Extra file or directory names excluded from the walk.
    pub exclude: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

impl EnvDoctorConfig {
    pub fn ignore_patterns(&self) -> &[String] {
        self.ignore.as_deref().unwrap_or_default()
    }

    pub fn excluded_names(&self) -> &[String] {
        self.exclude.as_deref().unwrap_or_default()
    }

    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output.as_ref().and_then(|o| o.format)
    }
}

/// Loads configuration from envdoctor.toml if it exists.
pub fn load_config(root: &Path) -> EnvDoctorResult<Option<EnvDoctorConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| EnvDoctorError::config(&path, e.to_string()))?;
    let cfg = toml::from_str(&content)
        .map_err(|e| EnvDoctorError::config(&path, format!("invalid {}: {}", CONFIG_FILE, e)))?;
    Ok(Some(cfg))
}
