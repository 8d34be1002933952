use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;

use crate::models::{Credentials, Variables};

/// Config holds all run configuration, from CLI flags with env fallbacks
#[derive(Debug, Clone, Parser)]
#[command(name = "wlan-provision", about = "Provision WLAN profiles on Central")]
pub struct Config {
    /// Central API token file (JSON)
    #[arg(long, env = "CENTRAL_TOKEN_FILE", default_value = "central_token.json")]
    pub credentials_file: PathBuf,

    /// Profile variables file (YAML)
    #[arg(long, env = "PROFILE_VARS_FILE", default_value = "vars.yaml")]
    pub variables_file: PathBuf,

    /// Directory holding the JSON profile templates
    #[arg(long, env = "TEMPLATES_DIR", default_value = "templates")]
    pub templates_dir: PathBuf,
}

/// Fatal user errors around the input files. No retries; the run aborts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("file '{path}' not found")]
    NotFound { path: String },

    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("error parsing JSON file '{path}': {source}")]
    ParseJson {
        path: String,
        source: serde_json::Error,
    },

    #[error("error parsing YAML file '{path}': {source}")]
    ParseYaml {
        path: String,
        source: serde_yaml::Error,
    },
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    let display = path.display().to_string();
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound { path: display }
        } else {
            ConfigError::Read {
                path: display,
                source: e,
            }
        }
    })
}

/// Load the Central token data from a JSON file
pub fn load_credentials(path: &Path) -> Result<Credentials, ConfigError> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|e| ConfigError::ParseJson {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the profile variables from a YAML file
pub fn load_variables(path: &Path) -> Result<Variables, ConfigError> {
    let content = read_file(path)?;
    serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseYaml {
        path: path.display().to_string(),
        source: e,
    })
}
