//! CLI configuration file

use crate::error::{CliError, CliResult};
use autonomix_types::Principal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings read from `~/.config/autonomix/config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Daemon endpoint used when `--endpoint` is absent
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Principal sent as `X-Caller` when `--caller` is absent
    #[serde(default)]
    pub caller: Option<Principal>,
}

impl CliConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("autonomix").join("config.toml"))
    }

    /// Load an explicit file, or the default file when present
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let path = match path {
            Some(path) => PathBuf::from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let raw = std::fs::read_to_string(&path)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> CliResult<Self> {
        toml::from_str(raw).map_err(|e| CliError::Config(e.to_string()))
    }
}
