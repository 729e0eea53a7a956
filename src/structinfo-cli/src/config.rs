//! Configuration management for the structinfo CLI

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use structinfo::{Options, ProcDirectory};

#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Report tunables (`region_limit`), read from the top level of the file
    #[serde(flatten)]
    pub options: Options,
    /// Where procfs is mounted
    pub proc_root: Option<PathBuf>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("structinfo");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from the default location, or defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn directory(&self) -> ProcDirectory {
        match &self.proc_root {
            Some(root) => ProcDirectory::new(root),
            None => ProcDirectory::default(),
        }
    }
}
