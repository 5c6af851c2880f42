//! TOML configuration: dataset locations and the region shard registry.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::dataset::DatasetLocator;
use crate::shard::ShardRegistry;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub global: GlobalConfig,
    #[serde(default)]
    pub regions: Vec<RegionConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalConfig {
    /// Reference points (one row per school)
    pub schools: DatasetLocator,
    /// Single candidate dataset, used when no regions are configured
    pub addresses: Option<DatasetLocator>,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegionConfig {
    pub name: String,
    pub url: DatasetLocator,
}

fn default_http_timeout_secs() -> u64 {
    60
}

impl Config {
    /// Load a config file. Relative dataset paths are taken relative to the
    /// file's directory.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = Self::parse(&content)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.relative_to(base))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    fn relative_to(mut self, base: &Path) -> Self {
        self.global.schools = self.global.schools.relative_to(base);
        self.global.addresses = self.global.addresses.map(|l| l.relative_to(base));
        for region in &mut self.regions {
            region.url = region.url.clone().relative_to(base);
        }
        self
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.global.http_timeout_secs)
    }

    pub fn shard_registry(&self) -> Result<ShardRegistry> {
        let registry = ShardRegistry::new(
            self.regions
                .iter()
                .map(|r| (r.name.clone(), r.url.clone())),
        )?;
        Ok(registry)
    }
}
