//! Runtime configuration, read from the environment (and `.env` when present).
//!
//! | Variable                    | Default            |
//! |-----------------------------|--------------------|
//! | `PATHOGEN_DATA_DIR`         | `.`                |
//! | `PATHOGEN_BIND_ADDR`        | `127.0.0.1:5000`   |
//! | `PATHOGEN_<CATEGORY>_FILES` | category default   |
//!
//! `<CATEGORY>` is one of `VIRUS`, `BACTERIA`, `FUNGI`, `OTHERS`; the value is
//! a comma-separated list of paths.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::data::category::Category;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Relative source paths resolve against this directory.
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub sources: BTreeMap<Category, Vec<PathBuf>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            sources: Category::ALL
                .into_iter()
                .map(|c| (c, c.default_files().iter().map(PathBuf::from).collect()))
                .collect(),
        }
    }
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup("PATHOGEN_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        let addr = lookup("PATHOGEN_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        config.bind_addr = addr
            .parse()
            .with_context(|| format!("PATHOGEN_BIND_ADDR: invalid socket address '{addr}'"))?;

        for category in Category::ALL {
            let key = format!("PATHOGEN_{}_FILES", category.env_tag());
            if let Some(list) = lookup(&key) {
                let files = list
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(PathBuf::from)
                    .collect();
                config.sources.insert(category, files);
            }
        }

        Ok(config)
    }

    /// Source paths for `category`, resolved against `data_dir`.
    pub fn source_paths(&self, category: Category) -> Vec<PathBuf> {
        self.sources
            .get(&category)
            .map(|files| files.iter().map(|f| self.data_dir.join(f)).collect())
            .unwrap_or_default()
    }
}
