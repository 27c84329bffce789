//! Runtime configuration.
//!
//! Values come from the environment (a `.env` file is loaded by the CLI
//! first) and can be overridden by command-line flags.

use std::env;
use std::path::PathBuf;

use crate::storage::DEFAULT_STORAGE_DIR;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

pub const PORT_VAR: &str = "INFLUMATCH_PORT";
pub const STORAGE_DIR_VAR: &str = "INFLUMATCH_STORAGE_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub storage_dir: PathBuf,
}

impl Config {
    /// Read the environment, falling back to defaults for unset or invalid values.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup(PORT_VAR)
            .and_then(|raw| match raw.trim().parse::<u16>() {
                Ok(port) => Some(port),
                Err(e) => {
                    eprintln!(
                        "Invalid {} value '{}': {}, using {}",
                        PORT_VAR, raw, e, DEFAULT_PORT
                    );
                    None
                }
            })
            .unwrap_or(DEFAULT_PORT);

        let storage_dir = lookup(STORAGE_DIR_VAR)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));

        Self { port, storage_dir }
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, port: Option<u16>, storage_dir: Option<PathBuf>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(dir) = storage_dir {
            self.storage_dir = dir;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
        }
    }
}
