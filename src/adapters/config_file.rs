//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over an optional file path.  With no path, or
//! a path that does not exist, `load` returns defaults.  A file that exists
//! must decode and validate.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::info;

use crate::app::ports::ConfigPort;
use crate::config::SystemConfig;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default)]
pub struct JsonConfigFile {
    path: Option<PathBuf>,
}

impl JsonConfigFile {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let Some(path) = &self.path else {
            info!("Config: no file given, using defaults");
            return Ok(SystemConfig::default());
        };
        match fs::read_to_string(path) {
            Ok(text) => {
                let config = SystemConfig::from_json(&text)?;
                info!("Config: loaded {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Config: {} not found, using defaults", path.display());
                Ok(SystemConfig::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
