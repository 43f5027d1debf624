use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use super::StudyConfig;

/// Overrides the XFOIL executable.
pub const XFOIL_ENV: &str = "AEROWING_XFOIL";
/// Overrides the AVL executable.
pub const AVL_ENV: &str = "AEROWING_AVL";
/// Overrides the airfoil coordinate directory.
pub const AIRFOILS_ENV: &str = "AEROWING_AIRFOILS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("Invalid study configuration: {0}")]
    ValidationError(String),
}

impl StudyConfig {
    /// Loads a configuration from a YAML file, applies the environment overrides and
    /// validates the result.
    ///
    /// # Arguments
    /// * `path` - Path to the YAML configuration file.
    ///
    /// # Returns
    /// The loaded configuration, or an error if the file cannot be read, parsed or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file_contents = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&file_contents)?;
        info!(path = %path.display(), "loaded study configuration");
        Ok(config)
    }

    /// Parses a YAML document. Missing sections keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: StudyConfig = serde_yaml::from_str(yaml)?;
        config.finish()
    }

    /// Defaults plus environment overrides, for running without a config file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().finish()
    }

    /// Applies overrides from any lookup (the process environment in practice).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(XFOIL_ENV) {
            debug!(variable = XFOIL_ENV, %value, "override");
            self.xfoil.executable = PathBuf::from(value);
        }
        if let Some(value) = lookup(AVL_ENV) {
            debug!(variable = AVL_ENV, %value, "override");
            self.avl.executable = PathBuf::from(value);
        }
        if let Some(value) = lookup(AIRFOILS_ENV) {
            debug!(variable = AIRFOILS_ENV, %value, "override");
            self.airfoils.directory = PathBuf::from(value);
        }
    }

    fn finish(mut self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| env::var(key).ok());
        self.validate()?;
        Ok(self)
    }
}
