mod loader;

pub use loader::{ConfigError, AIRFOILS_ENV, AVL_ENV, XFOIL_ENV};

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geometry::AirfoilLibrary;

/// How to launch one external solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Executable name (looked up on `PATH`) or path.
    pub executable: PathBuf,
    /// Extra command line arguments passed before the script is piped in.
    #[serde(default)]
    pub args: Vec<String>,
    /// Directory the solver runs in. A fresh temporary directory is used per run
    /// when unset.
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
    /// Wall-clock limit (s). The solver is killed once it is exceeded.
    #[serde(default)]
    pub timeout_secs: Option<f64>,
}

impl SolverConfig {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
            work_dir: None,
            timeout_secs: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(work_dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout_secs: f64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn xfoil() -> Self {
        Self::new("xfoil")
    }

    pub fn avl() -> Self {
        Self::new("avl")
    }

    /// The configured timeout, or `None` when unset or not a valid duration.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if self.executable.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{name}: executable must not be empty"
            )));
        }
        if let Some(secs) = self.timeout_secs {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "{name}: timeout must be a positive number of seconds, got {secs}"
                )));
            }
        }
        Ok(())
    }
}

/// Everything a study needs to reach the outside world: the two solvers and the
/// airfoil coordinate directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    pub xfoil: SolverConfig,
    pub avl: SolverConfig,
    pub airfoils: AirfoilLibrary,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            xfoil: SolverConfig::xfoil(),
            avl: SolverConfig::avl(),
            airfoils: AirfoilLibrary::default(),
        }
    }
}

impl StudyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.xfoil.validate("xfoil")?;
        self.avl.validate("avl")?;
        if self.airfoils.directory.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "airfoils: directory must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
