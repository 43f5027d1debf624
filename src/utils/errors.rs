use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AeroError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid polar: {0}")]
    InvalidPolar(String),

    #[error("Solver execution error: {0}")]
    SolverExecution(#[from] SolverError),

    #[error("Failed to parse {path} (line {line}): {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Failures of an external solver run. Any of these means no table was produced.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("failed to launch {executable}: {source}")]
    Launch {
        executable: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{executable} exited with {status}: {console_tail}")]
    ProcessFailed {
        executable: PathBuf,
        status: ExitStatus,
        console_tail: String,
    },

    #[error("{executable} did not finish within {timeout:?} and was killed")]
    Timeout {
        executable: PathBuf,
        timeout: Duration,
    },

    #[error("{executable} did not write {path}")]
    MissingOutput { executable: PathBuf, path: PathBuf },
}

impl AeroError {
    /// Attaches the file path to a parse failure raised on raw text.
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            AeroError::Parse { line, reason, .. } => AeroError::Parse {
                path: path.into(),
                line,
                reason,
            },
            other => other,
        }
    }

    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        AeroError::Parse {
            path: PathBuf::new(),
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AeroError>;
