//! Running a solver as a child process fed by a stdin script.

use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::config::SolverConfig;
use crate::utils::{AeroError, Result, SolverError};

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const CONSOLE_TAIL_LINES: usize = 20;

enum WorkDir {
    Temp(TempDir),
    Fixed(PathBuf),
}

impl WorkDir {
    fn path(&self) -> &Path {
        match self {
            WorkDir::Temp(dir) => dir.path(),
            WorkDir::Fixed(path) => path,
        }
    }
}

/// One solver invocation and the directory its files live in.
///
/// Script and output file names are relative to [`SolverRun::dir`], which is also
/// the solver's working directory. A temporary directory is removed when the run is
/// dropped.
pub(crate) struct SolverRun<'a> {
    config: &'a SolverConfig,
    work_dir: WorkDir,
}

impl<'a> SolverRun<'a> {
    pub fn prepare(config: &'a SolverConfig) -> Result<Self> {
        if let Some(secs) = config.timeout_secs {
            if config.timeout().is_none() || secs <= 0.0 {
                return Err(AeroError::InvalidParameter(format!(
                    "solver timeout must be a positive number of seconds, got {secs}"
                )));
            }
        }
        let work_dir = match &config.work_dir {
            Some(path) => {
                fs::create_dir_all(path)?;
                WorkDir::Fixed(std::path::absolute(path)?)
            }
            None => WorkDir::Temp(tempfile::Builder::new().prefix("aerowing-").tempdir()?),
        };
        Ok(Self { config, work_dir })
    }

    pub fn dir(&self) -> &Path {
        self.work_dir.path()
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir().join(file_name)
    }

    pub fn write_file(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path(file_name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Deletes outputs left by an earlier run. The solvers refuse to overwrite them.
    pub fn remove_stale<S: AsRef<str>>(&self, file_names: &[S]) -> Result<()> {
        for name in file_names {
            let path = self.path(name.as_ref());
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "removed stale output"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Launches the solver, pipes `script` to it and waits for it to exit.
    pub fn execute(&self, script: &str) -> Result<()> {
        let executable = &self.config.executable;
        debug!(executable = %executable.display(), %script, "solver script");

        let mut console = tempfile::tempfile()?;
        let child = Command::new(executable)
            .args(&self.config.args)
            .current_dir(self.dir())
            .stdin(Stdio::piped())
            .stdout(Stdio::from(console.try_clone()?))
            .stderr(Stdio::from(console.try_clone()?))
            .spawn()
            .map_err(|source| SolverError::Launch {
                executable: executable.clone(),
                source,
            })?;
        info!(executable = %executable.display(), pid = child.id(), work_dir = %self.dir().display(), "solver started");
        let started = Instant::now();
        let mut guard = ChildGuard { child };

        // The script is written from a second thread so a solver that stops reading
        // is still subject to the timeout. Dropping stdin there sends EOF.
        let stdin = guard.child.stdin.take();
        let timeout = self.config.timeout();
        let (status, written) = thread::scope(|scope| {
            let writer =
                stdin.map(|mut stdin| scope.spawn(move || stdin.write_all(script.as_bytes())));
            let status = guard.wait(timeout);
            (status, writer.map(|handle| handle.join()))
        });

        let status = status.map_err(|e| match e {
            WaitError::Io(e) => AeroError::Io(e),
            WaitError::Timeout(timeout) => AeroError::SolverExecution(SolverError::Timeout {
                executable: executable.clone(),
                timeout,
            }),
        })?;
        match written {
            None | Some(Ok(Ok(()))) => {}
            Some(Ok(Err(e))) if e.kind() == io::ErrorKind::BrokenPipe => {
                warn!(executable = %executable.display(), "solver closed its input early");
            }
            Some(Ok(Err(e))) => return Err(e.into()),
            Some(Err(_)) => {
                return Err(io::Error::new(io::ErrorKind::Other, "stdin writer panicked").into())
            }
        }

        if !status.success() {
            return Err(SolverError::ProcessFailed {
                executable: executable.clone(),
                status,
                console_tail: console_tail(&mut console),
            }
            .into());
        }
        info!(
            executable = %executable.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "solver finished"
        );
        Ok(())
    }

    /// Fails with [`SolverError::MissingOutput`] when the solver did not write `file_name`.
    pub fn require_output(&self, file_name: &str) -> Result<PathBuf> {
        let path = self.path(file_name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(SolverError::MissingOutput {
                executable: self.config.executable.clone(),
                path,
            }
            .into())
        }
    }
}

enum WaitError {
    Io(io::Error),
    Timeout(Duration),
}

/// Owns the child so it is killed and reaped on every exit path.
struct ChildGuard {
    child: Child,
}

impl ChildGuard {
    fn wait(&mut self, timeout: Option<Duration>) -> std::result::Result<ExitStatus, WaitError> {
        let Some(timeout) = timeout else {
            return self.child.wait().map_err(WaitError::Io);
        };
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = self.child.try_wait().map_err(WaitError::Io)? {
                return Ok(status);
            }
            let now = Instant::now();
            if now >= deadline {
                warn!(pid = self.child.id(), ?timeout, "solver timed out, killing it");
                self.kill();
                return Err(WaitError::Timeout(timeout));
            }
            thread::sleep(POLL_INTERVAL.min(deadline - now));
        }
    }

    fn kill(&mut self) {
        if let Err(e) = self.child.kill() {
            debug!(error = %e, "kill failed");
        }
        let _ = self.child.wait();
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            self.kill();
        }
    }
}

fn console_tail(console: &mut File) -> String {
    let mut text = String::new();
    if console.seek(SeekFrom::Start(0)).is_err() || console.read_to_string(&mut text).is_err() {
        return String::new();
    }
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(CONSOLE_TAIL_LINES);
    lines[start..].join("\n")
}
