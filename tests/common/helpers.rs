use std::fs;
use std::path::{Path, PathBuf};

use aerowing::{AirfoilLibrary, SolverConfig};
use tempfile::TempDir;

/// File the fake solvers append every stdin line to.
pub const RECEIVED_SCRIPT: &str = "received_script.txt";

/// A shell script standing in for a solver executable, run with a fixed work
/// directory so tests can inspect what was written there.
pub struct FakeSolver {
    pub dir: TempDir,
    pub config: SolverConfig,
}

impl FakeSolver {
    fn new(body: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("solver.sh");
        fs::write(&script, body).unwrap();
        let config = SolverConfig::new("/bin/sh")
            .with_args([script.display().to_string()])
            .with_work_dir(dir.path().join("run"))
            .with_timeout(30.0);
        Self { dir, config }
    }

    pub fn fixture(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn work_dir(&self) -> PathBuf {
        self.dir.path().join("run")
    }

    /// Script the solver received on stdin.
    pub fn received_script(&self) -> String {
        fs::read_to_string(self.work_dir().join(RECEIVED_SCRIPT)).unwrap_or_default()
    }

    pub fn work_file(&self, name: &str) -> String {
        fs::read_to_string(self.work_dir().join(name)).unwrap()
    }
}

/// XFOIL stand-in: saves `polar` to the file named after the first `PACC`.
pub fn fake_xfoil(polar: &str) -> FakeSolver {
    let solver = FakeSolver::new("");
    let fixture = solver.fixture("polar_fixture.txt", polar);
    let body = format!(
        r#"out=""
prev=""
while IFS= read -r line; do
  printf '%s\n' "$line" >> {received}
  if [ "$prev" = "PACC" ] && [ -z "$out" ]; then out="$line"; fi
  prev="$line"
done
cp "{fixture}" "$out"
"#,
        received = RECEIVED_SCRIPT,
        fixture = fixture.display()
    );
    rewrite(solver, &body)
}

/// AVL stand-in: answers `FT` with the total-forces template (CL = 0.3 + 0.08 α)
/// and `FS` with `strip_forces`. No file is written for the angle `skip_alpha`.
pub fn fake_avl(total_forces: &str, strip_forces: &str, skip_alpha: Option<&str>) -> FakeSolver {
    let solver = FakeSolver::new("");
    let ft = solver.fixture("ft_fixture.txt", total_forces);
    let fs_fixture = solver.fixture("fs_fixture.txt", strip_forces);
    let body = format!(
        r#"alpha=""
expect=""
while IFS= read -r line; do
  printf '%s\n' "$line" >> {received}
  if [ "$expect" = "ft" ]; then
    expect=""
    if [ "$alpha" != "{skip}" ]; then
      awk -v a="$alpha" '{{ gsub(/@ALPHA@/, a); gsub(/@CL@/, 0.3 + 0.08 * a); print }}' "{ft}" > "$line"
    fi
    continue
  fi
  if [ "$expect" = "fs" ]; then
    expect=""
    cp "{fs}" "$line"
    continue
  fi
  case "$line" in
    "A A "*) alpha="${{line#A A }}" ;;
    FT) expect="ft" ;;
    FS) expect="fs" ;;
  esac
done
"#,
        received = RECEIVED_SCRIPT,
        skip = skip_alpha.unwrap_or("none"),
        ft = ft.display(),
        fs = fs_fixture.display()
    );
    rewrite(solver, &body)
}

/// Consumes its input, prints a message and fails.
pub fn failing_solver() -> FakeSolver {
    FakeSolver::new("cat > /dev/null\necho 'fatal: matrix is singular'\nexit 2\n")
}

/// Consumes its input and exits cleanly without writing anything.
pub fn silent_solver() -> FakeSolver {
    FakeSolver::new(&format!("cat > {RECEIVED_SCRIPT}\n"))
}

/// Never finishes on its own.
pub fn hanging_solver(timeout_secs: f64) -> FakeSolver {
    let mut solver = FakeSolver::new("exec sleep 10\n");
    solver.config = solver.config.with_timeout(timeout_secs);
    solver
}

fn rewrite(solver: FakeSolver, body: &str) -> FakeSolver {
    fs::write(solver.dir.path().join("solver.sh"), body).unwrap();
    solver
}

/// Airfoil directory holding a small coordinate file for each name.
pub fn airfoil_library(names: &[&str]) -> (TempDir, AirfoilLibrary) {
    let dir = tempfile::tempdir().unwrap();
    for name in names {
        write_airfoil(dir.path(), name);
    }
    let library = AirfoilLibrary::new(dir.path());
    (dir, library)
}

fn write_airfoil(dir: &Path, name: &str) {
    let coordinates = "1.0 0.0\n0.5 0.06\n0.0 0.0\n0.5 -0.02\n1.0 0.0\n";
    fs::write(dir.join(format!("{name}.dat")), format!("{name}\n{coordinates}")).unwrap();
}

/// Root of the crate, for the files under `demos/`.
pub fn manifest_dir() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}
