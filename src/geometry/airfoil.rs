use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::utils::{AeroError, Result};

/// An airfoil identified by name. The name keys the coordinate file `<name>.dat`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Airfoil {
    pub name: String,
}

impl Airfoil {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn file_name(&self) -> String {
        format!("{}.dat", self.name)
    }
}

impl From<&str> for Airfoil {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Directory of airfoil coordinate files. Never written to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirfoilLibrary {
    pub directory: PathBuf,
}

impl Default for AirfoilLibrary {
    fn default() -> Self {
        let directory = dirs::data_dir()
            .map(|dir| dir.join("aerowing").join("airfoils"))
            .unwrap_or_else(|| PathBuf::from("airfoils"));
        Self { directory }
    }
}

impl AirfoilLibrary {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Absolute path of the airfoil's coordinate file. The file need not exist.
    pub fn path(&self, airfoil: &Airfoil) -> Result<PathBuf> {
        let path = self.directory.join(airfoil.file_name());
        Ok(std::path::absolute(path)?)
    }

    pub fn contains(&self, airfoil: &Airfoil) -> bool {
        self.directory.join(airfoil.file_name()).is_file()
    }

    /// Reads the `(x, y)` coordinate pairs of an airfoil.
    pub fn load_coordinates(&self, airfoil: &Airfoil) -> Result<Vec<(f64, f64)>> {
        let path = self.path(airfoil)?;
        let text = fs::read_to_string(&path)?;
        parse_coordinates(&text).map_err(|e| e.with_path(&path))
    }
}

/// Parses a Selig-style coordinate file: an optional title line followed by one
/// `x y` pair per line. Blank lines are ignored.
pub(crate) fn parse_coordinates(text: &str) -> Result<Vec<(f64, f64)>> {
    let mut points = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_pair(trimmed) {
            Some(point) => points.push(point),
            None if index == 0 => continue,
            None => {
                return Err(AeroError::parse(
                    index + 1,
                    format!("expected an x y coordinate pair, found {trimmed:?}"),
                ))
            }
        }
    }
    if points.is_empty() {
        return Err(AeroError::parse(0, "no coordinates found"));
    }
    Ok(points)
}

fn parse_pair(line: &str) -> Option<(f64, f64)> {
    let mut tokens = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty());
    let x = tokens.next()?.parse().ok()?;
    let y = tokens.next()?.parse().ok()?;
    match tokens.next() {
        Some(_) => None,
        None => Some((x, y)),
    }
}
