use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::Result;

/// Tolerance (deg) when matching a solved angle to a requested one. XFOIL prints
/// angles with three decimals.
const ALPHA_MATCH_TOLERANCE: f64 = 5e-4;

/// Aerodynamic coefficients at one solved angle of attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientRow {
    /// Angle of attack (deg).
    pub alpha: f64,
    pub lift_coefficient: f64,
    pub drag_coefficient: f64,
    /// Pressure drag coefficient. Only the 2D solver reports it.
    pub pressure_drag_coefficient: Option<f64>,
    pub moment_coefficient: f64,
}

impl CoefficientRow {
    pub fn new(
        alpha: f64,
        lift_coefficient: f64,
        drag_coefficient: f64,
        moment_coefficient: f64,
    ) -> Self {
        Self {
            alpha,
            lift_coefficient,
            drag_coefficient,
            pressure_drag_coefficient: None,
            moment_coefficient,
        }
    }

    pub fn with_pressure_drag(mut self, pressure_drag_coefficient: f64) -> Self {
        self.pressure_drag_coefficient = Some(pressure_drag_coefficient);
        self
    }
}

/// Coefficients versus angle of attack, one row per converged angle in solver order.
///
/// Angles the solver failed to converge are absent; `requested_alphas` keeps the
/// original request so those gaps can be told apart from a failed run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoefficientsTable {
    pub label: String,
    pub rows: Vec<CoefficientRow>,
    #[serde(default)]
    pub requested_alphas: Vec<f64>,
}

impl CoefficientsTable {
    pub fn new(label: impl Into<String>, rows: Vec<CoefficientRow>) -> Self {
        Self {
            label: label.into(),
            rows,
            requested_alphas: Vec::new(),
        }
    }

    pub fn with_requested_alphas(mut self, alphas: Vec<f64>) -> Self {
        self.requested_alphas = alphas;
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CoefficientRow> {
        self.rows.iter()
    }

    pub fn alphas(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.alpha).collect()
    }

    /// Requested angles that have no row in the table.
    pub fn unconverged_alphas(&self) -> Vec<f64> {
        self.requested_alphas
            .iter()
            .copied()
            .filter(|&requested| {
                !self
                    .rows
                    .iter()
                    .any(|r| (r.alpha - requested).abs() <= ALPHA_MATCH_TOLERANCE)
            })
            .collect()
    }

    pub fn row_at_alpha(&self, alpha: f64) -> Option<&CoefficientRow> {
        self.rows
            .iter()
            .find(|r| (r.alpha - alpha).abs() <= ALPHA_MATCH_TOLERANCE)
    }

    pub fn max_lift_row(&self) -> Option<&CoefficientRow> {
        self.rows
            .iter()
            .max_by(|a, b| a.lift_coefficient.total_cmp(&b.lift_coefficient))
    }

    pub fn min_lift_row(&self) -> Option<&CoefficientRow> {
        self.rows
            .iter()
            .min_by(|a, b| a.lift_coefficient.total_cmp(&b.lift_coefficient))
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = BufWriter::new(File::create(path)?);
        writeln!(file, "# {}", self.label)?;
        writeln!(file, "alpha,Cl,Cd,Cd_pressure,Cm")?;
        for row in &self.rows {
            let pressure = row
                .pressure_drag_coefficient
                .map(|v| v.to_string())
                .unwrap_or_default();
            writeln!(
                file,
                "{},{},{},{},{}",
                row.alpha, row.lift_coefficient, row.drag_coefficient, pressure, row.moment_coefficient
            )?;
        }
        file.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiftDistributionRow {
    /// Spanwise location (m).
    pub spanwise_location: f64,
    /// Local (strip) lift coefficient.
    pub lift_coefficient: f64,
}

/// Local lift coefficient along the span, ordered by spanwise location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiftDistributionTable {
    pub label: String,
    pub rows: Vec<LiftDistributionRow>,
}

impl LiftDistributionTable {
    pub fn new(label: impl Into<String>, mut rows: Vec<LiftDistributionRow>) -> Self {
        rows.sort_by(|a, b| a.spanwise_location.total_cmp(&b.spanwise_location));
        Self {
            label: label.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn max_lift_row(&self) -> Option<&LiftDistributionRow> {
        self.rows
            .iter()
            .max_by(|a, b| a.lift_coefficient.total_cmp(&b.lift_coefficient))
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = BufWriter::new(File::create(path)?);
        writeln!(file, "# {}", self.label)?;
        writeln!(file, "spanwise_location,Cl")?;
        for row in &self.rows {
            writeln!(file, "{},{}", row.spanwise_location, row.lift_coefficient)?;
        }
        file.flush()?;
        Ok(())
    }
}
