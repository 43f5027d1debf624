//! Quantities derived from solved coefficient tables.

use crate::models::avl::ProfileDragSettings;
use crate::models::{CoefficientRow, CoefficientsTable};
use crate::utils::{deg_to_rad, linear_regression, AeroError, Result};

/// Angle-of-attack window (deg, exclusive) over which the lift curve is taken as linear.
const LINEAR_LIFT_RANGE: (f64, f64) = (0.0, 5.0);

/// Lift-curve slope dCL/dα (per radian).
///
/// Fitted by least squares over the rows with `0° < α < 5°`.
pub fn lift_coefficient_slope(table: &CoefficientsTable) -> Result<f64> {
    let (low, high) = LINEAR_LIFT_RANGE;
    let (alphas, lifts): (Vec<f64>, Vec<f64>) = table
        .iter()
        .filter(|row| row.alpha > low && row.alpha < high)
        .map(|row| (deg_to_rad(row.alpha), row.lift_coefficient))
        .unzip();

    linear_regression(&alphas, &lifts)
        .map(|(slope, _)| slope)
        .ok_or_else(|| {
            AeroError::InsufficientData(format!(
                "{}: {} usable angles between {low}° and {high}°, at least 2 are needed",
                table.label,
                alphas.len()
            ))
        })
}

impl ProfileDragSettings {
    /// Three-point CD(CL) fit from a 2D polar: the minimum-lift row, the row closest
    /// to zero angle of attack and the maximum-lift row.
    pub fn from_polar(table: &CoefficientsTable) -> Result<Self> {
        if table.len() < 3 {
            return Err(AeroError::InsufficientData(format!(
                "{}: a CDCL fit needs at least 3 rows, found {}",
                table.label,
                table.len()
            )));
        }
        let insufficient = || AeroError::InsufficientData(format!("{}: empty polar", table.label));
        let low = table.min_lift_row().ok_or_else(insufficient)?;
        let high = table.max_lift_row().ok_or_else(insufficient)?;
        let middle = table
            .iter()
            .min_by(|a, b| a.alpha.abs().total_cmp(&b.alpha.abs()))
            .ok_or_else(insufficient)?;

        if !(low.lift_coefficient < middle.lift_coefficient
            && middle.lift_coefficient < high.lift_coefficient)
        {
            return Err(AeroError::InvalidPolar(format!(
                "{}: CDCL lift coefficients must increase strictly, got {} / {} / {}",
                table.label,
                low.lift_coefficient,
                middle.lift_coefficient,
                high.lift_coefficient
            )));
        }
        Ok(Self::from_rows(low, middle, high))
    }

    fn from_rows(low: &CoefficientRow, middle: &CoefficientRow, high: &CoefficientRow) -> Self {
        Self {
            cl1: low.lift_coefficient,
            cd1: low.drag_coefficient,
            cl2: middle.lift_coefficient,
            cd2: middle.drag_coefficient,
            cl3: high.lift_coefficient,
            cd3: high.drag_coefficient,
        }
    }
}
