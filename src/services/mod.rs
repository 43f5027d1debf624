//! Drivers for the external XFOIL and AVL solvers.

mod avl;
mod process;
mod xfoil;

pub use avl::{AvlService, DistributionCase};
pub use xfoil::{XfoilAnalysis, XfoilService};

use serde::{Deserialize, Serialize};

use crate::utils::{round_to, AeroError, Result};

/// Decimals kept on generated sweep angles, so `0.1` steps print as `0.3`, not
/// `0.30000000000000004`.
const SWEEP_DECIMALS: i32 = 6;
/// Largest number of angles a range may expand to.
pub const MAX_SWEEP_ANGLES: usize = 10_000;

/// Angles of attack (deg) to solve for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaSweep {
    /// Explicit angles, solved in the given order.
    List(Vec<f64>),
    /// `start` to `end` inclusive in steps of `increment`.
    Range { start: f64, end: f64, increment: f64 },
}

impl AlphaSweep {
    pub fn range(start: f64, end: f64, increment: f64) -> Self {
        AlphaSweep::Range {
            start,
            end,
            increment,
        }
    }

    /// The literal list of angles.
    ///
    /// A range includes `end` when it is reached to within a small fraction of the
    /// increment. A zero increment, or one pointing away from `end`, is rejected.
    pub fn angles(&self) -> Result<Vec<f64>> {
        match *self {
            AlphaSweep::List(ref alphas) => {
                if alphas.is_empty() {
                    return Err(AeroError::InvalidParameter(
                        "no angles of attack requested".to_string(),
                    ));
                }
                if let Some(bad) = alphas.iter().find(|a| !a.is_finite()) {
                    return Err(AeroError::InvalidParameter(format!(
                        "angle of attack {bad} is not finite"
                    )));
                }
                Ok(alphas.clone())
            }
            AlphaSweep::Range {
                start,
                end,
                increment,
            } => {
                if ![start, end, increment].iter().all(|v| v.is_finite()) {
                    return Err(AeroError::InvalidParameter(format!(
                        "alpha range ({start}, {end}, {increment}) must be finite"
                    )));
                }
                if increment == 0.0 || (end - start) * increment < 0.0 {
                    return Err(AeroError::InvalidParameter(format!(
                        "increment {increment} does not lead from {start} to {end}"
                    )));
                }
                let steps = ((end - start) / increment + 1e-6).floor();
                if !(steps < MAX_SWEEP_ANGLES as f64) {
                    return Err(AeroError::InvalidParameter(format!(
                        "alpha range ({start}, {end}, {increment}) expands to more than \
                         {MAX_SWEEP_ANGLES} angles"
                    )));
                }
                let steps = steps as usize;
                Ok((0..=steps)
                    .map(|i| round_to(start + i as f64 * increment, SWEEP_DECIMALS))
                    .collect())
            }
        }
    }
}

impl From<Vec<f64>> for AlphaSweep {
    fn from(alphas: Vec<f64>) -> Self {
        AlphaSweep::List(alphas)
    }
}
