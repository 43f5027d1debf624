pub mod config;
pub mod environment;
pub mod functions;
pub mod geometry;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{ConfigError, SolverConfig, StudyConfig};
pub use environment::FlightCondition;
pub use functions::lift_coefficient_slope;
pub use geometry::{Airfoil, AirfoilLibrary, Inertia, MassProperties, Wing, WingSection};
pub use models::avl::{GeometryInput, GeometryOptions, MassInput, ProfileDragSettings};
pub use models::{CoefficientRow, CoefficientsTable, LiftDistributionRow, LiftDistributionTable};
pub use services::{AlphaSweep, AvlService, DistributionCase, XfoilAnalysis, XfoilService};
pub use utils::{AeroError, Result, SolverError};
