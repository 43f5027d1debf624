pub mod avl;
mod coefficients;

pub use coefficients::{
    CoefficientRow, CoefficientsTable, LiftDistributionRow, LiftDistributionTable,
};
