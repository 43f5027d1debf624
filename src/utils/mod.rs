pub mod constants;
pub mod errors;
pub mod math;
pub mod quadrature;

pub use constants::*;
pub use errors::*;
pub use math::*;
pub use quadrature::*;
