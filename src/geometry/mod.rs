mod airfoil;
mod mass;
mod wing;

pub use airfoil::{Airfoil, AirfoilLibrary};
pub use mass::{Inertia, MassProperties};
pub use wing::{Wing, WingSection};
