//! Structural model of AVL's geometry and mass input files.

mod geometry;
mod mass;

pub use geometry::{
    Body, Control, Deflection, GeometryInput, GeometryOptions, Header, ProfileDragSettings,
    Section, Surface, Symmetry, VortexLattice,
};
pub use mass::{MassInput, MassItem};
