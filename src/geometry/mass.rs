use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Moments and products of inertia about the centre of gravity (kg·m²).
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inertia {
    pub ixx: f64,
    pub iyy: f64,
    pub izz: f64,
    #[serde(default)]
    pub ixy: f64,
    #[serde(default)]
    pub ixz: f64,
    #[serde(default)]
    pub iyz: f64,
}

impl Inertia {
    pub fn new(ixx: f64, iyy: f64, izz: f64, ixy: f64, ixz: f64, iyz: f64) -> Self {
        Self {
            ixx,
            iyy,
            izz,
            ixy,
            ixz,
            iyz,
        }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [self.ixx, self.iyy, self.izz, self.ixy, self.ixz, self.iyz]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    /// Total mass (kg).
    pub mass: f64,
    /// Centre of gravity in the geometry axes (m).
    pub center_of_gravity: Vector3<f64>,
    #[serde(default)]
    pub inertia: Inertia,
}

impl Default for MassProperties {
    fn default() -> Self {
        Self {
            mass: 0.0,
            center_of_gravity: Vector3::zeros(),
            inertia: Inertia::default(),
        }
    }
}

impl MassProperties {
    pub fn new(mass: f64, center_of_gravity: Vector3<f64>) -> Self {
        Self {
            mass,
            center_of_gravity,
            inertia: Inertia::default(),
        }
    }

    pub fn with_inertia(mut self, inertia: Inertia) -> Self {
        self.inertia = inertia;
        self
    }
}
