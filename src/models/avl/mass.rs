use std::fmt::Write;

use nalgebra::Vector3;

use crate::geometry::{Inertia, Wing};
use crate::utils::{format_number, round_to, Result, COEFFICIENT_DECIMALS, LENGTH_DECIMALS};

/// One row of the mass file.
#[derive(Debug, Clone, PartialEq)]
pub struct MassItem {
    pub mass: f64,
    pub location: Vector3<f64>,
    pub inertia: Inertia,
}

/// AVL mass file in SI units.
#[derive(Debug, Clone, PartialEq)]
pub struct MassInput {
    pub gravity: f64,
    pub air_density: f64,
    pub items: Vec<MassItem>,
}

impl MassInput {
    /// A single item carrying the wing's mass properties.
    pub fn from_wing(wing: &Wing, gravity: f64, air_density: f64) -> Result<Self> {
        wing.validate()?;
        let properties = &wing.mass_properties;
        let inertia = properties.inertia;
        Ok(Self {
            gravity: round_to(gravity, COEFFICIENT_DECIMALS),
            air_density: round_to(air_density, COEFFICIENT_DECIMALS),
            items: vec![MassItem {
                mass: round_to(properties.mass, COEFFICIENT_DECIMALS),
                location: properties
                    .center_of_gravity
                    .map(|v| round_to(v, LENGTH_DECIMALS)),
                inertia: Inertia {
                    ixx: round_to(inertia.ixx, COEFFICIENT_DECIMALS),
                    iyy: round_to(inertia.iyy, COEFFICIENT_DECIMALS),
                    izz: round_to(inertia.izz, COEFFICIENT_DECIMALS),
                    ixy: round_to(inertia.ixy, COEFFICIENT_DECIMALS),
                    ixz: round_to(inertia.ixz, COEFFICIENT_DECIMALS),
                    iyz: round_to(inertia.iyz, COEFFICIENT_DECIMALS),
                },
            }],
        })
    }

    pub fn total_mass(&self) -> f64 {
        self.items.iter().map(|item| item.mass).sum()
    }

    pub fn to_input_file(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "Lunit = 1.0 m");
        let _ = writeln!(out, "Munit = 1.0 kg");
        let _ = writeln!(out, "Tunit = 1.0 s");
        let _ = writeln!(out);
        let _ = writeln!(out, "g = {}", format_number(self.gravity));
        let _ = writeln!(out, "rho = {}", format_number(self.air_density));
        let _ = writeln!(out);
        let _ = writeln!(out, "#  mass   x   y   z   Ixx   Iyy   Izz   Ixy   Ixz   Iyz");
        for item in &self.items {
            let row: Vec<String> = [item.mass, item.location.x, item.location.y, item.location.z]
                .into_iter()
                .chain(item.inertia.as_array())
                .map(format_number)
                .collect();
            let _ = writeln!(out, "   {}", row.join("   "));
        }
        out
    }
}
