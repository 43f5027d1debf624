use aerowing::{Airfoil, MassProperties, Wing, WingSection};
use nalgebra::Vector3;

/// Tapered wing of the CLI walkthrough (`demos/wing.yaml`).
pub fn demo_wing() -> Wing {
    Wing::new(vec![
        WingSection::new(Vector3::new(0.0, 0.0, 0.0), 0.6, 0.0, Airfoil::new("s1223")),
        WingSection::new(Vector3::new(0.15, 1.3, 0.0), 0.3, 0.0, Airfoil::new("s1223")),
    ])
    .with_mass_properties(MassProperties::new(10.0, Vector3::new(0.15, 0.0, 0.0)))
}

/// Same wing without mass properties.
pub fn massless_wing() -> Wing {
    Wing {
        mass_properties: MassProperties::default(),
        ..demo_wing()
    }
}

/// Rectangular wing of span `span` and chord `chord`.
pub fn rectangular_wing(span: f64, chord: f64) -> Wing {
    Wing::new(vec![
        WingSection::new(Vector3::zeros(), chord, 0.0, Airfoil::new("naca0012")),
        WingSection::new(Vector3::new(0.0, span / 2.0, 0.0), chord, 0.0, Airfoil::new("naca0012")),
    ])
}

/// Three-section wing with a kinked chord law, sections listed tip first.
pub fn cranked_wing() -> Wing {
    Wing::new(vec![
        WingSection::new(Vector3::new(0.2, 1.5, 0.05), 0.25, -2.0, Airfoil::new("tip")),
        WingSection::new(Vector3::new(0.0, 0.0, 0.0), 0.5, 1.0, Airfoil::new("root")),
        WingSection::new(Vector3::new(0.05, 0.6, 0.0), 0.45, 0.0, Airfoil::new("mid")),
    ])
}
