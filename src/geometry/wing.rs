use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Airfoil, MassProperties};
use crate::utils::{interp, AdaptiveSimpson, AeroError, Result};

/// A spanwise station of the wing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WingSection {
    /// Leading-edge location (m). `y` is the spanwise coordinate.
    pub location: Vector3<f64>,
    /// Local chord length (m). Must be positive.
    pub chord: f64,
    /// Local twist / incidence angle (deg).
    #[serde(default)]
    pub twist: f64,
    pub airfoil: Airfoil,
}

impl WingSection {
    pub fn new(location: Vector3<f64>, chord: f64, twist: f64, airfoil: Airfoil) -> Self {
        Self {
            location,
            chord,
            twist,
            airfoil,
        }
    }

    pub fn x(&self) -> f64 {
        self.location.x
    }

    pub fn y(&self) -> f64 {
        self.location.y
    }

    pub fn z(&self) -> f64 {
        self.location.z
    }
}

/// A half wing described by its sections and mirrored about the `y = 0` plane.
///
/// Every derived quantity is recomputed from the current sections on each call, so
/// editing `sections` never leaves stale results behind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wing {
    pub sections: Vec<WingSection>,
    #[serde(default)]
    pub mass_properties: MassProperties,
}

impl Wing {
    pub fn new(sections: Vec<WingSection>) -> Self {
        Self {
            sections,
            mass_properties: MassProperties::default(),
        }
    }

    pub fn with_mass_properties(mut self, mass_properties: MassProperties) -> Self {
        self.mass_properties = mass_properties;
        self
    }

    /// Sections ordered by spanwise coordinate, root first.
    pub fn sorted_sections(&self) -> Vec<&WingSection> {
        let mut sections: Vec<&WingSection> = self.sections.iter().collect();
        sections.sort_by(|a, b| a.y().total_cmp(&b.y()));
        sections
    }

    /// Checks the wing is usable as solver input: at least two sections, finite
    /// coordinates and strictly positive chords.
    pub fn validate(&self) -> Result<()> {
        if self.sections.len() < 2 {
            return Err(AeroError::InvalidGeometry(format!(
                "the wing must have at least 2 sections, found {}",
                self.sections.len()
            )));
        }
        for (index, section) in self.sections.iter().enumerate() {
            if !section.location.iter().all(|v| v.is_finite()) {
                return Err(AeroError::InvalidGeometry(format!(
                    "section {index} has a non-finite location"
                )));
            }
            if !(section.chord.is_finite() && section.chord > 0.0) {
                return Err(AeroError::InvalidGeometry(format!(
                    "section {index} has chord {}, chords must be positive",
                    section.chord
                )));
            }
        }
        Ok(())
    }

    /// Total wingspan (m): twice the outermost spanwise coordinate.
    pub fn span(&self) -> f64 {
        self.sections
            .iter()
            .map(WingSection::y)
            .reduce(f64::max)
            .map_or(0.0, |y_max| 2.0 * y_max)
    }

    /// Chord (m) at spanwise position `y`, linearly interpolated between sections and
    /// clamped to the root/tip chord outside the section range.
    pub fn chord_distribution(&self, y: f64) -> f64 {
        let sections = self.sorted_sections();
        let ys: Vec<f64> = sections.iter().map(|s| s.y()).collect();
        let chords: Vec<f64> = sections.iter().map(|s| s.chord).collect();
        interp(y, &ys, &chords).unwrap_or(0.0)
    }

    /// Planform area (m²): `2 ∫ c(y) dy` over the half span.
    pub fn planform_area(&self) -> f64 {
        match self.half_span_stations() {
            Some(stations) => 2.0 * self.integrate_over_half_span(|c| c, &stations),
            None => 0.0,
        }
    }

    /// Planform area (m²) summed from section-to-section trapezoids, taking the
    /// leading-edge sweep into account through the in-plane distance between sections.
    pub fn swept_planform_area(&self) -> f64 {
        let sections = self.sorted_sections();
        2.0 * sections
            .windows(2)
            .map(|pair| {
                let (s1, s2) = (pair[0], pair[1]);
                let distance = ((s2.y() - s1.y()).powi(2) + (s2.x() - s1.x()).powi(2)).sqrt();
                0.5 * (s1.chord + s2.chord) * distance
            })
            .sum::<f64>()
    }

    /// Mean aerodynamic chord (m): `(2 / S) ∫ c(y)² dy` over the half span.
    ///
    /// A degenerate wing (zero planform area) has a MAC of 0.
    pub fn mean_aerodynamic_chord(&self) -> f64 {
        let area = self.planform_area();
        if area == 0.0 {
            debug!(
                edge_case = "degenerate_wing",
                "planform area is zero, mean aerodynamic chord defaults to 0"
            );
            return 0.0;
        }
        match self.half_span_stations() {
            Some(stations) => 2.0 / area * self.integrate_over_half_span(|c| c * c, &stations),
            None => 0.0,
        }
    }

    /// Aspect ratio `b² / S`; 0 for a degenerate wing.
    pub fn aspect_ratio(&self) -> f64 {
        let area = self.planform_area();
        if area == 0.0 {
            debug!(
                edge_case = "degenerate_wing",
                "planform area is zero, aspect ratio defaults to 0"
            );
            return 0.0;
        }
        self.span().powi(2) / area
    }

    /// Spanwise section stations, or `None` when the wing has no spanwise extent.
    fn half_span_stations(&self) -> Option<Vec<f64>> {
        let ys: Vec<f64> = self.sections.iter().map(WingSection::y).collect();
        let y_min = ys.iter().copied().reduce(f64::min)?;
        let y_max = ys.iter().copied().reduce(f64::max)?;
        if y_max == y_min || self.span() == 0.0 {
            return None;
        }
        Some(ys)
    }

    fn integrate_over_half_span<F: Fn(f64) -> f64>(&self, f: F, stations: &[f64]) -> f64 {
        let quadrature = AdaptiveSimpson::default();
        quadrature.integrate_piecewise(
            |y| f(self.chord_distribution(y)),
            0.0,
            self.span() / 2.0,
            stations,
        )
    }
}
