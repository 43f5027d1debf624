use std::fmt::Write;
use std::path::PathBuf;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{AirfoilLibrary, Wing};
use crate::models::CoefficientsTable;
use crate::utils::{
    format_number, round_to, AeroError, Result, COEFFICIENT_DECIMALS, LENGTH_DECIMALS,
};

/// Symmetry flag of the `iYsym` / `iZsym` header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symmetry {
    Symmetric,
    Antisymmetric,
    Ignore,
}

impl Symmetry {
    pub fn value(self) -> i32 {
        match self {
            Symmetry::Symmetric => 1,
            Symmetry::Antisymmetric => -1,
            Symmetry::Ignore => 0,
        }
    }
}

/// Control deflection sign on a duplicated surface (`SgnDup`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deflection {
    Normal,
    Inverse,
}

impl Deflection {
    pub fn value(self) -> i32 {
        match self {
            Deflection::Normal => 1,
            Deflection::Inverse => -1,
        }
    }
}

/// Vortex count and spacing parameter of a lattice direction (`Nchord Cspace`,
/// `Nspan Sspace`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VortexLattice {
    pub count: u32,
    pub spacing: f64,
}

impl VortexLattice {
    pub fn new(count: u32, spacing: f64) -> Self {
        Self { count, spacing }
    }

    fn tokens(&self) -> [String; 2] {
        [self.count.to_string(), format_number(self.spacing)]
    }
}

/// Three-point parabolic CD(CL) profile drag polar (`CDCL`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileDragSettings {
    pub cl1: f64,
    pub cd1: f64,
    pub cl2: f64,
    pub cd2: f64,
    pub cl3: f64,
    pub cd3: f64,
}

impl ProfileDragSettings {
    pub fn rounded(&self, decimals: i32) -> Self {
        Self {
            cl1: round_to(self.cl1, decimals),
            cd1: round_to(self.cd1, decimals),
            cl2: round_to(self.cl2, decimals),
            cd2: round_to(self.cd2, decimals),
            cl3: round_to(self.cl3, decimals),
            cd3: round_to(self.cd3, decimals),
        }
    }

    fn write(&self, out: &mut String, indent: usize) {
        keyword(out, indent, "CDCL");
        values(
            out,
            indent,
            [self.cl1, self.cd1, self.cl2, self.cd2, self.cl3, self.cd3]
                .map(format_number),
        );
    }
}

/// Header block of the geometry file.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub title: String,
    pub mach_number: f64,
    pub y_symmetry: Symmetry,
    pub z_symmetry: Symmetry,
    /// `Zsym`, ignored by AVL when `z_symmetry` is [`Symmetry::Ignore`].
    pub z_symmetry_plane: f64,
    pub reference_area: f64,
    pub reference_chord: f64,
    pub reference_span: f64,
    /// Moment reference point (`Xref Yref Zref`).
    pub reference_point: Vector3<f64>,
    pub profile_drag_coefficient: Option<f64>,
}

impl Header {
    pub fn to_input_file(&self) -> String {
        let mut out = String::new();
        line(&mut out, 0, &self.title);
        values(&mut out, 0, [format_number(self.mach_number)]);
        values(
            &mut out,
            0,
            [
                self.y_symmetry.value().to_string(),
                self.z_symmetry.value().to_string(),
                format_number(self.z_symmetry_plane),
            ],
        );
        values(
            &mut out,
            0,
            [
                format_number(self.reference_area),
                format_number(self.reference_chord),
                format_number(self.reference_span),
            ],
        );
        values(&mut out, 0, vector(&self.reference_point));
        if let Some(cdp) = self.profile_drag_coefficient {
            values(&mut out, 0, [format_number(cdp)]);
        }
        out
    }
}

/// Control surface attached to a section.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub name: String,
    /// Deflection per unit control variable.
    pub gain: f64,
    /// Hinge location as a chord fraction (`Xhinge`).
    pub hinge_x_location: f64,
    /// Hinge axis vector (`XYZhvec`).
    pub hinge_axis: Vector3<f64>,
    pub deflection: Deflection,
}

impl Control {
    pub fn to_input_file(&self) -> String {
        let mut out = String::new();
        keyword(&mut out, 8, "CONTROL");
        let [hx, hy, hz] = vector(&self.hinge_axis);
        values(
            &mut out,
            8,
            [
                self.name.clone(),
                format_number(self.gain),
                format_number(self.hinge_x_location),
                hx,
                hy,
                hz,
                self.deflection.value().to_string(),
            ],
        );
        out
    }
}

/// Spanwise section of a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Leading-edge location (`Xle Yle Zle`).
    pub location: Vector3<f64>,
    pub chord: f64,
    /// Incidence angle (deg, `Ainc`).
    pub incidence: f64,
    pub spanwise: Option<VortexLattice>,
    /// Absolute path of the airfoil coordinate file (`AFILE`).
    pub airfoil_file: PathBuf,
    pub cl_alpha_scaling: Option<f64>,
    pub profile_drag: Option<ProfileDragSettings>,
    pub controls: Vec<Control>,
}

impl Section {
    pub fn to_input_file(&self) -> String {
        let mut out = String::new();
        keyword(&mut out, 4, "SECTION");
        let [x, y, z] = vector(&self.location);
        let mut tokens = vec![
            x,
            y,
            z,
            format_number(self.chord),
            format_number(self.incidence),
        ];
        if let Some(spanwise) = &self.spanwise {
            tokens.extend(spanwise.tokens());
        }
        values(&mut out, 4, tokens);

        keyword(&mut out, 8, "AFILE");
        line(&mut out, 8, &self.airfoil_file.display().to_string());
        if let Some(scaling) = self.cl_alpha_scaling {
            keyword(&mut out, 8, "CLAF");
            values(&mut out, 8, [format_number(scaling)]);
        }
        if let Some(drag) = &self.profile_drag {
            drag.write(&mut out, 8);
        }
        for control in &self.controls {
            out.push_str(&control.to_input_file());
        }
        out
    }
}

/// A lifting surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub name: String,
    pub chordwise: VortexLattice,
    pub spanwise: Option<VortexLattice>,
    /// Mirror plane `y` coordinate (`YDUPLICATE`).
    pub y_duplicate: Option<f64>,
    pub scale: Option<Vector3<f64>>,
    pub translate: Option<Vector3<f64>>,
    /// Incidence offset added to every section (deg, `ANGLE`).
    pub incidence: Option<f64>,
    pub no_wake: bool,
    pub no_albe: bool,
    pub no_load: bool,
    pub profile_drag: Option<ProfileDragSettings>,
    pub sections: Vec<Section>,
}

impl Surface {
    pub fn to_input_file(&self) -> String {
        let mut out = String::new();
        keyword(&mut out, 0, "SURFACE");
        line(&mut out, 0, &self.name);
        let mut lattice = self.chordwise.tokens().to_vec();
        if let Some(spanwise) = &self.spanwise {
            lattice.extend(spanwise.tokens());
        }
        values(&mut out, 0, lattice);
        write_transform(
            &mut out,
            self.y_duplicate,
            self.scale.as_ref(),
            self.translate.as_ref(),
        );
        if let Some(angle) = self.incidence {
            keyword(&mut out, 4, "ANGLE");
            values(&mut out, 4, [format_number(angle)]);
        }
        if self.no_wake {
            keyword(&mut out, 4, "NOWAKE");
        }
        if self.no_albe {
            keyword(&mut out, 4, "NOALBE");
        }
        if self.no_load {
            keyword(&mut out, 4, "NOLOAD");
        }
        if let Some(drag) = &self.profile_drag {
            drag.write(&mut out, 4);
        }
        for section in &self.sections {
            out.push_str(&section.to_input_file());
        }
        out
    }
}

/// A non-lifting body modelled by a source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String,
    pub node_count: u32,
    pub node_spacing: f64,
    pub y_duplicate: Option<f64>,
    pub scale: Option<Vector3<f64>>,
    pub translate: Option<Vector3<f64>>,
    /// Body shape file (`BFIL`).
    pub body_file: Option<PathBuf>,
}

impl Body {
    pub fn to_input_file(&self) -> String {
        let mut out = String::new();
        keyword(&mut out, 0, "BODY");
        line(&mut out, 0, &self.name);
        values(
            &mut out,
            0,
            [self.node_count.to_string(), format_number(self.node_spacing)],
        );
        write_transform(
            &mut out,
            self.y_duplicate,
            self.scale.as_ref(),
            self.translate.as_ref(),
        );
        if let Some(path) = &self.body_file {
            keyword(&mut out, 4, "BFIL");
            line(&mut out, 4, &path.display().to_string());
        }
        out
    }
}

/// Settings of [`GeometryInput::from_wing`] that the wing itself does not carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryOptions {
    pub title: String,
    pub surface_name: String,
    pub mach_number: f64,
    pub y_symmetry: Symmetry,
    pub z_symmetry: Symmetry,
    pub z_symmetry_plane: f64,
    pub profile_drag_coefficient: Option<f64>,
    pub chordwise: VortexLattice,
    pub spanwise: Option<VortexLattice>,
    pub y_duplicate: Option<f64>,
    pub cl_alpha_scaling: Option<f64>,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            title: "Plane".to_string(),
            surface_name: "Wing".to_string(),
            mach_number: 0.0,
            y_symmetry: Symmetry::Symmetric,
            z_symmetry: Symmetry::Ignore,
            z_symmetry_plane: 0.0,
            profile_drag_coefficient: Some(0.0),
            chordwise: VortexLattice::new(12, 1.0),
            spanwise: Some(VortexLattice::new(20, 1.0)),
            y_duplicate: None,
            cl_alpha_scaling: None,
        }
    }
}

/// Complete AVL geometry input.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryInput {
    pub header: Header,
    pub surfaces: Vec<Surface>,
    pub bodies: Vec<Body>,
}

impl GeometryInput {
    /// Builds a single-surface input from a wing.
    ///
    /// `section_polars`, when given, holds one 2D polar per wing section in the
    /// order of `wing.sections`; each one becomes that section's `CDCL` fit.
    pub fn from_wing(
        wing: &Wing,
        options: &GeometryOptions,
        airfoils: &AirfoilLibrary,
        section_polars: Option<&[CoefficientsTable]>,
    ) -> Result<Self> {
        wing.validate()?;
        if let Some(polars) = section_polars {
            if polars.len() != wing.sections.len() {
                return Err(AeroError::InvalidParameter(format!(
                    "expected one polar per section ({}), got {}",
                    wing.sections.len(),
                    polars.len()
                )));
            }
        }

        let mac = wing.mean_aerodynamic_chord();
        let header = Header {
            title: options.title.clone(),
            mach_number: round_to(options.mach_number, COEFFICIENT_DECIMALS),
            y_symmetry: options.y_symmetry,
            z_symmetry: options.z_symmetry,
            z_symmetry_plane: options.z_symmetry_plane,
            reference_area: round_to(wing.planform_area(), LENGTH_DECIMALS),
            reference_chord: round_to(mac, LENGTH_DECIMALS),
            reference_span: round_to(wing.span(), LENGTH_DECIMALS),
            reference_point: Vector3::new(round_to(mac / 4.0, LENGTH_DECIMALS), 0.0, 0.0),
            profile_drag_coefficient: options
                .profile_drag_coefficient
                .map(|cdp| round_to(cdp, COEFFICIENT_DECIMALS)),
        };

        let mut order: Vec<usize> = (0..wing.sections.len()).collect();
        order.sort_by(|&a, &b| wing.sections[a].y().total_cmp(&wing.sections[b].y()));

        let mut sections = Vec::with_capacity(order.len());
        for index in order {
            let wing_section = &wing.sections[index];
            let profile_drag = match section_polars {
                Some(polars) => Some(
                    ProfileDragSettings::from_polar(&polars[index])?
                        .rounded(COEFFICIENT_DECIMALS),
                ),
                None => None,
            };
            sections.push(Section {
                location: wing_section.location,
                chord: wing_section.chord,
                incidence: wing_section.twist,
                spanwise: None,
                airfoil_file: airfoils.path(&wing_section.airfoil)?,
                cl_alpha_scaling: options.cl_alpha_scaling,
                profile_drag,
                controls: Vec::new(),
            });
        }
        debug!(
            sections = sections.len(),
            reference_area = header.reference_area,
            "built AVL geometry from wing"
        );

        Ok(Self {
            header,
            surfaces: vec![Surface {
                name: options.surface_name.clone(),
                chordwise: options.chordwise,
                spanwise: options.spanwise,
                y_duplicate: options.y_duplicate,
                scale: None,
                translate: None,
                incidence: None,
                no_wake: false,
                no_albe: false,
                no_load: false,
                profile_drag: None,
                sections,
            }],
            bodies: Vec::new(),
        })
    }

    /// Checks option combinations AVL would reject or silently misinterpret.
    /// Serialisation itself never validates.
    pub fn validate(&self) -> Result<()> {
        if self.header.y_symmetry != Symmetry::Ignore {
            let mirrored = self
                .surfaces
                .iter()
                .filter(|s| s.y_duplicate.is_some())
                .map(|s| s.name.as_str())
                .chain(
                    self.bodies
                        .iter()
                        .filter(|b| b.y_duplicate.is_some())
                        .map(|b| b.name.as_str()),
                )
                .next();
            if let Some(name) = mirrored {
                return Err(AeroError::InvalidParameter(format!(
                    "{name:?} uses YDUPLICATE while the header already imposes y symmetry"
                )));
            }
        }
        for surface in &self.surfaces {
            if surface.sections.len() < 2 {
                return Err(AeroError::InvalidGeometry(format!(
                    "surface {:?} must have at least 2 sections, found {}",
                    surface.name,
                    surface.sections.len()
                )));
            }
            if let Some(section) = surface.sections.iter().find(|s| !(s.chord > 0.0)) {
                return Err(AeroError::InvalidGeometry(format!(
                    "surface {:?} has a section with chord {}",
                    surface.name, section.chord
                )));
            }
        }
        Ok(())
    }

    pub fn to_input_file(&self) -> String {
        let mut out = self.header.to_input_file();
        for surface in &self.surfaces {
            out.push('\n');
            out.push_str(&surface.to_input_file());
        }
        for body in &self.bodies {
            out.push('\n');
            out.push_str(&body.to_input_file());
        }
        out
    }
}

fn write_transform(
    out: &mut String,
    y_duplicate: Option<f64>,
    scale: Option<&Vector3<f64>>,
    translate: Option<&Vector3<f64>>,
) {
    if let Some(y) = y_duplicate {
        keyword(out, 4, "YDUPLICATE");
        values(out, 4, [format_number(y)]);
    }
    if let Some(scale) = scale {
        keyword(out, 4, "SCALE");
        values(out, 4, vector(scale));
    }
    if let Some(translate) = translate {
        keyword(out, 4, "TRANSLATE");
        values(out, 4, vector(translate));
    }
}

fn vector(v: &Vector3<f64>) -> [String; 3] {
    [format_number(v.x), format_number(v.y), format_number(v.z)]
}

fn keyword(out: &mut String, indent: usize, keyword: &str) {
    line(out, indent, keyword);
}

fn values<I: IntoIterator<Item = String>>(out: &mut String, indent: usize, tokens: I) {
    let joined: Vec<String> = tokens.into_iter().collect();
    line(out, indent, &joined.join(" "));
}

fn line(out: &mut String, indent: usize, text: &str) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{:indent$}{}", "", text, indent = indent);
}
