use aerowing::models::avl::Symmetry;
use aerowing::{
    AeroError, AirfoilLibrary, CoefficientRow, CoefficientsTable, GeometryInput, GeometryOptions,
    MassInput,
};
use pretty_assertions::assert_eq;

use crate::common::{assert_avl_keyword_arguments, cranked_wing, demo_wing};

const KEYWORDS: &[&str] = &[
    "SURFACE", "SECTION", "AFILE", "CDCL", "CLAF", "YDUPLICATE", "ANGLE", "BODY",
];

fn library() -> AirfoilLibrary {
    AirfoilLibrary::new("/data/airfoils")
}

#[test]
fn test_demo_wing_geometry_file() {
    let input =
        GeometryInput::from_wing(&demo_wing(), &GeometryOptions::default(), &library(), None)
            .unwrap();
    input.validate().unwrap();

    let text = input.to_input_file();
    assert_eq!(
        text,
        "Plane\n0\n1 0 0\n1.17 0.467 2.6\n0.117 0 0\n0\n\
         \nSURFACE\nWing\n12 1 20 1\n\
         \x20   SECTION\n    0 0 0 0.6 0\n        AFILE\n        /data/airfoils/s1223.dat\n\
         \x20   SECTION\n    0.15 1.3 0 0.3 0\n        AFILE\n        /data/airfoils/s1223.dat\n"
    );
    assert_avl_keyword_arguments(&text, KEYWORDS);
}

#[test]
fn test_demo_wing_mass_file() {
    let input = MassInput::from_wing(&demo_wing(), 9.81, 1.225).unwrap();
    assert_eq!(
        input.to_input_file(),
        "Lunit = 1.0 m\nMunit = 1.0 kg\nTunit = 1.0 s\n\ng = 9.81\nrho = 1.225\n\n\
         #  mass   x   y   z   Ixx   Iyy   Izz   Ixy   Ixz   Iyz\n\
         \x20  10   0.15   0   0   0   0   0   0   0   0\n"
    );
}

#[test]
fn test_symmetry_conflict_is_rejected() {
    let options = GeometryOptions {
        y_duplicate: Some(0.0),
        ..GeometryOptions::default()
    };
    let input = GeometryInput::from_wing(&demo_wing(), &options, &library(), None).unwrap();
    assert!(matches!(
        input.validate(),
        Err(AeroError::InvalidParameter(_))
    ));

    // Mirroring through YDUPLICATE alone is fine
    let options = GeometryOptions {
        y_symmetry: Symmetry::Ignore,
        y_duplicate: Some(0.0),
        ..GeometryOptions::default()
    };
    let input = GeometryInput::from_wing(&demo_wing(), &options, &library(), None).unwrap();
    input.validate().unwrap();
    let text = input.to_input_file();
    assert!(text.starts_with("Plane\n0\n0 0 0\n"));
    assert!(text.contains("    YDUPLICATE\n    0\n"));
}

#[test]
fn test_cranked_wing_sections_written_root_to_tip() {
    let wing = cranked_wing();
    // One polar per section in `wing.sections` order (tip, root, mid), each with a
    // distinct lift offset so the pairing can be checked in the output
    let polars: Vec<CoefficientsTable> = [0.3, 0.1, 0.2]
        .iter()
        .map(|offset| {
            CoefficientsTable::new(
                "polar",
                vec![
                    CoefficientRow::new(-4.0, -0.4 + offset, 0.02, 0.0),
                    CoefficientRow::new(0.0, 0.0 + offset, 0.01, 0.0),
                    CoefficientRow::new(10.0, 1.0 + offset, 0.03, 0.0),
                ],
            )
        })
        .collect();

    let input =
        GeometryInput::from_wing(&wing, &GeometryOptions::default(), &library(), Some(&polars))
            .unwrap();
    let text = input.to_input_file();
    assert_avl_keyword_arguments(&text, KEYWORDS);

    let files: Vec<&str> = text
        .lines()
        .filter(|l| l.trim_start().starts_with("/data/airfoils/"))
        .map(str::trim)
        .collect();
    assert_eq!(
        files,
        vec![
            "/data/airfoils/root.dat",
            "/data/airfoils/mid.dat",
            "/data/airfoils/tip.dat"
        ]
    );

    let drag_lines: Vec<&str> = text
        .lines()
        .zip(text.lines().skip(1))
        .filter(|(keyword, _)| keyword.trim() == "CDCL")
        .map(|(_, values)| values.trim())
        .collect();
    assert_eq!(
        drag_lines,
        vec![
            "-0.3 0.02 0.1 0.01 1.1 0.03",
            "-0.2 0.02 0.2 0.01 1.2 0.03",
            "-0.1 0.02 0.3 0.01 1.3 0.03",
        ]
    );

    // Twist becomes the section incidence
    assert!(text.contains("    0.2 1.5 0.05 0.25 -2\n"));
}

#[test]
fn test_polar_count_must_match_sections() {
    let polars = vec![CoefficientsTable::new("only one", Vec::new())];
    let result = GeometryInput::from_wing(
        &demo_wing(),
        &GeometryOptions::default(),
        &library(),
        Some(&polars),
    );
    assert!(matches!(result, Err(AeroError::InvalidParameter(_))));
}

#[test]
fn test_header_numbers_read_back_exactly() {
    let options = GeometryOptions {
        mach_number: 0.0352917,
        profile_drag_coefficient: Some(0.0123456789),
        ..GeometryOptions::default()
    };
    let input = GeometryInput::from_wing(&cranked_wing(), &options, &library(), None).unwrap();
    let text = input.to_input_file();
    let lines: Vec<&str> = text.lines().collect();
    let numbers = |index: usize| -> Vec<f64> {
        lines[index]
            .split_whitespace()
            .map(|token| token.parse().unwrap())
            .collect()
    };

    let header = &input.header;
    assert_eq!(lines[0], header.title);
    assert_eq!(numbers(1), vec![header.mach_number]);
    assert_eq!(header.mach_number, 0.03529);
    assert_eq!(
        numbers(3),
        vec![
            header.reference_area,
            header.reference_chord,
            header.reference_span
        ]
    );
    let point = &header.reference_point;
    assert_eq!(numbers(4), vec![point.x, point.y, point.z]);
    assert_eq!(numbers(5), vec![header.profile_drag_coefficient.unwrap()]);
    assert_eq!(header.profile_drag_coefficient, Some(0.01235));

    // Section geometry is written unrounded
    let section_rows: Vec<Vec<f64>> = lines
        .iter()
        .zip(lines.iter().skip(1))
        .filter(|(keyword, _)| keyword.trim() == "SECTION")
        .map(|(_, row)| row.split_whitespace().map(|t| t.parse().unwrap()).collect())
        .collect();
    let wing = cranked_wing();
    let expected: Vec<Vec<f64>> = wing
        .sorted_sections()
        .iter()
        .map(|s| vec![s.x(), s.y(), s.z(), s.chord, s.twist])
        .collect();
    assert_eq!(section_rows, expected);
}
