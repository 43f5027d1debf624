use aerowing::{AeroError, AlphaSweep, Airfoil, SolverError, XfoilAnalysis, XfoilService};
use approx::assert_relative_eq;

use crate::common::{
    airfoil_library, assert_table_valid, failing_solver, fake_xfoil, hanging_solver, polar_text,
    section_polar_rows, silent_solver,
};

#[test]
fn test_viscous_polar() {
    let solver = fake_xfoil(&polar_text(&section_polar_rows()));
    let (_airfoils, library) = airfoil_library(&["s1223"]);
    let service = XfoilService::new(solver.config.clone(), library.clone());

    let analysis =
        XfoilAnalysis::viscous(AlphaSweep::range(-4.0, 12.0, 2.0), 400_000.0).with_iterations(100);
    let table = service
        .get_coefficients(&Airfoil::new("s1223"), &analysis)
        .unwrap();

    assert_table_valid(&table);
    assert_eq!(table.len(), 9);
    assert_eq!(table.label, "XFOIL | 2D | Airfoil s1223 | Re=4.000e+05");
    assert!(table.unconverged_alphas().is_empty());
    let row = table.row_at_alpha(4.0).unwrap();
    assert_relative_eq!(row.lift_coefficient, 0.8);
    assert_relative_eq!(row.drag_coefficient, 0.018);
    assert_eq!(row.pressure_drag_coefficient, Some(0.005));

    let script = solver.received_script();
    let airfoil_path = library.path(&Airfoil::new("s1223")).unwrap();
    assert!(script.starts_with(&format!("LOAD {}\n", airfoil_path.display())));
    assert!(script.contains("VISC 400000\nITER 100\nPACC\npolar.txt\n\n"));
    assert_eq!(script.matches("ALFA ").count(), 9);
    assert!(script.ends_with("PACC\n\nQUIT\n"));
}

#[test]
fn test_unconverged_angles_are_reported() {
    // The solver drops 6° and 8°
    let rows: Vec<_> = section_polar_rows()
        .into_iter()
        .filter(|row| row.0 != 6.0 && row.0 != 8.0)
        .collect();
    let solver = fake_xfoil(&polar_text(&rows));
    let (_airfoils, library) = airfoil_library(&["s1223"]);
    let service = XfoilService::new(solver.config.clone(), library);

    let table = service
        .get_coefficients(
            &Airfoil::new("s1223"),
            &XfoilAnalysis::inviscid(AlphaSweep::range(-4.0, 12.0, 2.0)),
        )
        .unwrap();

    assert_eq!(table.len(), 7);
    assert_eq!(table.unconverged_alphas(), vec![6.0, 8.0]);
    assert!(table.row_at_alpha(6.0).is_none());
    assert!(table.label.ends_with("Inviscid"));
    assert!(!solver.received_script().contains("VISC"));
}

#[test]
fn test_missing_airfoil_is_rejected_before_launch() {
    let solver = fake_xfoil(&polar_text(&section_polar_rows()));
    let (_airfoils, library) = airfoil_library(&["s1223"]);
    let service = XfoilService::new(solver.config.clone(), library);

    let result = service.get_coefficients(
        &Airfoil::new("naca2412"),
        &XfoilAnalysis::inviscid(AlphaSweep::List(vec![0.0])),
    );
    assert!(matches!(result, Err(AeroError::InvalidParameter(_))));
    assert!(solver.received_script().is_empty());
}

#[test]
fn test_invalid_reynolds_number() {
    let solver = fake_xfoil("");
    let (_airfoils, library) = airfoil_library(&["s1223"]);
    let service = XfoilService::new(solver.config.clone(), library);

    let result = service.get_coefficients(
        &Airfoil::new("s1223"),
        &XfoilAnalysis::viscous(AlphaSweep::List(vec![0.0]), -1.0),
    );
    assert!(matches!(result, Err(AeroError::InvalidParameter(_))));
}

#[test]
fn test_solver_failure() {
    let solver = failing_solver();
    let (_airfoils, library) = airfoil_library(&["s1223"]);
    let service = XfoilService::new(solver.config.clone(), library);

    let result = service.get_coefficients(
        &Airfoil::new("s1223"),
        &XfoilAnalysis::inviscid(AlphaSweep::List(vec![0.0, 2.0])),
    );
    match result {
        Err(AeroError::SolverExecution(SolverError::ProcessFailed { console_tail, .. })) => {
            assert!(console_tail.contains("matrix is singular"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_missing_polar_file() {
    let solver = silent_solver();
    let (_airfoils, library) = airfoil_library(&["s1223"]);
    let service = XfoilService::new(solver.config.clone(), library);

    let result = service.get_coefficients(
        &Airfoil::new("s1223"),
        &XfoilAnalysis::inviscid(AlphaSweep::List(vec![0.0])),
    );
    assert!(matches!(
        result,
        Err(AeroError::SolverExecution(SolverError::MissingOutput { .. }))
    ));
}

#[test]
fn test_stale_polar_is_not_reused() {
    let solver = silent_solver();
    std::fs::create_dir_all(solver.work_dir()).unwrap();
    std::fs::write(
        solver.work_dir().join("polar.txt"),
        polar_text(&section_polar_rows()),
    )
    .unwrap();
    let (_airfoils, library) = airfoil_library(&["s1223"]);
    let service = XfoilService::new(solver.config.clone(), library);

    let result = service.get_coefficients(
        &Airfoil::new("s1223"),
        &XfoilAnalysis::inviscid(AlphaSweep::List(vec![0.0])),
    );
    assert!(matches!(
        result,
        Err(AeroError::SolverExecution(SolverError::MissingOutput { .. }))
    ));
}

#[test]
fn test_hanging_solver_times_out() {
    let solver = hanging_solver(0.3);
    let (_airfoils, library) = airfoil_library(&["s1223"]);
    let service = XfoilService::new(solver.config.clone(), library);

    let result = service.get_coefficients(
        &Airfoil::new("s1223"),
        &XfoilAnalysis::inviscid(AlphaSweep::List(vec![0.0])),
    );
    assert!(matches!(
        result,
        Err(AeroError::SolverExecution(SolverError::Timeout { .. }))
    ));
}
