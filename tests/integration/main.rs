#[path = "../common/mod.rs"]
mod common;

mod solver_tests;
mod wing_tests;
