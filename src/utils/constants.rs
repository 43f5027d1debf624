pub const GRAVITY: f64 = 9.80665; // m/s^2
pub const MOLAR_GAS_CONSTANT: f64 = 8.3145; // J/(mol·K)
pub const MOLAR_MASS_DRY_AIR: f64 = 28.966e-3; // kg/mol
pub const AIR_GAS_CONSTANT: f64 = MOLAR_GAS_CONSTANT / MOLAR_MASS_DRY_AIR; // J/(kg·K)
pub const AIR_HEAT_CAPACITY_RATIO: f64 = 1.4;
pub const ISA_SEA_LEVEL_TEMP: f64 = 288.15; // K
pub const ISA_SEA_LEVEL_PRESSURE: f64 = 101325.0; // Pa
pub const ISA_LAPSE_RATE: f64 = 0.0065; // K/m, temperature drop with altitude
pub const CELSIUS_OFFSET: f64 = 273.15; // K

// Sutherland's law, referenced to the ISA sea-level temperature
pub const SUTHERLAND_REFERENCE_VISCOSITY: f64 = 1.716e-5; // Pa·s
pub const SUTHERLAND_CONSTANT: f64 = 110.4; // K

// Solver input precision (decimal places)
pub const LENGTH_DECIMALS: i32 = 3;
pub const COEFFICIENT_DECIMALS: i32 = 5;
