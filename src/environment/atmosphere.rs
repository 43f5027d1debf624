//! International Standard Atmosphere (troposphere) and Sutherland viscosity.

use serde::{Deserialize, Serialize};

use crate::utils::{
    AeroError, Result, AIR_GAS_CONSTANT, AIR_HEAT_CAPACITY_RATIO, CELSIUS_OFFSET, GRAVITY,
    ISA_LAPSE_RATE, ISA_SEA_LEVEL_PRESSURE, ISA_SEA_LEVEL_TEMP, SUTHERLAND_CONSTANT,
    SUTHERLAND_REFERENCE_VISCOSITY,
};

/// Air density (kg/m³) at a geometric altitude (m).
///
/// Fails when the lapse-rate temperature at that altitude is at or below absolute zero.
pub fn air_density(altitude: f64) -> Result<f64> {
    let t0 = ISA_SEA_LEVEL_TEMP;
    let temperature = t0 - ISA_LAPSE_RATE * altitude;
    if temperature <= 0.0 {
        return Err(AeroError::InvalidParameter(format!(
            "temperature at altitude {altitude} m is below absolute zero"
        )));
    }
    let exponent = GRAVITY / (AIR_GAS_CONSTANT * ISA_LAPSE_RATE);
    let pressure = ISA_SEA_LEVEL_PRESSURE * (1.0 - ISA_LAPSE_RATE * altitude / t0).powf(exponent);
    Ok(pressure / (AIR_GAS_CONSTANT * temperature))
}

/// Dynamic viscosity of air (Pa·s) at a temperature in °C.
pub fn air_viscosity(temperature: f64) -> f64 {
    let t = temperature + CELSIUS_OFFSET;
    let t0 = ISA_SEA_LEVEL_TEMP;
    SUTHERLAND_REFERENCE_VISCOSITY * (t / t0).powf(1.5) * (t0 + SUTHERLAND_CONSTANT)
        / (t + SUTHERLAND_CONSTANT)
}

/// Reynolds number for a reference length flown at `velocity` (m/s).
///
/// Density comes from the standard atmosphere at `altitude` while viscosity uses the
/// actual air `temperature` (°C), so hot or cold days can be studied at a given altitude.
pub fn reynolds_number(
    velocity: f64,
    reference_length: f64,
    altitude: f64,
    temperature: f64,
) -> Result<f64> {
    let rho = air_density(altitude)?;
    let mu = air_viscosity(temperature);
    Ok(rho * velocity * reference_length / mu)
}

/// Speed of sound (m/s) at a temperature in °C.
pub fn speed_of_sound(temperature: f64) -> f64 {
    (AIR_HEAT_CAPACITY_RATIO * AIR_GAS_CONSTANT * (temperature + CELSIUS_OFFSET)).sqrt()
}

pub fn mach_number(velocity: f64, temperature: f64) -> f64 {
    velocity / speed_of_sound(temperature)
}

/// Operating point of a study: where and how fast the wing flies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightCondition {
    /// Velocity (m/s).
    pub velocity: f64,
    /// Geometric altitude (m).
    pub altitude: f64,
    /// Air temperature (°C).
    pub temperature: f64,
}

impl Default for FlightCondition {
    fn default() -> Self {
        Self {
            velocity: 12.0,
            altitude: 0.0,
            temperature: ISA_SEA_LEVEL_TEMP - CELSIUS_OFFSET,
        }
    }
}

impl FlightCondition {
    pub fn new(velocity: f64, altitude: f64, temperature: f64) -> Self {
        Self {
            velocity,
            altitude,
            temperature,
        }
    }

    pub fn density(&self) -> Result<f64> {
        air_density(self.altitude)
    }

    pub fn reynolds(&self, reference_length: f64) -> Result<f64> {
        reynolds_number(
            self.velocity,
            reference_length,
            self.altitude,
            self.temperature,
        )
    }

    pub fn mach(&self) -> f64 {
        mach_number(self.velocity, self.temperature)
    }
}
