mod atmosphere;

pub use atmosphere::{
    air_density, air_viscosity, mach_number, reynolds_number, speed_of_sound, FlightCondition,
};
