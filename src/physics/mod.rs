pub mod atmosphere;
pub mod nozzle;

pub use atmosphere::ambient_pressure;
pub use nozzle::{choke_factor, solve_mach, throat_area, thrust_at};
