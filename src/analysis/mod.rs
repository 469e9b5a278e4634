pub mod contour;
pub mod filter;
pub mod gradient;
pub mod sensitivity;
pub mod series;
pub mod system;

pub use contour::{ConicalContour, ContourGenerator, ContourRequest, NozzleContour};
pub use filter::{CaseFilter, Range};
pub use gradient::gradient;
pub use sensitivity::{build_sensitivity_grids, GradientView, SensitivityGrid};
pub use series::{by_pressure, Quantity, Series};
pub use system::{
    compute_system, compute_system_resolving, compute_system_with, linspace, SystemAssumptions,
    SystemResult,
};
