pub mod types;
pub mod error;
pub mod physics;
pub mod cea;
pub mod analysis;
pub mod config;
pub mod worker;
pub mod io;

pub use error::{CeaError, Result};

// Short paths for the three pipeline stages
pub mod parser {
    pub use crate::cea::parser::{parse, parse_file, parse_file_with, parse_with};
}

pub mod system {
    pub use crate::analysis::system::{
        compute_system, compute_system_resolving, compute_system_with, SystemAssumptions,
        SystemResult,
    };
}

pub mod sensitivity {
    pub use crate::analysis::sensitivity::{build_sensitivity_grids, GradientView, SensitivityGrid};
}

pub mod atmosphere {
    pub use crate::physics::atmosphere::*;
}
