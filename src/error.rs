use thiserror::Error;

#[derive(Error, Debug)]
pub enum CeaError {
    #[error("missing data: {0}")]
    MissingData(String),

    #[error("expansion ratio is undefined for case {index} (O/F = {of}, Pc = {pc} bar)")]
    Validation { index: usize, of: f64, pc: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("parse worker failed: {0}")]
    Worker(String),
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, CeaError>;
