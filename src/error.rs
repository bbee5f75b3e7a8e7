//! Error types raised by the converter and its session layer.

use thiserror::Error;

/// Failures of configuration, precondition checks and numerics.
#[derive(Error, Debug)]
pub enum ConverterError {
    /// A required piece of configuration (basis, frequency grid) is missing or unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The input violates an operation precondition (zero q, NaN elements).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown regularization mode string.
    #[error("Unknown regularization mode '{0}': must be 'conventional', 'improved' or 'none'")]
    RegularizationMode(String),

    /// A matrix that has to be inverted is singular.
    #[error("Singular {what} at frequency index {index}")]
    SingularMatrix { what: &'static str, index: usize },

    /// Unknown conversion operation key.
    #[error("Unknown conversion '{0}'")]
    UnknownOperation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ConverterError>;
