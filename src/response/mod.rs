//! Response module - tensor fields, frequency regularization and the ESG.

mod field;
mod regularization;
mod esg;

pub use field::{TensorField, ElementState};
pub use regularization::Regularization;
pub use esg::ElectricSolutionGenerator;

pub(crate) use field::{nan_c64, to_complex};
