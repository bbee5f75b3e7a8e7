//! Preconditions checked before a conversion runs.

use log::debug;

use crate::error::{ConverterError, Result};
use crate::response::TensorField;
use super::state::DerivedState;

/// A named requirement on the converter state or the input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Input field must not contain NaN.
    NoNan,
    /// |q|² must not vanish.
    NonzeroWavevector,
    /// A frequency grid must be set and match the field length.
    FrequenciesSet,
    /// A lattice basis must be set.
    BasisSet,
}

impl Precondition {
    pub fn name(&self) -> &'static str {
        match self {
            Precondition::NoNan => "no-NaN",
            Precondition::NonzeroWavevector => "nonzero-wavevector",
            Precondition::FrequenciesSet => "frequencies-set",
            Precondition::BasisSet => "basis-set",
        }
    }

    pub fn check(&self, state: &DerivedState, field: &TensorField) -> Result<()> {
        match self {
            Precondition::NoNan => {
                if field.has_nan() {
                    return Err(ConverterError::InvalidInput(
                        "all tensor elements are required for this conversion".to_string(),
                    ));
                }
            }
            Precondition::NonzeroWavevector => {
                if state.wavevector.is_zero() {
                    return Err(ConverterError::InvalidInput(
                        "q-vector may not be zero for this conversion".to_string(),
                    ));
                }
            }
            Precondition::FrequenciesSet => {
                if state.frequencies.is_empty() {
                    return Err(ConverterError::Configuration(
                        "frequency grid is not set".to_string(),
                    ));
                }
                if field.len() != state.frequencies.len() {
                    return Err(ConverterError::InvalidInput(format!(
                        "field has {} frequencies but the grid has {}",
                        field.len(),
                        state.frequencies.len()
                    )));
                }
            }
            Precondition::BasisSet => {
                if state.basis.is_none() {
                    return Err(ConverterError::Configuration(
                        "lattice basis is not set".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Check every precondition in order, failing on the first violation.
pub fn validate(preconditions: &[Precondition], state: &DerivedState, field: &TensorField) -> Result<()> {
    preconditions.iter().try_for_each(|p| {
        p.check(state, field).map_err(|e| {
            debug!("precondition {} failed", p.name());
            e
        })
    })
}
