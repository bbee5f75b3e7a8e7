//! Converter configuration and the state derived from it.
//!
//! All derived quantities are a pure function of `ConverterConfig`; the
//! converter rebuilds the whole `DerivedState` after every change.

use nalgebra::Vector3;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::constants::ev_to_hartree;
use crate::error::{ConverterError, Result};
use crate::geometry::{LatticeBasis, ProjectionOperators, Wavevector};
use crate::response::{ElectricSolutionGenerator, Regularization};

/// User-facing converter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// q-vector in fractional coordinates of the reciprocal lattice
    pub wavevector: [f64; 3],
    /// Reciprocal lattice vectors b1, b2, b3 (Bohr⁻¹)
    pub basis: Option<[[f64; 3]; 3]>,
    /// Frequency grid in eV; empty means unset
    pub frequencies: Vec<f64>,
    /// Damping η in Hartree
    pub damping: f64,
    pub regularization: Regularization,
    /// Treat the ESG as identity even at finite q
    pub optical_limit: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            wavevector: [0.0; 3],
            basis: None,
            frequencies: Vec::new(),
            damping: 0.0,
            regularization: Regularization::Conventional,
            optical_limit: false,
        }
    }
}

/// Everything computed from a `ConverterConfig`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivedState {
    pub basis: Option<LatticeBasis>,
    pub wavevector: Wavevector,
    pub projectors: Option<ProjectionOperators>,
    /// Frequency grid in Hartree
    pub frequencies: Vec<f64>,
    /// Regularized frequency grid in Hartree
    pub regularized: Vec<Complex64>,
    pub esg: ElectricSolutionGenerator,
}

/// Compute the derived state for a configuration.
///
/// Fails without side effects if the configuration is inconsistent.
pub fn recompute_derived_state(config: &ConverterConfig) -> Result<DerivedState> {
    let basis = config.basis.map(LatticeBasis::from_vectors).transpose()?;
    let wavevector = Wavevector::new(Vector3::from(config.wavevector), basis.as_ref())?;

    if !(config.damping.is_finite() && config.damping >= 0.0) {
        return Err(ConverterError::InvalidInput(format!(
            "damping must be a finite non-negative number, got {}",
            config.damping
        )));
    }
    if config.frequencies.iter().any(|w| !w.is_finite()) {
        return Err(ConverterError::InvalidInput(
            "frequency grid contains non-finite values".to_string(),
        ));
    }

    let frequencies: Vec<f64> = config.frequencies.iter().map(|&w| ev_to_hartree(w)).collect();
    let regularized = config.regularization.apply(&frequencies, config.damping);
    let projectors = ProjectionOperators::build(wavevector.cart());

    let esg = if config.optical_limit {
        ElectricSolutionGenerator::identity(regularized.len())
    } else {
        ElectricSolutionGenerator::build(projectors.as_ref(), &regularized, wavevector.qabs2())
    };

    Ok(DerivedState {
        basis,
        wavevector,
        projectors,
        frequencies,
        regularized,
        esg,
    })
}
