//! The `Converter`: configuration plus a derived-state cache.

use log::{debug, info, warn};
use nalgebra::{Matrix3, Vector3};
use num_complex::Complex64;

use crate::constants::hartree_to_ev;
use crate::error::Result;
use crate::geometry::{LatticeBasis, ProjectionOperators, Wavevector};
use crate::response::{ElectricSolutionGenerator, Regularization};
use super::state::{recompute_derived_state, ConverterConfig, DerivedState};

/// Converts linear response functions into one another via the universal
/// response relations for a given wavevector and frequency grid.
///
/// Every setter validates the new configuration and rebuilds all derived
/// quantities at once. A failing setter leaves the converter unchanged.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
    state: DerivedState,
}

impl Converter {
    /// A converter with default settings: q = 0, no basis, no frequencies,
    /// η = 0 and conventional regularization.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: ConverterConfig) -> Result<Self> {
        let mut converter = Self::new();
        converter.apply(config)?;
        Ok(converter)
    }

    /// Replace the whole configuration.
    pub fn apply(&mut self, config: ConverterConfig) -> Result<()> {
        let state = recompute_derived_state(&config)?;
        self.config = config;
        self.state = state;
        self.log_summary();
        Ok(())
    }

    fn update<F: FnOnce(&mut ConverterConfig)>(&mut self, f: F) -> Result<()> {
        let mut config = self.config.clone();
        f(&mut config);
        self.apply(config)
    }

    /// Set q in fractional coordinates. A nonzero q needs a basis.
    pub fn set_wavevector(&mut self, q_frac: [f64; 3]) -> Result<()> {
        self.update(|c| c.wavevector = q_frac)
    }

    pub fn set_basis(&mut self, basis: &LatticeBasis) -> Result<()> {
        let b = basis.reciprocal_vector;
        let columns = [0usize, 1, 2].map(|j| [b[(0, j)], b[(1, j)], b[(2, j)]]);
        self.update(|c| c.basis = Some(columns))
    }

    /// Set the frequency grid in eV.
    pub fn set_frequencies(&mut self, freqs_ev: &[f64]) -> Result<()> {
        self.update(|c| c.frequencies = freqs_ev.to_vec())
    }

    /// Set the damping η in Hartree.
    pub fn set_damping(&mut self, eta: f64) -> Result<()> {
        self.update(|c| c.damping = eta)
    }

    pub fn set_regularization(&mut self, reg: Regularization) -> Result<()> {
        self.update(|c| c.regularization = reg)
    }

    /// Set the regularization by name ("conventional", "improved", "none").
    pub fn set_regularization_str(&mut self, reg: &str) -> Result<()> {
        self.set_regularization(reg.parse()?)
    }

    pub fn set_optical_limit(&mut self, optical_limit: bool) -> Result<()> {
        self.update(|c| c.optical_limit = optical_limit)
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub(crate) fn state(&self) -> &DerivedState {
        &self.state
    }

    pub fn basis(&self) -> Option<&LatticeBasis> {
        self.state.basis.as_ref()
    }

    pub fn wavevector(&self) -> &Wavevector {
        &self.state.wavevector
    }

    pub fn q_frac(&self) -> &Vector3<f64> {
        self.state.wavevector.frac()
    }

    pub fn q_cart(&self) -> &Vector3<f64> {
        self.state.wavevector.cart()
    }

    pub fn qabs(&self) -> f64 {
        self.state.wavevector.qabs()
    }

    pub fn qabs2(&self) -> f64 {
        self.state.wavevector.qabs2()
    }

    pub fn projectors(&self) -> Option<&ProjectionOperators> {
        self.state.projectors.as_ref()
    }

    pub fn pl(&self) -> Option<&Matrix3<f64>> {
        self.state.projectors.as_ref().map(|p| &p.pl)
    }

    pub fn pt(&self) -> Option<&Matrix3<f64>> {
        self.state.projectors.as_ref().map(|p| &p.pt)
    }

    pub fn num_frequencies(&self) -> usize {
        self.state.frequencies.len()
    }

    pub fn frequencies_ev(&self) -> Vec<f64> {
        self.state.frequencies.iter().map(|&w| hartree_to_ev(w)).collect()
    }

    /// Frequency grid in Hartree.
    pub fn frequencies_au(&self) -> &[f64] {
        &self.state.frequencies
    }

    /// Regularized frequencies in Hartree.
    pub fn regularized_frequencies(&self) -> &[Complex64] {
        &self.state.regularized
    }

    pub fn damping(&self) -> f64 {
        self.config.damping
    }

    pub fn regularization(&self) -> Regularization {
        self.config.regularization
    }

    pub fn optical_limit(&self) -> bool {
        self.config.optical_limit
    }

    pub fn electric_solution_generator(&self) -> &ElectricSolutionGenerator {
        &self.state.esg
    }

    pub fn esg(&self) -> &[Matrix3<Complex64>] {
        self.state.esg.esg()
    }

    pub fn esg_inverse(&self) -> &[Matrix3<Complex64>] {
        self.state.esg.esg_inverse()
    }

    fn log_summary(&self) {
        let q = &self.state.wavevector;
        info!(
            "converter: q_frac = {:?}, q_cart = {:?}, |q| = {:.6}, {} frequencies, regularization = {}, eta = {}",
            q.frac().as_slice(),
            q.cart().as_slice(),
            q.qabs(),
            self.state.frequencies.len(),
            self.config.regularization,
            self.config.damping
        );
        match &self.state.projectors {
            None => warn!("q-vector is zero: no projection operators, ESG set to identity"),
            Some(p) => {
                debug!("P_L = {}", p.pl);
                debug!("P_T = {}", p.pt);
                if self.config.optical_limit {
                    info!("optical limit assumed: ESG set to identity");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::error::ConverterError;

    #[test]
    fn test_defaults() {
        let conv = Converter::new();
        assert!(conv.wavevector().is_zero());
        assert!(conv.basis().is_none());
        assert_eq!(conv.num_frequencies(), 0);
        assert_eq!(conv.damping(), 0.0);
        assert_eq!(conv.regularization(), Regularization::Conventional);
        assert!(conv.pl().is_none());
    }

    #[test]
    fn test_wavevector_before_basis_fails_and_keeps_state() {
        let mut conv = Converter::new();
        let err = conv.set_wavevector([0.0, 0.0, 1.0]).unwrap_err();
        assert!(matches!(err, ConverterError::Configuration(_)));
        assert!(conv.wavevector().is_zero());
        assert_eq!(conv.config().wavevector, [0.0; 3]);
    }

    #[test]
    fn test_basis_change_updates_cartesian_wavevector() {
        let mut conv = Converter::new();
        conv.set_basis(&LatticeBasis::new(Matrix3::identity()).unwrap()).unwrap();
        conv.set_wavevector([0.0, 0.0, 0.5]).unwrap();
        assert_relative_eq!(conv.qabs(), 0.5, epsilon = 1e-14);

        conv.set_basis(&LatticeBasis::new(Matrix3::identity() * 2.0).unwrap()).unwrap();
        assert_relative_eq!(conv.qabs(), 1.0, epsilon = 1e-14);
        assert_relative_eq!(conv.q_cart().z, 1.0, epsilon = 1e-14);
        assert_relative_eq!(conv.q_frac().z, 0.5, epsilon = 1e-14);
    }

    #[test]
    fn test_set_basis_preserves_columns() {
        let b = Matrix3::new(
            1.0, 0.2, 0.0,
            0.0, 1.0, 0.3,
            0.4, 0.0, 1.0,
        );
        let mut conv = Converter::new();
        conv.set_basis(&LatticeBasis::new(b).unwrap()).unwrap();
        assert_relative_eq!(conv.basis().unwrap().reciprocal_vector, b, epsilon = 1e-15);
    }

    #[test]
    fn test_damping_and_mode_rebuild_regularized_grid() {
        let mut conv = Converter::new();
        conv.set_frequencies(&[1.0, 2.0]).unwrap();
        assert_eq!(conv.regularized_frequencies()[0].im, 0.0);
        conv.set_damping(0.05).unwrap();
        assert_relative_eq!(conv.regularized_frequencies()[0].im, 0.05);
        conv.set_regularization_str("none").unwrap();
        assert_eq!(conv.regularized_frequencies()[0].im, 0.0);
        assert!(matches!(
            conv.set_regularization_str("lorentz"),
            Err(ConverterError::RegularizationMode(_))
        ));
        assert_eq!(conv.regularization(), Regularization::None);
    }

    #[test]
    fn test_frequencies_ev_round_trip() {
        let mut conv = Converter::new();
        conv.set_frequencies(&[0.5, 1.5, 2.5]).unwrap();
        let back = conv.frequencies_ev();
        for (a, b) in back.iter().zip([0.5, 1.5, 2.5]) {
            assert_relative_eq!(*a, b, epsilon = 1e-14);
        }
        assert_eq!(conv.esg().len(), 3);
    }

    #[test]
    fn test_optical_limit_toggle() {
        let mut conv = Converter::new();
        conv.set_basis(&LatticeBasis::new(Matrix3::identity()).unwrap()).unwrap();
        conv.set_wavevector([0.0, 0.0, 0.1]).unwrap();
        conv.set_frequencies(&[1.0]).unwrap();
        assert_ne!(conv.esg()[0], Matrix3::identity());
        conv.set_optical_limit(true).unwrap();
        assert_eq!(conv.esg()[0], Matrix3::identity());
        assert!(conv.pl().is_some());
        conv.set_optical_limit(false).unwrap();
        assert_ne!(conv.esg()[0], Matrix3::identity());
    }
}
