//! Electric solution generator (ESG).
//!
//! At finite q the macroscopic and microscopic field solutions differ in their
//! transverse part. Per regularized frequency ω the ESG and its inverse are
//!
//!   ESG    = P_L + pre · P_T
//!   ESG⁻¹  = P_L + pre⁻¹ · P_T,   pre = ω² / (ω² - c²|q|²)
//!
//! References: Starke & Schober, "Functional Approach to Electrodynamics of
//! Media", Photonics Nanostruct. 14, 1 (2015); arXiv:1606.00445.

use log::warn;
use nalgebra::Matrix3;
use num_complex::Complex64;

use crate::constants::{SPEED_OF_LIGHT_AU, ZERO_THRESHOLD};
use crate::geometry::ProjectionOperators;
use super::field::to_complex;

/// Per-frequency ESG and inverse ESG.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElectricSolutionGenerator {
    esg: Vec<Matrix3<Complex64>>,
    esg_inverse: Vec<Matrix3<Complex64>>,
}

impl ElectricSolutionGenerator {
    /// Identity at every frequency (q = 0 or optical limit).
    pub fn identity(num_freqs: usize) -> Self {
        Self {
            esg: vec![Matrix3::identity(); num_freqs],
            esg_inverse: vec![Matrix3::identity(); num_freqs],
        }
    }

    /// Build the ESG pair for a regularized frequency grid (Hartree).
    ///
    /// Without projectors (q = 0) both operators are the identity. Where |pre|
    /// vanishes the inverse does not exist; there ESG = P_L and ESG⁻¹ = P_T.
    pub fn build(
        projectors: Option<&ProjectionOperators>,
        rfreqs: &[Complex64],
        qabs2: f64,
    ) -> Self {
        let Some(p) = projectors else {
            return Self::identity(rfreqs.len());
        };
        let pl = to_complex(&p.pl);
        let pt = to_complex(&p.pt);
        let c2q2 = SPEED_OF_LIGHT_AU * SPEED_OF_LIGHT_AU * qabs2;

        let mut esg = Vec::with_capacity(rfreqs.len());
        let mut esg_inverse = Vec::with_capacity(rfreqs.len());
        let mut degenerate = 0;
        for w in rfreqs {
            let w2 = w * w;
            let pre = w2 / (w2 - c2q2);
            if pre.norm() < ZERO_THRESHOLD {
                degenerate += 1;
                esg.push(pl);
                esg_inverse.push(pt);
            } else {
                esg.push(pl + pt * pre);
                esg_inverse.push(pl + pt * pre.inv());
            }
        }
        if degenerate > 0 {
            warn!(
                "ESG prefactor vanishes at {} of {} frequencies; using P_L / P_T there",
                degenerate,
                rfreqs.len()
            );
        }
        Self { esg, esg_inverse }
    }

    pub fn len(&self) -> usize {
        self.esg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.esg.is_empty()
    }

    pub fn esg(&self) -> &[Matrix3<Complex64>] {
        &self.esg
    }

    pub fn esg_inverse(&self) -> &[Matrix3<Complex64>] {
        &self.esg_inverse
    }
}
