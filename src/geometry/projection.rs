//! Longitudinal and transverse projection operators with respect to q.

use nalgebra::{Matrix3, Vector3};

use crate::constants::ZERO_THRESHOLD;

/// Projectors onto the subspaces parallel (P_L) and perpendicular (P_T) to q.
///
/// P_L = q qᵀ / |q|², P_T = 1 - P_L
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionOperators {
    pub pl: Matrix3<f64>,
    pub pt: Matrix3<f64>,
}

impl ProjectionOperators {
    /// Build projectors from a cartesian wavevector.
    ///
    /// Returns `None` when |q|² falls below the zero threshold, where P_L is undefined.
    pub fn build(q: &Vector3<f64>) -> Option<Self> {
        let qabs2 = q.norm_squared();
        if qabs2 < ZERO_THRESHOLD {
            return None;
        }
        let pl = q * q.transpose() / qabs2;
        let pt = Matrix3::identity() - pl;
        Some(Self { pl, pt })
    }

    /// Remove the longitudinal component of `v`.
    pub fn transverse(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.pt * v
    }
}
