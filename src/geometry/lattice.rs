//! Reciprocal lattice basis and the wavevector expressed in it.

use nalgebra::{Matrix3, Vector3};
use std::f64::consts::PI;

use crate::constants::ZERO_THRESHOLD;
use crate::error::{ConverterError, Result};

/// Reciprocal lattice basis.
///
/// The columns of `reciprocal_vector` are b1, b2, b3 in a cartesian frame (Bohr⁻¹),
/// so that `q_cart = reciprocal_vector * q_frac`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeBasis {
    pub reciprocal_vector: Matrix3<f64>,
    inverse: Matrix3<f64>,
}

impl LatticeBasis {
    /// Create a basis from a matrix with reciprocal lattice vectors as columns.
    pub fn new(reciprocal_vector: Matrix3<f64>) -> Result<Self> {
        if reciprocal_vector.iter().any(|x| !x.is_finite()) {
            return Err(ConverterError::Configuration(
                "lattice basis contains non-finite entries".to_string(),
            ));
        }
        let inverse = reciprocal_vector.try_inverse().ok_or_else(|| {
            ConverterError::Configuration("lattice basis is not invertible".to_string())
        })?;
        Ok(Self { reciprocal_vector, inverse })
    }

    /// Create a basis from the three reciprocal lattice vectors b1, b2, b3.
    pub fn from_vectors(b: [[f64; 3]; 3]) -> Result<Self> {
        Self::new(Matrix3::from_columns(&[
            Vector3::from(b[0]),
            Vector3::from(b[1]),
            Vector3::from(b[2]),
        ]))
    }

    /// Build the reciprocal basis from real-space lattice vectors.
    ///
    /// # Arguments
    /// * `avec` - Real-space lattice vectors a1, a2, a3 (Bohr), one per row
    /// * `scale` - Scaling factor applied to all three axes
    ///
    /// With A holding the scaled a_i as columns, B = 2π (Aᵀ)⁻¹ so that Aᵀ·B = 2π·1.
    pub fn from_real_space(avec: [[f64; 3]; 3], scale: f64) -> Result<Self> {
        let a = Matrix3::from_columns(&[
            Vector3::from(avec[0]),
            Vector3::from(avec[1]),
            Vector3::from(avec[2]),
        ]) * scale;
        let a_t_inv = a.transpose().try_inverse().ok_or_else(|| {
            ConverterError::Configuration("real-space lattice vectors are linearly dependent".to_string())
        })?;
        Self::new(2.0 * PI * a_t_inv)
    }

    pub fn inverse(&self) -> &Matrix3<f64> {
        &self.inverse
    }

    /// Volume of the first Brillouin zone (Bohr⁻³).
    pub fn reciprocal_volume(&self) -> f64 {
        self.reciprocal_vector.determinant()
    }

    /// Volume of the real-space unit cell (Bohr³).
    pub fn real_volume(&self) -> f64 {
        (2.0 * PI).powi(3) / self.reciprocal_volume()
    }

    pub fn to_cartesian(&self, frac: &Vector3<f64>) -> Vector3<f64> {
        self.reciprocal_vector * frac
    }

    pub fn to_fractional(&self, cart: &Vector3<f64>) -> Vector3<f64> {
        self.inverse * cart
    }
}

/// Wavevector q in fractional and cartesian coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wavevector {
    frac: Vector3<f64>,
    cart: Vector3<f64>,
    qabs2: f64,
}

impl Default for Wavevector {
    fn default() -> Self {
        Self::zero()
    }
}

impl Wavevector {
    /// The Γ-point, q = (0, 0, 0).
    pub fn zero() -> Self {
        Self {
            frac: Vector3::zeros(),
            cart: Vector3::zeros(),
            qabs2: 0.0,
        }
    }

    /// Create a wavevector from fractional coordinates.
    ///
    /// A nonzero vector needs a basis to derive its cartesian form.
    pub fn new(frac: Vector3<f64>, basis: Option<&LatticeBasis>) -> Result<Self> {
        if frac.iter().any(|x| !x.is_finite()) {
            return Err(ConverterError::InvalidInput(
                "wavevector contains non-finite components".to_string(),
            ));
        }
        if frac.iter().all(|&x| x == 0.0) {
            return Ok(Self::zero());
        }
        let basis = basis.ok_or_else(|| {
            ConverterError::Configuration(
                "a lattice basis is required for a nonzero wavevector".to_string(),
            )
        })?;
        let cart = basis.to_cartesian(&frac);
        Ok(Self {
            frac,
            cart,
            qabs2: cart.norm_squared(),
        })
    }

    pub fn frac(&self) -> &Vector3<f64> {
        &self.frac
    }

    pub fn cart(&self) -> &Vector3<f64> {
        &self.cart
    }

    /// |q| in Bohr⁻¹
    pub fn qabs(&self) -> f64 {
        self.qabs2.sqrt()
    }

    /// |q|² in Bohr⁻²
    pub fn qabs2(&self) -> f64 {
        self.qabs2
    }

    pub fn is_zero(&self) -> bool {
        self.qabs2 < ZERO_THRESHOLD
    }
}
