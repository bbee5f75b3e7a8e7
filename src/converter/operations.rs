//! Conversions between response functions.
//!
//! Universal response relations after Starke & Schober, "Functional Approach to
//! Electrodynamics of Media" (2015) and "Microscopic Theory of the Refractive
//! Index", arXiv:1510.03404. All response functions stay in atomic units.

use nalgebra::{Matrix2, Matrix3, Vector2, Vector3};
use num_complex::Complex64;
use std::f64::consts::PI;

use crate::error::{ConverterError, Result};
use crate::response::{nan_c64, to_complex, TensorField};
use super::dispatch::Operation;
use super::facade::Converter;
use super::validation::validate;

/// Refractive indices n₁, n₂ and optionally their polarization vectors.
///
/// `indices` holds n₁ in slot (0, 0) and n₂ in slot (1, 1), NaN elsewhere.
/// Each polarization field holds the cartesian components of one branch's
/// unit polarization vector on its diagonal, NaN elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct RefractiveIndices {
    pub indices: TensorField,
    pub polarizations: Option<[TensorField; 2]>,
}

impl RefractiveIndices {
    pub fn n1(&self) -> Vec<Complex64> {
        self.indices.element(0, 0)
    }

    pub fn n2(&self) -> Vec<Complex64> {
        self.indices.element(1, 1)
    }
}

/// Principal square root of n² with non-negative real and imaginary parts.
pub fn refractive_index(n2: Complex64) -> Complex64 {
    let abs = n2.norm();
    Complex64::new(
        (0.5 * (abs + n2.re)).max(0.0).sqrt(),
        (0.5 * (abs - n2.re)).max(0.0).sqrt(),
    )
}

/// Eigenpairs of a complex 2×2 matrix with unit-norm eigenvectors.
fn eigen_2x2(m: &Matrix2<Complex64>) -> [(Complex64, Vector2<Complex64>); 2] {
    let (a, b, c, d) = (m[(0, 0)], m[(0, 1)], m[(1, 0)], m[(1, 1)]);
    let scale = m.iter().map(|z| z.norm()).fold(0.0, f64::max);
    let tiny = 1e-14 * scale.max(f64::MIN_POSITIVE);
    if b.norm() <= tiny && c.norm() <= tiny {
        return [
            (a, Vector2::new(Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0))),
            (d, Vector2::new(Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0))),
        ];
    }
    let half_trace = (a + d) * 0.5;
    let disc = ((a - d) * (a - d) * 0.25 + b * c).sqrt();
    [half_trace + disc, half_trace - disc].map(|lambda| {
        let v = if b.norm() >= c.norm() {
            Vector2::new(b, lambda - a)
        } else {
            Vector2::new(lambda - d, c)
        };
        let norm = v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
        (lambda, v.map(|z| z / norm))
    })
}

/// Two unit vectors spanning the plane perpendicular to `q`.
fn transverse_basis(q: &Vector3<f64>, pt: &Matrix3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    // project the cartesian axis least aligned with q
    let axis = q.iamin();
    let v1 = (pt * Vector3::ith(axis, 1.0)).normalize();
    let v2 = q.cross(&v1).normalize();
    (v1, v2)
}

impl Converter {
    fn check(&self, op: Operation, field: &TensorField) -> Result<()> {
        validate(op.preconditions(), self.state(), field)
    }

    /// σ(ω) = iω/4π · (1 - ε(ω))
    pub fn eps_to_sig(&self, eps: &TensorField) -> Result<TensorField> {
        self.check(Operation::EpsToSig, eps)?;
        let rfreqs = self.regularized_frequencies();
        Ok(TensorField::from_fn(eps.len(), |f| {
            let pre = Complex64::i() * rfreqs[f] / (4.0 * PI);
            (Matrix3::<Complex64>::identity() - eps[f]) * pre
        }))
    }

    /// ε(ω) = 1 - 4π/(iω) · σ(ω)
    pub fn sig_to_eps(&self, sig: &TensorField) -> Result<TensorField> {
        self.check(Operation::SigToEps, sig)?;
        let rfreqs = self.regularized_frequencies();
        if let Some(f) = rfreqs.iter().position(|w| w.norm() == 0.0) {
            return Err(ConverterError::InvalidInput(format!(
                "regularized frequency vanishes at index {}; use a nonzero damping",
                f
            )));
        }
        Ok(TensorField::from_fn(sig.len(), |f| {
            let pre = Complex64::new(4.0 * PI, 0.0) / (Complex64::i() * rfreqs[f]);
            Matrix3::<Complex64>::identity() - sig[f] * pre
        }))
    }

    /// ε_micro(ω) = 1 - ESG(ω) + ESG(ω) · ε(ω)
    pub fn eps_to_eps_micro(&self, eps: &TensorField) -> Result<TensorField> {
        self.check(Operation::EpsToEpsMicro, eps)?;
        let esg = self.esg();
        Ok(TensorField::from_fn(eps.len(), |f| {
            Matrix3::<Complex64>::identity() - esg[f] + esg[f] * eps[f]
        }))
    }

    /// Longitudinal part T_L(ω) = qᵀ T(ω) q / |q|².
    pub fn long(&self, ten: &TensorField) -> Result<Vec<Complex64>> {
        self.check(Operation::Long, ten)?;
        let q = self.q_cart().map(|x| Complex64::new(x, 0.0));
        let qabs2 = self.qabs2();
        Ok(ten.iter().map(|t| (q.transpose() * t * q)[(0, 0)] / qabs2).collect())
    }

    /// T'(ω) = B⁻¹ · T(ω) · B
    pub fn cart_to_frac(&self, ten: &TensorField) -> Result<TensorField> {
        self.check(Operation::CartToFrac, ten)?;
        let (b, b_inv) = self.basis_pair()?;
        Ok(TensorField::from_fn(ten.len(), |f| b_inv * ten[f] * b))
    }

    /// T'(ω) = B · T(ω) · B⁻¹
    pub fn frac_to_cart(&self, ten: &TensorField) -> Result<TensorField> {
        self.check(Operation::FracToCart, ten)?;
        let (b, b_inv) = self.basis_pair()?;
        Ok(TensorField::from_fn(ten.len(), |f| b * ten[f] * b_inv))
    }

    fn basis_pair(&self) -> Result<(Matrix3<Complex64>, Matrix3<Complex64>)> {
        let basis = self.basis().ok_or_else(|| {
            ConverterError::Configuration("lattice basis is not set".to_string())
        })?;
        Ok((to_complex(&basis.reciprocal_vector), to_complex(basis.inverse())))
    }

    /// Refractive indices of the two transverse branches.
    ///
    /// For each frequency ε⁻¹ is projected onto the plane perpendicular to q;
    /// the eigenvalues of the inverse of that 2×2 block are n². The branches are
    /// ordered so that Re n₁ ≤ Re n₂ at the first frequency.
    pub fn eps_to_ref_ind(&self, eps: &TensorField, with_polarizations: bool) -> Result<RefractiveIndices> {
        self.check(Operation::EpsToRefInd, eps)?;
        let projectors = self.projectors().ok_or_else(|| {
            ConverterError::InvalidInput("q-vector may not be zero for this conversion".to_string())
        })?;
        let (v1, v2) = transverse_basis(self.q_cart(), &projectors.pt);
        let basis = [v1.map(|x| Complex64::new(x, 0.0)), v2.map(|x| Complex64::new(x, 0.0))];

        let num_freqs = eps.len();
        let mut n: [Vec<Complex64>; 2] = [Vec::with_capacity(num_freqs), Vec::with_capacity(num_freqs)];
        let mut pol: [Vec<Vector3<Complex64>>; 2] = [Vec::with_capacity(num_freqs), Vec::with_capacity(num_freqs)];
        for (f, e) in eps.iter().enumerate() {
            let e_inv = e.try_inverse().ok_or(ConverterError::SingularMatrix {
                what: "dielectric tensor",
                index: f,
            })?;
            let l = Matrix2::from_fn(|i, j| (basis[i].transpose() * e_inv * basis[j])[(0, 0)]);
            let l_inv = l.try_inverse().ok_or(ConverterError::SingularMatrix {
                what: "transverse inverse dielectric tensor",
                index: f,
            })?;
            for (branch, (n_squared, v)) in eigen_2x2(&l_inv).into_iter().enumerate() {
                n[branch].push(refractive_index(n_squared));
                pol[branch].push(basis[0] * v[0] + basis[1] * v[1]);
            }
        }

        if num_freqs > 0 && n[0][0].re > n[1][0].re {
            n.swap(0, 1);
            pol.swap(0, 1);
        }

        let mut indices = TensorField::nan(num_freqs);
        indices.set_element(0, 0, &n[0]);
        indices.set_element(1, 1, &n[1]);

        let polarizations = with_polarizations.then(|| {
            pol.map(|vectors| {
                TensorField::from_fn(num_freqs, |f| {
                    let mut m = Matrix3::from_element(nan_c64());
                    m.set_diagonal(&vectors[f]);
                    m
                })
            })
        });

        Ok(RefractiveIndices { indices, polarizations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::geometry::LatticeBasis;

    fn converter(q: [f64; 3], freqs: &[f64], eta: f64) -> Converter {
        let mut conv = Converter::new();
        conv.set_basis(&LatticeBasis::new(Matrix3::identity()).unwrap()).unwrap();
        conv.set_wavevector(q).unwrap();
        conv.set_frequencies(freqs).unwrap();
        conv.set_damping(eta).unwrap();
        conv
    }

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_refractive_index_branch() {
        let n = refractive_index(c(4.0, 0.0));
        assert_relative_eq!(n.re, 2.0, epsilon = 1e-14);
        assert_relative_eq!(n.im, 0.0, epsilon = 1e-14);
        // negative permittivity: purely imaginary index
        let n = refractive_index(c(-9.0, 0.0));
        assert_relative_eq!(n.re, 0.0, epsilon = 1e-14);
        assert_relative_eq!(n.im, 3.0, epsilon = 1e-14);
        let z = c(2.0, 1.5);
        let n = refractive_index(z);
        assert_relative_eq!((n * n).re, z.re, epsilon = 1e-12);
        assert_relative_eq!((n * n).im, z.im, epsilon = 1e-12);
    }

    #[test]
    fn test_eigen_2x2() {
        let m = Matrix2::new(c(2.0, 0.1), c(1.0, 0.0), c(0.5, -0.2), c(-1.0, 0.3));
        for (lambda, v) in eigen_2x2(&m) {
            let residual = m * v - v * lambda;
            assert!(residual.iter().all(|z| z.norm() < 1e-12));
            let norm: f64 = v.iter().map(|z| z.norm_sqr()).sum();
            assert_relative_eq!(norm, 1.0, epsilon = 1e-12);
        }
        let diag = Matrix2::new(c(3.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0));
        let pairs = eigen_2x2(&diag);
        assert_eq!(pairs[0].0, c(3.0, 0.0));
        assert_eq!(pairs[1].0, c(1.0, 0.0));
    }

    #[test]
    fn test_eps_to_sig_isotropic() {
        let conv = converter([0.0; 3], &[1.0, 2.0], 0.0);
        let eps = TensorField::isotropic(&[c(3.0, 0.5), c(2.0, 0.1)]);
        let sig = conv.eps_to_sig(&eps).unwrap();
        let w = conv.frequencies_au()[1];
        // σ = iω/4π (1 - ε) = iω/4π (-1 - 0.1i)
        let expected = Complex64::i() * w / (4.0 * PI) * c(-1.0, -0.1);
        assert_relative_eq!(sig[1][(2, 2)].re, expected.re, epsilon = 1e-14);
        assert_relative_eq!(sig[1][(2, 2)].im, expected.im, epsilon = 1e-14);
        assert_eq!(sig[1][(0, 1)], c(0.0, 0.0));
    }

    #[test]
    fn test_sig_to_eps_rejects_vanishing_frequency() {
        let mut conv = converter([0.0; 3], &[0.0, 1.0], 0.0);
        conv.set_regularization_str("none").unwrap();
        let sig = TensorField::constant(2, Matrix3::identity());
        assert!(matches!(conv.sig_to_eps(&sig), Err(ConverterError::InvalidInput(_))));
    }

    #[test]
    fn test_eps_micro_differs_at_finite_q() {
        let conv = converter([0.0, 0.0, 0.05], &[5.0], 0.01);
        let eps = TensorField::isotropic(&[c(4.0, 1.0)]);
        let micro = conv.eps_to_eps_micro(&eps).unwrap();
        // longitudinal component passes through
        assert_relative_eq!(micro[0][(2, 2)].re, 4.0, epsilon = 1e-12);
        assert_relative_eq!(micro[0][(2, 2)].im, 1.0, epsilon = 1e-12);
        assert!((micro[0][(0, 0)] - c(4.0, 1.0)).norm() > 1e-6);
    }

    #[test]
    fn test_long_of_anisotropic_tensor() {
        let conv = converter([0.0, 0.0, 0.3], &[1.0], 0.0);
        let eps = TensorField::constant(1, Matrix3::from_diagonal(&Vector3::new(c(1.0, 0.0), c(2.0, 0.0), c(5.0, 0.5))));
        let long = conv.long(&eps).unwrap();
        assert_relative_eq!(long[0].re, 5.0, epsilon = 1e-12);
        assert_relative_eq!(long[0].im, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_basis_transform_without_basis() {
        let conv = Converter::new();
        let ten = TensorField::constant(1, Matrix3::identity());
        assert!(matches!(conv.cart_to_frac(&ten), Err(ConverterError::Configuration(_))));
    }

    #[test]
    fn test_isotropic_medium_has_degenerate_indices() {
        let conv = converter([0.1, 0.2, 0.3], &[1.0, 2.0], 0.0);
        let eps = TensorField::isotropic(&[c(4.0, 0.0), c(2.25, 0.0)]);
        let result = conv.eps_to_ref_ind(&eps, false).unwrap();
        let (n1, n2) = (result.n1(), result.n2());
        for (f, expected) in [2.0, 1.5].into_iter().enumerate() {
            assert_relative_eq!(n1[f].re, expected, epsilon = 1e-10);
            assert_relative_eq!(n2[f].re, expected, epsilon = 1e-10);
            assert_relative_eq!(n1[f].im, 0.0, epsilon = 1e-10);
        }
        assert!(result.polarizations.is_none());
        assert!(result.indices[0][(0, 1)].is_nan());
        assert!(result.indices[0][(2, 2)].is_nan());
    }

    #[test]
    fn test_uniaxial_crystal_branches() {
        // q along z: both transverse branches see ε_xx and ε_yy
        let conv = converter([0.0, 0.0, 0.1], &[1.0], 0.0);
        let eps = TensorField::constant(
            1,
            Matrix3::from_diagonal(&Vector3::new(c(9.0, 0.0), c(4.0, 0.0), c(1.0, 0.0))),
        );
        let result = conv.eps_to_ref_ind(&eps, true).unwrap();
        assert_relative_eq!(result.n1()[0].re, 2.0, epsilon = 1e-10);
        assert_relative_eq!(result.n2()[0].re, 3.0, epsilon = 1e-10);

        let [pol1, pol2] = result.polarizations.unwrap();
        // n₁ = 2 polarized along y, n₂ = 3 along x
        assert_relative_eq!(pol1[0][(1, 1)].norm(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(pol1[0][(0, 0)].norm(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(pol2[0][(0, 0)].norm(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(pol2[0][(2, 2)].norm(), 0.0, epsilon = 1e-10);
        assert!(pol1[0][(0, 1)].is_nan());
    }

    #[test]
    fn test_singular_dielectric_tensor() {
        let conv = converter([0.0, 0.0, 0.1], &[1.0], 0.0);
        let eps = TensorField::constant(1, Matrix3::zeros());
        assert!(matches!(
            conv.eps_to_ref_ind(&eps, false),
            Err(ConverterError::SingularMatrix { index: 0, .. })
        ));
    }
}
