//! Response tensor fields: one complex 3×3 tensor per frequency.

use nalgebra::Matrix3;
use num_complex::Complex64;

/// Availability of a single tensor element (ij) across all frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    /// At least one frequency carries data.
    Available,
    /// NaN at every frequency, i.e. never computed.
    Missing,
}

/// Complex tensor field of shape (3, 3, N).
///
/// Elements that were never measured are stored as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorField {
    data: Vec<Matrix3<Complex64>>,
}

pub(crate) fn nan_c64() -> Complex64 {
    Complex64::new(f64::NAN, f64::NAN)
}

pub(crate) fn to_complex(m: &Matrix3<f64>) -> Matrix3<Complex64> {
    m.map(|x| Complex64::new(x, 0.0))
}

impl TensorField {
    pub fn new(data: Vec<Matrix3<Complex64>>) -> Self {
        Self { data }
    }

    /// Build a field by evaluating `f` at every frequency index.
    pub fn from_fn<F: FnMut(usize) -> Matrix3<Complex64>>(num_freqs: usize, f: F) -> Self {
        Self { data: (0..num_freqs).map(f).collect() }
    }

    /// The same tensor at every frequency.
    pub fn constant(num_freqs: usize, tensor: Matrix3<Complex64>) -> Self {
        Self { data: vec![tensor; num_freqs] }
    }

    /// Isotropic field ε(ω)·1 from a scalar per frequency.
    pub fn isotropic(values: &[Complex64]) -> Self {
        Self::from_fn(values.len(), |i| Matrix3::from_diagonal_element(values[i]))
    }

    /// A field with every element set to NaN.
    pub fn nan(num_freqs: usize) -> Self {
        Self::constant(num_freqs, Matrix3::from_element(nan_c64()))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[Matrix3<Complex64>] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Matrix3<Complex64>> {
        self.data.iter()
    }

    pub fn into_inner(self) -> Vec<Matrix3<Complex64>> {
        self.data
    }

    /// Time series of element (i, j).
    pub fn element(&self, i: usize, j: usize) -> Vec<Complex64> {
        self.data.iter().map(|m| m[(i, j)]).collect()
    }

    /// Overwrite element (i, j) at every frequency.
    pub fn set_element(&mut self, i: usize, j: usize, values: &[Complex64]) {
        for (m, v) in self.data.iter_mut().zip(values) {
            m[(i, j)] = *v;
        }
    }

    pub fn has_nan(&self) -> bool {
        self.data.iter().any(|m| m.iter().any(|z| z.is_nan()))
    }

    /// True if no element is NaN at any frequency.
    pub fn is_fully_available(&self) -> bool {
        !self.has_nan()
    }

    /// Per-element availability; an element is missing when it is NaN at every frequency.
    pub fn element_states(&self) -> [[ElementState; 3]; 3] {
        let mut states = [[ElementState::Available; 3]; 3];
        for (i, row) in states.iter_mut().enumerate() {
            for (j, state) in row.iter_mut().enumerate() {
                if self.data.iter().all(|m| m[(i, j)].is_nan()) {
                    *state = ElementState::Missing;
                }
            }
        }
        states
    }
}

impl std::ops::Index<usize> for TensorField {
    type Output = Matrix3<Complex64>;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.data[idx]
    }
}

impl From<Vec<Matrix3<Complex64>>> for TensorField {
    fn from(data: Vec<Matrix3<Complex64>>) -> Self {
        Self::new(data)
    }
}
