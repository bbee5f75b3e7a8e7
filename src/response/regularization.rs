//! Frequency regularization ω → ω_reg used to stay off the real-axis poles.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConverterError;

/// Regularization scheme for real frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Regularization {
    /// ω → ω + iη
    #[default]
    Conventional,
    /// ω → √(ω² + 2iηω), Sangalli et al., PRB 95, 155203 (2017)
    Improved,
    /// ω → ω
    None,
}

impl Regularization {
    /// Regularize a frequency grid given in Hartree.
    pub fn apply(&self, freqs: &[f64], eta: f64) -> Vec<Complex64> {
        freqs.iter().map(|&w| self.regularize(w, eta)).collect()
    }

    pub fn regularize(&self, w: f64, eta: f64) -> Complex64 {
        match self {
            Regularization::Conventional => Complex64::new(w, eta),
            Regularization::Improved => Complex64::new(w * w, 2.0 * eta * w).sqrt(),
            Regularization::None => Complex64::new(w, 0.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Regularization::Conventional => "conventional",
            Regularization::Improved => "improved",
            Regularization::None => "none",
        }
    }
}

impl FromStr for Regularization {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conventional" | "conv" => Ok(Regularization::Conventional),
            "improved" | "imp" => Ok(Regularization::Improved),
            "none" => Ok(Regularization::None),
            _ => Err(ConverterError::RegularizationMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for Regularization {
    type Error = ConverterError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Regularization> for String {
    fn from(reg: Regularization) -> Self {
        reg.as_str().to_string()
    }
}

impl fmt::Display for Regularization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
