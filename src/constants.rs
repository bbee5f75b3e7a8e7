//! Physical constants and numeric thresholds, all in Hartree atomic units.

/// Hartree to eV conversion factor (CODATA 2014)
pub const HA_TO_EV: f64 = 27.21138602;

/// Speed of light in atomic units, the inverse fine-structure constant (CODATA 2014)
pub const SPEED_OF_LIGHT_AU: f64 = 137.035999139;

/// Below this, |q|² (Bohr⁻²) counts as zero and the ESG prefactor counts as vanishing.
pub const ZERO_THRESHOLD: f64 = 1e-10;

/// Convert an energy from eV to Hartree.
pub fn ev_to_hartree(e: f64) -> f64 {
    e / HA_TO_EV
}

/// Convert an energy from Hartree to eV.
pub fn hartree_to_ev(e: f64) -> f64 {
    e * HA_TO_EV
}
