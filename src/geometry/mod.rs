//! Geometry module - lattice basis, wavevector and projection operators.

mod lattice;
mod projection;

pub use lattice::{LatticeBasis, Wavevector};
pub use projection::ProjectionOperators;
