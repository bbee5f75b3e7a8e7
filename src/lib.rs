//! Rust Optics - conversion of linear response functions of crystals.
//!
//! This crate converts dielectric tensors, conductivity tensors, microscopic
//! dielectric tensors and refractive indices into one another at finite
//! wavevector q, using the universal response relations of the functional
//! approach to electrodynamics of media.

pub mod constants;
pub mod error;
pub mod geometry;
pub mod response;
pub mod converter;
pub mod io;

// Re-export commonly used types at crate root
pub use error::{ConverterError, Result};
pub use geometry::{LatticeBasis, Wavevector, ProjectionOperators};
pub use response::{TensorField, ElementState, Regularization, ElectricSolutionGenerator};
pub use converter::{Converter, ConverterConfig, DerivedState, recompute_derived_state, Precondition, Operation, ConversionOutput, RefractiveIndices, conversions_for, convertible_fields, CatalogEntry, FieldCatalog, OptionFlag};
