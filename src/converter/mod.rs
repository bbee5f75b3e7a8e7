//! Converter module - response relations, preconditions and operation dispatch.

mod state;
mod validation;
mod facade;
mod operations;
mod dispatch;
mod catalog;

pub use state::{recompute_derived_state, ConverterConfig, DerivedState};
pub use validation::{validate, Precondition};
pub use facade::Converter;
pub use operations::{refractive_index, RefractiveIndices};
pub use dispatch::{ConversionOutput, Operation};
pub use catalog::{conversions_for, convertible_fields, CatalogEntry, FieldCatalog, OptionFlag};
