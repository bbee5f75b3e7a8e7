//! Catalog of conversions offered for each kind of input field.
//!
//! The presentation layer looks up the visible field here and invokes the
//! selected entry through `Converter::convert`.

use super::dispatch::Operation;

/// Hints for the front end attached to a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionFlag {
    /// q-vector input is irrelevant for this conversion
    DisableWavevectorInput,
    /// q-vector may not be (0, 0, 0)
    RequireNonzeroWavevector,
    /// Regularization has no effect
    DisableRegularizationChoice,
    /// Only ω → ω + iη is offered
    RestrictToConventionalRegularization,
    /// Output should be plotted as a vector, not a tensor
    TreatOutputAsVector,
}

/// One conversion available for an input field.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Human-readable output name, e.g. "conductivity tensor"
    pub output_name: &'static str,
    pub operation: Operation,
    /// Field name of the produced output, e.g. "sigTen"
    pub output_field: String,
    pub flags: &'static [OptionFlag],
}

/// All conversions for one input field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCatalog {
    pub field: &'static str,
    pub name: &'static str,
    pub converters: Vec<CatalogEntry>,
}

impl FieldCatalog {
    pub fn get(&self, output_name: &str) -> Option<&CatalogEntry> {
        self.converters.iter().find(|e| e.output_name == output_name)
    }
}

use self::OptionFlag::*;

struct Specific {
    output_name: &'static str,
    operation: Operation,
    output_field: &'static str,
    flags: &'static [OptionFlag],
}

const EPS_CONVERTERS: &[Specific] = &[
    Specific {
        output_name: "conductivity tensor",
        operation: Operation::EpsToSig,
        output_field: "sigTen",
        flags: &[DisableWavevectorInput],
    },
    Specific {
        output_name: "microscopic dielectric tensor",
        operation: Operation::EpsToEpsMicro,
        output_field: "epsMicro",
        flags: &[],
    },
    Specific {
        output_name: "refractive indices",
        operation: Operation::EpsToRefInd,
        output_field: "refInd",
        flags: &[DisableRegularizationChoice, RequireNonzeroWavevector, TreatOutputAsVector],
    },
];

const SIG_CONVERTERS: &[Specific] = &[Specific {
    output_name: "dielectric tensor",
    operation: Operation::SigToEps,
    output_field: "epsTen",
    flags: &[RestrictToConventionalRegularization, DisableWavevectorInput],
}];

const FIELDS: &[(&str, &str, &[Specific])] = &[
    ("epsTen", "dielectric tensor", EPS_CONVERTERS),
    ("sigTen", "conductivity tensor", SIG_CONVERTERS),
];

/// Conversions for a tensor field, e.g. "epsTen"; `None` if nothing is offered.
///
/// Every tensor field additionally gets its longitudinal part and the two
/// basis transformations.
pub fn conversions_for(field: &str) -> Option<FieldCatalog> {
    let &(field, name, specific) = FIELDS.iter().find(|(f, _, _)| *f == field)?;
    let mut converters: Vec<CatalogEntry> = specific
        .iter()
        .map(|s| CatalogEntry {
            output_name: s.output_name,
            operation: s.operation,
            output_field: s.output_field.to_string(),
            flags: s.flags,
        })
        .collect();

    if let Some(basename) = field.strip_suffix("Ten") {
        converters.push(CatalogEntry {
            output_name: "longitudinal part",
            operation: Operation::Long,
            output_field: format!("{}L", basename),
            flags: &[DisableRegularizationChoice, RequireNonzeroWavevector],
        });
        converters.push(CatalogEntry {
            output_name: "cartesian to fractional basis",
            operation: Operation::CartToFrac,
            output_field: field.to_string(),
            flags: &[DisableRegularizationChoice, DisableWavevectorInput],
        });
        converters.push(CatalogEntry {
            output_name: "fractional to cartesian basis",
            operation: Operation::FracToCart,
            output_field: field.to_string(),
            flags: &[DisableRegularizationChoice, DisableWavevectorInput],
        });
    }

    Some(FieldCatalog { field, name, converters })
}

/// Input fields that have at least one conversion.
pub fn convertible_fields() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|(f, _, _)| *f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eps_catalog() {
        let cat = conversions_for("epsTen").unwrap();
        assert_eq!(cat.name, "dielectric tensor");
        assert_eq!(cat.converters.len(), 6);
        let sig = cat.get("conductivity tensor").unwrap();
        assert_eq!(sig.operation, Operation::EpsToSig);
        assert_eq!(sig.output_field, "sigTen");
        let long = cat.get("longitudinal part").unwrap();
        assert_eq!(long.output_field, "epsL");
        assert!(long.flags.contains(&RequireNonzeroWavevector));
        let n = cat.get("refractive indices").unwrap();
        assert!(n.flags.contains(&TreatOutputAsVector));
    }

    #[test]
    fn test_sig_catalog() {
        let cat = conversions_for("sigTen").unwrap();
        let eps = cat.get("dielectric tensor").unwrap();
        assert_eq!(eps.operation.key(), "sig_to_eps");
        assert!(eps.flags.contains(&RestrictToConventionalRegularization));
        assert_eq!(cat.get("fractional to cartesian basis").unwrap().output_field, "sigTen");
        assert_eq!(cat.get("longitudinal part").unwrap().output_field, "sigL");
    }

    #[test]
    fn test_unknown_field() {
        assert!(conversions_for("EELS").is_none());
        assert_eq!(convertible_fields().count(), 2);
    }
}
