//! Static table from conversion keys to operations.

use num_complex::Complex64;
use std::fmt;
use std::str::FromStr;

use crate::error::{ConverterError, Result};
use crate::response::TensorField;
use super::facade::Converter;
use super::operations::RefractiveIndices;
use super::validation::Precondition;
use super::validation::Precondition::{BasisSet, FrequenciesSet, NoNan, NonzeroWavevector};

/// The closed set of conversions a `Converter` offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    EpsToSig,
    SigToEps,
    EpsToEpsMicro,
    Long,
    CartToFrac,
    FracToCart,
    EpsToRefInd,
}

/// Result of a dispatched conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutput {
    Tensor(TensorField),
    Scalar(Vec<Complex64>),
    RefractiveIndices(RefractiveIndices),
}

type Handler = fn(&Converter, &TensorField) -> Result<ConversionOutput>;

struct OperationEntry {
    operation: Operation,
    key: &'static str,
    preconditions: &'static [Precondition],
    handler: Handler,
}

static OPERATION_TABLE: [OperationEntry; 7] = [
    OperationEntry {
        operation: Operation::EpsToSig,
        key: "eps_to_sig",
        preconditions: &[NoNan, FrequenciesSet],
        handler: run_eps_to_sig,
    },
    OperationEntry {
        operation: Operation::SigToEps,
        key: "sig_to_eps",
        preconditions: &[NoNan, FrequenciesSet],
        handler: run_sig_to_eps,
    },
    OperationEntry {
        operation: Operation::EpsToEpsMicro,
        key: "eps_to_epsMicro",
        preconditions: &[NoNan, FrequenciesSet],
        handler: run_eps_to_eps_micro,
    },
    OperationEntry {
        operation: Operation::Long,
        key: "long",
        preconditions: &[NoNan, NonzeroWavevector],
        handler: run_long,
    },
    OperationEntry {
        operation: Operation::CartToFrac,
        key: "cartToFrac",
        preconditions: &[BasisSet],
        handler: run_cart_to_frac,
    },
    OperationEntry {
        operation: Operation::FracToCart,
        key: "fracToCart",
        preconditions: &[BasisSet],
        handler: run_frac_to_cart,
    },
    OperationEntry {
        operation: Operation::EpsToRefInd,
        key: "eps_to_refInd",
        preconditions: &[NoNan, NonzeroWavevector],
        handler: run_eps_to_ref_ind,
    },
];

fn run_eps_to_sig(c: &Converter, field: &TensorField) -> Result<ConversionOutput> {
    c.eps_to_sig(field).map(ConversionOutput::Tensor)
}

fn run_sig_to_eps(c: &Converter, field: &TensorField) -> Result<ConversionOutput> {
    c.sig_to_eps(field).map(ConversionOutput::Tensor)
}

fn run_eps_to_eps_micro(c: &Converter, field: &TensorField) -> Result<ConversionOutput> {
    c.eps_to_eps_micro(field).map(ConversionOutput::Tensor)
}

fn run_long(c: &Converter, field: &TensorField) -> Result<ConversionOutput> {
    c.long(field).map(ConversionOutput::Scalar)
}

fn run_cart_to_frac(c: &Converter, field: &TensorField) -> Result<ConversionOutput> {
    c.cart_to_frac(field).map(ConversionOutput::Tensor)
}

fn run_frac_to_cart(c: &Converter, field: &TensorField) -> Result<ConversionOutput> {
    c.frac_to_cart(field).map(ConversionOutput::Tensor)
}

fn run_eps_to_ref_ind(c: &Converter, field: &TensorField) -> Result<ConversionOutput> {
    c.eps_to_ref_ind(field, false).map(ConversionOutput::RefractiveIndices)
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::EpsToSig,
        Operation::SigToEps,
        Operation::EpsToEpsMicro,
        Operation::Long,
        Operation::CartToFrac,
        Operation::FracToCart,
        Operation::EpsToRefInd,
    ];

    fn entry(&self) -> &'static OperationEntry {
        // table order matches declaration order
        &OPERATION_TABLE[*self as usize]
    }

    /// Key used by the conversion catalog.
    pub fn key(&self) -> &'static str {
        self.entry().key
    }

    /// Checks run before the numeric body.
    pub fn preconditions(&self) -> &'static [Precondition] {
        self.entry().preconditions
    }
}

impl FromStr for Operation {
    type Err = ConverterError;

    fn from_str(key: &str) -> Result<Self> {
        OPERATION_TABLE
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.operation)
            .ok_or_else(|| ConverterError::UnknownOperation(key.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Converter {
    /// Run a conversion selected at runtime.
    pub fn convert(&self, operation: Operation, field: &TensorField) -> Result<ConversionOutput> {
        (operation.entry().handler)(self, field)
    }

    /// Run a conversion by its catalog key, e.g. "eps_to_sig".
    pub fn convert_by_key(&self, key: &str, field: &TensorField) -> Result<ConversionOutput> {
        self.convert(key.parse()?, field)
    }
}
