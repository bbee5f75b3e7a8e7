//! YAML session files: converter settings, the conversion to run and the input field.

use nalgebra::Matrix3;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::converter::{ConversionOutput, ConverterConfig};
use crate::error::Result;
use crate::response::TensorField;

/// One 3×3 tensor as rows of `[re, im]` pairs.
pub type TensorRows = [[[f64; 2]; 3]; 3];

/// A conversion request.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Session {
    #[serde(default)]
    pub converter: ConverterConfig,
    /// Operation key, e.g. "eps_to_sig"
    pub operation: String,
    /// Input tensor per frequency
    pub field: Vec<TensorRows>,
}

/// Conversion result as written back to YAML.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputDocument {
    Tensor { field: Vec<TensorRows> },
    Scalar { values: Vec<[f64; 2]> },
    RefractiveIndices { n1: Vec<[f64; 2]>, n2: Vec<[f64; 2]> },
}

impl Session {
    pub fn tensor_field(&self) -> TensorField {
        rows_to_field(&self.field)
    }
}

pub fn rows_to_field(rows: &[TensorRows]) -> TensorField {
    TensorField::from_fn(rows.len(), |f| {
        Matrix3::from_fn(|i, j| Complex64::new(rows[f][i][j][0], rows[f][i][j][1]))
    })
}

pub fn field_to_rows(field: &TensorField) -> Vec<TensorRows> {
    field
        .iter()
        .map(|m| {
            let mut rows = [[[0.0; 2]; 3]; 3];
            for (i, row) in rows.iter_mut().enumerate() {
                for (j, z) in row.iter_mut().enumerate() {
                    *z = [m[(i, j)].re, m[(i, j)].im];
                }
            }
            rows
        })
        .collect()
}

fn pairs(values: &[Complex64]) -> Vec<[f64; 2]> {
    values.iter().map(|z| [z.re, z.im]).collect()
}

impl From<&ConversionOutput> for OutputDocument {
    fn from(output: &ConversionOutput) -> Self {
        match output {
            ConversionOutput::Tensor(field) => OutputDocument::Tensor { field: field_to_rows(field) },
            ConversionOutput::Scalar(values) => OutputDocument::Scalar { values: pairs(values) },
            ConversionOutput::RefractiveIndices(n) => OutputDocument::RefractiveIndices {
                n1: pairs(&n.n1()),
                n2: pairs(&n.n2()),
            },
        }
    }
}

/// Read a session from a YAML file.
pub fn read_session(filename: &str) -> Result<Session> {
    let file = std::fs::File::open(filename)?;
    let reader = std::io::BufReader::new(file);
    let session: Session = serde_yaml::from_reader(reader)?;
    Ok(session)
}

/// Write a conversion result as YAML.
pub fn write_output<W: Write>(writer: W, output: &ConversionOutput) -> Result<()> {
    serde_yaml::to_writer(writer, &OutputDocument::from(output))?;
    Ok(())
}

// example of a session file
// converter:
//   wavevector: [0.0, 0.0, 0.1]
//   basis:
//     - [1.0, 0.0, 0.0]
//     - [0.0, 1.0, 0.0]
//     - [0.0, 0.0, 1.0]
//   frequencies: [1.0, 2.0]
//   damping: 0.01
//   regularization: conventional
// operation: eps_to_sig
// field:
//   - [[[2.0, 0.1], [0.0, 0.0], [0.0, 0.0]],
//      [[0.0, 0.0], [2.0, 0.1], [0.0, 0.0]],
//      [[0.0, 0.0], [0.0, 0.0], [2.0, 0.1]]]
//   - ...

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::Converter;

    const SESSION: &str = "
converter:
  frequencies: [1.0, 2.0]
  damping: 0.01
operation: eps_to_sig
field:
  - [[[2.0, 0.1], [0.0, 0.0], [0.0, 0.0]],
     [[0.0, 0.0], [2.0, 0.1], [0.0, 0.0]],
     [[0.0, 0.0], [0.0, 0.0], [2.0, 0.1]]]
  - [[[3.0, 0.2], [0.5, 0.0], [0.0, 0.0]],
     [[0.5, 0.0], [3.0, 0.2], [0.0, 0.0]],
     [[0.0, 0.0], [0.0, 0.0], [3.0, 0.2]]]
";

    #[test]
    fn test_parse_session() {
        let session: Session = serde_yaml::from_str(SESSION).unwrap();
        assert_eq!(session.operation, "eps_to_sig");
        let field = session.tensor_field();
        assert_eq!(field.len(), 2);
        assert_eq!(field[1][(0, 1)], Complex64::new(0.5, 0.0));
        assert_eq!(field[0][(2, 2)], Complex64::new(2.0, 0.1));
        assert_eq!(field_to_rows(&field), session.field);
    }

    #[test]
    fn test_nan_elements_survive_yaml() {
        let yaml = "
operation: long
field:
  - [[[.nan, .nan], [0.0, 0.0], [0.0, 0.0]],
     [[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]],
     [[0.0, 0.0], [0.0, 0.0], [1.0, 0.0]]]
";
        let session: Session = serde_yaml::from_str(yaml).unwrap();
        assert!(session.tensor_field().has_nan());
        assert!(session.converter.frequencies.is_empty());
    }

    #[test]
    fn test_run_session_and_write() {
        let session: Session = serde_yaml::from_str(SESSION).unwrap();
        let conv = Converter::from_config(session.converter.clone()).unwrap();
        let output = conv.convert_by_key(&session.operation, &session.tensor_field()).unwrap();
        let mut buf = Vec::new();
        write_output(&mut buf, &output).unwrap();
        let doc: OutputDocument = serde_yaml::from_slice(&buf).unwrap();
        match doc {
            OutputDocument::Tensor { field } => assert_eq!(field.len(), 2),
            other => panic!("unexpected document {:?}", other),
        }
    }
}
