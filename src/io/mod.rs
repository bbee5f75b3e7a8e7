//! IO module - session files for the command-line front end.

mod config;

pub use config::{read_session, write_output, rows_to_field, field_to_rows, Session, OutputDocument, TensorRows};
