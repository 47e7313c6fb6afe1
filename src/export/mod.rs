//! Record construction and output
//!
//! This module provides:
//! - The joiner building one flat record per (bucket, index, node)
//! - Include/exclude field projection
//! - CSV file and console JSON output

pub mod records;
pub mod writer;

pub use records::{build_records, FieldFilter, Record, MISSING_DEFINITION};
pub use writer::{export_records, render_csv, Destination};
