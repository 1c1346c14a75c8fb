//! Tabular export of annotated vital-sign rows.
//!
//! The export sits next to its source document: `case.rtf` becomes
//! `case_processed.csv`.

mod error;
mod processed;

pub use error::{OutputError, Result};
pub use processed::{PROCESSED_SUFFIX, processed_path, render_csv, write_csv, write_processed};
