//! `_processed.csv` export.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::info;
use vitals_model::{AnnotatedRow, EXPORT_COLUMNS};

use crate::error::{OutputError, Result};

/// Suffix added to the source file's base name.
pub const PROCESSED_SUFFIX: &str = "_processed.csv";

/// Export path for a source document: same directory and base name, with
/// the last extension replaced by `_processed.csv`.
pub fn processed_path(source: &Path) -> PathBuf {
    let mut name: OsString = source
        .file_stem()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(PROCESSED_SUFFIX);
    source.with_file_name(name)
}

/// Encode rows as CSV text: one header row, then one record per row.
pub fn render_csv(rows: &[AnnotatedRow]) -> Result<String> {
    if rows.is_empty() {
        return Err(OutputError::NoRows);
    }
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EXPORT_COLUMNS)
        .map_err(|source| OutputError::Csv { source })?;
    for row in rows {
        writer
            .write_record(row.export_values())
            .map_err(|source| OutputError::Csv { source })?;
    }
    let bytes = writer.into_inner().map_err(|err| OutputError::Csv {
        source: csv::Error::from(err.into_error()),
    })?;
    String::from_utf8(bytes).map_err(|err| OutputError::Csv {
        source: csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            err,
        )),
    })
}

/// Write rows to `path`. The file is only created once encoding has succeeded.
pub fn write_csv(rows: &[AnnotatedRow], path: &Path) -> Result<()> {
    let text = render_csv(rows)?;
    std::fs::write(path, text).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = rows.len(), "processed export written");
    Ok(())
}

/// Write rows next to `source` and return the export path.
pub fn write_processed(rows: &[AnnotatedRow], source: &Path) -> Result<PathBuf> {
    let path = processed_path(source);
    write_csv(rows, &path)?;
    Ok(path)
}
