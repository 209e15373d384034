//! Serializers for flight-control and viewer formats.
//!
//! Every exporter renders its whole output in memory first and then writes it
//! through [`write_atomic`] or [`write_atomic_all`], so a failed export never
//! leaves a truncated file or a partial set of files at the destination.

pub mod kml;
pub mod litchi;
pub mod waypoints;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Output formats the planner can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossless JSON waypoint list
    Json,
    /// Google Earth / mapping viewer markup
    Kml,
    /// Litchi mission CSV, one file per flight
    Litchi,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Kml => "kml",
            ExportFormat::Litchi => "csv",
        }
    }
}

/// Write `contents` to `path` via a temporary file in the same directory.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = stage(path, contents)?;
    tmp.persist(path).map_err(|e| Error::export(path, e.error))?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote export");
    Ok(())
}

/// Write several files so that either all of them land or none do.
///
/// Every file is staged next to its target before the first one is moved into
/// place; if a later move fails, the targets already replaced are removed.
pub fn write_atomic_all(files: &[(PathBuf, Vec<u8>)]) -> Result<()> {
    let staged = files
        .iter()
        .map(|(path, contents)| stage(path, contents))
        .collect::<Result<Vec<_>>>()?;

    let mut persisted: Vec<&Path> = Vec::with_capacity(files.len());
    for ((path, contents), tmp) in files.iter().zip(staged) {
        if let Err(e) = tmp.persist(path) {
            for done in persisted {
                if let Err(cleanup) = std::fs::remove_file(done) {
                    tracing::warn!(
                        path = %done.display(),
                        error = %cleanup,
                        "Failed to roll back export"
                    );
                }
            }
            return Err(Error::export(path, e.error));
        }
        tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote export");
        persisted.push(path);
    }
    Ok(())
}

fn stage(path: &Path, contents: &[u8]) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::export(path, e))?;
    tmp.write_all(contents).map_err(|e| Error::export(path, e))?;
    tmp.as_file().sync_all().map_err(|e| Error::export(path, e))?;
    Ok(tmp)
}

/// Escape text for XML element content and attribute values.
pub(crate) fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
