//! Settlement records from a directory of JSON files.
//!
//! Every `*.json` file directly inside the directory is read in file-name
//! order. A file holds either one settlement record or an array of them.
//! Files that cannot be read or parsed are logged and skipped; the rest of
//! the realm still loads. Parsing is all-or-nothing per file: one record
//! with the wrong shape (a string population, a non-integral troop count)
//! drops every record in that file.

use std::path::{Path, PathBuf};

use realm_stats::{SettlementProvider, parse_records};
use realm_types::SettlementRecord;
use tracing::{debug, warn};

use crate::error::{LoadError, ReportError};

/// A [`SettlementProvider`] backed by a directory of JSON files.
///
/// The directory is re-read on every call to
/// [`SettlementProvider::settlements`], so invalidating the stats cache
/// picks up edits made on disk.
#[derive(Debug, Clone)]
pub struct JsonDirectoryProvider {
    dir: PathBuf,
    label: String,
}

impl JsonDirectoryProvider {
    /// Create a provider for `dir`, checking that it can be listed.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::DataDir`] if the directory cannot be read.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ReportError> {
        let dir = dir.into();
        std::fs::read_dir(&dir).map_err(|source| ReportError::DataDir {
            path: dir.clone(),
            source,
        })?;
        let label = dir.display().to_string();
        Ok(Self { dir, label })
    }

    /// JSON files in the directory, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the directory cannot be listed.
    pub fn json_files(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && is_json(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl SettlementProvider for JsonDirectoryProvider {
    fn label(&self) -> &str {
        &self.label
    }

    fn settlements(&self) -> Vec<SettlementRecord> {
        let files = match self.json_files() {
            Ok(files) => files,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "Cannot list settlement directory");
                return Vec::new();
            }
        };

        let mut records = Vec::new();
        for path in files {
            match load_file(&path) {
                Ok(mut loaded) => {
                    debug!(file = %path.display(), count = loaded.len(), "Settlement file loaded");
                    records.append(&mut loaded);
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping settlement file");
                }
            }
        }
        records
    }
}

fn load_file(path: &Path) -> Result<Vec<SettlementRecord>, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(parse_records(&contents)?)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
