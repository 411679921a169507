use std::{
    fs,
    path::{Path, PathBuf},
};

use base64::{Engine, engine::general_purpose::STANDARD};
use log::debug;

use crate::error::{PayloadErr, Result};

/// A sample file loaded from disk together with its base64 encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    path: PathBuf,
    raw: Vec<u8>,
    encoded: String,
}

impl AssetRecord {
    /// Builds a record from bytes already in memory.
    pub fn from_bytes(path: impl Into<PathBuf>, raw: Vec<u8>) -> Self {
        let encoded = STANDARD.encode(&raw);
        Self {
            path: path.into(),
            raw,
            encoded,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The last component of the path, for logging.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// Consumes the record, keeping only the encoded payload.
    pub fn into_encoded(self) -> String {
        self.encoded
    }

    /// Decodes the encoded payload back into bytes.
    pub fn decode(&self) -> std::result::Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.encoded)
    }
}

/// Reads and encodes a single sample file.
///
/// # Arguments
/// * `path` - The sample to load.
///
/// # Returns
/// The loaded record.
///
/// # Errors
/// `PayloadErr::Resource` if the file is missing or unreadable.
pub fn load_file(path: impl AsRef<Path>) -> Result<AssetRecord> {
    let path = path.as_ref();
    let raw = fs::read(path).map_err(|e| PayloadErr::resource(path, e))?;
    debug!(bytes = raw.len(); "loaded sample {}", path.display());
    Ok(AssetRecord::from_bytes(path, raw))
}

/// Reads and encodes every regular file directly inside `dir`.
///
/// Subdirectories are skipped. Records are ordered by file name so repeated
/// calls over an unchanged directory yield the same order on every platform.
///
/// # Errors
/// `PayloadErr::Resource` if the directory or any file in it cannot be read.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<AssetRecord>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| PayloadErr::resource(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| PayloadErr::resource(dir, e))?.path();
        // Follows symlinks so a linked sample counts as a file.
        let meta = fs::metadata(&path).map_err(|e| PayloadErr::resource(&path, e))?;
        if meta.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(count = files.len(); "found samples in {}", dir.display());

    files.iter().map(|path| load_file(path)).collect()
}
