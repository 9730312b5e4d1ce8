//! Flat-file document store.
//!
//! Every document is a single file directly under one base directory, addressed by its file
//! name. A missing document is an ordinary outcome (`Ok(None)`), not an error: callers probe
//! before falling back to defaults.
//!
//! Writes are staged in a temp file inside the base directory and then renamed into place, so
//! a reader never observes a half-written document. The staged file is removed on drop if the
//! write fails part way.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

pub mod naming;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid document name '{0}'")]
    InvalidName(String),

    #[error("I/O error on '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("document '{name}' is malformed: {source}")]
    Format {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn io_error(name: &str, source: io::Error) -> StoreError {
    StoreError::Io {
        name: name.to_string(),
        source,
    }
}

/// Handle on the document directory. One instance is shared per process through `AppState`.
#[derive(Debug)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Opens the store, creating the base directory if needed.
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).map_err(|e| io_error(&base_path.to_string_lossy(), e))?;
        debug!("File store opened at {}", base_path.display());
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Reads a document. Returns `Ok(None)` when it does not exist.
    pub fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
        let path = self.resolve(name)?;
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!("Read {name} ({} bytes)", content.len());
                Ok(Some(content))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(name, e)),
        }
    }

    /// Reads and deserializes a JSON document. Returns `Ok(None)` when it does not exist and
    /// `StoreError::Format` when it exists but does not parse as `T`.
    pub fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        let Some(content) = self.read(name)? else {
            return Ok(None);
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Format {
                name: name.to_string(),
                source,
            })
    }

    /// Writes a document, replacing any previous content.
    pub fn write(&self, name: &str, content: &str) -> Result<(), StoreError> {
        let path = self.resolve(name)?;
        let staged = self.stage(name, content)?;
        staged
            .persist(&path)
            .map_err(|e| io_error(name, e.error))?;
        debug!("Wrote {name} ({} bytes)", content.len());
        Ok(())
    }

    /// Writes a document only if none exists under `name`.
    /// Returns `false` and leaves the existing document untouched otherwise.
    pub fn write_new(&self, name: &str, content: &str) -> Result<bool, StoreError> {
        let path = self.resolve(name)?;
        let staged = self.stage(name, content)?;
        match staged.persist_noclobber(&path) {
            Ok(_) => {
                debug!("Wrote new document {name} ({} bytes)", content.len());
                Ok(true)
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(io_error(name, e.error)),
        }
    }

    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(value)?;
        self.write(name, &content)
    }

    pub fn write_json_new<T: Serialize>(&self, name: &str, value: &T) -> Result<bool, StoreError> {
        let content = serde_json::to_string_pretty(value)?;
        self.write_new(name, &content)
    }

    /// Lists document names starting with `prefix`, in ascending lexical order.
    /// Timestamped names sort by creation time under this ordering.
    pub fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.base_path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(prefix, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error(prefix, e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| io_error(prefix, e))?
                .is_file();
            if !is_file {
                continue;
            }
            // Staged temp files are dot-prefixed and never listed.
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !name.starts_with('.') && name.starts_with(prefix) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, StoreError> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\'])
            && !name.contains("..");
        if !valid {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.base_path.join(name))
    }

    fn stage(&self, name: &str, content: &str) -> Result<NamedTempFile, StoreError> {
        fs::create_dir_all(&self.base_path).map_err(|e| io_error(name, e))?;
        let mut staged = NamedTempFile::new_in(&self.base_path).map_err(|e| io_error(name, e))?;
        staged
            .write_all(content.as_bytes())
            .map_err(|e| io_error(name, e))?;
        staged.as_file().sync_all().map_err(|e| io_error(name, e))?;
        Ok(staged)
    }
}
