//! Backing file access
//!
//! A [`FileStore`] reads and writes one settings file through a format
//! adapter. Missing files read as empty documents; corrupt files are removed
//! and read as empty documents, so a damaged or hand-edited file never stops
//! the application.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;
use crate::format::{Format, Table};

/// Read/write access to a settings file in format `F`.
pub struct FileStore<F: Format> {
    path: PathBuf,
    always_read: bool,
    cache: RefCell<Option<F::Document>>,
    _format: PhantomData<fn() -> F>,
}

impl<F: Format> FileStore<F> {
    /// Create a store that re-reads the file on every access.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            always_read: true,
            cache: RefCell::new(None),
            _format: PhantomData,
        }
    }

    /// Keep the last document in memory instead of re-reading the file.
    ///
    /// With `always_read` disabled, external edits become visible only after
    /// [`FileStore::invalidate`].
    pub fn always_read(mut self, always_read: bool) -> Self {
        self.always_read = always_read;
        self
    }

    /// Default location for format `F`: `settings.<ext>` in the current directory.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let file_name = format!("settings.{}", F::EXTENSION);
        let cwd = std::env::current_dir().map_err(|e| SettingsError::io(&file_name, e))?;
        Ok(cwd.join(file_name))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether every read goes to disk
    pub fn is_always_read(&self) -> bool {
        self.always_read
    }

    /// Drop the cached document, if any.
    pub fn invalidate(&self) {
        self.cache.borrow_mut().take();
    }

    /// Read the current document.
    ///
    /// # Errors
    ///
    /// Only I/O failures other than a missing file are reported. Content
    /// that fails to parse, or that is not a mapping, is deleted and read as
    /// an empty document.
    pub fn read(&self) -> Result<F::Document, SettingsError> {
        if !self.always_read {
            if let Some(doc) = self.cache.borrow().as_ref() {
                return Ok(doc.clone());
            }
        }

        let doc = self.read_file()?;
        if !self.always_read {
            *self.cache.borrow_mut() = Some(doc.clone());
        }
        Ok(doc)
    }

    /// Replace the file content with `document`.
    ///
    /// The file is created if absent and truncated otherwise.
    pub fn write(&self, document: &F::Document) -> Result<(), SettingsError> {
        let text = F::encode(document).map_err(|e| SettingsError::Encode {
            path: self.path.clone(),
            format: F::NAME,
            message: e.to_string(),
        })?;

        let mut file = fs::File::create(&self.path).map_err(|e| SettingsError::io(&self.path, e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| SettingsError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), keys = document.len(), "Wrote settings file");

        if !self.always_read {
            *self.cache.borrow_mut() = Some(document.clone());
        }
        Ok(())
    }

    fn read_file(&self) -> Result<F::Document, SettingsError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(F::Document::default()),
            Err(e) => return Err(SettingsError::io(&self.path, e)),
        };

        match F::decode(&bytes) {
            Ok(Some(doc)) => {
                tracing::debug!(path = %self.path.display(), keys = doc.len(), "Read settings file");
                Ok(doc)
            }
            Ok(None) => {
                tracing::warn!(
                    path = %self.path.display(),
                    format = F::NAME,
                    "Settings file does not contain a mapping; removing it"
                );
                self.remove_corrupt()
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    format = F::NAME,
                    error = %e,
                    "Settings file is corrupt; removing it"
                );
                self.remove_corrupt()
            }
        }
    }

    fn remove_corrupt(&self) -> Result<F::Document, SettingsError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(F::Document::default()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(F::Document::default()),
            Err(e) => Err(SettingsError::io(&self.path, e)),
        }
    }
}

impl<F: Format> std::fmt::Debug for FileStore<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("format", &F::NAME)
            .field("path", &self.path)
            .field("always_read", &self.always_read)
            .finish()
    }
}
