//! Storage slots the task list is persisted to.
//!
//! This module provides:
//! - [`FileSlot`]: a JSON file on disk, the default for the command line
//! - [`MemorySlot`]: an in-memory slot for embedding and tests

use crate::error::Result;
use crate::traits::StorageSlot;
use std::path::{Path, PathBuf};

/// File-based storage slot.
///
/// Each save writes a sibling temporary file and renames it over the target,
/// so a failed write never leaves a half-written list behind.
#[derive(Debug, Clone)]
pub struct FileSlot {
    /// Path to the JSON file.
    path: PathBuf,
}

impl FileSlot {
    /// Create a slot backed by the file at `path`.
    ///
    /// The file and its parent directory are created on first save.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Get the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StorageSlot for FileSlot {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&self.path)?))
    }

    fn save(&mut self, data: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let temp = self.temp_path();
        std::fs::write(&temp, data)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

/// In-memory storage slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    data: Option<String>,
    saves: usize,
}

impl MemorySlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that already holds `data`.
    #[must_use]
    pub fn with_data(data: impl Into<String>) -> Self {
        Self { data: Some(data.into()), saves: 0 }
    }

    /// Current contents of the slot.
    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// Number of successful saves.
    #[must_use]
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl StorageSlot for MemorySlot {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.data.clone())
    }

    fn save(&mut self, data: &str) -> Result<()> {
        self.data = Some(data.to_string());
        self.saves += 1;
        Ok(())
    }
}
