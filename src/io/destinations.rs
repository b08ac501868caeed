//! Places a generated mock can be written to.
//!
//! Every mock goes through an [`OutputDestination`]: a file under the output
//! directory (or next to its interface), stdout, or an in-memory buffer in
//! tests.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::errors::{Error, Result};

pub trait OutputDestination: Send + Sync {
    fn write_str(&self, content: &str) -> Result<()>;

    fn flush(&self) -> Result<()>;

    /// Human readable name used in messages and error reports.
    fn description(&self) -> String;
}

/// Writes the whole mock to one file, creating missing parent directories.
/// An existing file is replaced.
#[derive(Debug, Clone)]
pub struct FileDestination {
    path: PathBuf,
}

impl FileDestination {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputDestination for FileDestination {
    fn write_str(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::sink(self.description(), format!("failed to create directory: {}", e)))?;
        }
        std::fs::write(&self.path, content)
            .map_err(|e| Error::sink(self.description(), e.to_string()))
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn description(&self) -> String {
        self.path.display().to_string()
    }
}

/// Thread-safe in-memory buffer. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryDestination {
    buffer: Arc<RwLock<String>>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_content(&self) -> String {
        self.buffer
            .read()
            .map(|b| b.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn is_empty(&self) -> bool {
        self.get_content().is_empty()
    }
}

impl OutputDestination for MemoryDestination {
    fn write_str(&self, content: &str) -> Result<()> {
        let mut buffer = self
            .buffer
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        buffer.push_str(content);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn description(&self) -> String {
        "memory".to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutDestination;

impl StdoutDestination {
    pub fn new() -> Self {
        Self
    }
}

impl OutputDestination for StdoutDestination {
    fn write_str(&self, content: &str) -> Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(content.as_bytes())
            .map_err(|e| Error::sink(self.description(), e.to_string()))
    }

    fn flush(&self) -> Result<()> {
        io::stdout()
            .lock()
            .flush()
            .map_err(|e| Error::sink(self.description(), e.to_string()))
    }

    fn description(&self) -> String {
        "stdout".to_string()
    }
}
