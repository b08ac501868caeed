use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use crate::errors::Result;

/// Finds Go source files under a directory.
///
/// Entries are visited in file-name order, depth first. Names starting with
/// `.` are skipped along with everything below them.
pub struct FileWalker {
    root: PathBuf,
    recursive: bool,
}

impl FileWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: false,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let mut walker = WalkDir::new(&self.root).sort_by_file_name();
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        let mut files = Vec::new();
        for entry in walker
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(std::io::Error::from(e).into()),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() && is_go_source(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_go_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "go")
}

pub fn find_go_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    FileWalker::new(root).recursive(recursive).walk()
}
