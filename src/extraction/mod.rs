//! Interface extraction from Go source files.

pub mod extractor;
pub mod lexer;
pub mod module;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, debug_span};

use crate::core::{Import, Interface};
use crate::errors::{Error, ExtractError, Result};

pub use module::resolve_import_path;

/// The interfaces declared in one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub package_name: String,
    pub imports: Vec<Import>,
    pub interfaces: Vec<Interface>,
}

impl SourceUnit {
    pub fn find(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Sets the import path of the declaring package on every interface.
    pub fn with_import_path(mut self, import_path: Option<String>) -> Self {
        for iface in &mut self.interfaces {
            iface.import_path = import_path.clone();
        }
        self
    }
}

/// Extracts every mockable interface from `source`, read from `path`.
pub fn extract(path: &Path, source: &str) -> std::result::Result<SourceUnit, ExtractError> {
    let parsed = extractor::parse(path, source)?;
    let method_sets = extractor::resolve_method_sets(&parsed.interfaces);

    let interfaces = parsed
        .interfaces
        .iter()
        .zip(method_sets)
        .map(|(declared, set)| {
            let mut iface = Interface::new(&declared.name, path)
                .with_package(&parsed.package_name)
                .with_imports(parsed.imports.clone())
                .with_methods(set.methods);
            iface.unresolved_embeds = set.unresolved;
            iface
        })
        .collect::<Vec<_>>();

    debug!(
        path = %path.display(),
        interfaces = interfaces.len(),
        "Extracted interfaces"
    );

    Ok(SourceUnit {
        path: path.to_path_buf(),
        package_name: parsed.package_name,
        imports: parsed.imports,
        interfaces,
    })
}

/// Reads and extracts a file, attaching the import path of its directory.
pub fn extract_file(path: &Path) -> Result<SourceUnit> {
    let _span = debug_span!("extract", path = %path.display()).entered();
    let source = fs::read_to_string(path)?;
    let unit = extract(path, &source).map_err(Error::from)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(unit.with_import_path(resolve_import_path(dir)))
}
