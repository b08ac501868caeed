//! Import path resolution for the package that declares an interface.
//!
//! A directory's import path comes from the nearest enclosing `go.mod`
//! (`module` path plus the relative directory) or, failing that, from its
//! position under `$GOPATH/src`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

const GO_MOD: &str = "go.mod";

/// Import path of the package in `dir`, if one can be determined.
pub fn resolve_import_path(dir: &Path) -> Option<String> {
    let dir = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    from_go_mod(&dir).or_else(|| from_gopath(&dir, &gopath_roots()))
}

fn from_go_mod(dir: &Path) -> Option<String> {
    for root in dir.ancestors() {
        let manifest = root.join(GO_MOD);
        let Ok(contents) = fs::read_to_string(&manifest) else {
            continue;
        };
        let Some(module) = parse_module_directive(&contents) else {
            debug!(path = %manifest.display(), "go.mod has no module directive");
            return None;
        };
        let relative = dir.strip_prefix(root).ok()?;
        trace!(module = %module, root = %root.display(), "Found module root");
        return Some(join_import_path(&module, relative));
    }
    None
}

fn from_gopath(dir: &Path, roots: &[PathBuf]) -> Option<String> {
    roots.iter().find_map(|root| {
        let src = root.join("src");
        let src = fs::canonicalize(&src).unwrap_or(src);
        let relative = dir.strip_prefix(&src).ok()?;
        let path = join_import_path("", relative);
        (!path.is_empty()).then_some(path)
    })
}

/// `$GOPATH` entries, or `~/go` when unset.
fn gopath_roots() -> Vec<PathBuf> {
    match std::env::var_os("GOPATH") {
        Some(value) if !value.is_empty() => std::env::split_paths(&value).collect(),
        _ => dirs::home_dir().map(|h| h.join("go")).into_iter().collect(),
    }
}

fn join_import_path(base: &str, relative: &Path) -> String {
    let mut path = base.to_string();
    for component in relative.components() {
        if let std::path::Component::Normal(part) = component {
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(&part.to_string_lossy());
        }
    }
    path
}

/// The module path declared by a `go.mod` file.
pub fn parse_module_directive(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or_default().trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let module = rest.trim().trim_matches(|c| c == '"' || c == '`');
        (!module.is_empty()).then(|| module.to_string())
    })
}
