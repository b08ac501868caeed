//! Run configuration.
//!
//! A run is described by a [`RunConfig`]: where to look for interfaces,
//! which ones to mock, and where the mocks go. The generator itself only
//! sees the narrower [`GeneratorConfig`].
//!
//! Settings come from the command line, optionally layered over a
//! `.mockery.toml` file (see [`loader`]).

pub mod loader;

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::errors::{Error, Result};

pub use loader::{load_config, FileConfig, CONFIG_FILE_NAME};

/// Package name of mocks written to stdout.
pub const STDOUT_PACKAGE: &str = "mocks";

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "./mocks";

/// Settings the generator needs for one mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Package clause of an out-of-package mock.
    pub package_name: String,
    /// Write the mock into the package that declares the interface.
    pub in_package: bool,
    /// Comment placed above the package clause.
    pub note: Option<String>,
}

impl GeneratorConfig {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            in_package: false,
            note: None,
        }
    }

    /// Configuration for mocks written next to the interface they implement.
    /// The package clause is taken from the interface in that case.
    pub fn in_package() -> Self {
        Self {
            package_name: String::new(),
            in_package: true,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// File naming style for generated mocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CaseStyle {
    /// File named exactly like the interface.
    #[default]
    Camel,
    /// `ListenerStore` becomes `listener_store`.
    Underscore,
}

static CASE_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.)([A-Z])").unwrap());

impl CaseStyle {
    /// File stem (without `.go`) for a mock of `interface`.
    pub fn file_stem(self, interface: &str) -> String {
        match self {
            CaseStyle::Camel => interface.to_string(),
            CaseStyle::Underscore => CASE_BOUNDARY
                .replace_all(interface, "${1}_${2}")
                .to_lowercase(),
        }
    }
}

/// Which interfaces a run generates mocks for.
#[derive(Debug, Clone)]
pub enum NameFilter {
    /// Every interface found.
    All,
    /// The one interface with exactly this name. The first match wins.
    Exact(String),
    /// Every interface whose name matches.
    Pattern(Regex),
}

const PATTERN_METACHARACTERS: &[char] = &[
    '\\', '.', '+', '*', '?', '(', ')', '|', '[', ']', '{', '}', '^', '$',
];

impl NameFilter {
    /// Interprets a `--name` value: plain identifiers match exactly, anything
    /// with regex metacharacters is compiled as a pattern.
    pub fn parse(name: &str) -> Result<Self> {
        if name.contains(PATTERN_METACHARACTERS) {
            Regex::new(name)
                .map(NameFilter::Pattern)
                .map_err(|e| Error::configuration(format!("invalid name pattern '{}': {}", name, e)))
        } else {
            Ok(NameFilter::Exact(name.to_string()))
        }
    }

    pub fn matches(&self, interface: &str) -> bool {
        match self {
            NameFilter::All => true,
            NameFilter::Exact(name) => name == interface,
            NameFilter::Pattern(re) => re.is_match(interface),
        }
    }

    /// Whether the run asked for interfaces by name; finding none of them is
    /// a lookup failure.
    pub fn is_named(&self) -> bool {
        !matches!(self, NameFilter::All)
    }

    /// An exact filter stops after its first match.
    pub fn limit_one(&self) -> bool {
        matches!(self, NameFilter::Exact(_))
    }

    pub fn describe(&self) -> String {
        match self {
            NameFilter::All => "*".to_string(),
            NameFilter::Exact(name) => name.clone(),
            NameFilter::Pattern(re) => re.as_str().to_string(),
        }
    }
}

/// Where generated mocks are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    /// One file per mock in this directory; its base name is the package.
    Directory(PathBuf),
}

impl OutputTarget {
    /// Package clause for out-of-package mocks sent to this target.
    pub fn package_name(&self) -> String {
        match self {
            OutputTarget::Stdout => STDOUT_PACKAGE.to_string(),
            OutputTarget::Directory(dir) => directory_package(dir),
        }
    }
}

fn directory_package(dir: &Path) -> String {
    dir.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .last()
        .unwrap_or_else(|| STDOUT_PACKAGE.to_string())
}

/// Complete description of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory searched for `.go` files.
    pub dir: PathBuf,
    pub recursive: bool,
    pub filter: NameFilter,
    pub target: OutputTarget,
    pub case: CaseStyle,
    pub in_package: bool,
    pub note: Option<String>,
    /// Worker threads; 0 picks one per core.
    pub jobs: usize,
}

impl RunConfig {
    pub fn new(dir: impl Into<PathBuf>, filter: NameFilter) -> Self {
        Self {
            dir: dir.into(),
            recursive: false,
            filter,
            target: OutputTarget::Directory(PathBuf::from(DEFAULT_OUTPUT_DIR)),
            case: CaseStyle::default(),
            in_package: false,
            note: None,
            jobs: 0,
        }
    }

    /// Generator settings derived from this run.
    pub fn generator(&self) -> GeneratorConfig {
        let base = if self.in_package {
            GeneratorConfig::in_package()
        } else {
            GeneratorConfig::new(self.target.package_name())
        };
        match &self.note {
            Some(note) => base.with_note(note.clone()),
            None => base,
        }
    }

    /// Searching every interface always descends into subdirectories.
    pub fn walks_recursively(&self) -> bool {
        self.recursive || matches!(self.filter, NameFilter::All)
    }
}
