//! Outcome collection for a generation run.
//!
//! Every file and interface is processed independently; the report keeps
//! both the mocks that were written and every failure, so that no skip goes
//! unnoticed by the caller.

use std::fmt;

/// Results of one run over a directory.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub generated: Vec<GeneratedMock>,
    pub failures: Vec<Failure>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_generated(&mut self, mock: GeneratedMock) {
        self.generated.push(mock);
    }

    pub fn record_failure(&mut self, failure: Failure) {
        self.failures.push(failure);
    }

    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn failures_of(&self, kind: FailureKind) -> impl Iterator<Item = &Failure> {
        self.failures.iter().filter(move |f| f.kind == kind)
    }

    /// Whether any failure should turn into a non-zero exit status.
    ///
    /// Unparseable files are skipped and do not count.
    pub fn has_fatal_failures(&self) -> bool {
        self.failures.iter().any(|f| f.kind != FailureKind::Extraction)
    }
}

/// A mock that was generated and committed to its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMock {
    pub interface: String,
    pub destination: String,
}

impl GeneratedMock {
    pub fn new(interface: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            destination: destination.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    /// File path or interface name the failure is attributed to.
    pub subject: String,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.kind.as_str(), self.subject, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Extraction,
    Lookup,
    Generation,
    Sink,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extraction => "Extraction",
            Self::Lookup => "Lookup",
            Self::Generation => "Generation",
            Self::Sink => "Output",
        }
    }
}
