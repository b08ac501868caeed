//! The generate command: discovery, extraction, generation and output.
//!
//! Files are found in name order and extracted in parallel; the selected
//! interfaces are then generated in parallel. Results are written one by
//! one in discovery order, so output is deterministic regardless of the
//! number of worker threads.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, debug_span, info, info_span, warn};

use crate::config::{OutputTarget, RunConfig};
use crate::core::Interface;
use crate::errors::{Failure, FailureKind, GeneratedMock, Result, RunReport};
use crate::extraction::extract_file;
use crate::generator::emit;
use crate::io::{find_go_files, FileDestination, OutputDestination, StdoutDestination};

/// Runs a complete generation pass, writing each mock where `config` says.
pub fn generate_mocks(config: &RunConfig) -> Result<RunReport> {
    generate_mocks_with(config, |iface| destination_for(config, iface))
}

/// Like [`generate_mocks`], with the destination of every mock chosen by
/// `open`.
pub fn generate_mocks_with<F>(config: &RunConfig, open: F) -> Result<RunReport>
where
    F: Fn(&Interface) -> Box<dyn OutputDestination>,
{
    let _span = info_span!("generate", dir = %config.dir.display()).entered();
    let mut report = RunReport::new();

    let recursive = config.walks_recursively();
    let files = find_go_files(&config.dir, recursive)?;
    info!(files = files.len(), recursive, "Discovered Go source files");

    let selected = select_interfaces(config, files, &mut report);
    if selected.is_empty() && config.filter.is_named() {
        let name = config.filter.describe();
        report.record_failure(Failure::new(
            FailureKind::Lookup,
            &name,
            crate::errors::Error::Lookup { name: name.clone() }.to_string(),
        ));
        return Ok(report);
    }
    info!(interfaces = selected.len(), "Selected interfaces");

    let generator_config = config.generator();
    let outputs: Vec<_> = selected
        .par_iter()
        .map(|iface| {
            let _span = debug_span!("interface", name = %iface.name).entered();
            emit(iface, &generator_config)
        })
        .collect();

    for (iface, output) in selected.iter().zip(outputs) {
        let source = match output {
            Ok(source) => source,
            Err(failure) => {
                warn!("{}", failure);
                report.record_failure(Failure::new(
                    FailureKind::Generation,
                    &iface.name,
                    failure.to_string(),
                ));
                continue;
            }
        };

        let destination = open(iface);
        if config.target != OutputTarget::Stdout {
            println!("Generating mock for: {}", iface.name);
        }
        match destination
            .write_str(&source)
            .and_then(|()| destination.flush())
        {
            Ok(()) => {
                debug!(interface = %iface.name, destination = %destination.description(), "Wrote mock");
                report.record_generated(GeneratedMock::new(&iface.name, destination.description()));
            }
            Err(e) => {
                warn!("{}", e);
                report.record_failure(Failure::new(FailureKind::Sink, &iface.name, e.to_string()));
            }
        }
    }

    Ok(report)
}

/// Extracts every file and keeps the interfaces the filter selects, in
/// discovery order. An exact filter stops at its first match.
fn select_interfaces(config: &RunConfig, files: Vec<PathBuf>, report: &mut RunReport) -> Vec<Interface> {
    let units: Vec<_> = files
        .par_iter()
        .map(|path| (path, extract_file(path)))
        .collect();

    let mut selected = Vec::new();
    for (path, unit) in units {
        let unit = match unit {
            Ok(unit) => unit,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                report.record_failure(Failure::new(
                    FailureKind::Extraction,
                    path.display().to_string(),
                    e.to_string(),
                ));
                continue;
            }
        };
        for iface in unit.interfaces {
            if !config.filter.matches(&iface.name) {
                continue;
            }
            if iface.import_path.is_none() && !config.in_package {
                warn!(
                    interface = %iface.name,
                    "Unable to determine the import path of {}; omitting its import",
                    path.display()
                );
            }
            selected.push(iface);
            if config.filter.limit_one() {
                return selected;
            }
        }
    }
    selected
}

/// Where the mock of `iface` goes for this run.
///
/// Mocks written into the interface's own package are named
/// `mock_<name>.go` beside the declaring file.
pub fn destination_for(config: &RunConfig, iface: &Interface) -> Box<dyn OutputDestination> {
    let stem = config.case.file_stem(&iface.name);
    match &config.target {
        OutputTarget::Stdout => Box::new(StdoutDestination::new()),
        _ if config.in_package => {
            let dir = iface.path.parent().map(PathBuf::from).unwrap_or_default();
            Box::new(FileDestination::new(dir.join(format!("mock_{}.go", stem))))
        }
        OutputTarget::Directory(dir) => Box::new(FileDestination::new(dir.join(format!("{}.go", stem)))),
    }
}
