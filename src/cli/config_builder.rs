//! Builds the run configuration from parsed arguments and the optional
//! configuration file.

use std::path::PathBuf;

use super::Cli;
use crate::config::{
    load_config, FileConfig, NameFilter, OutputTarget, RunConfig, DEFAULT_OUTPUT_DIR,
};
use crate::errors::Result;

/// Loads the configuration file for `cli` and merges it underneath the
/// command-line values.
pub fn build_run_config(cli: &Cli) -> Result<RunConfig> {
    let file = load_config(cli.config.as_deref(), &cli.dir)?.unwrap_or_default();
    merge(cli, file)
}

/// Values given on the command line win; the file fills in the rest.
pub fn merge(cli: &Cli, file: FileConfig) -> Result<RunConfig> {
    let filter = match &cli.name {
        Some(name) => NameFilter::parse(name)?,
        None => NameFilter::All,
    };

    let mut config = RunConfig::new(&cli.dir, filter);
    config.recursive = cli.recursive || file.recursive.unwrap_or(false);
    config.in_package = cli.inpkg || file.inpkg.unwrap_or(false);
    config.case = cli.case.or(file.case).unwrap_or_default();
    config.note = cli.note.clone().or(file.note);
    config.jobs = cli.jobs;
    config.target = if cli.print {
        OutputTarget::Stdout
    } else {
        OutputTarget::Directory(
            cli.output
                .clone()
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        )
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CaseStyle;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mockery").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_command_line_only() {
        let config = merge(&cli(&["--name", "Requester", "--print"]), FileConfig::default()).unwrap();
        assert!(matches!(config.filter, NameFilter::Exact(ref n) if n == "Requester"));
        assert_eq!(config.target, OutputTarget::Stdout);
        assert_eq!(config.case, CaseStyle::Camel);
        assert!(!config.walks_recursively());
    }

    #[test]
    fn test_file_fills_unset_values() {
        let file = FileConfig {
            output: Some(PathBuf::from("fakes")),
            case: Some(CaseStyle::Underscore),
            note: Some("from file".into()),
            inpkg: None,
            recursive: Some(true),
        };
        let config = merge(&cli(&["--name", "Requester"]), file).unwrap();
        assert_eq!(config.target, OutputTarget::Directory(PathBuf::from("fakes")));
        assert_eq!(config.case, CaseStyle::Underscore);
        assert_eq!(config.note.as_deref(), Some("from file"));
        assert!(config.recursive);
    }

    #[test]
    fn test_command_line_overrides_file() {
        let file = FileConfig {
            output: Some(PathBuf::from("fakes")),
            case: Some(CaseStyle::Underscore),
            note: Some("from file".into()),
            ..FileConfig::default()
        };
        let config = merge(
            &cli(&["--all", "--output", "mocks", "--case", "camel", "--note", "cli"]),
            file,
        )
        .unwrap();
        assert_eq!(config.target, OutputTarget::Directory(PathBuf::from("mocks")));
        assert_eq!(config.case, CaseStyle::Camel);
        assert_eq!(config.note.as_deref(), Some("cli"));
        assert!(matches!(config.filter, NameFilter::All));
    }

    #[test]
    fn test_invalid_pattern_is_a_configuration_error() {
        assert!(merge(&cli(&["--name", "Req[uester"]), FileConfig::default()).is_err());
    }
}
