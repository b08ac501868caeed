use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::config::CaseStyle;

#[derive(Parser, Debug)]
#[command(name = "mockery")]
#[command(about = "Generates testify mocks for Go interfaces", long_about = None)]
#[command(version)]
#[command(group(ArgGroup::new("selection").required(true).args(["name", "all"])))]
pub struct Cli {
    /// Name of the interface to mock; a value containing regex
    /// metacharacters selects every matching interface
    #[arg(long)]
    pub name: Option<String>,

    /// Generate mocks for every interface found, in all subdirectories
    #[arg(long)]
    pub all: bool,

    /// Print the generated mocks to stdout instead of writing files
    #[arg(long)]
    pub print: bool,

    /// Directory to write mocks to [default: ./mocks]
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Directory to search for interfaces
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Recurse into subdirectories
    #[arg(long)]
    pub recursive: bool,

    /// Generate the mock inside the package that declares the interface
    #[arg(long)]
    pub inpkg: bool,

    /// Casing convention for generated file names [default: camel]
    #[arg(long, value_enum)]
    pub case: Option<CaseStyle>,

    /// Comment inserted at the top of every generated file
    #[arg(long)]
    pub note: Option<String>,

    /// Configuration file [default: <dir>/.mockery.toml when present]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of worker threads (0 = one per core)
    #[arg(short = 'j', long, default_value = "0")]
    pub jobs: usize,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_name_and_all_are_exclusive() {
        assert!(Cli::try_parse_from(["mockery", "--name", "A", "--all"]).is_err());
    }

    #[test]
    fn test_selection_is_required() {
        assert!(Cli::try_parse_from(["mockery", "--print"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["mockery", "--name", "Requester"]).unwrap();
        assert_eq!(cli.name.as_deref(), Some("Requester"));
        assert_eq!(cli.dir, PathBuf::from("."));
        assert_eq!(cli.output, None);
        assert_eq!(cli.case, None);
        assert_eq!(cli.jobs, 0);
        assert_eq!(cli.verbosity, 0);
    }

    #[test]
    fn test_case_values() {
        let cli = Cli::try_parse_from(["mockery", "--all", "--case", "underscore", "-vv"]).unwrap();
        assert_eq!(cli.case, Some(CaseStyle::Underscore));
        assert_eq!(cli.verbosity, 2);
        assert!(Cli::try_parse_from(["mockery", "--all", "--case", "snake"]).is_err());
    }
}
