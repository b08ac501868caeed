use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::CaseStyle;
use crate::errors::{Error, Result};

/// Name of the optional project configuration file.
pub const CONFIG_FILE_NAME: &str = ".mockery.toml";

/// Settings read from a `.mockery.toml` file. Every key is optional;
/// values given on the command line take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub output: Option<PathBuf>,
    pub case: Option<CaseStyle>,
    pub note: Option<String>,
    pub inpkg: Option<bool>,
    pub recursive: Option<bool>,
}

pub(crate) fn read_config_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

pub fn parse_config(contents: &str, origin: &Path) -> Result<FileConfig> {
    toml::from_str::<FileConfig>(contents).map_err(|e| {
        Error::configuration(format!("failed to parse {}: {}", origin.display(), e))
    })
}

/// Loads the configuration file for a run.
///
/// An explicit path must exist. Without one, `.mockery.toml` in the search
/// directory is used when present.
pub fn load_config(explicit: Option<&Path>, search_dir: &Path) -> Result<Option<FileConfig>> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = search_dir.join(CONFIG_FILE_NAME);
            if !candidate.is_file() {
                tracing::debug!("No {} in {}", CONFIG_FILE_NAME, search_dir.display());
                return Ok(None);
            }
            candidate
        }
    };

    let contents = read_config_file(&path).map_err(|e| {
        Error::configuration(format!("failed to read {}: {}", path.display(), e))
    })?;
    let config = parse_config(&contents, &path)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_parse_all_keys() {
        let config = parse_config(
            indoc! {r#"
                output = "internal/fakes"
                case = "underscore"
                note = "regenerate with make mocks"
                inpkg = false
                recursive = true
            "#},
            Path::new(CONFIG_FILE_NAME),
        )
        .unwrap();

        assert_eq!(config.output, Some(PathBuf::from("internal/fakes")));
        assert_eq!(config.case, Some(CaseStyle::Underscore));
        assert_eq!(config.note.as_deref(), Some("regenerate with make mocks"));
        assert_eq!(config.inpkg, Some(false));
        assert_eq!(config.recursive, Some(true));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = parse_config("outptu = \"mocks\"\n", Path::new(CONFIG_FILE_NAME)).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("outptu"));
    }

    #[test]
    fn test_missing_default_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_config(None, dir.path()).unwrap(), None);
    }

    #[test]
    fn test_default_file_in_search_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "case = \"camel\"\n").unwrap();

        let config = load_config(None, dir.path()).unwrap().unwrap();
        assert_eq!(config.case, Some(CaseStyle::Camel));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(&missing), dir.path()).is_err());
    }
}
