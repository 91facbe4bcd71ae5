//! Loading option tables from disk.
//!
//! Tables are YAML unless the file extension is `.json`. Every loaded table
//! is validated before it is returned.
//!
//! # Example YAML
//!
//! ```yaml
//! command: example
//! mode: interleaved
//! help: true
//! version: true
//! options:
//!   - { short: "-a", long: "--all" }
//!   - { short: "-n", long: "--number", kind: required }
//!   - { long: "--color", kind: optional }
//!   - { short: "-D", long: "--define", kind: take_two_args, multiple: true }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use command_options_core::{OptionTable, ValidationError, validate_table};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading an option table.
#[derive(Debug, Error)]
pub enum TableError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The table parsed but is structurally invalid.
    #[error("invalid option table: {0}")]
    Invalid(#[from] ValidationError),
}

/// Loads and validates the option table at `path`.
pub fn load_table(path: impl AsRef<Path>) -> Result<OptionTable, TableError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let table: OptionTable = if is_json(path) {
        serde_json::from_reader(reader)?
    } else {
        serde_yaml::from_reader(reader)?
    };

    if let Some(err) = validate_table(&table).into_iter().next() {
        return Err(err.into());
    }

    debug!(
        path = %path.display(),
        command = %table.command,
        options = table.options.len(),
        "Loaded option table"
    );
    Ok(table)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_options_core::{Kind, ParseMode};

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_yaml_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "table.yaml",
            r#"
command: example
mode: posix
help: true
options:
  - { short: "-a", long: "--all" }
  - { short: "-D", kind: take_two_args }
"#,
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.command, "example");
        assert_eq!(table.mode, ParseMode::Posix);
        assert_eq!(table.kind_of("--all"), Kind::Boolean);
        assert_eq!(table.kind_of("-D"), Kind::TakeTwoArgs);
    }

    #[test]
    fn test_load_json_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "table.JSON",
            r#"{"command": "example", "options": [{"long": "--file", "kind": "required"}]}"#,
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.mode, ParseMode::Interleaved);
        assert_eq!(table.kind_of("--file"), Kind::Required);
    }

    #[test]
    fn test_load_rejects_invalid_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "table.yaml",
            "command: example\noptions:\n  - { short: \"x\" }\n",
        );

        let err = load_table(&path).unwrap_err();
        assert!(matches!(
            err,
            TableError::Invalid(ValidationError::InvalidShortOption(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_table(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, TableError::IoError(_)));
    }
}
