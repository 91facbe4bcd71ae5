//! Option table validation.
//!
//! Catches structural problems in an [`OptionTable`] before it is used for
//! parsing: malformed option names, duplicates, options declared with
//! [`Kind::Unknown`], and collisions with the built-in help and version
//! options.
//!
//! # Examples
//!
//! ```
//! use command_options_core::*;
//!
//! let table = OptionTable::new("ls")
//!     .with_option(OptionSpec::boolean(Some("-a"), Some("--all")));
//! assert!(validate_table(&table).is_empty());
//!
//! // Invalid: short option missing leading dash
//! let bad = OptionTable::new("ls")
//!     .with_option(OptionSpec::boolean(Some("a"), Some("--all")));
//! assert!(!validate_table(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::schema::Kind;
use crate::table::{OptionSpec, OptionTable};

/// Option table validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("table command cannot be empty")]
    EmptyCommandName,
    /// Short option is not a dash followed by exactly one character.
    #[error("invalid short option format: {0}")]
    InvalidShortOption(String),
    /// Long option does not start with `--`, is too short, or contains `=`.
    #[error("invalid long option format: {0}")]
    InvalidLongOption(String),
    /// An option has neither short nor long form.
    #[error("option must define short or long form")]
    MissingOptionName,
    /// Two options share the same name.
    #[error("duplicate option: {0}")]
    DuplicateOption(String),
    /// An option is declared with the `unknown` kind.
    #[error("option {0} is declared with kind 'unknown'")]
    UnknownKind(String),
    /// An option reuses a name claimed by the built-in help or version option.
    #[error("option {0} collides with a built-in option")]
    ReservedOption(String),
}

/// Validates an option table.
///
/// Validation stops at the first problem, so the result holds at most one
/// error.
///
/// # Examples
///
/// ```
/// use command_options_core::*;
///
/// let table = OptionTable::new("tool")
///     .with_option(OptionSpec::boolean(Some("-h"), Some("--host")))
///     .with_help();
/// assert_eq!(
///     validate_table(&table),
///     vec![ValidationError::ReservedOption("-h".to_string())]
/// );
/// ```
pub fn validate_table(table: &OptionTable) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if table.command.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }

    errors.extend(validate_options(table, &table.options));
    errors
}

fn validate_options(table: &OptionTable, options: &[OptionSpec]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for option in options {
        if option.short.is_none() && option.long.is_none() {
            errors.push(ValidationError::MissingOptionName);
            return errors;
        }

        if let Some(short) = &option.short {
            if !is_valid_short(short) {
                errors.push(ValidationError::InvalidShortOption(short.clone()));
                return errors;
            }
            if table.is_help(short) {
                errors.push(ValidationError::ReservedOption(short.clone()));
                return errors;
            }
            if !seen.insert(short.as_str()) {
                errors.push(ValidationError::DuplicateOption(short.clone()));
                return errors;
            }
        }

        if let Some(long) = &option.long {
            if !long.starts_with("--") || long.len() < 3 || long.contains('=') {
                errors.push(ValidationError::InvalidLongOption(long.clone()));
                return errors;
            }
            if table.is_help(long) || table.is_version(long) {
                errors.push(ValidationError::ReservedOption(long.clone()));
                return errors;
            }
            if !seen.insert(long.as_str()) {
                errors.push(ValidationError::DuplicateOption(long.clone()));
                return errors;
            }
        }

        if option.kind == Kind::Unknown {
            errors.push(ValidationError::UnknownKind(
                option.canonical_name().to_string(),
            ));
            return errors;
        }
    }

    errors
}

/// `-` followed by exactly one character other than `-` and `=`.
fn is_valid_short(short: &str) -> bool {
    let Some(rest) = short.strip_prefix('-') else {
        return false;
    };
    let mut chars = rest.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c != '-' && c != '=')
}
