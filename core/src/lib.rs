//! Schema-driven command-line option parsing.
//!
//! This crate classifies `argv`-style tokens against a caller-supplied
//! schema and reports what it finds through callbacks:
//!
//! - [`Schema`]: the mandatory trait: classify a name as a [`Kind`] and
//!   receive parsed options.
//! - [`PositionalArg`], [`PositionalArgs`], [`PairOption`]: optional
//!   capabilities a schema exposes through [`Schema`]'s accessor methods.
//! - [`parse_interleaved`], [`parse_posix`], [`parse_subcommand`]: the three
//!   parsing disciplines, also selectable at runtime with [`ParseMode`].
//! - [`Error`]: every parse failure; [`ErrorKind`] identifies sentinels such
//!   as [`Error::Help`] even when they are wrapped with an option name.
//!
//! The conventions followed are the usual POSIX/GNU ones: clustered short
//! flags (`-abc`), glued short values (`-ofile`), `--long=value`, optional
//! values that only bind through `=`, and `--` ending option parsing.
//!
//! For schemas described as data, [`OptionTable`] implements every
//! capability and records results into [`Matches`]; [`validate_table`] checks
//! a table for malformed or conflicting declarations.
//!
//! # Example
//!
//! ```
//! use command_options_core::*;
//!
//! let table = OptionTable::new("mycli")
//!     .with_option(OptionSpec::boolean(Some("-v"), Some("--verbose")))
//!     .with_option(OptionSpec::required(Some("-n"), Some("--number")))
//!     .with_help();
//! assert!(validate_table(&table).is_empty());
//!
//! let matches = table.parse(&["-vn", "3", "file", "--", "-v"]).unwrap();
//! assert_eq!(matches.value_of("--number"), Some("3"));
//! assert_eq!(matches.before, ["file"]);
//! assert_eq!(matches.after, ["-v"]);
//!
//! let err = table.parse(&["--number"]).unwrap_err();
//! assert_eq!(err.to_string(), "option --number requires an argument");
//! assert_eq!(err.kind(), ErrorKind::MissingArgument);
//! ```

mod error;
mod parser;
mod schema;
mod table;
mod validate;

pub use error::{BoxedCause, Error, ErrorKind, Result, is_invalid_command_line};
pub use parser::{ParseMode, SEPARATOR, parse_interleaved, parse_posix, parse_subcommand};
pub use schema::{Kind, PairOption, PositionalArg, PositionalArgs, Schema};
pub use table::{HELP_LONG, HELP_SHORT, Matches, Occurrence, OptionSpec, OptionTable, VERSION_LONG};
pub use validate::{ValidationError, validate_table};
