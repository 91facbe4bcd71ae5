//! Schema traits consulted by the parser.
//!
//! A schema is anything implementing [`Schema`]: it classifies option names
//! and receives parsed options. Three optional capabilities extend it:
//!
//! - [`PositionalArg`]: notified of each positional argument as it is seen.
//! - [`PositionalArgs`]: notified once with all positional arguments, split
//!   around `--`.
//! - [`PairOption`]: receives options declared as [`Kind::TakeTwoArgs`].
//!
//! A schema opts into a capability by overriding the matching accessor on
//! [`Schema`] to return `Some(self)`.
//!
//! # Examples
//!
//! ```
//! use command_options_core::{Error, Kind, PositionalArgs, Schema, parse_interleaved};
//!
//! #[derive(Default)]
//! struct Opts {
//!     verbose: bool,
//!     files: Vec<String>,
//! }
//!
//! impl Schema for Opts {
//!     fn kind(&self, name: &str) -> Kind {
//!         match name {
//!             "-v" | "--verbose" => Kind::Boolean,
//!             _ => Kind::Unknown,
//!         }
//!     }
//!
//!     fn option(&mut self, name: &str, _value: Option<&str>) -> Result<(), Error> {
//!         match name {
//!             "-v" | "--verbose" => self.verbose = true,
//!             _ => return Err(Error::Unknown),
//!         }
//!         Ok(())
//!     }
//!
//!     fn as_positional_args(&mut self) -> Option<&mut dyn PositionalArgs> {
//!         Some(self)
//!     }
//! }
//!
//! impl PositionalArgs for Opts {
//!     fn args(&mut self, before: &[String], _after: &[String]) -> Result<(), Error> {
//!         self.files = before.to_vec();
//!         Ok(())
//!     }
//! }
//!
//! let mut opts = Opts::default();
//! parse_interleaved(&mut opts, &["a.txt", "-v", "b.txt"]).unwrap();
//! assert!(opts.verbose);
//! assert_eq!(opts.files, ["a.txt", "b.txt"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How an option consumes values.
///
/// # Examples
///
/// ```
/// use command_options_core::Kind;
///
/// assert_eq!(Kind::default(), Kind::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// Not an option the schema recognizes.
    #[default]
    Unknown,
    /// Takes no value.
    Boolean,
    /// Takes exactly one value, either after `=` or as the next token.
    Required,
    /// Takes a value only through `=` (or glued to a short option).
    Optional,
    /// Takes exactly two values from the following tokens.
    TakeTwoArgs,
}

/// The mandatory part of a schema.
///
/// Names passed to both methods include their leading dashes (`-v`,
/// `--verbose`). `kind` may be called several times for the same name during
/// one parse and must answer consistently.
pub trait Schema {
    /// Classifies an option name.
    fn kind(&self, name: &str) -> Kind;

    /// Receives a parsed option.
    ///
    /// `value` is `None` when no value was supplied and `Some("")` for an
    /// explicitly empty one (`--name=`). Returning [`Error::Unknown`](crate::Error::Unknown)
    /// reports the option as unknown.
    fn option(&mut self, name: &str, value: Option<&str>) -> Result<()>;

    /// Exposes the [`PositionalArg`] capability.
    fn as_positional_arg(&mut self) -> Option<&mut dyn PositionalArg> {
        None
    }

    /// Exposes the [`PositionalArgs`] capability.
    fn as_positional_args(&mut self) -> Option<&mut dyn PositionalArgs> {
        None
    }

    /// Exposes the [`PairOption`] capability.
    ///
    /// Required whenever [`Schema::kind`] can return [`Kind::TakeTwoArgs`].
    fn as_pair_option(&mut self) -> Option<&mut dyn PairOption> {
        None
    }
}

/// Per-argument notification.
pub trait PositionalArg {
    /// Called for each positional argument with its 0-based index and whether
    /// it appeared after `--`.
    fn arg(&mut self, index: usize, value: &str, after_separator: bool) -> Result<()>;
}

/// Batch notification, called exactly once per parse: either at `--` or
/// when the input runs out.
pub trait PositionalArgs {
    /// `after` holds the arguments following `--`; it is empty when no
    /// separator was seen.
    fn args(&mut self, before: &[String], after: &[String]) -> Result<()>;
}

/// Receiver for options declared as [`Kind::TakeTwoArgs`].
pub trait PairOption {
    fn option_pair(&mut self, name: &str, values: (&str, &str)) -> Result<()>;
}
