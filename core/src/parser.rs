//! Single-pass command-line parser.
//!
//! The parser walks the tokens left to right. Each token is either the `--`
//! separator, a positional argument, an option, or the value of an option
//! seen just before it. Three entry points share one engine and differ only
//! in two switches:
//!
//! | Entry point | stops at first positional | `--` is a separator |
//! |---|---|---|
//! | [`parse_interleaved`] | no | yes |
//! | [`parse_posix`] | yes | yes |
//! | [`parse_subcommand`] | yes | no |
//!
//! # Examples
//!
//! ```
//! use command_options_core::{Error, Kind, Schema, parse_posix};
//!
//! #[derive(Default)]
//! struct Opts {
//!     all: bool,
//!     number: i64,
//! }
//!
//! impl Schema for Opts {
//!     fn kind(&self, name: &str) -> Kind {
//!         match name {
//!             "-a" | "--all" => Kind::Boolean,
//!             "-n" | "--number" => Kind::Required,
//!             _ => Kind::Unknown,
//!         }
//!     }
//!
//!     fn option(&mut self, name: &str, value: Option<&str>) -> Result<(), Error> {
//!         match name {
//!             "-a" | "--all" => self.all = true,
//!             "-n" | "--number" => {
//!                 self.number = value.unwrap_or_default().parse().map_err(Error::wrap)?;
//!             }
//!             _ => return Err(Error::Unknown),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut opts = Opts::default();
//! let args = parse_posix(&mut opts, &["-an42", "run", "-a"]).unwrap();
//! assert!(opts.all);
//! assert_eq!(opts.number, 42);
//! assert_eq!(args, ["run", "-a"]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::schema::{Kind, Schema};

/// Token that ends option parsing.
pub const SEPARATOR: &str = "--";

/// Parsing discipline selected at runtime.
///
/// # Examples
///
/// ```
/// use command_options_core::ParseMode;
///
/// assert_eq!(ParseMode::default(), ParseMode::Interleaved);
/// assert_eq!(ParseMode::Posix.to_string(), "posix");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Options and positional arguments may be mixed freely.
    #[default]
    Interleaved,
    /// Everything after the first positional argument is positional.
    Posix,
    /// Like `Posix`, but `--` is ordinary text and at least one positional
    /// argument (the subcommand) is required.
    Subcommand,
}

impl ParseMode {
    /// Parses `args` with this discipline.
    ///
    /// `args` should not include the program name.
    pub fn parse<S, A>(self, schema: &mut S, args: &[A]) -> Result<Vec<String>>
    where
        S: Schema + ?Sized,
        A: AsRef<str>,
    {
        debug!(mode = %self, tokens = args.len(), "Parsing command line");
        let positional = Parser::new(schema, self).run(args)?;
        if self == Self::Subcommand && positional.is_empty() {
            return Err(Error::NoSubcommand);
        }
        Ok(positional)
    }

    /// Returns the snake_case name used in option table files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interleaved => "interleaved",
            Self::Posix => "posix",
            Self::Subcommand => "subcommand",
        }
    }

    fn early_exit(self) -> bool {
        matches!(self, Self::Posix | Self::Subcommand)
    }

    fn keeps_separator(self) -> bool {
        matches!(self, Self::Subcommand)
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses options anywhere on the command line and returns the positional
/// arguments.
///
/// `args` should not include the program name.
pub fn parse_interleaved<S, A>(schema: &mut S, args: &[A]) -> Result<Vec<String>>
where
    S: Schema + ?Sized,
    A: AsRef<str>,
{
    ParseMode::Interleaved.parse(schema, args)
}

/// Parses options up to the first positional argument and returns the
/// positional arguments.
pub fn parse_posix<S, A>(schema: &mut S, args: &[A]) -> Result<Vec<String>>
where
    S: Schema + ?Sized,
    A: AsRef<str>,
{
    ParseMode::Posix.parse(schema, args)
}

/// Parses global options in front of a subcommand.
///
/// Stops at the first positional argument and leaves `--` in place so the
/// subcommand can parse it. Returns [`Error::NoSubcommand`] when no
/// positional argument is present.
pub fn parse_subcommand<S, A>(schema: &mut S, args: &[A]) -> Result<Vec<String>>
where
    S: Schema + ?Sized,
    A: AsRef<str>,
{
    ParseMode::Subcommand.parse(schema, args)
}

/// What the token at the cursor turned out to be.
enum Step<'t> {
    Separator,
    Positional,
    Single {
        name: &'t str,
        value: Option<&'t str>,
        consumed: usize,
    },
    /// A boolean short option glued to more short options; `rest` is
    /// classified next in place of the current token.
    Cluster { name: &'t str, rest: String },
    Pair {
        name: &'t str,
        values: (&'t str, &'t str),
        consumed: usize,
    },
}

struct Parser<'s, S: ?Sized> {
    schema: &'s mut S,
    mode: ParseMode,
    positional: Vec<String>,
    exited: bool,
}

impl<'s, S: Schema + ?Sized> Parser<'s, S> {
    fn new(schema: &'s mut S, mode: ParseMode) -> Self {
        Self {
            schema,
            mode,
            positional: Vec::new(),
            exited: false,
        }
    }

    fn run<A: AsRef<str>>(mut self, args: &[A]) -> Result<Vec<String>> {
        let mut pos = 0;
        let mut pending: Option<String> = None;

        while pos < args.len() {
            let token = pending.as_deref().unwrap_or_else(|| args[pos].as_ref());
            let following = &args[pos + 1..];

            let (advance, next) = match self.classify(token, following)? {
                Step::Separator => return self.finish_at_separator(following),
                Step::Positional => {
                    self.push_positional(token)?;
                    (1, None)
                }
                Step::Single {
                    name,
                    value,
                    consumed,
                } => {
                    self.dispatch(name, value)?;
                    (consumed, None)
                }
                Step::Cluster { name, rest } => {
                    self.dispatch(name, None)?;
                    (0, Some(rest))
                }
                Step::Pair {
                    name,
                    values,
                    consumed,
                } => {
                    self.dispatch_pair(name, values)?;
                    (consumed, None)
                }
            };
            pos += advance;
            pending = next;
        }

        if let Some(receiver) = self.schema.as_positional_args() {
            receiver.args(&self.positional, &[])?;
        }
        Ok(self.positional)
    }

    fn classify<'t, A: AsRef<str>>(&self, token: &'t str, following: &'t [A]) -> Result<Step<'t>> {
        if token == SEPARATOR && !self.mode.keeps_separator() {
            return Ok(Step::Separator);
        }
        if self.exited || !token.starts_with('-') || token == "-" || token == SEPARATOR {
            return Ok(Step::Positional);
        }

        let next = |n: usize| -> Option<&'t str> { following.get(n).map(|arg| arg.as_ref()) };

        if token.starts_with(SEPARATOR) {
            let (name, value) = match token.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (token, None),
            };
            return match self.schema.kind(name) {
                Kind::Required => match value {
                    Some(_) => Ok(Step::single(name, value, 1)),
                    None => {
                        let value = next(0).ok_or_else(|| Error::MissingValue(name.to_string()))?;
                        Ok(Step::single(name, Some(value), 2))
                    }
                },
                Kind::Optional => Ok(Step::single(name, value, 1)),
                Kind::Boolean if value.is_some() => Err(Error::UnexpectedValue(name.to_string())),
                Kind::Boolean => Ok(Step::single(name, None, 1)),
                Kind::TakeTwoArgs if value.is_some() => {
                    Err(Error::InlineValue(name.to_string()))
                }
                Kind::TakeTwoArgs => match (next(0), next(1)) {
                    (Some(first), Some(second)) => Ok(Step::pair(name, (first, second), 3)),
                    _ => Err(Error::MissingValues(name.to_string())),
                },
                Kind::Unknown => Err(Error::UnknownOption(name.to_string())),
            };
        }

        // `-` followed by at least one character; the name is that character.
        let letter = token[1..].chars().next().map_or(1, char::len_utf8);
        let (name, rest) = token.split_at(1 + letter);

        if rest.is_empty() {
            return match self.schema.kind(name) {
                Kind::Required => {
                    let value = next(0).ok_or_else(|| Error::MissingValue(name.to_string()))?;
                    Ok(Step::single(name, Some(value), 2))
                }
                Kind::Boolean | Kind::Optional => Ok(Step::single(name, None, 1)),
                Kind::TakeTwoArgs => match (next(0), next(1)) {
                    (Some(first), Some(second)) => Ok(Step::pair(name, (first, second), 3)),
                    _ => Err(Error::MissingValues(name.to_string())),
                },
                Kind::Unknown => Err(Error::UnknownOption(name.to_string())),
            };
        }

        match self.schema.kind(name) {
            Kind::Required | Kind::Optional => Ok(Step::single(name, Some(rest), 1)),
            Kind::Boolean if rest.starts_with('-') => Err(Error::InvalidCluster(token.to_string())),
            Kind::Boolean => Ok(Step::Cluster {
                name,
                rest: format!("-{rest}"),
            }),
            Kind::TakeTwoArgs if rest.starts_with('=') => Err(Error::InlineValue(name.to_string())),
            Kind::TakeTwoArgs => {
                let second = next(0).ok_or_else(|| Error::MissingValues(name.to_string()))?;
                Ok(Step::pair(name, (rest, second), 2))
            }
            Kind::Unknown => Err(Error::UnknownOption(name.to_string())),
        }
    }

    fn dispatch(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        trace!(name, value, "Dispatching option");
        self.schema
            .option(name, value)
            .map_err(|err| err.in_option(name))
    }

    fn dispatch_pair(&mut self, name: &str, values: (&str, &str)) -> Result<()> {
        trace!(name, first = values.0, second = values.1, "Dispatching option pair");
        let Some(receiver) = self.schema.as_pair_option() else {
            panic!(
                "option {name} is classified as Kind::TakeTwoArgs but the schema does not \
                 implement PairOption"
            );
        };
        receiver
            .option_pair(name, values)
            .map_err(|err| err.in_option(name))
    }

    fn push_positional(&mut self, value: &str) -> Result<()> {
        let index = self.positional.len();
        trace!(index, value, "Positional argument");
        if let Some(receiver) = self.schema.as_positional_arg() {
            receiver.arg(index, value, false)?;
        }
        self.positional.push(value.to_string());
        if self.mode.early_exit() {
            self.exited = true;
        }
        Ok(())
    }

    fn finish_at_separator<A: AsRef<str>>(mut self, after: &[A]) -> Result<Vec<String>> {
        let base = self.positional.len();
        let after: Vec<String> = after.iter().map(|arg| arg.as_ref().to_string()).collect();
        debug!(before = base, after = after.len(), "Reached separator");

        if let Some(receiver) = self.schema.as_positional_arg() {
            for (offset, value) in after.iter().enumerate() {
                receiver.arg(base + offset, value, true)?;
            }
        }
        if let Some(receiver) = self.schema.as_positional_args() {
            receiver.args(&self.positional, &after)?;
        }

        self.positional.extend(after);
        Ok(self.positional)
    }
}

impl<'t> Step<'t> {
    fn single(name: &'t str, value: Option<&'t str>, consumed: usize) -> Self {
        Self::Single {
            name,
            value,
            consumed,
        }
    }

    fn pair(name: &'t str, values: (&'t str, &'t str), consumed: usize) -> Self {
        Self::Pair {
            name,
            values,
            consumed,
        }
    }
}
