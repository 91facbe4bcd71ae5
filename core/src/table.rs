//! Declarative option tables.
//!
//! An [`OptionTable`] is a ready-made [`Schema`] described as data: a list of
//! [`OptionSpec`] entries plus switches for the conventional `--help` and
//! `--version` options. It can be deserialized from JSON or YAML, and
//! [`OptionTable::parse`] records what it sees into [`Matches`].
//!
//! # Example
//!
//! ```
//! use command_options_core::*;
//!
//! let table = OptionTable::new("example")
//!     .with_option(OptionSpec::boolean(Some("-v"), Some("--verbose")))
//!     .with_option(OptionSpec::required(Some("-o"), Some("--output")))
//!     .with_option(OptionSpec::pair(Some("-D"), Some("--define")).allow_multiple())
//!     .with_help();
//!
//! let matches = table.parse(&["-vo", "out.txt", "-D", "key", "value", "input"]).unwrap();
//! assert!(matches.is_present("--verbose"));
//! assert_eq!(matches.value_of("--output"), Some("out.txt"));
//! assert_eq!(matches.values_of("--define").collect::<Vec<_>>(), [["key", "value"]]);
//! assert_eq!(matches.positional, ["input"]);
//!
//! assert!(table.parse(&["--help"]).unwrap_err().is_help());
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::parser::ParseMode;
use crate::schema::{Kind, PairOption, PositionalArgs, Schema};

/// Short name of the built-in help option.
pub const HELP_SHORT: &str = "-h";
/// Long name of the built-in help option.
pub const HELP_LONG: &str = "--help";
/// Name of the built-in version option.
pub const VERSION_LONG: &str = "--version";

/// One option in an [`OptionTable`].
///
/// # Examples
///
/// ```
/// use command_options_core::{Kind, OptionSpec};
///
/// let color = OptionSpec::optional(None, Some("--color"))
///     .with_description("Colorize output");
/// assert_eq!(color.kind, Kind::Optional);
/// assert_eq!(color.canonical_name(), "--color");
/// assert!(color.matches("--color"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Short form (e.g. "-o")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    /// Long form (e.g. "--output")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    /// How the option consumes values
    #[serde(default = "default_kind")]
    pub kind: Kind,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Can this option appear more than once?
    #[serde(default)]
    pub multiple: bool,
}

fn default_kind() -> Kind {
    Kind::Boolean
}

impl OptionSpec {
    fn new(short: Option<&str>, long: Option<&str>, kind: Kind) -> Self {
        Self {
            short: short.map(String::from),
            long: long.map(String::from),
            kind,
            description: None,
            multiple: false,
        }
    }

    /// Creates an option that takes no value.
    pub fn boolean(short: Option<&str>, long: Option<&str>) -> Self {
        Self::new(short, long, Kind::Boolean)
    }

    /// Creates an option that always takes one value.
    pub fn required(short: Option<&str>, long: Option<&str>) -> Self {
        Self::new(short, long, Kind::Required)
    }

    /// Creates an option whose value can only be given with `=` or glued to
    /// the short form.
    pub fn optional(short: Option<&str>, long: Option<&str>) -> Self {
        Self::new(short, long, Kind::Optional)
    }

    /// Creates an option that takes two values, such as `--define KEY VALUE`.
    pub fn pair(short: Option<&str>, long: Option<&str>) -> Self {
        Self::new(short, long, Kind::TakeTwoArgs)
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Marks as allowing multiple occurrences.
    pub fn allow_multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Returns the canonical name (long form preferred, falls back to short).
    pub fn canonical_name(&self) -> &str {
        self.long
            .as_deref()
            .or(self.short.as_deref())
            .unwrap_or("unknown")
    }

    /// Checks if this option is spelled `name` (short or long form).
    pub fn matches(&self, name: &str) -> bool {
        self.short.as_deref() == Some(name) || self.long.as_deref() == Some(name)
    }
}

/// A complete option schema for one command.
///
/// Tables are usually loaded from a file:
///
/// ```
/// use command_options_core::{Kind, OptionTable, ParseMode};
///
/// let yaml = r#"
/// command: deploy
/// mode: posix
/// help: true
/// options:
///   - { short: "-n", long: "--dry-run" }
///   - { long: "--target", kind: required }
/// "#;
/// let table: OptionTable = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(table.mode, ParseMode::Posix);
/// assert_eq!(table.kind_of("-n"), Kind::Boolean);
/// assert_eq!(table.kind_of("--target"), Kind::Required);
/// assert_eq!(table.kind_of("-h"), Kind::Boolean);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTable {
    /// Name of the command the table describes
    pub command: String,
    /// Short description of the command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parsing discipline used by [`OptionTable::parse`]
    #[serde(default)]
    pub mode: ParseMode,
    /// Recognize `-h` and `--help`
    #[serde(default)]
    pub help: bool,
    /// Recognize `--version`
    #[serde(default)]
    pub version: bool,
    /// Declared options
    #[serde(default)]
    pub options: Vec<OptionSpec>,
}

impl OptionTable {
    /// Creates an empty table for `command` using interleaved parsing.
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            ..Default::default()
        }
    }

    /// Adds an option.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Sets the parsing discipline.
    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enables the built-in `-h` / `--help` option.
    pub fn with_help(mut self) -> Self {
        self.help = true;
        self
    }

    /// Enables the built-in `--version` option.
    pub fn with_version(mut self) -> Self {
        self.version = true;
        self
    }

    /// Finds a declared option by short or long form.
    pub fn find(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.matches(name))
    }

    /// Classifies `name`, including the built-in options.
    pub fn kind_of(&self, name: &str) -> Kind {
        if self.is_builtin(name) {
            return Kind::Boolean;
        }
        self.find(name).map_or(Kind::Unknown, |o| o.kind)
    }

    /// Parses `args` with the table's own [`mode`](OptionTable::mode).
    pub fn parse<A: AsRef<str>>(&self, args: &[A]) -> Result<Matches> {
        self.parse_with(self.mode, args)
    }

    /// Parses `args` with an explicit mode.
    pub fn parse_with<A: AsRef<str>>(&self, mode: ParseMode, args: &[A]) -> Result<Matches> {
        let mut recorder = Recorder {
            table: self,
            matches: Matches::default(),
        };
        let positional = mode.parse(&mut recorder, args)?;
        let mut matches = recorder.matches;
        matches.positional = positional;
        Ok(matches)
    }

    pub(crate) fn is_help(&self, name: &str) -> bool {
        self.help && (name == HELP_SHORT || name == HELP_LONG)
    }

    pub(crate) fn is_version(&self, name: &str) -> bool {
        self.version && name == VERSION_LONG
    }

    fn is_builtin(&self, name: &str) -> bool {
        self.is_help(name) || self.is_version(name)
    }
}

/// One recorded option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Canonical name of the option
    pub name: String,
    /// Spelling used on the command line
    pub given: String,
    /// Values in the order they were supplied
    pub values: Vec<String>,
}

/// Everything [`OptionTable::parse`] recorded.
///
/// Lookups take the canonical name of an option (see
/// [`OptionSpec::canonical_name`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matches {
    /// Options in command-line order
    pub occurrences: Vec<Occurrence>,
    /// All positional arguments
    pub positional: Vec<String>,
    /// Positional arguments before `--`
    pub before: Vec<String>,
    /// Positional arguments after `--`
    pub after: Vec<String>,
}

impl Matches {
    /// Iterates over the occurrences of `name`.
    pub fn occurrences_of<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Occurrence> {
        self.occurrences.iter().filter(move |o| o.name == name)
    }

    /// Returns `true` if `name` was given at least once.
    pub fn is_present(&self, name: &str) -> bool {
        self.occurrences_of(name).next().is_some()
    }

    /// Number of times `name` was given.
    pub fn count(&self, name: &str) -> usize {
        self.occurrences_of(name).count()
    }

    /// First value of the last occurrence of `name`.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.occurrences_of(name)
            .last()
            .and_then(|o| o.values.first())
            .map(String::as_str)
    }

    /// Values of every occurrence of `name`.
    pub fn values_of<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a [String]> {
        self.occurrences_of(name).map(|o| o.values.as_slice())
    }
}

/// Schema adapter that records into [`Matches`].
struct Recorder<'a> {
    table: &'a OptionTable,
    matches: Matches,
}

impl Recorder<'_> {
    fn record(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        let spec = self.table.find(name).ok_or(Error::Unknown)?;
        let canonical = spec.canonical_name();
        if !spec.multiple && self.matches.is_present(canonical) {
            return Err(Error::custom("may only be given once"));
        }
        trace!(option = canonical, given = name, "Recorded option");
        self.matches.occurrences.push(Occurrence {
            name: canonical.to_string(),
            given: name.to_string(),
            values,
        });
        Ok(())
    }
}

impl Schema for Recorder<'_> {
    fn kind(&self, name: &str) -> Kind {
        self.table.kind_of(name)
    }

    fn option(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        if self.table.is_help(name) {
            return Err(Error::Help);
        }
        if self.table.is_version(name) {
            return Err(Error::Version);
        }
        self.record(name, value.into_iter().map(String::from).collect())
    }

    fn as_positional_args(&mut self) -> Option<&mut dyn PositionalArgs> {
        Some(self)
    }

    fn as_pair_option(&mut self) -> Option<&mut dyn PairOption> {
        Some(self)
    }
}

impl PositionalArgs for Recorder<'_> {
    fn args(&mut self, before: &[String], after: &[String]) -> Result<()> {
        self.matches.before = before.to_vec();
        self.matches.after = after.to_vec();
        Ok(())
    }
}

impl PairOption for Recorder<'_> {
    fn option_pair(&mut self, name: &str, (first, second): (&str, &str)) -> Result<()> {
        self.record(name, vec![first.to_string(), second.to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn sample() -> OptionTable {
        OptionTable::new("sample")
            .with_option(OptionSpec::boolean(Some("-a"), Some("--all")).allow_multiple())
            .with_option(OptionSpec::required(Some("-f"), Some("--file")))
            .with_option(OptionSpec::optional(None, Some("--color")))
            .with_option(OptionSpec::pair(Some("-s"), Some("--set")).allow_multiple())
            .with_help()
            .with_version()
    }

    #[test]
    fn test_records_under_canonical_name() {
        let matches = sample().parse(&["-a", "-ffoo", "--all", "x"]).unwrap();
        assert_eq!(matches.count("--all"), 2);
        assert_eq!(matches.value_of("--file"), Some("foo"));
        assert_eq!(matches.occurrences[1].given, "-f");
        assert_eq!(matches.positional, ["x"]);
        assert_eq!(matches.before, ["x"]);
        assert!(matches.after.is_empty());
    }

    #[test]
    fn test_optional_value_presence() {
        let err = sample().parse(&["--color", "--color=never"]).unwrap_err();
        // --color is not multiple
        assert_eq!(err.to_string(), "option --color: may only be given once");

        let matches = sample().parse(&["--color"]).unwrap();
        assert!(matches.is_present("--color"));
        assert_eq!(matches.value_of("--color"), None);

        let matches = sample().parse(&["--color="]).unwrap();
        assert_eq!(matches.value_of("--color"), Some(""));
    }

    #[test]
    fn test_pairs_and_separator() {
        let matches = sample()
            .parse(&["-s", "k1", "v1", "--set", "k2", "v2", "--", "-a"])
            .unwrap();
        let pairs: Vec<&[String]> = matches.values_of("--set").collect();
        assert_eq!(pairs, [["k1", "v1"], ["k2", "v2"]]);
        assert!(!matches.is_present("--all"));
        assert_eq!(matches.after, ["-a"]);
        assert_eq!(matches.positional, ["-a"]);
    }

    #[test]
    fn test_builtin_options() {
        let table = sample();
        assert_eq!(table.parse(&["-h"]).unwrap_err().kind(), ErrorKind::HelpRequested);
        assert_eq!(table.parse(&["-ah"]).unwrap_err().kind(), ErrorKind::HelpRequested);
        assert!(table.parse(&["--version"]).unwrap_err().is_version());

        let bare = OptionTable::new("bare");
        assert_eq!(bare.kind_of("--help"), Kind::Unknown);
        let err = bare.parse(&["--help"]).unwrap_err();
        assert!(matches!(err, Error::UnknownOption(ref name) if name == "--help"));
    }

    #[test]
    fn test_subcommand_mode_from_table() {
        let table = sample().with_mode(ParseMode::Subcommand);
        let matches = table.parse(&["-a", "run", "--", "-f"]).unwrap();
        assert_eq!(matches.positional, ["run", "--", "-f"]);
        assert_eq!(matches.before, ["run", "--", "-f"]);
        assert_eq!(table.parse(&["-a"]).unwrap_err().kind(), ErrorKind::NoSubcommand);
    }

    #[test]
    fn test_lookup_result_outlives_name() {
        let matches = sample().parse(&["--file", "out.txt", "-s", "k", "v"]).unwrap();
        let value = matches.value_of(&String::from("--file"));
        let pairs: Vec<&[String]> = matches.values_of(&format!("--{}", "set")).collect();
        assert_eq!(value, Some("out.txt"));
        assert_eq!(pairs, [["k", "v"]]);
    }

    #[test]
    fn test_table_round_trips_through_json() {
        let table = sample();
        let json = serde_json::to_string(&table).unwrap();
        let back: OptionTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
