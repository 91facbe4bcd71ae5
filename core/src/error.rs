//! Error taxonomy for command-line parsing.
//!
//! Every failure produced while parsing is an [`Error`], which makes the type
//! itself the "invalid command line" category. Individual failures keep their
//! own identity through [`Error::kind`], and any cause a schema attached stays
//! reachable through [`Error::find_cause`].
//!
//! # Examples
//!
//! ```
//! use command_options_core::{Error, ErrorKind, is_invalid_command_line};
//!
//! let cause = "NaN".parse::<i64>().unwrap_err();
//! let err = Error::wrap(cause).in_option("--number");
//!
//! assert_eq!(err.to_string(), "option --number: invalid digit found in string");
//! assert_eq!(err.kind(), ErrorKind::Custom);
//! assert!(err.find_cause::<std::num::ParseIntError>().is_some());
//! assert!(is_invalid_command_line(&err));
//! ```

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed cause attached to a schema-constructed [`Error`].
pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Errors produced while parsing a command line.
///
/// The first four variants are sentinels: schemas return [`Error::Help`],
/// [`Error::Version`] and [`Error::Unknown`] from their callbacks, and
/// [`Error::NoSubcommand`] is produced by
/// [`parse_subcommand`](crate::parse_subcommand).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The user asked for the help message.
    #[error("help requested")]
    Help,
    /// The user asked for version information.
    #[error("version requested")]
    Version,
    /// Returned by a schema's option callback for a name it does not handle.
    ///
    /// The parser rewrites it into [`Error::UnknownOption`] carrying the name.
    #[error("unknown option")]
    Unknown,
    /// Subcommand-style parsing found no positional argument.
    #[error("no subcommand was provided")]
    NoSubcommand,
    /// The option name is not recognized.
    #[error("unknown option {0:?}")]
    UnknownOption(String),
    /// A `Required` option reached the end of input without a value.
    #[error("option {0} requires an argument")]
    MissingValue(String),
    /// A two-value option did not have two values available.
    #[error("option {0} requires 2 arguments")]
    MissingValues(String),
    /// A `Boolean` option was given a value with `=`.
    #[error("option {0} takes no argument")]
    UnexpectedValue(String),
    /// A two-value option was written in the `=` form.
    #[error("option {0} does not accept an inline argument")]
    InlineValue(String),
    /// A cluster of boolean short options contained a `-`.
    #[error("invalid option '-' in {0:?}")]
    InvalidCluster(String),
    /// A schema callback rejected the option.
    #[error("option {name}: {source}")]
    Rejected {
        /// Option name as it appeared on the command line.
        name: String,
        /// What the schema returned.
        source: Box<Error>,
    },
    /// A failure built by a schema implementation.
    #[error("{message}")]
    Custom {
        /// Human-readable description.
        message: String,
        /// Underlying cause, if any.
        #[source]
        source: Option<BoxedCause>,
    },
}

/// Identity of an [`Error`], for matching without caring about payloads.
///
/// # Examples
///
/// ```
/// use command_options_core::{Error, ErrorKind};
///
/// let err = Error::Help.in_option("--help");
/// assert_eq!(err.kind(), ErrorKind::HelpRequested);
/// assert!(err.is_help());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// [`Error::Help`]
    HelpRequested,
    /// [`Error::Version`]
    VersionRequested,
    /// [`Error::Unknown`] or [`Error::UnknownOption`]
    UnknownOption,
    /// [`Error::NoSubcommand`]
    NoSubcommand,
    /// An option was given fewer values than its kind needs.
    MissingArgument,
    /// An option was given a value it does not accept.
    UnexpectedArgument,
    /// A malformed cluster of short options.
    InvalidOption,
    /// An error built by a schema with [`Error::custom`] and friends.
    Custom,
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates an error with a message and no cause.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_options_core::{Error, ErrorKind};
    ///
    /// let err = Error::custom("possible values are 'always', 'never', 'auto'");
    /// assert_eq!(err.kind(), ErrorKind::Custom);
    /// ```
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error with a message that wraps `cause`.
    pub fn with_source<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Custom {
            message: message.into(),
            source: Some(Box::new(cause)),
        }
    }

    /// Wraps `cause`, reusing its message.
    pub fn wrap<E>(cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Custom {
            message: cause.to_string(),
            source: Some(Box::new(cause)),
        }
    }

    /// Attributes this error to the option `name`.
    ///
    /// [`Error::Unknown`] becomes [`Error::UnknownOption`]; everything else is
    /// wrapped in [`Error::Rejected`].
    pub fn in_option(self, name: &str) -> Self {
        match self {
            Self::Unknown => Self::UnknownOption(name.to_string()),
            other => Self::Rejected {
                name: name.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the identity of this error, looking through [`Error::Rejected`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Help => ErrorKind::HelpRequested,
            Self::Version => ErrorKind::VersionRequested,
            Self::Unknown | Self::UnknownOption(_) => ErrorKind::UnknownOption,
            Self::NoSubcommand => ErrorKind::NoSubcommand,
            Self::MissingValue(_) | Self::MissingValues(_) => ErrorKind::MissingArgument,
            Self::UnexpectedValue(_) | Self::InlineValue(_) => ErrorKind::UnexpectedArgument,
            Self::InvalidCluster(_) => ErrorKind::InvalidOption,
            Self::Rejected { source, .. } => source.kind(),
            Self::Custom { .. } => ErrorKind::Custom,
        }
    }

    /// Returns `true` for a help request, wrapped or not.
    pub fn is_help(&self) -> bool {
        self.kind() == ErrorKind::HelpRequested
    }

    /// Returns `true` for a version request, wrapped or not.
    pub fn is_version(&self) -> bool {
        self.kind() == ErrorKind::VersionRequested
    }

    /// Returns the option name this error is attributed to, if any.
    pub fn option_name(&self) -> Option<&str> {
        match self {
            Self::UnknownOption(name)
            | Self::MissingValue(name)
            | Self::MissingValues(name)
            | Self::UnexpectedValue(name)
            | Self::InlineValue(name)
            | Self::Rejected { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Searches the source chain for a cause of type `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::ParseIntError;
    /// use command_options_core::Error;
    ///
    /// let err = Error::with_source("bad width", "x".parse::<u32>().unwrap_err());
    /// assert!(err.find_cause::<ParseIntError>().is_some());
    /// assert!(Error::custom("bad width").find_cause::<ParseIntError>().is_none());
    /// ```
    pub fn find_cause<T>(&self) -> Option<&T>
    where
        T: StdError + 'static,
    {
        let mut current = self.source();
        while let Some(err) = current {
            if let Some(found) = err.downcast_ref::<T>() {
                return Some(found);
            }
            current = err.source();
        }
        None
    }
}

/// Reports whether `err`, or anything in its source chain, is an [`Error`].
///
/// Useful when the parse error has been boxed or wrapped by an
/// application-level error type.
///
/// # Examples
///
/// ```
/// use command_options_core::{Error, is_invalid_command_line};
///
/// let boxed: Box<dyn std::error::Error> = Box::new(Error::NoSubcommand);
/// assert!(is_invalid_command_line(boxed.as_ref()));
///
/// let io = std::io::Error::other("disk on fire");
/// assert!(!is_invalid_command_line(&io));
/// ```
pub fn is_invalid_command_line(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if err.is::<Error>() {
            return true;
        }
        current = err.source();
    }
    false
}
