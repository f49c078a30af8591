//! Error types for argument parsing and parser configuration.
//!
//! A failed parse always surfaces as a single [`ParseError`] that carries the
//! error kind, the offending token and the rendered caret [`Diagnostic`].
//! The smaller error types in this module are produced by individual
//! components and mapped onto a [`ParseErrorKind`] by the dispatcher.

use thiserror::Error;

use crate::diagnostics::Diagnostic;

/// Kind of a parse failure.
///
/// The `Display` impl provides the one-line summary used in logs; the full
/// user-facing text lives in the accompanying [`Diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The argument list was empty.
    #[error("no command provided")]
    NoCommandProvided,
    /// The first token is not a registered command.
    #[error("command not recognized")]
    UnrecognizedCommand,
    /// A full dispatch pass consumed nothing.
    #[error("unrecognized argument")]
    UnrecognizedArgument,
    /// A value-bearing flag has no value, or the next token is another flag.
    #[error("missing value for argument")]
    MissingFlagValue,
    /// A value was rejected by a validator, converter or the file probe.
    #[error("invalid argument value")]
    InvalidFlagValue,
    /// A core list holds more entries than the command allows.
    #[error("too many values, at most {max} allowed")]
    TooManyValues {
        /// Maximum number of entries accepted for the active command.
        max: usize,
    },
    /// `--` was used under a command that cannot spawn a process.
    #[error("process spawn is not supported by this command")]
    UnsupportedSeparatorContext,
    /// A command-specific mandatory flag was not supplied.
    #[error("missing required argument `{flag}`")]
    MissingRequiredArgument {
        /// Canonical name of the missing flag.
        flag: String,
    },
}

/// A rejected invocation.
#[derive(Debug, Clone, Error)]
#[error("invalid argument `{token}`: {kind}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// The token the diagnostic points at (empty when pointing past the end).
    pub token: String,
    /// Rendered command line, caret indicator and hint.
    pub diagnostic: Diagnostic,
}

/// Failure of a single descriptor to consume its value tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Fewer value tokens remain than the descriptor's arity.
    #[error("not enough arguments provided: expected {expected}, found {found}")]
    InsufficientArguments {
        /// Number of value tokens required.
        expected: usize,
        /// Number of value tokens available.
        found: usize,
    },
    /// A value token failed one of the descriptor's validators.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Failure to convert a `<number><unit>` token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// The token does not match the numeric grammar or uses an unknown unit.
    #[error("invalid timeout value: {0}")]
    InvalidTimeout(String),
}

/// Failure to read a core list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// A token is neither an integer nor a `<a>-<b>` range.
    #[error("invalid list entry: {0:?}")]
    Malformed(String),
    /// The expanded list would hold more than `max` entries.
    #[error("list expands to more than {max} entries")]
    TooMany {
        /// Largest accepted entry count.
        max: usize,
    },
}

/// Errors raised while loading or validating a [`ParserConfig`](crate::ParserConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A time unit entry cannot be used for conversion.
    #[error("invalid time unit `{unit}`: {reason}")]
    InvalidUnit {
        /// Unit suffix as written in the configuration.
        unit: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The unit table could not be compiled into a matcher.
    #[error("invalid unit pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Convenience alias for configuration results.
pub type Result<T> = std::result::Result<T, ConfigError>;
