//! Command-line grammar for the wperf profiler.
//!
//! This crate turns the process's argument list into a validated
//! [`Invocation`] (the selected command plus every resolved option) or
//! rejects it with a [`ParseError`] carrying a caret [`Diagnostic`]:
//!
//! - [`ArgParser`] — the grammar engine and main entry point.
//! - [`ArgDescriptor`] — immutable specification of one argument; the
//!   process-wide tables live in [`registry()`].
//! - [`Grammar`] — the descriptor subset enabled for a [`CommandTag`].
//! - [`DurationParser`] — `<number><unit>` values such as `2m` or `500ms`.
//! - [`parse_int_list`] — core lists such as `0,2-4`.
//!
//! The crate never executes the requested command and performs no I/O
//! beyond the injected [`FileProbe`].
//!
//! # Example
//!
//! ```
//! use wperf_args_core::{ArgParser, CommandTag, KnownFiles};
//!
//! let parser = ArgParser::default().with_file_probe(KnownFiles::default());
//!
//! let invocation = parser
//!     .parse(["record", "-c", "1", "--timeout", "3s", "--", "notepad.exe", "test_arg"])
//!     .unwrap();
//! assert_eq!(invocation.command, CommandTag::Record);
//! assert_eq!(invocation.cores(), [1]);
//! assert_eq!(invocation.timeout(), Some(3.0));
//! assert_eq!(invocation.record_commandline(), Some("notepad.exe test_arg"));
//! assert_eq!(invocation.pdb_file(), Some("notepad.pdb"));
//!
//! let err = parser.parse(["sample", "-c", "0,1"]).unwrap_err();
//! eprint!("{}", err.diagnostic);
//! ```

mod config;
mod descriptor;
mod diagnostics;
mod error;
mod invocation;
mod parser;
mod probe;
mod ranges;
pub mod registry;
mod tokens;
mod units;

pub use config::ParserConfig;
pub use descriptor::{
    ArgDescriptor, ArgKind, Arity, ParsedArg, ValueKind, Validator, is_non_empty,
    is_unsigned_integer,
};
pub use diagnostics::Diagnostic;
pub use error::{ConfigError, DescriptorError, DurationError, ListError, ParseError, ParseErrorKind, Result};
pub use invocation::{ArgValue, Invocation, Passthrough};
pub use parser::ArgParser;
pub use probe::{FileProbe, KnownFiles, RealFileSystem};
pub use ranges::{file_name, parse_int_list, replace_file_extension};
pub use registry::{CommandTag, Grammar, Registry, registry};
pub use tokens::TokenStream;
pub use units::{DurationParser, default_time_units};
