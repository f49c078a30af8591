//! Grammar engine: turns an argument list into an [`Invocation`].
//!
//! Parsing runs in three phases:
//!
//! 1. **Command selection**: the head token must match a command
//!    descriptor; the first match in registration order wins.
//! 2. **Dispatch**: repeated passes over the command's [`Grammar`]: its
//!    command-specific flags, then the `--` separator, then the global flags.
//!    A pass that consumes nothing is an error.
//! 3. **Required-argument checks**: per command, after the stream is empty.
//!
//! Any violated precondition aborts the whole parse with a [`ParseError`]
//! carrying a caret [`Diagnostic`]; no partial result is ever returned.

use tracing::{debug, trace};

use crate::config::ParserConfig;
use crate::descriptor::{ArgDescriptor, ArgKind, ParsedArg, ValueKind};
use crate::diagnostics::Diagnostic;
use crate::error::{ConfigError, DescriptorError, ListError, ParseError, ParseErrorKind};
use crate::invocation::{ArgValue, Invocation, Passthrough};
use crate::probe::{FileProbe, RealFileSystem};
use crate::ranges::{file_name, parse_int_list, replace_file_extension};
use crate::registry::{CommandTag, Grammar, names, registry};
use crate::tokens::TokenStream;
use crate::units::DurationParser;

const MISSING_VALUE_HINT: &str = "Hint: Missing value for argument!";

/// Command-line parser for one configuration and file probe.
///
/// The parser holds no per-invocation state and can be reused for any
/// number of [`parse`](Self::parse) calls.
///
/// # Examples
///
/// ```
/// use wperf_args_core::{ArgParser, CommandTag, ParseErrorKind};
///
/// let parser = ArgParser::default();
///
/// let invocation = parser.parse(["test", "-v", "--json"]).unwrap();
/// assert_eq!(invocation.command, CommandTag::Test);
/// assert!(invocation.verbose() && invocation.json());
///
/// let err = parser.parse(["test", "-v", "--json", "random"]).unwrap_err();
/// assert_eq!(err.kind, ParseErrorKind::UnrecognizedArgument);
/// assert_eq!(err.token, "random");
/// ```
#[derive(Debug, Clone)]
pub struct ArgParser<P = RealFileSystem> {
    config: ParserConfig,
    durations: DurationParser,
    probe: P,
}

impl Default for ArgParser {
    fn default() -> Self {
        Self {
            config: ParserConfig::default(),
            durations: DurationParser::with_default_units(),
            probe: RealFileSystem,
        }
    }
}

impl ArgParser {
    /// Creates a parser that checks paths against the real filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUnit`] if the configured unit table is
    /// unusable.
    pub fn new(config: ParserConfig) -> Result<Self, ConfigError> {
        let durations = DurationParser::new(config.time_units.clone())?;
        Ok(Self {
            config,
            durations,
            probe: RealFileSystem,
        })
    }
}

impl<P: FileProbe> ArgParser<P> {
    /// Replaces the file probe.
    pub fn with_file_probe<Q: FileProbe>(self, probe: Q) -> ArgParser<Q> {
        ArgParser {
            config: self.config,
            durations: self.durations,
            probe,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses `args`, which must not include the program name.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on the first violated rule; see
    /// [`ParseErrorKind`] for the possible kinds.
    pub fn parse<I, S>(&self, args: I) -> Result<Invocation, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut session = Session {
            parser: self,
            args: &args,
            stream: TokenStream::new(args.iter().cloned()),
        };
        let invocation = session.run()?;
        debug!(
            command = %invocation.command,
            values = invocation.values.len(),
            passthrough = invocation.passthrough.is_some(),
            "Parsed invocation"
        );
        Ok(invocation)
    }
}

/// State owned by a single parse call.
struct Session<'a, P> {
    parser: &'a ArgParser<P>,
    args: &'a [String],
    stream: TokenStream,
}

impl<P: FileProbe> Session<'_, P> {
    fn run(&mut self) -> Result<Invocation, ParseError> {
        if self.stream.is_empty() {
            return Err(self.fail(
                ParseErrorKind::NoCommandProvided,
                "",
                Some(format!(
                    "Hint: no command provided, see `{} help`.",
                    self.parser.config.program_name
                )),
            ));
        }

        let mut invocation = self.select_command()?;
        self.seed_defaults(&mut invocation);

        let grammar = Grammar::for_command(invocation.command);
        while !self.stream.is_empty() {
            let before = self.stream.len();

            for descriptor in grammar.command_flags {
                self.apply(descriptor, &mut invocation)?;
            }

            if grammar.accepts_separator && self.try_separator(&mut invocation)? {
                break;
            }

            for descriptor in grammar.global_flags {
                self.apply(descriptor, &mut invocation)?;
            }

            if self.stream.len() == before {
                let token = self.stream.peek().unwrap_or_default().to_string();
                return Err(self.fail(
                    ParseErrorKind::UnrecognizedArgument,
                    &token,
                    Some(format!(
                        "Hint: `{token}` is not a valid argument for `{}`.",
                        invocation.command
                    )),
                ));
            }
        }

        self.check_required(&invocation)?;
        Ok(invocation)
    }

    fn select_command(&mut self) -> Result<Invocation, ParseError> {
        let registry = registry();
        for descriptor in &registry.commands {
            let Some(parsed) = self.try_parse(descriptor)? else {
                continue;
            };
            // Only command descriptors live in this table.
            let command = descriptor.command_tag().unwrap_or_default();
            debug!(%command, token = descriptor.name(), "Selected command");

            let mut invocation = Invocation::new(command);
            if let Some(query) = parsed.values.first() {
                invocation.set(descriptor.name(), ArgValue::Text(query.clone()));
            }
            self.stream.advance(parsed.consumed());
            return Ok(invocation);
        }

        let token = self.stream.peek().unwrap_or_default().to_string();
        Err(self.fail(
            ParseErrorKind::UnrecognizedCommand,
            &token,
            Some(format!("Hint: `{token}` is not a recognized command.")),
        ))
    }

    fn seed_defaults(&self, invocation: &mut Invocation) {
        if invocation.command.enables_sampling() {
            let config = &self.parser.config;
            invocation.set(
                names::RECORD_SPAWN_DELAY,
                ArgValue::Count(config.record_spawn_delay_ms),
            );
            invocation.set(
                names::SAMPLE_DISPLAY_ROW,
                ArgValue::Count(config.sample_display_row),
            );
        }
    }

    /// Matches `descriptor` against the stream head and records its value.
    fn apply(
        &mut self,
        descriptor: &ArgDescriptor,
        invocation: &mut Invocation,
    ) -> Result<bool, ParseError> {
        if !self.stream.peek().is_some_and(|head| descriptor.matches(head)) {
            return Ok(false);
        }

        if let ArgKind::Value(_) = descriptor.kind() {
            self.check_flag_value_exists()?;
        }

        let Some(parsed) = self.try_parse(descriptor)? else {
            return Ok(false);
        };
        trace!(flag = descriptor.name(), values = ?parsed.values, "Matched flag");

        match descriptor.kind() {
            ArgKind::Switch => {
                invocation.set(descriptor.name(), ArgValue::Switch(true));
                if descriptor.name() == names::DISASSEMBLE {
                    invocation.set(names::ANNOTATE, ArgValue::Switch(true));
                }
            }
            ArgKind::Value(kind) => {
                let raw = parsed.values.first().map(String::as_str).unwrap_or_default();
                let value = self.resolve_value(kind, raw, invocation.command)?;
                invocation.set(descriptor.name(), value);
            }
            ArgKind::Command(_) | ArgKind::Positional => {}
        }

        self.stream.advance(parsed.consumed());
        Ok(true)
    }

    /// Runs the descriptor's own arity and validator checks.
    fn try_parse(&self, descriptor: &ArgDescriptor) -> Result<Option<ParsedArg>, ParseError> {
        descriptor.parse(self.stream.remaining()).map_err(|err| match err {
            DescriptorError::InsufficientArguments { .. } => self.fail(
                ParseErrorKind::MissingFlagValue,
                "",
                Some(MISSING_VALUE_HINT.to_string()),
            ),
            DescriptorError::InvalidValue(value) => self.fail(
                ParseErrorKind::InvalidFlagValue,
                &value,
                Some(format!(
                    "Hint: `{value}` is not a valid value for `{}`.",
                    descriptor.name()
                )),
            ),
        })
    }

    /// The token after a value-bearing flag must exist and must not look
    /// like another flag.
    fn check_flag_value_exists(&self) -> Result<(), ParseError> {
        match self.stream.peek_nth(1) {
            None => Err(self.fail(
                ParseErrorKind::MissingFlagValue,
                "",
                Some(MISSING_VALUE_HINT.to_string()),
            )),
            Some(next) if next.starts_with('-') => Err(self.fail(
                ParseErrorKind::MissingFlagValue,
                next,
                Some(MISSING_VALUE_HINT.to_string()),
            )),
            Some(_) => Ok(()),
        }
    }

    fn resolve_value(
        &self,
        kind: ValueKind,
        raw: &str,
        command: CommandTag,
    ) -> Result<ArgValue, ParseError> {
        match kind {
            ValueKind::Text => Ok(ArgValue::Text(raw.to_string())),
            ValueKind::File => {
                if self.parser.probe.file_exists(raw) {
                    Ok(ArgValue::Text(raw.to_string()))
                } else {
                    Err(self.fail(
                        ParseErrorKind::InvalidFlagValue,
                        raw,
                        Some(format!("File path '{raw}' doesn't exist")),
                    ))
                }
            }
            ValueKind::Duration => self
                .parser
                .durations
                .to_seconds(raw)
                .map(ArgValue::Seconds)
                .map_err(|_| {
                    let units = self
                        .parser
                        .durations
                        .units()
                        .keys()
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(", ");
                    self.fail(
                        ParseErrorKind::InvalidFlagValue,
                        raw,
                        Some(format!(
                            "Hint: expected <number><unit> with an optional unit of: {units}."
                        )),
                    )
                }),
            ValueKind::CoreList => {
                let max = self.parser.config.max_cores(command);
                match parse_int_list(raw, ',', max) {
                    Ok(cores) => Ok(ArgValue::IntList(cores)),
                    Err(ListError::TooMany { max }) => Err(self.fail(
                        ParseErrorKind::TooManyValues { max },
                        raw,
                        Some(format!("Maximum number of cores allowed is {max}")),
                    )),
                    Err(ListError::Malformed(_)) => Err(self.fail(
                        ParseErrorKind::InvalidFlagValue,
                        raw,
                        Some("Hint: expected a comma separated list of cores or ranges, e.g. 0,2-4.".to_string()),
                    )),
                }
            }
            ValueKind::Count => raw.parse::<u64>().map(ArgValue::Count).map_err(|_| {
                self.fail(
                    ParseErrorKind::InvalidFlagValue,
                    raw,
                    Some(format!("Hint: `{raw}` is not a valid number.")),
                )
            }),
        }
    }

    /// Matches `--` and collects the verbatim passthrough command line.
    fn try_separator(&mut self, invocation: &mut Invocation) -> Result<bool, ParseError> {
        let separator = &registry().separator;
        if !self.stream.peek().is_some_and(|head| separator.matches(head)) {
            return Ok(false);
        }

        if !invocation.command.supports_spawn() {
            let token = self.stream.peek_nth(1).unwrap_or(names::SEPARATOR).to_string();
            return Err(self.fail(
                ParseErrorKind::UnsupportedSeparatorContext,
                &token,
                Some("warning: only `stat`, `record`, `timeline` and `spe` support process spawn!".to_string()),
            ));
        }

        let Some(parsed) = self.try_parse(separator)? else {
            return Ok(false);
        };
        self.stream.advance(parsed.consumed());
        collect_passthrough(invocation, parsed.values);
        Ok(true)
    }

    fn check_required(&self, invocation: &Invocation) -> Result<(), ParseError> {
        match invocation.command {
            CommandTag::Record => {
                if invocation.passthrough.is_none() {
                    return Err(self.fail(
                        ParseErrorKind::MissingRequiredArgument {
                            flag: names::SEPARATOR.to_string(),
                        },
                        "",
                        Some("Hint: `record` requires a process to spawn: `record [OPTIONS] -- COMMAND [ARGS]`.".to_string()),
                    ));
                }
            }
            CommandTag::Sample => {
                if invocation.contains(names::PE_FILE) {
                    return Ok(());
                }
                for dependent in [names::IMAGE_NAME, names::PDB_FILE] {
                    if invocation.contains(dependent) {
                        return Err(self.fail(
                            ParseErrorKind::MissingRequiredArgument {
                                flag: names::PE_FILE.to_string(),
                            },
                            dependent,
                            Some(format!("Hint: `{dependent}` requires `{}`.", names::PE_FILE)),
                        ));
                    }
                }
            }
            CommandTag::Stat
            | CommandTag::Test
            | CommandTag::Detect
            | CommandTag::Help
            | CommandTag::Version
            | CommandTag::List
            | CommandTag::Man
            | CommandTag::Spe
            | CommandTag::Timeline
            | CommandTag::NoCommand => {}
        }
        Ok(())
    }

    fn fail(&self, kind: ParseErrorKind, token: &str, hint: Option<String>) -> ParseError {
        let diagnostic = Diagnostic::locate(&self.parser.config.program_name, self.args, token, hint);
        debug!(kind = %kind, token, "Rejected invocation");
        ParseError {
            kind,
            token: token.to_string(),
            diagnostic,
        }
    }
}

/// Records everything after `--` as the process command line.
///
/// The first token becomes the implied executable; the PE file, PDB file and
/// image name are derived from it unless given explicitly.
fn collect_passthrough(invocation: &mut Invocation, tokens: Vec<String>) {
    let Some(executable) = tokens.first().cloned() else {
        debug!("Empty passthrough command line");
        return;
    };

    if !invocation.contains(names::PE_FILE) {
        invocation.set(names::PE_FILE, ArgValue::Text(executable.clone()));
    }
    if !invocation.contains(names::PDB_FILE) {
        let pdb = replace_file_extension(&executable, "pdb");
        invocation.set(names::PDB_FILE, ArgValue::Text(pdb));
    }
    if !invocation.contains(names::IMAGE_NAME) {
        invocation.set(
            names::IMAGE_NAME,
            ArgValue::Text(file_name(&executable).to_string()),
        );
    }

    let command_line = tokens.join(" ");
    debug!(%executable, %command_line, "Collected passthrough command line");
    invocation.passthrough = Some(Passthrough {
        command_line,
        executable,
    });
}
