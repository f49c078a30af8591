//! Argument descriptors.
//!
//! A descriptor is the immutable specification of one recognized argument:
//! its canonical name, aliases, description, arity and value validators.
//! Descriptors carry no parse state; a successful match returns a
//! [`ParsedArg`] owned by the caller.

use crate::error::DescriptorError;
use crate::registry::CommandTag;

/// Predicate applied to every value token a descriptor consumes.
pub type Validator = fn(&str) -> bool;

/// Number of value tokens consumed after the matched token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many tokens.
    Fixed(usize),
    /// Every remaining token.
    Variable,
}

/// How a value-bearing flag's token is resolved into a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Stored verbatim.
    Text,
    /// A path that must exist according to the injected file probe.
    File,
    /// `<number><unit?>`, converted to seconds.
    Duration,
    /// Comma-separated cores and ranges, bounded per command.
    CoreList,
    /// Unsigned decimal integer.
    Count,
}

/// Kind-specific payload of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Selects the invocation's command.
    Command(CommandTag),
    /// Boolean flag, arity 0.
    Switch,
    /// Flag followed by a single value.
    Value(ValueKind),
    /// Group of positional tokens, fixed or variable arity.
    Positional,
}

/// Immutable specification of one recognized argument.
///
/// Use the constructors [`command`](Self::command), [`switch`](Self::switch),
/// [`value`](Self::value) and [`positional`](Self::positional), then chain
/// [`with_alias`](Self::with_alias) and friends.
///
/// # Examples
///
/// ```
/// use wperf_args_core::ArgDescriptor;
///
/// let verbose = ArgDescriptor::switch("--verbose")
///     .with_alias("-v")
///     .with_description("Enable verbose output also in JSON output.");
/// assert!(verbose.matches("-v"));
/// assert!(verbose.matches("--verbose"));
/// assert!(!verbose.matches("--verb"));
/// ```
#[derive(Debug, Clone)]
pub struct ArgDescriptor {
    name: String,
    aliases: Vec<String>,
    description: String,
    kind: ArgKind,
    arity: Arity,
    validators: Vec<Validator>,
}

/// Values consumed by a successful [`ArgDescriptor::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArg {
    /// Canonical name of the matched descriptor.
    pub name: String,
    /// Value tokens, in order.
    pub values: Vec<String>,
}

impl ParsedArg {
    /// Number of tokens consumed from the stream, including the matched one.
    pub fn consumed(&self) -> usize {
        self.values.len() + 1
    }
}

impl ArgDescriptor {
    fn new(name: &str, kind: ArgKind, arity: Arity) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            description: String::new(),
            kind,
            arity,
            validators: Vec::new(),
        }
    }

    /// Creates a command descriptor with arity 0.
    pub fn command(name: &str, tag: CommandTag) -> Self {
        Self::new(name, ArgKind::Command(tag), Arity::Fixed(0))
    }

    /// Creates a boolean flag.
    pub fn switch(name: &str) -> Self {
        Self::new(name, ArgKind::Switch, Arity::Fixed(0))
    }

    /// Creates a flag that takes exactly one value.
    pub fn value(name: &str, kind: ValueKind) -> Self {
        Self::new(name, ArgKind::Value(kind), Arity::Fixed(1))
    }

    /// Creates a positional group.
    pub fn positional(name: &str, arity: Arity) -> Self {
        Self::new(name, ArgKind::Positional, arity)
    }

    /// Adds an alias. Order is display priority.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Sets the human description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Adds a validator applied to every value token.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Overrides the arity. Commands only accept 0 or 1.
    pub fn with_arity(mut self, arity: Arity) -> Self {
        debug_assert!(
            !matches!(self.kind, ArgKind::Command(_)) || matches!(arity, Arity::Fixed(0 | 1)),
            "command descriptors take at most one value"
        );
        self.arity = arity;
        self
    }

    /// Canonical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Aliases in display order.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Human description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Kind-specific payload.
    pub fn kind(&self) -> ArgKind {
        self.kind
    }

    /// Declared arity.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Command tag, for command descriptors.
    pub fn command_tag(&self) -> Option<CommandTag> {
        match self.kind {
            ArgKind::Command(tag) => Some(tag),
            _ => None,
        }
    }

    /// Returns `true` iff `token` is non-empty and equals the name or an alias.
    pub fn matches(&self, token: &str) -> bool {
        !token.is_empty() && (token == self.name || self.aliases.iter().any(|a| a == token))
    }

    /// Tries to consume this descriptor from the head of `tokens`.
    ///
    /// Returns `Ok(None)` without inspecting further when `tokens` is empty
    /// or its head does not match. Otherwise returns the value tokens
    /// following the match, after running every validator over each of them.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::InsufficientArguments`] when fewer tokens
    /// than the arity remain, and [`DescriptorError::InvalidValue`] when a
    /// validator rejects a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use wperf_args_core::{ArgDescriptor, Arity};
    ///
    /// let rest = ArgDescriptor::positional("--", Arity::Variable);
    /// let tokens: Vec<String> = ["--", "app.exe", "-x"].iter().map(|s| s.to_string()).collect();
    /// let parsed = rest.parse(&tokens).unwrap().unwrap();
    /// assert_eq!(parsed.values, ["app.exe", "-x"]);
    /// ```
    pub fn parse(&self, tokens: &[String]) -> Result<Option<ParsedArg>, DescriptorError> {
        let Some(head) = tokens.first() else {
            return Ok(None);
        };
        if !self.matches(head) {
            return Ok(None);
        }

        let available = tokens.len() - 1;
        let arity = match self.arity {
            Arity::Fixed(n) => n,
            Arity::Variable => available,
        };
        if available < arity {
            return Err(DescriptorError::InsufficientArguments {
                expected: arity,
                found: available,
            });
        }

        let mut values = Vec::with_capacity(arity);
        for value in &tokens[1..=arity] {
            if !self.validators.iter().all(|validate| validate(value)) {
                return Err(DescriptorError::InvalidValue(value.clone()));
            }
            values.push(value.clone());
        }

        Ok(Some(ParsedArg {
            name: self.name.clone(),
            values,
        }))
    }
}

/// Accepts non-empty strings of ASCII digits.
pub fn is_unsigned_integer(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Accepts any non-empty string.
pub fn is_non_empty(value: &str) -> bool {
    !value.is_empty()
}
