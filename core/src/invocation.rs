//! The structured result of a successful parse.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::registry::{CommandTag, names};

/// A resolved argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// A boolean flag that was present.
    Switch(bool),
    /// A verbatim string or checked path.
    Text(String),
    /// A duration converted to seconds.
    Seconds(f64),
    /// An unsigned integer.
    Count(u64),
    /// A list of integers, e.g. cores.
    IntList(Vec<u32>),
}

/// Command line forwarded verbatim after `--`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Passthrough {
    /// All tokens after the separator, space-joined.
    pub command_line: String,
    /// The first token after the separator.
    pub executable: String,
}

/// Validated invocation: the selected command and every resolved value.
///
/// Values are keyed by the canonical descriptor name (see
/// [`names`](crate::registry::names)). The typed accessors cover the common
/// lookups.
///
/// # Examples
///
/// ```
/// use wperf_args_core::ArgParser;
///
/// let parser = ArgParser::default();
/// let invocation = parser.parse(["sample", "--timeout", "2m"]).unwrap();
/// assert_eq!(invocation.timeout(), Some(120.0));
/// assert!(!invocation.verbose());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invocation {
    /// The selected command.
    pub command: CommandTag,
    /// Resolved values keyed by canonical descriptor name.
    pub values: BTreeMap<String, ArgValue>,
    /// Present only when `--` was used.
    pub passthrough: Option<Passthrough>,
}

impl Invocation {
    pub(crate) fn new(command: CommandTag) -> Self {
        Self {
            command,
            values: BTreeMap::new(),
            passthrough: None,
        }
    }

    pub(crate) fn set(&mut self, name: &str, value: ArgValue) {
        self.values.insert(name.to_string(), value);
    }

    /// Returns the value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// Returns `true` if a value is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns `true` if the boolean flag `name` was given.
    pub fn switch(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(ArgValue::Switch(true)))
    }

    /// Returns the string stored under `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Returns the duration in seconds stored under `name`.
    pub fn seconds(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(ArgValue::Seconds(seconds)) => Some(*seconds),
            _ => None,
        }
    }

    /// Returns the integer stored under `name`.
    pub fn count(&self, name: &str) -> Option<u64> {
        match self.values.get(name) {
            Some(ArgValue::Count(count)) => Some(*count),
            _ => None,
        }
    }

    /// Returns the integer list stored under `name`.
    pub fn int_list(&self, name: &str) -> Option<&[u32]> {
        match self.values.get(name) {
            Some(ArgValue::IntList(list)) => Some(list),
            _ => None,
        }
    }

    /// `--verbose` / `-v`.
    pub fn verbose(&self) -> bool {
        self.switch(names::VERBOSE)
    }

    /// `--json` output requested.
    pub fn json(&self) -> bool {
        self.switch(names::JSON)
    }

    /// `--force-lock` given.
    pub fn force_lock(&self) -> bool {
        self.switch(names::FORCE_LOCK)
    }

    /// `-q` given.
    pub fn quiet(&self) -> bool {
        self.switch(names::QUIET)
    }

    /// Kernel-mode events requested with `-k`.
    pub fn kernel(&self) -> bool {
        self.switch(names::KERNEL)
    }

    /// `--annotate`, also set by `--disassemble`.
    pub fn annotate(&self) -> bool {
        self.switch(names::ANNOTATE)
    }

    /// `--disassemble` given.
    pub fn disassemble(&self) -> bool {
        self.switch(names::DISASSEMBLE)
    }

    /// Cores selected with `-c`, empty when not given.
    pub fn cores(&self) -> &[u32] {
        self.int_list(names::CORES).unwrap_or_default()
    }

    /// `--timeout` in seconds.
    pub fn timeout(&self) -> Option<f64> {
        self.seconds(names::TIMEOUT)
    }

    /// `-i` in seconds.
    pub fn interval(&self) -> Option<f64> {
        self.seconds(names::INTERVAL)
    }

    /// Symbol filter from `--symbol`.
    pub fn symbol(&self) -> Option<&str> {
        self.text(names::SYMBOL)
    }

    /// Explicit `--pe_file`, or the executable after `--`.
    pub fn pe_file(&self) -> Option<&str> {
        self.text(names::PE_FILE)
    }

    /// Explicit `--pdb_file`, or the one derived from the executable.
    pub fn pdb_file(&self) -> Option<&str> {
        self.text(names::PDB_FILE)
    }

    /// Explicit `--image_name`, or the executable's file name.
    pub fn image_name(&self) -> Option<&str> {
        self.text(names::IMAGE_NAME)
    }

    /// Delay before sampling a spawned process, in milliseconds.
    pub fn record_spawn_delay_ms(&self) -> Option<u64> {
        self.count(names::RECORD_SPAWN_DELAY)
    }

    /// Number of sample rows to display.
    pub fn sample_display_row(&self) -> Option<u64> {
        self.count(names::SAMPLE_DISPLAY_ROW)
    }

    /// Query passed to `man`.
    pub fn man_query(&self) -> Option<&str> {
        self.text(names::MAN_QUERY)
    }

    /// Verbatim command line forwarded after `--`.
    pub fn record_commandline(&self) -> Option<&str> {
        self.passthrough.as_ref().map(|p| p.command_line.as_str())
    }
}
