//! Process-wide descriptor tables and per-command grammar selection.
//!
//! The tables are built once and never mutated. [`Grammar::for_command`]
//! decides which of them are active for a given command tag.

use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;

use crate::descriptor::{ArgDescriptor, Arity, ValueKind, is_non_empty, is_unsigned_integer};

/// Command selected by the first token of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommandTag {
    /// Count events.
    Stat,
    /// Sample a running process.
    Sample,
    /// Spawn a process and sample it.
    Record,
    /// Self-test the driver configuration.
    Test,
    /// Detect attached devices.
    Detect,
    /// Print help.
    Help,
    /// Print the version.
    Version,
    /// List supported events and metrics.
    List,
    /// Describe an event or metric.
    Man,
    /// Sample with the statistical profiling extension.
    Spe,
    /// Count repeatedly and record a timeline.
    Timeline,
    /// No command selected yet.
    #[default]
    NoCommand,
}

impl CommandTag {
    /// Commands that accept nothing beyond the global flags.
    pub fn takes_no_arguments(self) -> bool {
        matches!(
            self,
            Self::Help | Self::Version | Self::List | Self::Detect | Self::Test
        )
    }

    /// Commands that enable the sampling sub-grammar.
    pub fn enables_sampling(self) -> bool {
        matches!(self, Self::Sample | Self::Record | Self::Timeline | Self::Spe)
    }

    /// Commands that enable the counting sub-grammar.
    pub fn enables_counting(self) -> bool {
        matches!(self, Self::Stat)
    }

    /// Commands allowed to spawn a process after `--`.
    pub fn supports_spawn(self) -> bool {
        matches!(self, Self::Record | Self::Stat | Self::Timeline | Self::Spe)
    }

    /// Lowercase command name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stat => "stat",
            Self::Sample => "sample",
            Self::Record => "record",
            Self::Test => "test",
            Self::Detect => "detect",
            Self::Help => "help",
            Self::Version => "version",
            Self::List => "list",
            Self::Man => "man",
            Self::Spe => "spe",
            Self::Timeline => "timeline",
            Self::NoCommand => "no_command",
        }
    }
}

impl fmt::Display for CommandTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical names of every registered flag.
pub mod names {
    pub const JSON: &str = "--json";
    pub const VERBOSE: &str = "--verbose";
    pub const FORCE_LOCK: &str = "--force-lock";

    pub const ANNOTATE: &str = "--annotate";
    pub const KERNEL: &str = "-k";
    pub const SAMPLE_DISPLAY_LONG: &str = "--sample-display-long";
    pub const QUIET: &str = "-q";
    pub const DISASSEMBLE: &str = "--disassemble";

    pub const CORES: &str = "-c";
    pub const TIMEOUT: &str = "--timeout";
    pub const SYMBOL: &str = "--symbol";
    pub const RECORD_SPAWN_DELAY: &str = "--record_spawn_delay";
    pub const SAMPLE_DISPLAY_ROW: &str = "--sample-display-row";
    pub const PE_FILE: &str = "--pe_file";
    pub const PDB_FILE: &str = "--pdb_file";
    pub const IMAGE_NAME: &str = "--image_name";
    pub const EVENTS: &str = "-e";
    pub const METRICS: &str = "-m";
    pub const METRIC_CONFIG: &str = "-C";
    pub const EVENT_CONFIG: &str = "-E";
    pub const OUTPUT: &str = "--output";
    pub const OUTPUT_CSV: &str = "--output-csv";
    pub const OUTPUT_PREFIX: &str = "--output-prefix";
    pub const CONFIG: &str = "--config";
    pub const INTERVAL: &str = "-i";
    pub const DMC: &str = "--dmc";

    pub const SEPARATOR: &str = "--";
    pub const MAN_QUERY: &str = "man";
}

/// Every registered descriptor, grouped by where it is legal.
#[derive(Debug)]
pub struct Registry {
    /// Command descriptors in matching order.
    pub commands: Vec<ArgDescriptor>,
    /// Flags legal under every command.
    pub global: Vec<ArgDescriptor>,
    /// Flags legal under sampling commands.
    pub sampling: Vec<ArgDescriptor>,
    /// Flags legal under counting commands.
    pub counting: Vec<ArgDescriptor>,
    /// The `--` passthrough separator.
    pub separator: ArgDescriptor,
}

impl Registry {
    /// Finds any registered descriptor by canonical name or alias.
    pub fn find(&self, token: &str) -> Option<&ArgDescriptor> {
        self.commands
            .iter()
            .chain(&self.global)
            .chain(&self.sampling)
            .chain(&self.counting)
            .chain(std::iter::once(&self.separator))
            .find(|d| d.matches(token))
    }
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(build_registry);

/// Returns the process-wide descriptor registry.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

fn build_registry() -> Registry {
    use names::*;

    let commands = vec![
        ArgDescriptor::command("stat", CommandTag::Stat)
            .with_description("Count events. If no events are specified, a default set is counted."),
        ArgDescriptor::command("sample", CommandTag::Sample)
            .with_description("Sample a running process and report hot functions."),
        ArgDescriptor::command("record", CommandTag::Record)
            .with_description("Spawn a process and sample it, same as `sample` plus process spawn."),
        ArgDescriptor::command("timeline", CommandTag::Timeline)
            .with_description("Count events at fixed intervals and store a timeline."),
        ArgDescriptor::command("spe", CommandTag::Spe)
            .with_description("Sample with the Arm statistical profiling extension."),
        ArgDescriptor::command("test", CommandTag::Test)
            .with_description("Configuration information about driver and application."),
        ArgDescriptor::command("detect", CommandTag::Detect)
            .with_description("List installed devices."),
        ArgDescriptor::command("list", CommandTag::List)
            .with_alias("-l")
            .with_description("List supported events and metrics."),
        ArgDescriptor::command(MAN_QUERY, CommandTag::Man)
            .with_arity(Arity::Fixed(1))
            .with_validator(is_non_empty)
            .with_description("Plain text information about one or more events, metrics or groups."),
        ArgDescriptor::command("help", CommandTag::Help)
            .with_alias("-h")
            .with_alias("--help")
            .with_description("Run wperf help command."),
        ArgDescriptor::command("version", CommandTag::Version)
            .with_alias("--version")
            .with_description("Display version."),
    ];

    let global = vec![
        ArgDescriptor::switch(JSON).with_description("Define output type as JSON."),
        ArgDescriptor::switch(VERBOSE)
            .with_alias("-v")
            .with_description("Enable verbose output also in JSON output."),
        ArgDescriptor::switch(FORCE_LOCK).with_description(
            "Force driver to give lock to current `wperf` process, use when you want\n\
             to interrupt currently executing `wperf` session or to recover from the lock.",
        ),
    ];

    let kernel = ArgDescriptor::switch(KERNEL)
        .with_alias("--k")
        .with_description("Count kernel mode as well (disabled by default).");
    let quiet = ArgDescriptor::switch(QUIET).with_description("Quiet mode, no output is produced.");
    let cores = ArgDescriptor::value(CORES, ValueKind::CoreList)
        .with_alias("--cores")
        .with_description("Specify comma separated list of CPU cores, and or ranges of CPU cores.");
    let timeout = ArgDescriptor::value(TIMEOUT, ValueKind::Duration)
        .with_description("Count or sample for this many seconds. Units ms, s, m, h and d are accepted.");
    let interval = ArgDescriptor::value(INTERVAL, ValueKind::Duration)
        .with_description("Interval between counting sessions.");
    let events = ArgDescriptor::value(EVENTS, ValueKind::Text)
        .with_validator(is_non_empty)
        .with_description("Specify comma separated list of event names (or raw events) to count.");
    let metrics = ArgDescriptor::value(METRICS, ValueKind::Text)
        .with_validator(is_non_empty)
        .with_description("Specify comma separated list of metrics to count.");
    let metric_config = ArgDescriptor::value(METRIC_CONFIG, ValueKind::File)
        .with_description("Provide customized config file which describes metrics.");
    let event_config = ArgDescriptor::value(EVENT_CONFIG, ValueKind::File)
        .with_description("Provide customized config file which describes custom events.");
    let output = ArgDescriptor::value(OUTPUT, ValueKind::Text)
        .with_alias("-o")
        .with_validator(is_non_empty)
        .with_description("Output filename.");
    let output_csv = ArgDescriptor::value(OUTPUT_CSV, ValueKind::Text)
        .with_validator(is_non_empty)
        .with_description("Output filename for CSV data.");
    let output_prefix = ArgDescriptor::value(OUTPUT_PREFIX, ValueKind::Text)
        .with_alias("--cwd")
        .with_validator(is_non_empty)
        .with_description("Set current working dir for storing output files.");
    let config = ArgDescriptor::value(CONFIG, ValueKind::Text)
        .with_validator(is_non_empty)
        .with_description("Specify configuration parameters.");
    let dmc = ArgDescriptor::value(DMC, ValueKind::Count)
        .with_validator(is_unsigned_integer)
        .with_description("Profile on the specified DDR controller.");

    let sampling = vec![
        ArgDescriptor::switch(ANNOTATE).with_description(
            "Enable translating addresses taken from samples in sample/record mode into source code line numbers.",
        ),
        kernel.clone(),
        ArgDescriptor::switch(SAMPLE_DISPLAY_LONG).with_description("Display decorated symbol names."),
        quiet.clone(),
        ArgDescriptor::switch(DISASSEMBLE)
            .with_description("Enable disassemble output on sampling mode. Implies 'annotate'."),
        cores.clone(),
        timeout.clone(),
        ArgDescriptor::value(SYMBOL, ValueKind::Text)
            .with_alias("-s")
            .with_validator(is_non_empty)
            .with_description("Filter results for specific symbols."),
        ArgDescriptor::value(RECORD_SPAWN_DELAY, ValueKind::Count)
            .with_validator(is_unsigned_integer)
            .with_description("Set the waiting time, in milliseconds, before reading process data after spawning it."),
        ArgDescriptor::value(SAMPLE_DISPLAY_ROW, ValueKind::Count)
            .with_validator(is_unsigned_integer)
            .with_description("Set how many samples you want to see in the summary."),
        ArgDescriptor::value(PE_FILE, ValueKind::File)
            .with_description("Specify the PE filename (and path)."),
        ArgDescriptor::value(PDB_FILE, ValueKind::File)
            .with_description("Specify the PDB filename (and path)."),
        ArgDescriptor::value(IMAGE_NAME, ValueKind::Text)
            .with_validator(is_non_empty)
            .with_description("Specify the image name you want to sample."),
        events.clone(),
        metrics.clone(),
        metric_config.clone(),
        event_config.clone(),
        output.clone(),
        output_csv.clone(),
        output_prefix.clone(),
        config.clone(),
        interval.clone(),
        dmc.clone(),
    ];

    let counting = vec![
        kernel,
        quiet,
        cores,
        timeout,
        interval,
        events,
        metrics,
        metric_config,
        event_config,
        output,
        output_csv,
        output_prefix,
        config,
        dmc,
    ];

    let separator = ArgDescriptor::positional(SEPARATOR, Arity::Variable).with_description(
        "Process name is defined by COMMAND. User can pass verbatim arguments to the process with [ARGS].",
    );

    Registry {
        commands,
        global,
        sampling,
        counting,
        separator,
    }
}

/// Descriptor subset enabled for one command.
#[derive(Debug, Clone, Copy)]
pub struct Grammar {
    /// Command-specific flags tried before the separator.
    pub command_flags: &'static [ArgDescriptor],
    /// Whether the separator is tried at all.
    pub accepts_separator: bool,
    /// Flags tried last on every pass.
    pub global_flags: &'static [ArgDescriptor],
}

impl Grammar {
    /// Selects the enabled descriptors for `command`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wperf_args_core::{CommandTag, Grammar};
    ///
    /// assert!(Grammar::for_command(CommandTag::Test).command_flags.is_empty());
    /// assert!(!Grammar::for_command(CommandTag::Test).accepts_separator);
    /// assert!(!Grammar::for_command(CommandTag::Sample).command_flags.is_empty());
    /// ```
    pub fn for_command(command: CommandTag) -> Self {
        let registry = registry();
        let no_flags: &'static [ArgDescriptor] = &[];

        if command.takes_no_arguments() {
            return Self {
                command_flags: no_flags,
                accepts_separator: false,
                global_flags: &registry.global,
            };
        }

        let command_flags: &'static [ArgDescriptor] = if command.enables_sampling() {
            &registry.sampling
        } else if command.enables_counting() {
            &registry.counting
        } else {
            no_flags
        };

        Self {
            command_flags,
            accepts_separator: true,
            global_flags: &registry.global,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn all_tokens(descriptors: &[ArgDescriptor]) -> Vec<&str> {
        descriptors
            .iter()
            .flat_map(|d| std::iter::once(d.name()).chain(d.aliases().iter().map(String::as_str)))
            .collect()
    }

    #[test]
    fn test_command_tokens_are_unique() {
        let tokens = all_tokens(&registry().commands);
        let unique: HashSet<&str> = tokens.iter().copied().collect();
        assert_eq!(tokens.len(), unique.len());
    }

    #[test]
    fn test_flag_groups_have_unique_tokens() {
        for group in [&registry().sampling, &registry().counting] {
            let mut tokens = all_tokens(group);
            tokens.extend(all_tokens(&registry().global));
            let unique: HashSet<&str> = tokens.iter().copied().collect();
            assert_eq!(tokens.len(), unique.len());
        }
    }

    #[test]
    fn test_every_command_tag_is_reachable() {
        let tags: HashSet<CommandTag> = registry()
            .commands
            .iter()
            .filter_map(ArgDescriptor::command_tag)
            .collect();
        assert_eq!(tags.len(), 11);
        assert!(!tags.contains(&CommandTag::NoCommand));
    }

    #[test]
    fn test_find_by_alias() {
        let registry = registry();
        assert_eq!(registry.find("--help").map(ArgDescriptor::name), Some("help"));
        assert_eq!(registry.find("--cwd").map(ArgDescriptor::name), Some(names::OUTPUT_PREFIX));
        assert_eq!(registry.find("--").map(ArgDescriptor::name), Some(names::SEPARATOR));
        assert!(registry.find("--bogus").is_none());
    }

    #[test]
    fn test_grammar_selection() {
        let test = Grammar::for_command(CommandTag::Test);
        assert!(test.command_flags.is_empty());
        assert!(!test.accepts_separator);
        assert_eq!(test.global_flags.len(), 3);

        let record = Grammar::for_command(CommandTag::Record);
        assert!(record.command_flags.iter().any(|d| d.matches("--annotate")));
        assert!(record.accepts_separator);

        let stat = Grammar::for_command(CommandTag::Stat);
        assert!(stat.command_flags.iter().any(|d| d.matches("-e")));
        assert!(!stat.command_flags.iter().any(|d| d.matches("--annotate")));

        let man = Grammar::for_command(CommandTag::Man);
        assert!(man.command_flags.is_empty());
        assert!(man.accepts_separator);
    }

    #[test]
    fn test_spawn_support() {
        for tag in [CommandTag::Record, CommandTag::Stat, CommandTag::Timeline, CommandTag::Spe] {
            assert!(tag.supports_spawn(), "{tag}");
        }
        for tag in [CommandTag::Sample, CommandTag::Man, CommandTag::Test] {
            assert!(!tag.supports_spawn(), "{tag}");
        }
    }
}
