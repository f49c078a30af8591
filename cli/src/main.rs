use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use wperf_args_core::{
    ArgDescriptor, ArgKind, ArgParser, Arity, CommandTag, FileProbe, Grammar, KnownFiles,
    ParserConfig, RealFileSystem, registry,
};

/// Output format for printed results.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "wperf-args")]
#[command(about = "Validate wperf command lines and print the resolved arguments")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a wperf argument list and print the resolved invocation.
    Parse(ParseArgs),
    /// Print the default parser configuration.
    Config(ConfigArgs),
    /// List the arguments accepted by a wperf command.
    Grammar(GrammarArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// YAML parser configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
    /// Treat only these paths as existing instead of checking the filesystem.
    #[arg(long = "existing")]
    existing: Vec<String>,
    /// The wperf arguments, without the program name. Pass them after `--`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct ConfigArgs {
    /// Output format.
    #[arg(long, value_enum, default_value = "yaml")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct GrammarArgs {
    /// Command name or alias, e.g. `record` or `--help`.
    name: String,
    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

/// Printable summary of one descriptor.
#[derive(Debug, Serialize)]
struct DescriptorSummary<'a> {
    name: &'a str,
    aliases: &'a [String],
    description: &'a str,
    takes_value: bool,
}

impl<'a> From<&'a ArgDescriptor> for DescriptorSummary<'a> {
    fn from(descriptor: &'a ArgDescriptor) -> Self {
        Self {
            name: descriptor.name(),
            aliases: descriptor.aliases(),
            description: descriptor.description(),
            takes_value: matches!(descriptor.kind(), ArgKind::Value(_))
                || descriptor.arity() != Arity::Fixed(0),
        }
    }
}

#[derive(Debug, Serialize)]
struct GrammarSummary<'a> {
    command: CommandTag,
    arguments: Vec<DescriptorSummary<'a>>,
    accepts_separator: bool,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Config(args) => run_config(args),
        Command::Grammar(args) => run_grammar(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => ParserConfig::load(path)
            .map_err(|e| format!("failed to load config '{}': {e}", path.display()))?,
        None => ParserConfig::default(),
    };
    let parser = ArgParser::new(config).map_err(|e| format!("invalid config: {e}"))?;

    if args.existing.is_empty() {
        parse_and_print(&parser.with_file_probe(RealFileSystem), &args.args, args.format)
    } else {
        let probe = KnownFiles::new(args.existing.iter().cloned());
        parse_and_print(&parser.with_file_probe(probe), &args.args, args.format)
    }
}

fn parse_and_print<P: FileProbe>(
    parser: &ArgParser<P>,
    args: &[String],
    format: OutputFormat,
) -> Result<(), String> {
    match parser.parse(args) {
        Ok(invocation) => print_value(&invocation, format),
        Err(err) => {
            eprint!("{}", err.diagnostic);
            Err(err.to_string())
        }
    }
}

fn run_config(args: ConfigArgs) -> Result<(), String> {
    print_value(&ParserConfig::default(), args.format)
}

fn run_grammar(args: GrammarArgs) -> Result<(), String> {
    let Some(tag) = registry().find(&args.name).and_then(ArgDescriptor::command_tag)
    else {
        return Err(format!("unknown command: {}", args.name));
    };

    let grammar = Grammar::for_command(tag);
    let mut arguments: Vec<DescriptorSummary<'_>> =
        grammar.command_flags.iter().map(DescriptorSummary::from).collect();
    arguments.extend(grammar.global_flags.iter().map(DescriptorSummary::from));
    if grammar.accepts_separator && tag.supports_spawn() {
        arguments.push(DescriptorSummary::from(&registry().separator));
    }

    let summary = GrammarSummary {
        command: tag,
        arguments,
        accepts_separator: grammar.accepts_separator && tag.supports_spawn(),
    };
    print_value(&summary, args.format)
}

fn print_value<T: Serialize>(value: &T, format: OutputFormat) -> Result<(), String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("failed to serialize output: {e}"))?,
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("failed to serialize output: {e}"))?
        }
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
