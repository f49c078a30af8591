use wperf_args_core::{
    ArgParser, ArgValue, CommandTag, KnownFiles, ParseErrorKind, ParserConfig, registry,
};

fn parser() -> ArgParser<KnownFiles> {
    ArgParser::default().with_file_probe(KnownFiles::new([
        "C:\\Program\\sample.exe",
        "C:\\Program\\sample.pdb",
        "metrics.csv",
    ]))
}

// ---------------------------------------------------------------------------
// Command selection
// ---------------------------------------------------------------------------

#[test]
fn test_every_command_token_selects_its_tag() {
    let parser = parser();
    for descriptor in &registry().commands {
        let expected = descriptor.command_tag().expect("command descriptor");
        let tokens = std::iter::once(descriptor.name()).chain(descriptor.aliases().iter().map(String::as_str));
        for token in tokens {
            let mut args = vec![token.to_string()];
            match expected {
                CommandTag::Man => args.push("ld_spec".to_string()),
                CommandTag::Record => args.extend(["--".to_string(), "app.exe".to_string()]),
                _ => {}
            }
            let invocation = parser
                .parse(&args)
                .unwrap_or_else(|err| panic!("{token}: {err}"));
            assert_eq!(invocation.command, expected, "token {token}");
        }
    }
}

#[test]
fn test_empty_input_fails() {
    let err = parser().parse(Vec::<String>::new()).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NoCommandProvided);
}

#[test]
fn test_test_command_with_globals() {
    let invocation = parser().parse(["test", "-v", "--json"]).unwrap();

    assert_eq!(invocation.command, CommandTag::Test);
    assert!(invocation.verbose());
    assert!(invocation.json());
    assert!(!invocation.force_lock());
}

#[test]
fn test_random_argument_rejected() {
    let err = parser().parse(["test", "-v", "--json", "random"]).unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::UnrecognizedArgument);
    assert_eq!(err.token, "random");
    assert_eq!(err.diagnostic.command_line, "wperf test -v --json random");
    assert_eq!(err.diagnostic.indicator, format!("{}^", "~".repeat(21)));
}

// ---------------------------------------------------------------------------
// Timeouts
// ---------------------------------------------------------------------------

#[test]
fn test_timeout_minutes() {
    let invocation = parser().parse(["sample", "--timeout", "2m"]).unwrap();
    assert_eq!(invocation.timeout(), Some(120.0));
}

#[test]
fn test_timeout_without_unit_is_seconds() {
    let invocation = parser().parse(["stat", "--timeout", "7.25"]).unwrap();
    assert_eq!(invocation.timeout(), Some(7.25));
}

#[test]
fn test_timeout_bad_unit() {
    let err = parser().parse(["sample", "--timeout", "5x"]).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidFlagValue);
    assert_eq!(err.token, "5x");
}

#[test]
fn test_timeout_split_across_tokens() {
    let err = parser().parse(["sample", "--timeout", "5.4", "ms"]).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnrecognizedArgument);
    assert_eq!(err.token, "ms");
}

#[test]
fn test_custom_unit_table() {
    let mut config = ParserConfig::default();
    config.time_units.insert("w".to_string(), 604800.0);
    let parser = ArgParser::new(config).unwrap();

    let invocation = parser.parse(["stat", "--timeout", "1w", "-i", "500ms"]).unwrap();
    assert_eq!(invocation.timeout(), Some(604800.0));
    assert_eq!(invocation.interval(), Some(0.5));
}

// ---------------------------------------------------------------------------
// Passthrough
// ---------------------------------------------------------------------------

#[test]
fn test_record_passthrough() {
    let invocation = parser()
        .parse(["record", "--", "notepad.exe", "test_arg"])
        .unwrap();

    let passthrough = invocation.passthrough.as_ref().expect("passthrough");
    assert_eq!(passthrough.command_line, "notepad.exe test_arg");
    assert_eq!(passthrough.executable, "notepad.exe");
    assert_eq!(invocation.pe_file(), Some("notepad.exe"));
    assert_eq!(invocation.pdb_file(), Some("notepad.pdb"));
    assert_eq!(invocation.image_name(), Some("notepad.exe"));
}

#[test]
fn test_passthrough_tokens_are_not_validated() {
    let invocation = parser()
        .parse(["record", "-v", "--", "app.exe", "--timeout", "5x", "--", "-v"])
        .unwrap();

    assert!(invocation.verbose());
    assert_eq!(invocation.timeout(), None);
    assert_eq!(
        invocation.record_commandline(),
        Some("app.exe --timeout 5x -- -v")
    );
}

#[test]
fn test_explicit_pe_and_pdb_are_kept() {
    let invocation = parser()
        .parse([
            "record",
            "--pe_file",
            "C:\\Program\\sample.exe",
            "--pdb_file",
            "C:\\Program\\sample.pdb",
            "--",
            "launcher.exe",
            "--run",
        ])
        .unwrap();

    assert_eq!(invocation.pe_file(), Some("C:\\Program\\sample.exe"));
    assert_eq!(invocation.pdb_file(), Some("C:\\Program\\sample.pdb"));
    assert_eq!(
        invocation.passthrough.as_ref().map(|p| p.executable.as_str()),
        Some("launcher.exe")
    );
}

#[test]
fn test_stat_can_spawn() {
    let invocation = parser()
        .parse(["stat", "-e", "inst_spec,vfp_spec", "--", "bench.exe"])
        .unwrap();
    assert_eq!(invocation.text("-e"), Some("inst_spec,vfp_spec"));
    assert_eq!(invocation.record_commandline(), Some("bench.exe"));
}

#[test]
fn test_separator_under_sample_is_rejected() {
    let err = parser().parse(["sample", "--", "app.exe"]).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnsupportedSeparatorContext);
}

// ---------------------------------------------------------------------------
// Core lists
// ---------------------------------------------------------------------------

#[test]
fn test_sample_allows_one_core() {
    let invocation = parser().parse(["sample", "-c", "3"]).unwrap();
    assert_eq!(invocation.cores(), [3]);

    let err = parser().parse(["sample", "--cores", "0,1"]).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TooManyValues { max: 1 });
    assert_eq!(
        err.diagnostic.hint.as_deref(),
        Some("Maximum number of cores allowed is 1")
    );
}

#[test]
fn test_stat_core_ranges() {
    let invocation = parser().parse(["stat", "-c", "5-2,8"]).unwrap();
    assert_eq!(invocation.cores(), [2, 3, 4, 5, 8]);
}

#[test]
fn test_core_list_bound_from_config() {
    let config = ParserConfig {
        count_max_cores: 4,
        ..ParserConfig::default()
    };
    let parser = ArgParser::new(config).unwrap();

    assert!(parser.parse(["stat", "-c", "0-3"]).is_ok());
    let err = parser.parse(["stat", "-c", "0-4"]).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TooManyValues { max: 4 });
}

#[test]
fn test_huge_core_range_hits_the_bound() {
    let err = parser().parse(["sample", "-c", "0-4294967295"]).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TooManyValues { max: 1 });
    assert_eq!(err.token, "0-4294967295");

    let err = parser().parse(["stat", "-c", "0-4294967295"]).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TooManyValues { max: 128 });
    assert_eq!(
        err.diagnostic.hint.as_deref(),
        Some("Maximum number of cores allowed is 128")
    );
}

#[test]
fn test_malformed_core_list() {
    let err = parser().parse(["stat", "-c", "1,x"]).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidFlagValue);
}

// ---------------------------------------------------------------------------
// Sampling sub-grammar
// ---------------------------------------------------------------------------

#[test]
fn test_full_sample_invocation() {
    let invocation = parser()
        .parse([
            "sample",
            "--annotate",
            "-k",
            "--sample-display-long",
            "-q",
            "-c",
            "2",
            "--timeout",
            "10s",
            "-s",
            "main",
            "--sample-display-row",
            "20",
            "--pe_file",
            "C:\\Program\\sample.exe",
            "--pdb_file",
            "C:\\Program\\sample.pdb",
            "--image_name",
            "sample.exe",
            "-e",
            "ld_spec:100000",
            "-o",
            "out.json",
            "--cwd",
            "results",
            "--json",
            "--force-lock",
        ])
        .unwrap();

    assert_eq!(invocation.command, CommandTag::Sample);
    assert!(invocation.annotate());
    assert!(invocation.kernel());
    assert!(invocation.quiet());
    assert!(invocation.switch("--sample-display-long"));
    assert_eq!(invocation.cores(), [2]);
    assert_eq!(invocation.timeout(), Some(10.0));
    assert_eq!(invocation.symbol(), Some("main"));
    assert_eq!(invocation.sample_display_row(), Some(20));
    assert_eq!(invocation.image_name(), Some("sample.exe"));
    assert_eq!(invocation.text("--output"), Some("out.json"));
    assert_eq!(invocation.text("--output-prefix"), Some("results"));
    assert!(invocation.json());
    assert!(invocation.force_lock());
}

#[test]
fn test_sampling_flags_rejected_under_stat() {
    let err = parser().parse(["stat", "--annotate"]).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnrecognizedArgument);
    assert_eq!(err.token, "--annotate");
}

#[test]
fn test_config_files_are_checked() {
    let invocation = parser().parse(["stat", "-C", "metrics.csv"]).unwrap();
    assert_eq!(invocation.get("-C"), Some(&ArgValue::Text("metrics.csv".to_string())));

    let err = parser().parse(["stat", "-E", "events.csv"]).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidFlagValue);
    assert_eq!(err.token, "events.csv");
}

#[test]
fn test_missing_value_points_past_end() {
    let err = parser().parse(["stat", "-e"]).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MissingFlagValue);
    assert_eq!(err.diagnostic.command_line, "wperf stat -e");
    assert_eq!(err.diagnostic.indicator, format!("{}^", "~".repeat(13)));
}

#[test]
fn test_program_name_from_config() {
    let config = ParserConfig {
        program_name: "wperf.exe".to_string(),
        ..ParserConfig::default()
    };
    let parser = ArgParser::new(config).unwrap();

    let err = parser.parse(["nope"]).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnrecognizedCommand);
    assert!(err.diagnostic.to_string().contains("wperf.exe nope\n"));
}
