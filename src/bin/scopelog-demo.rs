#![deny(unsafe_code)]

//! Walkthrough of the logging crate: default routing, pushed contexts, an
//! in-memory sink, a custom formatter, and an optional failing assertion.

use std::ffi::OsString;
use std::fmt::{self, Write as _};
use std::process::ExitCode;
use std::{env, io};

use clap::{Arg, ArgAction, Command};
use logging::{
    BoundedWriter, ContextInfo, Level, LogConfig, SourceLocation, assert_log, debug_log,
    error_log, info_log, ring_buffer_sink, scoped_log, stdout_sink, trace_log, warn_log,
};

/// Parsed command line.
#[derive(Debug, Default)]
struct DemoArgs {
    level: Option<Level>,
    trigger_assert: bool,
    no_asserts: bool,
}

fn clap_command() -> Command {
    Command::new("scopelog-demo")
        .about("Exercise scoped logging contexts, sinks, and formatters.")
        .arg(
            Arg::new("level")
                .long("level")
                .value_name("LEVEL")
                .help("Global minimum level (trace, debug, info, warn, error, panic).")
                .value_parser(|value: &str| value.parse::<Level>())
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("assert")
                .long("assert")
                .help("Run the assertion section, which fails and aborts.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-asserts")
                .long("no-asserts")
                .help("Disable assertion evaluation.")
                .action(ArgAction::SetTrue),
        )
}

fn parse_args<I, S>(arguments: I) -> Result<DemoArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let mut matches = clap_command().try_get_matches_from(arguments)?;
    Ok(DemoArgs {
        level: matches.remove_one::<Level>("level"),
        trigger_assert: matches.get_flag("assert"),
        no_asserts: matches.get_flag("no-asserts"),
    })
}

/// Upper-cases the rendered message and wraps it as `|<level>| - MESSAGE!!!`.
fn screaming_formatter(
    buf: &mut [u8],
    _context: &ContextInfo,
    level: Level,
    _location: SourceLocation,
    args: fmt::Arguments<'_>,
) -> usize {
    let mut out = BoundedWriter::new(buf);
    let _ = write!(out, "|{level}| - ");
    let _ = write!(out, "{}", args.to_string().to_ascii_uppercase());
    let _ = out.write_str("!!!");
    out.written()
}

fn other_api(x: i32) -> i32 {
    let function = logging::location!().function;
    trace_log!("Entering '{}'", function.rsplit("::").next().unwrap_or(function));
    debug_log!("Got parameter {x}");
    info_log!("Hello from other_api");
    warn_log!("This api is under construction");
    0
}

fn banner(title: &str) {
    println!("\n{:-^100}", format!(" {title} "));
}

fn run(args: &DemoArgs) {
    banner("DEFAULT LOGGING");
    info_log!("Hello world from main!");
    // Below the default minimum level.
    debug_log!("This is a showcase of the logging capabilities");

    banner("PUSH CONFIGURABLE LOGGERS");
    {
        let _log = scoped_log!(
            level = Level::Trace,
            sinks[Level::Warn] = stdout_sink(),
            sinks[Level::Error] = stdout_sink(),
        );
        let result = other_api(10);
        error_log!("Got {result} from {}", "other_api");
    }
    error_log!("Am now using defaults!");

    banner("MEMORY SINK");
    let memory = ring_buffer_sink(1024);
    {
        let _log = scoped_log!(
            name = "memory_sink_for_warn_and_error",
            level = Level::Trace,
            sinks[Level::Warn] = memory.clone(),
            sinks[Level::Error] = memory.clone(),
        );
        let dump = || {
            println!(
                ">>> Memory sink contains\n{}<<<",
                String::from_utf8_lossy(&memory.contents())
            );
        };
        dump();
        let result = other_api(10);
        dump();
        error_log!("Got this '{result}'");
        dump();
    }

    banner("CUSTOM FORMATTER");
    {
        let _log = scoped_log!(name = "custom_formatter", formatter = screaming_formatter);
        let result = other_api(10);
        error_log!("Got {result} from {}", "other_api");
    }

    if args.trigger_assert {
        banner("ASSERTIONS");
        let a = 10;
        let b = 0;
        assert_log!(a == b, "Whoops, lhs={a} and rhs={b}");
        info_log!("Assertions are disabled; execution continues.");
    }
}

fn main() -> ExitCode {
    let args = match parse_args(env::args_os()) {
        Ok(args) => args,
        Err(error) => {
            let _ = error.print();
            return ExitCode::from(u8::try_from(error.exit_code()).unwrap_or(2));
        }
    };

    let mut config = match LogConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            use io::Write as _;
            let _ = writeln!(io::stderr(), "scopelog-demo: {error}");
            return ExitCode::from(2);
        }
    };
    if let Some(level) = args.level {
        config = config.level(level);
    }
    if args.no_asserts {
        config = config.disable_asserts(true);
    }
    logging::init(config);

    run(&args);
    ExitCode::SUCCESS
}
