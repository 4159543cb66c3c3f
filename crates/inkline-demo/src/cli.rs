#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually to keep the binary lean. Session settings also
//! honour the `INKLINE_*` variables read by `LiveConfig::from_env`.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
inkline demo: live regions redrawn in place

USAGE:
    inkline-demo [DEMO] [OPTIONS]

DEMOS:
    progress    Two concurrent tasks with fractional advances
    track       A bar driven by plain iteration
    status      Spinner with log events printed above it
    all         Every demo in turn (default)

OPTIONS:
    --refresh-hz=N   Refresh rate in Hz (default: 10)
    --stderr         Render on standard error instead of standard output
    --transient      Erase the live region when a demo ends
    --help, -h       Show this help message
    --version, -V    Show version

ENVIRONMENT VARIABLES:
    INKLINE_REFRESH_HZ, INKLINE_WIDTH, INKLINE_HEIGHT, INKLINE_TRANSIENT
                     Session overrides (flags win)
    INKLINE_LOG_FILE Write diagnostics to this file instead of stderr
    RUST_LOG         Diagnostic filter (default: warn)";

/// Which demo to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    Progress,
    Track,
    Status,
    All,
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    pub demo: Demo,
    /// Refresh rate override.
    pub refresh_hz: Option<f64>,
    /// Render on stderr.
    pub stderr: bool,
    pub transient: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            demo: Demo::All,
            refresh_hz: None,
            stderr: false,
            transient: false,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, PartialEq)]
pub enum Parsed {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse the process arguments, exiting on `--help`, `--version` or a
    /// bad argument.
    pub fn parse() -> Self {
        match parse_args(env::args().skip(1)) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("inkline-demo {VERSION}");
                process::exit(0);
            }
            Err(message) => {
                eprintln!("{message}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }
}

pub fn parse_args<I>(args: I) -> Result<Parsed, String>
where
    I: IntoIterator<Item = String>,
{
    let mut opts = Opts::default();
    let mut demo_seen = false;
    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Parsed::Help),
            "--version" | "-V" => return Ok(Parsed::Version),
            "--stderr" => opts.stderr = true,
            "--transient" => opts.transient = true,
            "progress" | "track" | "status" | "all" if !demo_seen => {
                demo_seen = true;
                opts.demo = match arg.as_str() {
                    "progress" => Demo::Progress,
                    "track" => Demo::Track,
                    "status" => Demo::Status,
                    _ => Demo::All,
                };
            }
            other => {
                let Some(val) = other.strip_prefix("--refresh-hz=") else {
                    return Err(format!("Unknown argument: {other}"));
                };
                match val.parse::<f64>() {
                    Ok(hz) if hz.is_finite() && hz > 0.0 => opts.refresh_hz = Some(hz),
                    _ => return Err(format!("Invalid --refresh-hz value: {val}")),
                }
            }
        }
    }
    Ok(Parsed::Run(opts))
}
