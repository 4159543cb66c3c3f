#![forbid(unsafe_code)]

//! inkline demo binary entry point.

mod cli;

use std::fs::File;
use std::io::Write;
use std::process;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use inkline::TaskSpec;
use inkline::prelude::*;
use inkline::runtime::progress::format_hms;
use tracing_subscriber::EnvFilter;

use crate::cli::{Demo, Opts};

fn main() {
    let opts = Opts::parse();
    init_logging(opts.stderr);
    if let Err(e) = run(&opts) {
        eprintln!("inkline-demo: {e}");
        process::exit(1);
    }
}

/// Diagnostics go to `INKLINE_LOG_FILE` when set, otherwise to stderr
/// unless stderr is the live stream.
fn init_logging(live_on_stderr: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    match std::env::var_os("INKLINE_LOG_FILE") {
        Some(path) => match File::create(&path) {
            Ok(file) => {
                let _ = builder.with_ansi(false).with_writer(Mutex::new(file)).try_init();
            }
            Err(e) => eprintln!("inkline-demo: cannot open log file: {e}"),
        },
        None if !live_on_stderr => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
        None => {}
    }
}

fn run(opts: &Opts) -> LiveResult<()> {
    let mut config = LiveConfig::from_env()?;
    if let Some(hz) = opts.refresh_hz {
        config = config.with_refresh_rate(hz);
    }
    if opts.transient {
        config.transient = true;
    }
    let streams = StreamRegistry::new();
    if opts.stderr {
        dispatch(opts.demo, &streams, &config, OutputStream::stderr)
    } else {
        dispatch(opts.demo, &streams, &config, OutputStream::stdout)
    }
}

fn dispatch<W>(
    demo: Demo,
    streams: &StreamRegistry,
    config: &LiveConfig,
    open: fn() -> OutputStream<W>,
) -> LiveResult<()>
where
    W: Write + Send + 'static,
{
    match demo {
        Demo::Progress => progress(streams, open(), config),
        Demo::Track => track(streams, open(), config),
        Demo::Status => status(streams, open(), config),
        Demo::All => {
            track(streams, open(), config)?;
            progress(streams, open(), config)?;
            status(streams, open(), config)
        }
    }
}

/// A bar driven by plain iteration.
fn track<W: Write + Send + 'static>(
    streams: &StreamRegistry,
    stream: OutputStream<W>,
    config: &LiveConfig,
) -> LiveResult<()> {
    let session = start_session(streams, stream, config.clone())?;
    for _ in session.registry().track(0..20, "Processing...") {
        thread::sleep(Duration::from_millis(50));
    }
    session.stop()
}

/// Two tasks advancing at different fractional rates until both finish.
fn progress<W: Write + Send + 'static>(
    streams: &StreamRegistry,
    stream: OutputStream<W>,
    config: &LiveConfig,
) -> LiveResult<()> {
    let session = start_session(streams, stream, config.clone())?;
    let tasks = session.registry();
    let download = tasks.add_task(
        TaskSpec::new("Downloading...")
            .total(100.0)
            .style(Style::new().fg(Color::RED)),
    );
    let process = tasks.add_task(
        TaskSpec::new("Processing...")
            .total(80.0)
            .style(Style::new().fg(Color::GREEN)),
    );
    while !tasks.is_finished() {
        tasks.advance(download, 0.9)?;
        tasks.advance(process, 0.5)?;
        thread::sleep(Duration::from_millis(20));
    }
    tracing::info!("progress demo finished");
    session.stop()
}

/// A spinner with timestamped events logged above it.
fn status<W: Write + Send + 'static>(
    streams: &StreamRegistry,
    stream: OutputStream<W>,
    config: &LiveConfig,
) -> LiveResult<()> {
    const DONE: Style = Style::new().fg(Color::GREEN);
    const FAILED: Style = Style::new().fg(Color::RED);

    let view = StatusView::new(Line::styled(
        "Monitoring system...",
        Style::new().fg(Color::GREEN).bold(),
    ))
    .spinner(Spinner::DOTS);
    // The spinner goes away when monitoring ends; only the log remains.
    let session = start_session_with(streams, stream, view, config.clone().with_transient(true))?;

    let started = Instant::now();
    for n in 1..=10 {
        thread::sleep(Duration::from_millis(500));
        let outcome = if n % 3 == 0 { FAILED } else { DONE };
        session.log(Line::from_spans([
            Span::styled(format!("[{}] ", format_hms(started.elapsed())), Style::new().dim()),
            Span::raw(format!("Event #{n}: ")),
            Span::styled("Completed", outcome),
        ]));
    }
    session.log(Span::styled("Monitoring complete", Style::new().fg(Color::GREEN).bold()));
    session.stop()
}
