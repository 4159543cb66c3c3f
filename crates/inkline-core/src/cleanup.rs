#![forbid(unsafe_code)]

//! Abnormal-exit cleanup for live regions on stdout/stderr.
//!
//! A live region hides the cursor and may leave a style active mid-frame.
//! Normal shutdown restores both, but a panic or Ctrl-C would leave the
//! user's shell without a cursor. [`CleanupGuard`] arms two fallbacks for the
//! lifetime of a session:
//!
//! 1. A process panic hook (installed once, chained to the previous hook)
//!    that restores every armed standard stream before the panic message.
//! 2. On Unix, a `signal-hook` listener thread (also installed once) that
//!    restores the armed streams on SIGINT or SIGTERM and then exits with the
//!    conventional `128 + signal` status. With nothing armed the listener
//!    falls back to the default action, so the process still terminates
//!    between sessions.
//!
//! Custom sinks do not need this: their owner's `Drop` runs during unwind.

use std::io::{self, Write};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(unix)]
use std::sync::Mutex;

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;
#[cfg(unix)]
use signal_hook::low_level::emulate_default_handler;

/// Number of armed guards per standard stream.
static STDOUT_ARMED: AtomicUsize = AtomicUsize::new(0);
static STDERR_ARMED: AtomicUsize = AtomicUsize::new(0);

/// A process standard stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl StdStream {
    fn armed(self) -> &'static AtomicUsize {
        match self {
            Self::Stdout => &STDOUT_ARMED,
            Self::Stderr => &STDERR_ARMED,
        }
    }

    /// Reset style and show the cursor on this stream, ignoring errors.
    pub fn restore(self) {
        match self {
            Self::Stdout => restore_terminal(&mut io::stdout()),
            Self::Stderr => restore_terminal(&mut io::stderr()),
        }
    }
}

fn restore_terminal(out: &mut impl Write) {
    let _ = crossterm::execute!(
        out,
        crossterm::style::SetAttribute(crossterm::style::Attribute::Reset),
        crossterm::cursor::Show
    );
    let _ = out.flush();
}

/// Keeps panic and signal cleanup armed for one standard stream.
///
/// Dropping the guard disarms it. Guards nest: the stream stays armed until
/// the last guard for it is dropped.
#[derive(Debug)]
pub struct CleanupGuard {
    stream: StdStream,
}

impl CleanupGuard {
    /// Arm cleanup for `stream`.
    ///
    /// # Errors
    ///
    /// Returns an error if the signal listener cannot be registered.
    pub fn arm(stream: StdStream) -> io::Result<Self> {
        install_panic_hook();
        #[cfg(unix)]
        install_signal_listener()?;
        stream.armed().fetch_add(1, Ordering::SeqCst);
        crate::debug!(?stream, "exit cleanup armed");
        Ok(Self { stream })
    }

    /// The guarded stream.
    #[must_use]
    pub fn stream(&self) -> StdStream {
        self.stream
    }

    /// True while at least one guard is armed for `stream`.
    #[must_use]
    pub fn is_armed(stream: StdStream) -> bool {
        stream.armed().load(Ordering::SeqCst) > 0
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        self.stream.armed().fetch_sub(1, Ordering::SeqCst);
        crate::debug!(stream = ?self.stream, "exit cleanup disarmed");
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_armed();
            previous(info);
        }));
    });
}

fn restore_armed() {
    for stream in [StdStream::Stdout, StdStream::Stderr] {
        if CleanupGuard::is_armed(stream) {
            stream.restore();
        }
    }
}

/// Start the process-wide SIGINT/SIGTERM listener on first use.
///
/// A failed registration is reported and retried by the next `arm`.
#[cfg(unix)]
fn install_signal_listener() -> io::Result<()> {
    static INSTALLED: Mutex<bool> = Mutex::new(false);
    let mut installed = INSTALLED
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if *installed {
        return Ok(());
    }
    let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
    std::thread::Builder::new()
        .name("inkline-signal".into())
        .spawn(move || {
            for signal in signals.forever() {
                on_termination_signal(signal);
            }
        })?;
    *installed = true;
    Ok(())
}

#[cfg(unix)]
fn on_termination_signal(signal: i32) {
    let armed = [StdStream::Stdout, StdStream::Stderr]
        .into_iter()
        .any(CleanupGuard::is_armed);
    if armed {
        crate::warn!(signal, "termination signal received, restoring terminal");
        restore_armed();
        std::process::exit(128 + signal);
    }
    // No live region on screen: behave as if no handler were installed.
    if emulate_default_handler(signal).is_err() {
        std::process::exit(128 + signal);
    }
}
