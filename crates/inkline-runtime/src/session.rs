#![forbid(unsafe_code)]

//! Background-driven live sessions.
//!
//! [`start_session`] starts a [`LiveRegion`] synchronously (so a contested
//! stream is reported to the caller) and hands it to a refresh thread that
//! ticks every `refresh_interval`, or sooner when the registry signals a
//! significant change, a log line is queued, or [`SessionHandle::refresh`]
//! is called.
//!
//! ```no_run
//! use inkline_core::stream::StreamRegistry;
//! use inkline_runtime::{LiveConfig, OutputStream, start_session};
//!
//! let streams = StreamRegistry::new();
//! let session = start_session(&streams, OutputStream::stderr(), LiveConfig::default())?;
//! let tasks = session.registry();
//! let id = tasks.add("Downloading", Some(100.0));
//! while !tasks.is_finished() {
//!     tasks.advance(id, 1.0)?;
//!     std::thread::sleep(std::time::Duration::from_millis(10));
//! }
//! session.stop()?;
//! # Ok::<(), inkline_runtime::LiveError>(())
//! ```

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use inkline_core::stream::{StreamId, StreamRegistry};
use inkline_render::frame::Line;

use crate::config::LiveConfig;
use crate::controller::{LiveRegion, LiveState, LogQueue, OutputStream, StateCell, TickOutcome};
use crate::error::{LiveError, LiveResult};
use crate::progress::ProgressView;
use crate::registry::TaskRegistry;
use crate::signal::{RefreshSignal, Wake};
use crate::source::RenderSource;

/// Start a session rendering every visible task with [`ProgressView`].
///
/// # Errors
///
/// [`LiveError::InvalidConfig`] for an invalid `config`,
/// [`LiveError::AlreadyActive`] when the stream already has a session, and
/// [`LiveError::WriteFailure`] when the terminal cannot be set up.
pub fn start_session<W>(
    streams: &StreamRegistry,
    stream: OutputStream<W>,
    config: LiveConfig,
) -> LiveResult<SessionHandle>
where
    W: Write + Send + 'static,
{
    start_session_with(streams, stream, ProgressView::new(), config)
}

/// Start a session rendering `source`.
///
/// # Errors
///
/// As [`start_session`].
pub fn start_session_with<W, S>(
    streams: &StreamRegistry,
    stream: OutputStream<W>,
    source: S,
    config: LiveConfig,
) -> LiveResult<SessionHandle>
where
    W: Write + Send + 'static,
    S: RenderSource + Send + 'static,
{
    config.validate()?;
    let interval = config.refresh_interval;
    let registry = TaskRegistry::with_policy(config.total_policy);
    let mut region = LiveRegion::new(stream, registry.clone(), source, config);
    region.start(streams)?;

    let stream_id = region.stream_id();
    let logs = region.log_queue();
    let state = region.state_cell();
    let signal = registry.refresh_signal();
    let loop_signal = signal.clone();
    let thread = thread::Builder::new()
        .name("inkline-refresh".into())
        .spawn(move || refresh_loop(region, &loop_signal, interval))?;

    Ok(SessionHandle {
        shared: Arc::new(Shared {
            stream: stream_id,
            registry,
            signal,
            logs,
            state,
            thread: Mutex::new(Some(thread)),
        }),
    })
}

fn refresh_loop<W: Write>(
    mut region: LiveRegion<W>,
    signal: &RefreshSignal,
    interval: Duration,
) -> LiveResult<()> {
    let _span = tracing::debug_span!("inkline.refresh", stream = %region.stream_id()).entered();
    loop {
        if region.tick() == TickOutcome::Failed {
            // Keep the region (and its error) until someone asks to stop.
            signal.wait_stopped();
            break;
        }
        match signal.wait_timeout(interval) {
            Wake::Stopped => break,
            Wake::Requested | Wake::Timeout => {}
        }
    }
    region.stop()
}

struct Shared {
    stream: StreamId,
    registry: TaskRegistry,
    signal: RefreshSignal,
    logs: LogQueue,
    state: StateCell,
    thread: Mutex<Option<JoinHandle<LiveResult<()>>>>,
}

impl Shared {
    fn lock_thread(&self) -> MutexGuard<'_, Option<JoinHandle<LiveResult<()>>>> {
        self.thread
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn stop(&self) -> LiveResult<()> {
        // Held across the join so a concurrent stop waits for the first.
        let mut thread = self.lock_thread();
        let Some(handle) = thread.take() else {
            return Ok(());
        };
        self.signal.stop();
        match handle.join() {
            Ok(result) => result,
            Err(_) => Err(LiveError::WriteFailure(io::Error::other(
                "refresh thread panicked",
            ))),
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!(stream = %self.stream, error = %e, "live session ended with an error");
        }
    }
}

/// Handle to a running session.
///
/// Cheap to clone; every clone controls the same session. Dropping the
/// last clone stops it.
#[derive(Clone)]
pub struct SessionHandle {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("stream", &self.shared.stream)
            .field("state", &self.state())
            .finish()
    }
}

impl SessionHandle {
    /// The session's task registry.
    pub fn registry(&self) -> TaskRegistry {
        self.shared.registry.clone()
    }

    pub fn stream(&self) -> StreamId {
        self.shared.stream
    }

    /// Print `line` above the live region as soon as possible.
    pub fn log(&self, line: impl Into<Line>) {
        self.shared.logs.push(line.into());
        self.shared.signal.request();
    }

    /// Tick now instead of at the next interval.
    pub fn refresh(&self) {
        self.shared.signal.request();
    }

    pub fn state(&self) -> LiveState {
        self.shared.state.get()
    }

    /// Stop the session and wait for the final frame to be written.
    ///
    /// Safe to call from any clone, any number of times; only the first
    /// call can return an error.
    ///
    /// # Errors
    ///
    /// The [`LiveError::WriteFailure`] that ended the session, if any.
    pub fn stop(&self) -> LiveResult<()> {
        self.shared.stop()
    }
}
