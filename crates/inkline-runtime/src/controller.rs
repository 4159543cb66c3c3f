#![forbid(unsafe_code)]

//! Live region controller.
//!
//! [`LiveRegion`] owns one output stream for the duration of a session and
//! repaints a block of rows at its bottom in place. It is cooperative: the
//! caller decides when to [`tick`](LiveRegion::tick). The
//! [`session`](crate::session) module drives it from a background thread.
//!
//! # States
//!
//! ```text
//! Idle --start--> Active --stop--> Stopping --> Idle
//!                   |                 ^
//!                   +--write failure--+
//! ```
//!
//! A failed write moves the region to `Stopping`, suppresses every later
//! tick, and parks the error until [`stop`](LiveRegion::stop) returns it.
//!
//! # Plain streams
//!
//! When the stream is not interactive nothing is repainted. Log lines are
//! appended as they arrive and the final frame is appended once, on stop.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use crossterm::tty::IsTty;

use inkline_core::cleanup::{CleanupGuard, StdStream};
use inkline_core::stream::{StreamClaim, StreamId, StreamRegistry};
use inkline_core::terminal_capabilities::{FALLBACK_SIZE, TerminalCapabilities, terminal_size};
use inkline_render::frame::{Frame, Line};
use inkline_render::presenter::Presenter;
use inkline_render::terminal_writer::TerminalWriter;

use crate::config::LiveConfig;
use crate::error::{LiveError, LiveResult};
use crate::registry::TaskRegistry;
use crate::source::{RenderContext, RenderSource};

/// Lifecycle state of a live region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveState {
    /// Not started, or fully stopped.
    Idle,
    /// Painting.
    Active,
    /// Shutting down, or failed and waiting for `stop`.
    Stopping,
}

impl LiveState {
    const fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Active => 1,
            Self::Stopping => 2,
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Active,
            2 => Self::Stopping,
            _ => Self::Idle,
        }
    }
}

/// State readable from other threads.
#[derive(Debug, Clone, Default)]
pub(crate) struct StateCell(Arc<AtomicU8>);

impl StateCell {
    pub(crate) fn get(&self) -> LiveState {
        LiveState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, state: LiveState) {
        self.0.store(state.as_u8(), Ordering::Release);
    }
}

/// Lines waiting to be printed above the region.
#[derive(Debug, Clone, Default)]
pub(crate) struct LogQueue(Arc<Mutex<Vec<Line>>>);

impl LogQueue {
    fn lock(&self) -> MutexGuard<'_, Vec<Line>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn push(&self, line: Line) {
        self.lock().push(line);
    }

    fn drain(&self) -> Vec<Line> {
        std::mem::take(&mut *self.lock())
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Bytes were written: `changed` region rows, plus any log lines.
    Painted { changed: usize },
    /// Nothing changed; nothing was written.
    Unchanged,
    /// The region is not active.
    Suppressed,
    /// A write failed; the region is now `Stopping`.
    Failed,
}

/// A sink plus what we know about it.
#[derive(Debug)]
pub struct OutputStream<W: Write> {
    id: StreamId,
    sink: W,
    caps: TerminalCapabilities,
    size: Option<(u16, u16)>,
    std: Option<StdStream>,
}

impl OutputStream<io::Stdout> {
    /// Process standard output, with capabilities detected from the tty
    /// and environment.
    pub fn stdout() -> Self {
        let sink = io::stdout();
        let caps = TerminalCapabilities::detect(sink.is_tty());
        Self {
            id: StreamId::Stdout,
            sink,
            caps,
            size: None,
            std: Some(StdStream::Stdout),
        }
    }
}

impl OutputStream<io::Stderr> {
    /// Process standard error, with capabilities detected from the tty
    /// and environment.
    pub fn stderr() -> Self {
        let sink = io::stderr();
        let caps = TerminalCapabilities::detect(sink.is_tty());
        Self {
            id: StreamId::Stderr,
            sink,
            caps,
            size: None,
            std: Some(StdStream::Stderr),
        }
    }
}

impl<W: Write> OutputStream<W> {
    /// An arbitrary sink. `interactive` selects basic terminal
    /// capabilities or plain output.
    pub fn new(id: StreamId, sink: W, interactive: bool) -> Self {
        let caps = if interactive {
            TerminalCapabilities::basic()
        } else {
            TerminalCapabilities::plain()
        };
        Self {
            id,
            sink,
            caps,
            size: None,
            std: None,
        }
    }

    #[must_use]
    pub fn with_capabilities(mut self, caps: TerminalCapabilities) -> Self {
        self.caps = caps;
        self
    }

    /// Fixed `(columns, rows)` for a sink that is not the controlling
    /// terminal.
    #[must_use]
    pub fn with_size(mut self, columns: u16, rows: u16) -> Self {
        self.size = Some((columns, rows));
        self
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    pub fn capabilities(&self) -> TerminalCapabilities {
        self.caps
    }
}

/// In-place renderer for one output stream.
pub struct LiveRegion<W: Write> {
    id: StreamId,
    std: Option<StdStream>,
    size: Option<(u16, u16)>,
    writer: TerminalWriter<W>,
    presenter: Presenter,
    registry: TaskRegistry,
    source: Box<dyn RenderSource + Send>,
    config: LiveConfig,
    logs: LogQueue,
    state: StateCell,
    claim: Option<StreamClaim>,
    guard: Option<CleanupGuard>,
    started: Instant,
    ticks: u64,
    failure: Option<io::Error>,
}

impl<W: Write> std::fmt::Debug for LiveRegion<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveRegion")
            .field("stream", &self.id)
            .field("state", &self.state.get())
            .field("painted_rows", &self.presenter.painted_rows())
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl<W: Write> LiveRegion<W> {
    /// Build an idle region. Nothing is written until [`start`](Self::start).
    pub fn new<S>(stream: OutputStream<W>, registry: TaskRegistry, source: S, config: LiveConfig) -> Self
    where
        S: RenderSource + Send + 'static,
    {
        let mut caps = stream.caps;
        if let Some(sync) = config.sync_output {
            caps.sync_output = sync && caps.interactive;
        }
        Self {
            id: stream.id,
            std: stream.std,
            size: stream.size,
            writer: TerminalWriter::new(stream.sink, caps),
            presenter: Presenter::new(),
            registry,
            source: Box::new(source),
            config,
            logs: LogQueue::default(),
            state: StateCell::default(),
            claim: None,
            guard: None,
            started: Instant::now(),
            ticks: 0,
            failure: None,
        }
    }

    pub fn state(&self) -> LiveState {
        self.state.get()
    }

    pub fn stream_id(&self) -> StreamId {
        self.id
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Ticks run since start, failed ones included.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_interactive(&self) -> bool {
        self.writer.is_interactive()
    }

    /// The sink, for inspection.
    pub fn sink(&self) -> &W {
        self.writer.get_ref()
    }

    pub(crate) fn state_cell(&self) -> StateCell {
        self.state.clone()
    }

    pub(crate) fn log_queue(&self) -> LogQueue {
        self.logs.clone()
    }

    /// Queue `line` for printing above the region on the next tick.
    pub fn log(&self, line: impl Into<Line>) {
        self.logs.push(line.into());
    }

    /// Claim the stream and take over its cursor.
    ///
    /// # Errors
    ///
    /// [`LiveError::AlreadyActive`] when this region is already running or
    /// another session holds the stream; the other session is untouched.
    /// [`LiveError::WriteFailure`] when hiding the cursor fails.
    pub fn start(&mut self, streams: &StreamRegistry) -> LiveResult<()> {
        if self.state.get() != LiveState::Idle {
            return Err(LiveError::AlreadyActive { stream: self.id });
        }
        let claim = streams
            .claim(self.id)
            .ok_or(LiveError::AlreadyActive { stream: self.id })?;

        if self.writer.is_interactive() {
            if let Some(std) = self.std {
                self.guard = match CleanupGuard::arm(std) {
                    Ok(guard) => Some(guard),
                    Err(e) => {
                        tracing::warn!(stream = %self.id, error = %e, "exit cleanup unavailable");
                        None
                    }
                };
            }
            if self.config.hide_cursor {
                if let Err(e) = self.writer.hide_cursor().and_then(|()| self.writer.flush()) {
                    self.guard = None;
                    return Err(LiveError::WriteFailure(e));
                }
            }
        }

        self.claim = Some(claim);
        self.started = Instant::now();
        self.ticks = 0;
        self.failure = None;
        self.state.set(LiveState::Active);
        tracing::info!(
            stream = %self.id,
            interactive = self.writer.is_interactive(),
            "live region started"
        );
        Ok(())
    }

    /// Compose, diff and paint one frame.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.get() != LiveState::Active {
            return TickOutcome::Suppressed;
        }
        self.registry.retire(self.config.retention);
        let frame = self.compose();
        self.ticks += 1;
        let logs = self.logs.drain();

        match self.paint(&logs, frame) {
            Ok(0) if logs.is_empty() => TickOutcome::Unchanged,
            Ok(changed) => TickOutcome::Painted { changed },
            Err(e) => {
                tracing::warn!(stream = %self.id, error = %e, "live region write failed");
                self.failure = Some(e);
                self.state.set(LiveState::Stopping);
                TickOutcome::Failed
            }
        }
    }

    /// Paint the final frame (or erase the region when transient), restore
    /// the cursor and release the stream.
    ///
    /// Idempotent: a stopped or never-started region returns `Ok(())`.
    ///
    /// # Errors
    ///
    /// The [`LiveError::WriteFailure`] that stopped the region, exactly
    /// once, or a failure while writing the final frame.
    pub fn stop(&mut self) -> LiveResult<()> {
        if self.state.get() == LiveState::Idle {
            return Ok(());
        }
        self.state.set(LiveState::Stopping);

        let result = match self.failure.take() {
            Some(e) => {
                self.restore_quietly();
                Err(LiveError::WriteFailure(e))
            }
            None => self.finish().map_err(|e| {
                self.restore_quietly();
                LiveError::WriteFailure(e)
            }),
        };

        self.presenter.release();
        self.guard = None;
        self.claim = None;
        self.state.set(LiveState::Idle);
        tracing::info!(stream = %self.id, ticks = self.ticks, ok = result.is_ok(), "live region stopped");
        result
    }

    fn dimensions(&self) -> (u16, u16) {
        let measured = self
            .size
            .or_else(|| self.std.and_then(|_| terminal_size()))
            .unwrap_or(FALLBACK_SIZE);
        (
            self.config.width.unwrap_or(measured.0).max(1),
            self.config.height.unwrap_or(measured.1).max(1),
        )
    }

    fn compose(&mut self) -> Frame {
        let (width, _) = self.dimensions();
        let tasks = self.registry.visible_snapshot();
        let ctx = RenderContext {
            tasks: &tasks,
            elapsed: self.started.elapsed(),
            tick: self.ticks,
            width,
            overflow: self.config.overflow,
        };
        let mut frame = self.source.produce(&ctx);

        let max = width as usize;
        if frame.width() > width || frame.lines().iter().any(|l| l.width() > max) {
            let mut fitted = ctx.frame();
            fitted.extend(frame.lines().iter().cloned());
            frame = fitted;
        }
        frame
    }

    /// Keep the newest rows that fit on screen. The bottom row stays free
    /// for the resting cursor. Plain streams append and are never clipped.
    fn clip(&self, frame: Frame) -> Frame {
        let (_, height) = self.dimensions();
        frame.tail(usize::from(height.saturating_sub(1)).max(1))
    }

    fn paint(&mut self, logs: &[Line], frame: Frame) -> io::Result<usize> {
        if !self.writer.is_interactive() {
            for line in logs {
                self.writer.write_line(line)?;
                self.writer.newline()?;
            }
            self.writer.flush()?;
            return Ok(0);
        }
        let frame = self.clip(frame);
        self.writer.begin_batch()?;
        self.presenter.write_above(&mut self.writer, logs)?;
        let changed = self.presenter.present(&mut self.writer, &frame)?;
        self.writer.end_batch()?;
        Ok(changed)
    }

    fn finish(&mut self) -> io::Result<()> {
        let frame = self.compose();
        let logs = self.logs.drain();

        if !self.writer.is_interactive() {
            for line in &logs {
                self.writer.write_line(line)?;
                self.writer.newline()?;
            }
            if !self.config.transient {
                self.presenter.append(&mut self.writer, &frame)?;
            }
            return self.writer.flush();
        }

        let frame = self.clip(frame);
        self.writer.begin_batch()?;
        self.presenter.write_above(&mut self.writer, &logs)?;
        if self.config.transient {
            self.presenter.clear(&mut self.writer)?;
        } else {
            self.presenter.present(&mut self.writer, &frame)?;
        }
        self.writer.reset_style()?;
        self.writer.show_cursor()?;
        self.writer.end_batch()
    }

    /// Best effort after a failure: the sink is already broken.
    fn restore_quietly(&mut self) {
        let _ = self.writer.end_batch();
        let _ = self.writer.reset_style();
        let _ = self.writer.show_cursor();
        let _ = self.writer.flush();
    }
}

impl<W: Write> Drop for LiveRegion<W> {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!(stream = %self.id, error = %e, "live region dropped after a failure");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::from_fn;
    use inkline_render::terminal_model::TerminalModel;

    fn region(interactive: bool, config: LiveConfig) -> (LiveRegion<Vec<u8>>, TaskRegistry) {
        let registry = TaskRegistry::new();
        let stream = OutputStream::new(StreamId::unique(), Vec::new(), interactive).with_size(40, 10);
        let source = from_fn(|ctx: &RenderContext<'_>| {
            let mut frame = ctx.frame();
            for task in ctx.tasks {
                frame.push(format!("{} {}", task.description(), task.completed()));
            }
            frame
        });
        (LiveRegion::new(stream, registry.clone(), source, config), registry)
    }

    fn screen(bytes: &[u8]) -> TerminalModel {
        let mut model = TerminalModel::new(40, 10);
        model.process(bytes);
        model
    }

    #[test]
    fn lifecycle() {
        let streams = StreamRegistry::new();
        let (mut live, tasks) = region(true, LiveConfig::default());
        assert_eq!(live.state(), LiveState::Idle);
        assert_eq!(live.tick(), TickOutcome::Suppressed);

        live.start(&streams).unwrap();
        assert_eq!(live.state(), LiveState::Active);
        assert!(streams.is_active(live.stream_id()));

        tasks.add("a", Some(2.0));
        assert_eq!(live.tick(), TickOutcome::Painted { changed: 1 });
        assert_eq!(live.tick(), TickOutcome::Unchanged);

        live.stop().unwrap();
        assert_eq!(live.state(), LiveState::Idle);
        assert!(!streams.is_active(live.stream_id()));
        live.stop().unwrap();

        let model = screen(live.sink());
        assert_eq!(model.screen_text()[0], "a 0");
        assert!(model.modes().cursor_visible);
        assert_eq!(model.cursor(), (0, 1));
    }

    #[test]
    fn logs_go_above_the_region() {
        let streams = StreamRegistry::new();
        let (mut live, tasks) = region(true, LiveConfig::default());
        live.start(&streams).unwrap();
        let id = tasks.add("job", None);
        live.tick();
        live.log("first event");
        tasks.advance(id, 3.0).unwrap();
        live.tick();
        live.log("second event");
        live.stop().unwrap();

        let model = screen(live.sink());
        assert_eq!(model.screen_text()[0], "first event");
        assert_eq!(model.screen_text()[1], "second event");
        assert_eq!(model.screen_text()[2], "job 3");
        assert_eq!(model.screen_text()[3], "");
    }

    #[test]
    fn transient_region_is_erased() {
        let streams = StreamRegistry::new();
        let (mut live, tasks) = region(true, LiveConfig::default().with_transient(true));
        live.start(&streams).unwrap();
        tasks.add("x", None);
        tasks.add("y", None);
        live.tick();
        live.stop().unwrap();
        let model = screen(live.sink());
        assert_eq!(model.screen_text()[0], "");
        assert_eq!(model.cursor(), (0, 0));
    }

    #[test]
    fn region_is_clipped_to_height_minus_one() {
        let streams = StreamRegistry::new();
        let (mut live, tasks) = region(true, LiveConfig::default().with_height(4));
        live.start(&streams).unwrap();
        for n in 0..6 {
            tasks.add(format!("t{n}"), None);
        }
        assert_eq!(live.tick(), TickOutcome::Painted { changed: 3 });
        live.stop().unwrap();
        let model = screen(live.sink());
        assert_eq!(model.screen_text()[0], "t3 0");
        assert_eq!(model.screen_text()[2], "t5 0");
    }

    #[test]
    fn wide_frames_are_refitted() {
        let streams = StreamRegistry::new();
        let registry = TaskRegistry::new();
        let stream = OutputStream::new(StreamId::unique(), Vec::new(), true).with_size(8, 5);
        let source = from_fn(|_: &RenderContext<'_>| Frame::new(100).with_line("abcdefghijkl"));
        let mut live = LiveRegion::new(stream, registry, source, LiveConfig::default());
        live.start(&streams).unwrap();
        live.tick();
        live.stop().unwrap();
        let mut model = TerminalModel::new(8, 5);
        model.process(live.sink());
        assert_eq!(model.screen_text()[0], "abcdefgh");
        assert_eq!(model.screen_text()[1], "");
    }

    #[test]
    fn second_start_on_claimed_stream_fails() {
        let streams = StreamRegistry::new();
        let registry = TaskRegistry::new();
        let id = StreamId::unique();
        let mut first = LiveRegion::new(
            OutputStream::new(id, Vec::new(), true),
            registry.clone(),
            from_fn(|ctx: &RenderContext<'_>| ctx.frame().with_line("one")),
            LiveConfig::default(),
        );
        let mut second = LiveRegion::new(
            OutputStream::new(id, Vec::new(), true),
            registry,
            from_fn(|ctx: &RenderContext<'_>| ctx.frame().with_line("two")),
            LiveConfig::default(),
        );
        first.start(&streams).unwrap();
        let err = second.start(&streams).unwrap_err();
        assert!(matches!(err, LiveError::AlreadyActive { stream } if stream == id));
        assert_eq!(second.state(), LiveState::Idle);
        assert!(second.sink().is_empty());
        assert_eq!(first.tick(), TickOutcome::Painted { changed: 1 });
        assert!(first.start(&streams).is_err());
    }

    #[test]
    fn plain_stream_appends_logs_and_final_frame() {
        let streams = StreamRegistry::new();
        let (mut live, tasks) = region(false, LiveConfig::default());
        live.start(&streams).unwrap();
        let id = tasks.add("copy", Some(10.0));
        live.tick();
        live.log("halfway");
        tasks.advance(id, 5.0).unwrap();
        live.tick();
        tasks.advance(id, 5.0).unwrap();
        live.stop().unwrap();
        assert_eq!(
            String::from_utf8(live.sink().clone()).unwrap(),
            "halfway\ncopy 10\n"
        );
    }

    #[test]
    fn hidden_cursor_is_optional() {
        let streams = StreamRegistry::new();
        let (mut live, _) = region(true, LiveConfig::default().with_hide_cursor(false));
        live.start(&streams).unwrap();
        assert!(live.sink().is_empty());
        live.stop().unwrap();
        assert!(screen(live.sink()).modes().cursor_visible);
    }

    #[test]
    fn forced_sync_output_wraps_batches() {
        let streams = StreamRegistry::new();
        let (mut live, tasks) = region(true, LiveConfig::default().with_sync_output(true));
        live.start(&streams).unwrap();
        tasks.add("s", None);
        live.tick();
        live.stop().unwrap();
        let text = String::from_utf8_lossy(live.sink()).into_owned();
        assert!(text.contains("\x1b[?2026h"));
        assert!(screen(live.sink()).sync_output_balanced());
    }
}
