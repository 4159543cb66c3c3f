//! End-to-end behaviour of live regions and sessions over in-memory sinks.
//!
//! - A second session on a claimed stream fails and leaves the first alone.
//! - A write failure stops painting and is reported by `stop` exactly once.
//! - Redirected output is plain text, byte for byte.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use inkline_core::stream::{StreamId, StreamRegistry};
use inkline_render::terminal_model::TerminalModel;
use inkline_runtime::{
    LiveConfig, LiveError, LiveRegion, LiveState, OutputStream, RenderContext, TaskRegistry,
    TickOutcome, from_fn, start_session, start_session_with,
};

// ── Sinks ───────────────────────────────────────────────────────────────

/// In-memory sink readable while a session owns a clone.
#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl SharedSink {
    fn bytes(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Accepts `budget` bytes, then fails every write with `BrokenPipe`.
#[derive(Clone)]
struct FailingSink {
    budget: usize,
    written: Arc<Mutex<Vec<u8>>>,
    attempts: Arc<AtomicUsize>,
}

impl FailingSink {
    fn new(budget: usize) -> Self {
        Self {
            budget,
            written: Arc::default(),
            attempts: Arc::default(),
        }
    }

    fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let mut written = self.written.lock().unwrap();
        let room = self.budget.saturating_sub(written.len());
        if room == 0 {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
        }
        let n = room.min(buf.len());
        written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn counting_source() -> impl inkline_runtime::RenderSource + Send + 'static {
    from_fn(|ctx: &RenderContext<'_>| {
        let mut frame = ctx.frame();
        for task in ctx.tasks {
            let total = task.total().map_or_else(|| "?".to_string(), |t| t.to_string());
            frame.push(format!("{} {}/{}", task.description(), task.completed(), total));
        }
        frame
    })
}

fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    cond()
}

fn fast() -> LiveConfig {
    LiveConfig::default().with_refresh_interval(Duration::from_millis(5))
}

// ── One session per stream ──────────────────────────────────────────────

#[test]
fn second_session_on_active_stream_fails() {
    let streams = StreamRegistry::new();
    let id = StreamId::unique();
    let first_sink = SharedSink::default();
    let first = start_session_with(
        &streams,
        OutputStream::new(id, first_sink.clone(), true).with_size(40, 10),
        counting_source(),
        fast(),
    )
    .unwrap();

    let second_sink = SharedSink::default();
    let err = start_session(&streams, OutputStream::new(id, second_sink.clone(), true), fast())
        .unwrap_err();
    assert!(matches!(err, LiveError::AlreadyActive { stream } if stream == id));
    assert!(second_sink.bytes().is_empty());

    // The first session keeps painting.
    assert_eq!(first.state(), LiveState::Active);
    first.registry().add("still here", Some(2.0));
    first.stop().unwrap();
    let mut model = TerminalModel::new(40, 10);
    model.process(&first_sink.bytes());
    assert_eq!(model.screen_text()[0], "still here 0/2");

    // Released: a new session may start.
    let again = start_session(&streams, OutputStream::new(id, SharedSink::default(), true), fast());
    assert!(again.is_ok());
}

#[test]
fn distinct_streams_run_side_by_side() {
    let streams = StreamRegistry::new();
    let open = || OutputStream::new(StreamId::unique(), SharedSink::default(), true);
    let a = start_session(&streams, open(), fast());
    let b = start_session(&streams, open(), fast());
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(streams.active_count(), 2);
}

// ── Write failure ───────────────────────────────────────────────────────

#[test]
fn write_failure_stops_ticks_and_surfaces_once() {
    let streams = StreamRegistry::new();
    let registry = TaskRegistry::new();
    // Room for the cursor-hide sequence and nothing else.
    let sink = FailingSink::new(6);
    let stream = OutputStream::new(StreamId::unique(), sink.clone(), true);
    let mut live = LiveRegion::new(stream, registry.clone(), counting_source(), LiveConfig::default());
    live.start(&streams).unwrap();

    registry.add("upload", Some(10.0));
    assert_eq!(live.tick(), TickOutcome::Failed);
    assert_eq!(live.state(), LiveState::Stopping);

    let attempts = sink.attempts();
    assert_eq!(live.tick(), TickOutcome::Suppressed);
    assert_eq!(live.tick(), TickOutcome::Suppressed);
    assert_eq!(sink.attempts(), attempts, "suppressed ticks must not write");

    match live.stop() {
        Err(LiveError::WriteFailure(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected WriteFailure, got {other:?}"),
    }
    assert!(live.stop().is_ok());
    assert_eq!(live.state(), LiveState::Idle);
    assert!(!streams.is_active(live.stream_id()));
}

#[test]
fn session_write_failure_is_reported_by_stop() {
    let streams = StreamRegistry::new();
    let sink = FailingSink::new(6);
    let session = start_session_with(
        &streams,
        OutputStream::new(StreamId::unique(), sink, true),
        counting_source(),
        fast(),
    )
    .unwrap();
    session.registry().add("upload", Some(10.0));
    assert!(wait_for(|| session.state() == LiveState::Stopping));

    assert!(matches!(session.stop(), Err(LiveError::WriteFailure(_))));
    assert!(session.stop().is_ok());
    assert!(!streams.is_active(session.stream()));
}

// ── Plain output ────────────────────────────────────────────────────────

#[test]
fn plain_stream_output_is_exact_text() {
    let streams = StreamRegistry::new();
    let sink = SharedSink::default();
    let session = start_session_with(
        &streams,
        OutputStream::new(StreamId::unique(), sink.clone(), false),
        counting_source(),
        fast(),
    )
    .unwrap();

    let tasks = session.registry();
    let download = tasks.add("download", Some(100.0));
    session.log("[12:00:01] connected");
    tasks.advance(download, 40.0).unwrap();
    tasks.advance(download, 70.0).unwrap();
    session.log("[12:00:02] done");
    session.stop().unwrap();

    assert_eq!(
        String::from_utf8(sink.bytes()).unwrap(),
        "[12:00:01] connected\n[12:00:02] done\ndownload 100/100\n"
    );
}

#[test]
fn plain_stream_keeps_rows_beyond_terminal_height() {
    let streams = StreamRegistry::new();
    let sink = SharedSink::default();
    let stream = OutputStream::new(StreamId::unique(), sink.clone(), false).with_size(80, 24);
    let session = start_session_with(&streams, stream, counting_source(), fast()).unwrap();

    let tasks = session.registry();
    for n in 0..30 {
        tasks.add(format!("task{n:02}"), Some(1.0));
    }
    session.stop().unwrap();

    let text = String::from_utf8(sink.bytes()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 30);
    assert_eq!(lines[0], "task00 0/1");
    assert_eq!(lines[29], "task29 0/1");
}

#[test]
fn plain_file_sink_has_no_escape_bytes() {
    let streams = StreamRegistry::new();
    let mut file = tempfile::tempfile().unwrap();
    let stream = OutputStream::new(StreamId::unique(), file.try_clone().unwrap(), false);
    let session = start_session(&streams, stream, fast()).unwrap();
    let tasks = session.registry();
    let a = tasks.add("Downloading", Some(100.0));
    let b = tasks.add("Processing", Some(80.0));
    for _ in 0..20 {
        tasks.advance(a, 9.0).unwrap();
        tasks.advance(b, 5.0).unwrap();
        thread::sleep(Duration::from_millis(1));
    }
    session.log("midway");
    session.stop().unwrap();

    let mut text = String::new();
    file.seek(SeekFrom::Start(0)).unwrap();
    file.read_to_string(&mut text).unwrap();
    assert!(!text.contains('\x1b'), "escape byte in {text:?}");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "midway");
    assert!(lines[1].starts_with("Downloading"));
    assert!(lines[2].starts_with("Processing"));
}

// ── Interactive output ──────────────────────────────────────────────────

#[test]
fn interactive_session_reconciles_to_final_state() {
    let streams = StreamRegistry::new();
    let sink = SharedSink::default();
    let session = start_session_with(
        &streams,
        OutputStream::new(StreamId::unique(), sink.clone(), true).with_size(40, 12),
        counting_source(),
        fast(),
    )
    .unwrap();
    let tasks = session.registry();
    let ids: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|name| tasks.add(*name, Some(4.0)))
        .collect();
    for round in 0..4 {
        for id in ids.iter().filter(|id| tasks.get(**id).is_some()) {
            tasks.advance(*id, 1.0).unwrap();
        }
        if round == 1 {
            tasks.remove(ids[1]).unwrap();
            session.log("removed b");
        }
        thread::sleep(Duration::from_millis(6));
    }
    session.stop().unwrap();

    let mut model = TerminalModel::new(40, 12);
    model.process(&sink.bytes());
    assert_eq!(model.screen_text()[0], "removed b");
    assert_eq!(model.screen_text()[1], "a 4/4");
    assert_eq!(model.screen_text()[2], "c 4/4");
    assert_eq!(model.screen_text()[3], "");
    assert_eq!(model.cursor(), (0, 3));
    assert!(model.modes().cursor_visible);
    assert!(model.sync_output_balanced());
}
