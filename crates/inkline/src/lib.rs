#![forbid(unsafe_code)]

//! inkline public facade crate.
//!
//! Re-exports the types most programs need from the internal crates and
//! offers a prelude.
//!
//! ```no_run
//! use inkline::prelude::*;
//!
//! let streams = StreamRegistry::new();
//! let session = start_session(&streams, OutputStream::stderr(), LiveConfig::default())?;
//! let tasks = session.registry();
//! for _ in tasks.track(0..20, "Processing...") {
//!     std::thread::sleep(std::time::Duration::from_millis(50));
//! }
//! session.stop()?;
//! # Ok::<(), inkline::LiveError>(())
//! ```

// --- Core re-exports -------------------------------------------------------

pub use inkline_core::stream::{StreamId, StreamRegistry};
pub use inkline_core::terminal_capabilities::TerminalCapabilities;

// --- Render re-exports -----------------------------------------------------

pub use inkline_render::{Color, Frame, Line, Overflow, Span, Style, StyleFlags};

// --- Runtime re-exports ----------------------------------------------------

pub use inkline_runtime::{
    LiveConfig, LiveError, LiveRegion, LiveResult, LiveState, OutputStream, ProgressView,
    RenderContext, RenderSource, Retention, SessionHandle, Spinner, Stack, StatusView, Task,
    TaskId, TaskRegistry, TaskSpec, TaskUpdate, TickOutcome, TotalPolicy, from_fn,
    start_session, start_session_with,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Color, Frame, Line, LiveConfig, LiveError, LiveResult, OutputStream, ProgressView,
        RenderContext, RenderSource, SessionHandle, Span, Spinner, StatusView, StreamRegistry,
        Style, TaskRegistry, from_fn, start_session, start_session_with,
    };

    pub use crate::{core, render, runtime};
}

pub use inkline_core as core;
pub use inkline_render as render;
pub use inkline_runtime as runtime;
