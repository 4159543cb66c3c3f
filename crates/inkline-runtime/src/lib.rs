#![forbid(unsafe_code)]

//! inkline runtime
//!
//! Ties the core and render crates together into live sessions.
//!
//! # Key Components
//!
//! - [`TaskRegistry`] - Thread-safe store of progress tasks
//! - [`RenderSource`] - Trait for anything that composes a frame from task state
//! - [`ProgressView`] / [`StatusView`] - Built-in sources
//! - [`LiveRegion`] - Cooperative controller that repaints a region in place
//! - [`start_session`] / [`SessionHandle`] - Background refresh thread and its handle
//! - [`LiveConfig`] - Session configuration
//!
//! # How it fits
//! Registry mutations never touch the terminal. The controller snapshots the
//! registry on each tick, asks its source for a frame, and lets
//! `inkline-render` diff and paint it.

pub mod config;
pub mod controller;
pub mod error;
pub mod progress;
pub mod registry;
pub mod session;
mod signal;
pub mod source;
pub mod status;
pub mod track;

pub use config::LiveConfig;
pub use controller::{LiveRegion, LiveState, OutputStream, TickOutcome};
pub use error::{LiveError, LiveResult};
pub use progress::ProgressView;
pub use registry::{Retention, Task, TaskId, TaskRegistry, TaskSpec, TaskUpdate, TotalPolicy};
pub use session::{SessionHandle, start_session, start_session_with};
pub use source::{RenderContext, RenderSource, Stack, from_fn};
pub use status::{Spinner, StatusView};
pub use track::Track;
