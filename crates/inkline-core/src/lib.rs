#![forbid(unsafe_code)]

//! Core: terminal capabilities, output stream identity, and exit cleanup.

pub mod cleanup;
pub mod logging;
pub mod stream;
pub mod terminal_capabilities;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, info_span, trace, warn};
