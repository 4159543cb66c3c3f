#![forbid(unsafe_code)]

//! Render kernel: styled lines, frames, line diffs, and ANSI presentation.

pub mod ansi;
pub mod diff;
pub mod frame;
pub mod presenter;
pub mod style;
pub mod terminal_model;
pub mod terminal_writer;

mod text_width;

pub use diff::{LineEdit, apply_edits, diff};
pub use frame::{Frame, Line, Overflow, Span};
pub use presenter::Presenter;
pub use style::{Color, Style, StyleFlags};
pub use terminal_writer::{OutputMode, TerminalWriter};
