#![forbid(unsafe_code)]

//! Cursor and erase primitives over one output stream.
//!
//! The `TerminalWriter` is the only thing that writes bytes to a live
//! region's stream. It:
//! - Fixes its [`OutputMode`] once, from capabilities detected at session
//!   start.
//! - Degrades to append-only plain text in [`OutputMode::Plain`]: cursor,
//!   erase and visibility primitives become no-ops and no SGR is emitted.
//! - Accumulates a batch in memory and hands it to the sink with a single
//!   `write_all` followed by one `flush`, wrapped in synchronized-output
//!   markers when the terminal supports them.
//!
//! Outside a batch every primitive is written through immediately.
//!
//! ```
//! use inkline_core::terminal_capabilities::TerminalCapabilities;
//! use inkline_render::style::Style;
//! use inkline_render::terminal_writer::TerminalWriter;
//!
//! let mut writer = TerminalWriter::new(Vec::new(), TerminalCapabilities::plain());
//! writer.move_cursor_up(3).unwrap();
//! writer.write("saved 3 files", Style::new().bold()).unwrap();
//! writer.newline().unwrap();
//! assert_eq!(writer.into_inner(), b"saved 3 files\n");
//! ```

use std::io::{self, Write};

use inkline_core::terminal_capabilities::TerminalCapabilities;

use crate::ansi;
use crate::frame::Line;
use crate::style::Style;
use crate::text_width::sanitize;

/// How the bound stream is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// A terminal: cursor control, erase and (optionally) styles.
    Interactive,
    /// A file or pipe: text and newlines only.
    Plain,
}

/// Primitive terminal operations over a byte sink.
#[derive(Debug)]
pub struct TerminalWriter<W: Write> {
    out: W,
    mode: OutputMode,
    color: bool,
    sync_output: bool,
    pending: Vec<u8>,
    in_batch: bool,
    cursor_visible: bool,
}

impl<W: Write> TerminalWriter<W> {
    /// Bind a writer to `out` with the given capabilities.
    pub fn new(out: W, caps: TerminalCapabilities) -> Self {
        let mode = if caps.interactive {
            OutputMode::Interactive
        } else {
            OutputMode::Plain
        };
        Self {
            out,
            mode,
            color: caps.interactive && caps.color,
            sync_output: caps.interactive && caps.sync_output,
            pending: Vec::with_capacity(4096),
            in_batch: false,
            cursor_visible: true,
        }
    }

    /// The output mode fixed at construction.
    #[must_use]
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// True in [`OutputMode::Interactive`].
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.mode == OutputMode::Interactive
    }

    /// True when styled text carries SGR sequences.
    #[must_use]
    pub fn styles_enabled(&self) -> bool {
        self.color
    }

    /// Cursor visibility as last set through this writer.
    #[must_use]
    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// The sink.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Unwrap the sink. Unflushed bytes are discarded.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> io::Result<()> {
        f(&mut self.pending)?;
        if self.in_batch {
            Ok(())
        } else {
            self.drain()
        }
    }

    fn interactive_emit(
        &mut self,
        f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>,
    ) -> io::Result<()> {
        if self.is_interactive() {
            self.emit(f)
        } else {
            Ok(())
        }
    }

    fn drain(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let result = self.out.write_all(&self.pending);
        self.pending.clear();
        result
    }

    /// Move the cursor up `n` rows.
    pub fn move_cursor_up(&mut self, n: usize) -> io::Result<()> {
        let n = u16::try_from(n).unwrap_or(u16::MAX);
        self.interactive_emit(|w| ansi::cuu(w, n))
    }

    /// Move the cursor down `n` rows (never scrolls).
    pub fn move_cursor_down(&mut self, n: usize) -> io::Result<()> {
        let n = u16::try_from(n).unwrap_or(u16::MAX);
        self.interactive_emit(|w| ansi::cud(w, n))
    }

    /// Return to column 0.
    pub fn carriage_return(&mut self) -> io::Result<()> {
        self.interactive_emit(ansi::cr)
    }

    /// End the current line.
    ///
    /// Interactive output writes `CR LF` so the cursor lands in column 0
    /// regardless of the tty's output translation; plain output writes `LF`.
    pub fn newline(&mut self) -> io::Result<()> {
        if self.is_interactive() {
            self.emit(|w| {
                ansi::cr(w)?;
                ansi::lf(w)
            })
        } else {
            self.emit(ansi::lf)
        }
    }

    /// Erase the current line and return to column 0.
    pub fn clear_line(&mut self) -> io::Result<()> {
        self.interactive_emit(|w| {
            ansi::cr(w)?;
            ansi::erase_line(w)
        })
    }

    /// Erase from the cursor to the end of the screen.
    pub fn clear_from_cursor_down(&mut self) -> io::Result<()> {
        self.interactive_emit(ansi::erase_down)
    }

    /// Write text in `style`.
    ///
    /// Control characters are stripped. The style is reset after the text,
    /// so no attribute leaks into the next write.
    pub fn write(&mut self, text: &str, style: Style) -> io::Result<()> {
        let text = sanitize(text);
        if text.is_empty() {
            return Ok(());
        }
        let styled = self.color && !style.is_plain();
        self.emit(|w| {
            if styled {
                ansi::sgr(w, style)?;
            }
            w.write_all(text.as_bytes())?;
            if styled {
                ansi::sgr_reset(w)?;
            }
            Ok(())
        })
    }

    /// Write every span of `line`. Does not end the line.
    pub fn write_line(&mut self, line: &Line) -> io::Result<()> {
        for span in line.spans() {
            self.write(span.text(), span.style())?;
        }
        Ok(())
    }

    /// Reset all SGR attributes.
    pub fn reset_style(&mut self) -> io::Result<()> {
        if self.color {
            self.emit(ansi::sgr_reset)
        } else {
            Ok(())
        }
    }

    fn set_cursor_visibility(&mut self, visible: bool) -> io::Result<()> {
        if !self.is_interactive() || self.cursor_visible == visible {
            return Ok(());
        }
        self.cursor_visible = visible;
        if visible {
            self.emit(ansi::cursor_show)
        } else {
            self.emit(ansi::cursor_hide)
        }
    }

    /// Hide the cursor.
    pub fn hide_cursor(&mut self) -> io::Result<()> {
        self.set_cursor_visibility(false)
    }

    /// Show the cursor.
    pub fn show_cursor(&mut self) -> io::Result<()> {
        self.set_cursor_visibility(true)
    }

    /// Start accumulating a batch. Nested calls are ignored.
    pub fn begin_batch(&mut self) -> io::Result<()> {
        if self.in_batch {
            return Ok(());
        }
        self.in_batch = true;
        if self.sync_output {
            ansi::sync_begin(&mut self.pending)?;
        }
        Ok(())
    }

    /// Close the batch and hand it to the sink in one write.
    pub fn end_batch(&mut self) -> io::Result<()> {
        if !self.in_batch {
            return self.flush();
        }
        if self.sync_output {
            ansi::sync_end(&mut self.pending)?;
        }
        self.in_batch = false;
        self.flush()
    }

    /// Write out anything pending and flush the sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.drain()?;
        self.out.flush()
    }
}
