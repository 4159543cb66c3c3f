#![forbid(unsafe_code)]

//! Presenter: reconciles the painted live region with a new frame.
//!
//! The presenter remembers the lines it last painted and turns a
//! [`diff`](crate::diff) into cursor moves and line writes through a
//! [`TerminalWriter`]. It never opens or closes batches; the caller wraps
//! one tick's worth of calls in `begin_batch`/`end_batch`.
//!
//! # Cursor contract
//!
//! Between calls the cursor rests in column 0 of the row just below the
//! painted region. Every operation starts by moving up over the region and
//! ends back in that resting position:
//!
//! 1. Move up `painted_rows`.
//! 2. Walk the edits top to bottom. Runs of `Unchanged` rows are skipped
//!    with one cursor-down; `Replace` and `Insert` rows are cleared,
//!    written and terminated with `CR LF` (which scrolls the screen when
//!    the region grows past the bottom row); the first `Delete` erases
//!    everything below the cursor.
//! 3. Skip any trailing unchanged rows.
//!
//! Log lines are written where the region starts; the region is then
//! repainted in full below them.

use std::io::{self, Write};

use crate::diff::{LineEdit, diff_lines, is_noop};
use crate::frame::{Frame, Line};
use crate::terminal_writer::TerminalWriter;

/// Paint state of one live region.
#[derive(Debug, Default, Clone)]
pub struct Presenter {
    painted: Vec<Line>,
}

impl Presenter {
    /// A presenter with nothing painted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows currently occupied by the region.
    #[must_use]
    pub fn painted_rows(&self) -> usize {
        self.painted.len()
    }

    /// Lines currently painted.
    #[must_use]
    pub fn painted(&self) -> &[Line] {
        &self.painted
    }

    /// Paint `next`, touching only rows that changed.
    ///
    /// On error the painted state is left as it was; the terminal contents
    /// are then unknown.
    pub fn present<W: Write>(
        &mut self,
        writer: &mut TerminalWriter<W>,
        next: &Frame,
    ) -> io::Result<usize> {
        let edits = diff_lines(&self.painted, next.lines());
        if is_noop(&edits) {
            return Ok(0);
        }
        let changed = self.apply(writer, &edits)?;
        self.painted = next.lines().to_vec();
        Ok(changed)
    }

    fn apply<W: Write>(
        &self,
        writer: &mut TerminalWriter<W>,
        edits: &[LineEdit],
    ) -> io::Result<usize> {
        writer.move_cursor_up(self.painted.len())?;
        let mut skip = 0;
        let mut changed = 0;
        for edit in edits {
            match edit {
                LineEdit::Unchanged(_) => skip += 1,
                LineEdit::Replace(_, line) | LineEdit::Insert(_, line) => {
                    writer.move_cursor_down(std::mem::take(&mut skip))?;
                    writer.clear_line()?;
                    writer.write_line(line)?;
                    writer.newline()?;
                    changed += 1;
                }
                LineEdit::Delete(_) => {
                    writer.move_cursor_down(std::mem::take(&mut skip))?;
                    writer.clear_from_cursor_down()?;
                    changed += 1;
                    break;
                }
            }
        }
        writer.move_cursor_down(skip)?;
        Ok(changed)
    }

    /// Print `lines` above the region, then repaint the region beneath them.
    pub fn write_above<W: Write>(
        &mut self,
        writer: &mut TerminalWriter<W>,
        lines: &[Line],
    ) -> io::Result<()> {
        if lines.is_empty() {
            return Ok(());
        }
        writer.move_cursor_up(self.painted.len())?;
        writer.clear_from_cursor_down()?;
        for line in lines.iter().chain(self.painted.iter()) {
            writer.write_line(line)?;
            writer.newline()?;
        }
        Ok(())
    }

    /// Erase the region and forget it.
    pub fn clear<W: Write>(&mut self, writer: &mut TerminalWriter<W>) -> io::Result<()> {
        if self.painted.is_empty() {
            return Ok(());
        }
        writer.move_cursor_up(self.painted.len())?;
        writer.clear_from_cursor_down()?;
        self.painted.clear();
        Ok(())
    }

    /// Write `frame` as permanent output below whatever is on screen.
    ///
    /// Used for the final frame of a plain stream, where nothing was
    /// painted in place.
    pub fn append<W: Write>(
        &mut self,
        writer: &mut TerminalWriter<W>,
        frame: &Frame,
    ) -> io::Result<()> {
        for line in frame.lines() {
            writer.write_line(line)?;
            writer.newline()?;
        }
        Ok(())
    }

    /// Leave the painted rows on screen as ordinary output.
    pub fn release(&mut self) {
        self.painted.clear();
    }
}
