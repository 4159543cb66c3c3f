#![forbid(unsafe_code)]

//! Line diff between two frames.
//!
//! The diff is a positional, row-by-row comparison. Live regions are short
//! and mostly stable from tick to tick (a handful of progress rows whose
//! text changes in place), so an O(n) scan that keeps rows anchored is
//! preferable to a minimal edit script that shuffles them around.
//!
//! # Algorithm
//!
//! 1. For every row present in both frames, emit `Unchanged` when the lines
//!    are equal and `Replace` otherwise.
//! 2. Rows present only in `next` are `Insert`.
//! 3. Rows present only in `previous` are `Delete`.
//!
//! Edits are emitted in ascending row order, one per row of the longer
//! frame.
//!
//! ```
//! use inkline_render::diff::{LineEdit, apply_edits, diff};
//! use inkline_render::frame::Frame;
//!
//! let a = Frame::new(20).with_line("download  40%").with_line("extract");
//! let b = Frame::new(20).with_line("download  80%").with_line("extract");
//!
//! let edits = diff(&a, &b);
//! assert!(matches!(edits[0], LineEdit::Replace(0, _)));
//! assert_eq!(edits[1], LineEdit::Unchanged(1));
//!
//! let mut rows = a.lines().to_vec();
//! apply_edits(&mut rows, &edits);
//! assert_eq!(rows, b.lines());
//! ```

use crate::frame::{Frame, Line};

/// One row-level instruction for reconciling a painted frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEdit {
    /// Row is identical in both frames.
    Unchanged(usize),
    /// Row exists in both frames with different content.
    Replace(usize, Line),
    /// Row exists only in the new frame.
    Insert(usize, Line),
    /// Row exists only in the previous frame.
    Delete(usize),
}

impl LineEdit {
    /// Row this edit addresses.
    #[must_use]
    pub fn row(&self) -> usize {
        match self {
            Self::Unchanged(row) | Self::Delete(row) => *row,
            Self::Replace(row, _) | Self::Insert(row, _) => *row,
        }
    }

    /// True for `Unchanged`.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Unchanged(_))
    }
}

/// Compute row edits turning `previous` into `next`.
#[must_use]
pub fn diff(previous: &Frame, next: &Frame) -> Vec<LineEdit> {
    diff_lines(previous.lines(), next.lines())
}

/// [`diff`] over raw line slices.
#[must_use]
pub fn diff_lines(previous: &[Line], next: &[Line]) -> Vec<LineEdit> {
    #[cfg(feature = "tracing")]
    let _span = tracing::trace_span!("frame_diff", prev = previous.len(), next = next.len())
        .entered();

    let rows = previous.len().max(next.len());
    let mut edits = Vec::with_capacity(rows);
    for row in 0..rows {
        let edit = match (previous.get(row), next.get(row)) {
            (Some(old), Some(new)) if old == new => LineEdit::Unchanged(row),
            (Some(_), Some(new)) => LineEdit::Replace(row, new.clone()),
            (None, Some(new)) => LineEdit::Insert(row, new.clone()),
            (Some(_), None) => LineEdit::Delete(row),
            (None, None) => unreachable!("row below both frame heights"),
        };
        edits.push(edit);
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
        changed = edits.iter().filter(|e| !e.is_noop()).count(),
        "frame diff computed"
    );
    edits
}

/// Apply `edits` to a line vector in place.
///
/// This is the reference semantics the presenter reproduces on a terminal.
pub fn apply_edits(lines: &mut Vec<Line>, edits: &[LineEdit]) {
    for edit in edits {
        match edit {
            LineEdit::Unchanged(_) => {}
            LineEdit::Replace(row, line) => {
                if let Some(slot) = lines.get_mut(*row) {
                    *slot = line.clone();
                }
            }
            LineEdit::Insert(row, line) => {
                let at = (*row).min(lines.len());
                lines.insert(at, line.clone());
            }
            LineEdit::Delete(row) => {
                lines.truncate(*row);
                return;
            }
        }
    }
}

/// True when every edit is `Unchanged`.
#[must_use]
pub fn is_noop(edits: &[LineEdit]) -> bool {
    edits.iter().all(LineEdit::is_noop)
}
