#![forbid(unsafe_code)]

//! Frames: the content of a live region for one tick.
//!
//! A [`Frame`] is an ordered list of [`Line`]s, each an ordered list of
//! styled [`Span`]s. The frame's width bound is fixed when it is created and
//! every pushed line is made to fit it according to the frame's
//! [`Overflow`] policy, so a presented frame never wraps on the terminal by
//! accident (which would desynchronise the row bookkeeping of the
//! presenter).
//!
//! Span text is sanitized on construction: a tab becomes a space and every
//! other control character is dropped.
//!
//! ```
//! use inkline_render::frame::{Frame, Line, Overflow, Span};
//! use inkline_render::style::Style;
//!
//! let mut frame = Frame::with_overflow(8, Overflow::Wrap);
//! frame.push(Line::from_spans([
//!     Span::styled("done", Style::new().bold()),
//!     Span::raw(" 100%"),
//! ]));
//! assert_eq!(frame.len(), 2);
//! assert_eq!(frame.lines()[0].plain_text(), "done 100");
//! assert_eq!(frame.lines()[1].plain_text(), "%");
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::style::Style;
use crate::text_width::{display_width, sanitize, split_at_width};

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Span {
    text: String,
    style: Style,
}

impl Span {
    /// An unstyled span.
    pub fn raw(text: impl AsRef<str>) -> Self {
        Self::styled(text, Style::new())
    }

    /// A styled span.
    pub fn styled(text: impl AsRef<str>, style: Style) -> Self {
        Self {
            text: sanitize(text.as_ref()),
            style,
        }
    }

    /// The (sanitized) text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The style.
    #[must_use]
    pub fn style(&self) -> Style {
        self.style
    }

    /// Display width in terminal columns.
    #[must_use]
    pub fn width(&self) -> usize {
        display_width(&self.text)
    }

    /// Copy of this span's style around `text`, which is already sanitized.
    fn with_text(&self, text: &str) -> Self {
        Self {
            text: text.to_string(),
            style: self.style,
        }
    }
}

impl From<&str> for Span {
    fn from(text: &str) -> Self {
        Self::raw(text)
    }
}

impl From<String> for Span {
    fn from(text: String) -> Self {
        Self::raw(text)
    }
}

/// One terminal row of styled spans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Line {
    spans: Vec<Span>,
}

impl Line {
    /// An empty line.
    #[must_use]
    pub const fn new() -> Self {
        Self { spans: Vec::new() }
    }

    /// A line of unstyled text.
    pub fn raw(text: impl AsRef<str>) -> Self {
        Self::from_spans([Span::raw(text)])
    }

    /// A line of uniformly styled text.
    pub fn styled(text: impl AsRef<str>, style: Style) -> Self {
        Self::from_spans([Span::styled(text, style)])
    }

    /// Build a line from spans. Empty spans are skipped.
    pub fn from_spans<I>(spans: I) -> Self
    where
        I: IntoIterator<Item = Span>,
    {
        Self {
            spans: spans.into_iter().filter(|s| !s.text.is_empty()).collect(),
        }
    }

    /// Append a span.
    pub fn push(&mut self, span: Span) {
        if !span.text.is_empty() {
            self.spans.push(span);
        }
    }

    /// Append a span, builder style.
    #[must_use]
    pub fn with(mut self, span: Span) -> Self {
        self.push(span);
        self
    }

    /// The spans in order.
    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// True when the line has no visible text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Display width in terminal columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    /// The concatenated text without styles.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(Span::text).collect()
    }

    /// Cut the line at `max` columns.
    #[must_use]
    pub fn truncated(&self, max: usize) -> Line {
        if self.width() <= max {
            return self.clone();
        }
        let mut out = Line::new();
        let mut remaining = max;
        for span in &self.spans {
            let (head, used, tail) = split_at_width(&span.text, remaining);
            out.push(span.with_text(head));
            remaining -= used;
            if !tail.is_empty() {
                break;
            }
        }
        out
    }

    /// Break the line into rows of at most `max` columns.
    ///
    /// Always returns at least one line. A grapheme wider than `max` can
    /// never fit and is dropped, as [`truncated`](Self::truncated) does.
    #[must_use]
    pub fn wrapped(&self, max: usize) -> Vec<Line> {
        if max == 0 {
            return vec![Line::new()];
        }
        if self.width() <= max {
            return vec![self.clone()];
        }

        let mut rows = Vec::new();
        let mut current = Line::new();
        let mut used = 0;

        for span in &self.spans {
            let mut rest = span.text.as_str();
            while !rest.is_empty() {
                let (head, head_width, tail) = split_at_width(rest, max - used);
                if head.is_empty() {
                    if used == 0 {
                        // Wider than a whole row.
                        let grapheme = rest.graphemes(true).next().unwrap_or(rest);
                        rest = &rest[grapheme.len()..];
                    } else {
                        rows.push(std::mem::take(&mut current));
                        used = 0;
                    }
                    continue;
                }
                current.push(span.with_text(head));
                used += head_width;
                rest = tail;
                if !rest.is_empty() || used == max {
                    rows.push(std::mem::take(&mut current));
                    used = 0;
                }
            }
        }
        if !current.is_empty() || rows.is_empty() {
            rows.push(current);
        }
        rows
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Self::raw(text)
    }
}

impl From<String> for Line {
    fn from(text: String) -> Self {
        Self::raw(text)
    }
}

impl From<Span> for Line {
    fn from(span: Span) -> Self {
        Self::from_spans([span])
    }
}

impl FromIterator<Span> for Line {
    fn from_iter<I: IntoIterator<Item = Span>>(iter: I) -> Self {
        Self::from_spans(iter)
    }
}

/// What happens to a line wider than the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Cut at the width bound.
    #[default]
    Truncate,
    /// Continue on following rows.
    Wrap,
}

/// The composed content of a live region for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u16,
    overflow: Overflow,
    lines: Vec<Line>,
}

impl Frame {
    /// An empty frame bounded to `width` columns, truncating overflow.
    #[must_use]
    pub fn new(width: u16) -> Self {
        Self::with_overflow(width, Overflow::Truncate)
    }

    /// An empty frame with an explicit overflow policy.
    #[must_use]
    pub fn with_overflow(width: u16, overflow: Overflow) -> Self {
        Self {
            width,
            overflow,
            lines: Vec::new(),
        }
    }

    /// Append a line, fitting it to the width bound.
    pub fn push(&mut self, line: impl Into<Line>) {
        let line = line.into();
        let max = self.width as usize;
        match self.overflow {
            Overflow::Truncate => self.lines.push(line.truncated(max)),
            Overflow::Wrap => self.lines.extend(line.wrapped(max)),
        }
    }

    /// Append several lines.
    pub fn extend<I, L>(&mut self, lines: I)
    where
        I: IntoIterator<Item = L>,
        L: Into<Line>,
    {
        for line in lines {
            self.push(line);
        }
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with_line(mut self, line: impl Into<Line>) -> Self {
        self.push(line);
        self
    }

    /// The width bound.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// The overflow policy.
    #[must_use]
    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    /// The rows, top to bottom.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the frame has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Keep only the newest `max_rows` rows; older rows scroll off.
    #[must_use]
    pub fn tail(mut self, max_rows: usize) -> Self {
        if self.lines.len() > max_rows {
            let excess = self.lines.len() - max_rows;
            self.lines.drain(..excess);
        }
        self
    }

    /// Rows as plain text, for assertions and plain-mode output.
    #[must_use]
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines.iter().map(Line::plain_text).collect()
    }
}
