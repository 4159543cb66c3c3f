#![forbid(unsafe_code)]

//! Status line: an animated spinner followed by a message.

use std::time::Duration;

use inkline_render::frame::{Frame, Line, Span};
use inkline_render::style::{Color, Style};

use crate::source::{RenderContext, RenderSource};

/// Braille dots.
pub const DOTS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
/// ASCII line.
pub const LINE: &[&str] = &["|", "/", "-", "\\"];

/// A spinner animation: frames shown in turn, one per `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spinner {
    pub frames: &'static [&'static str],
    pub interval: Duration,
}

impl Spinner {
    pub const DOTS: Spinner = Spinner {
        frames: DOTS,
        interval: Duration::from_millis(80),
    };
    pub const LINE: Spinner = Spinner {
        frames: LINE,
        interval: Duration::from_millis(130),
    };

    /// The frame to show `elapsed` after the animation started.
    ///
    /// Time-based rather than tick-based, so the animation speed does not
    /// depend on the refresh rate.
    pub fn frame_at(&self, elapsed: Duration) -> &'static str {
        if self.frames.is_empty() {
            return "";
        }
        let step = self.interval.as_millis().max(1);
        let index = (elapsed.as_millis() / step) % self.frames.len() as u128;
        self.frames[index as usize]
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::DOTS
    }
}

/// Renders `<spinner> <message>` on a single row.
#[derive(Debug, Clone)]
pub struct StatusView {
    message: Line,
    spinner: Spinner,
    spinner_style: Style,
}

impl StatusView {
    pub fn new(message: impl Into<Line>) -> Self {
        Self {
            message: message.into(),
            spinner: Spinner::default(),
            spinner_style: Style::new().fg(Color::GREEN),
        }
    }

    #[must_use]
    pub fn spinner(mut self, spinner: Spinner) -> Self {
        self.spinner = spinner;
        self
    }

    #[must_use]
    pub fn spinner_style(mut self, style: Style) -> Self {
        self.spinner_style = style;
        self
    }
}

impl RenderSource for StatusView {
    fn produce(&mut self, ctx: &RenderContext<'_>) -> Frame {
        let mut line = Line::from_spans([
            Span::styled(self.spinner.frame_at(ctx.elapsed), self.spinner_style),
            Span::raw(" "),
        ]);
        for span in self.message.spans() {
            line.push(span.clone());
        }
        ctx.frame().with_line(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkline_render::frame::Overflow;

    fn ctx_at(elapsed: Duration) -> RenderContext<'static> {
        RenderContext {
            tasks: &[],
            elapsed,
            tick: 0,
            width: 40,
            overflow: Overflow::Truncate,
        }
    }

    #[test]
    fn spinner_cycles_with_time() {
        let s = Spinner::DOTS;
        assert_eq!(s.frame_at(Duration::ZERO), "⠋");
        assert_eq!(s.frame_at(Duration::from_millis(79)), "⠋");
        assert_eq!(s.frame_at(Duration::from_millis(80)), "⠙");
        assert_eq!(s.frame_at(Duration::from_millis(800)), "⠋");
        assert_eq!(Spinner::LINE.frame_at(Duration::from_millis(390)), "\\");
    }

    #[test]
    fn status_line_has_spinner_then_message() {
        let mut view = StatusView::new(Line::styled("Monitoring...", Style::new().bold()));
        let frame = view.produce(&ctx_at(Duration::from_millis(160)));
        assert_eq!(frame.plain_lines(), vec!["⠹ Monitoring..."]);
        let spans = frame.lines()[0].spans();
        assert_eq!(spans[0].style(), Style::new().fg(Color::GREEN));
        assert_eq!(spans[2].style(), Style::new().bold());
    }

    #[test]
    fn custom_spinner() {
        let mut view = StatusView::new("working").spinner(Spinner::LINE);
        let frame = view.produce(&ctx_at(Duration::ZERO));
        assert_eq!(frame.plain_lines(), vec!["| working"]);
    }
}
