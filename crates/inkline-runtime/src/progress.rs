#![forbid(unsafe_code)]

//! Built-in progress view: one row per visible task.
//!
//! Columns, left to right: description (padded to the widest), bar,
//! percentage, and remaining time (elapsed time once finished). The bar
//! shrinks to fit the frame width and disappears when there is no room.
//! Tasks without a total get a pulsing bar and no percentage.

use std::time::Duration;

use unicode_width::UnicodeWidthStr;

use inkline_render::frame::{Frame, Line, Span};
use inkline_render::style::{Color, Style};

use crate::registry::Task;
use crate::source::{RenderContext, RenderSource};

const DEFAULT_BAR_WIDTH: u16 = 40;
const MIN_BAR_WIDTH: usize = 4;
const BAR_FULL: &str = "━";
const BAR_HALF: &str = "╸";
const UNKNOWN_TIME: &str = "-:--:--";

const COMPLETE: Style = Style::new().fg(Color::Rgb(249, 38, 114));
const FINISHED: Style = Style::new().fg(Color::Rgb(114, 156, 31));
const BACK: Style = Style::new().fg(Color::Rgb(58, 58, 58));
const PERCENT: Style = Style::new().fg(Color::MAGENTA);
const REMAINING: Style = Style::new().fg(Color::CYAN);
const ELAPSED: Style = Style::new().fg(Color::YELLOW);

/// Format a duration as `h:mm:ss`.
pub fn format_hms(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Renders every visible task as a progress row.
#[derive(Debug, Clone)]
pub struct ProgressView {
    bar_width: u16,
    show_percentage: bool,
    show_time: bool,
}

impl Default for ProgressView {
    fn default() -> Self {
        Self {
            bar_width: DEFAULT_BAR_WIDTH,
            show_percentage: true,
            show_time: true,
        }
    }
}

impl ProgressView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preferred bar width; the bar still shrinks to fit.
    #[must_use]
    pub fn bar_width(mut self, width: u16) -> Self {
        self.bar_width = width;
        self
    }

    #[must_use]
    pub fn show_percentage(mut self, show: bool) -> Self {
        self.show_percentage = show;
        self
    }

    #[must_use]
    pub fn show_time(mut self, show: bool) -> Self {
        self.show_time = show;
        self
    }

    fn bar(&self, task: &Task, width: usize, tick: u64) -> Vec<Span> {
        let Some(fraction) = task.fraction() else {
            return pulse(width, tick);
        };
        let fill = if task.is_finished() { FINISHED } else { COMPLETE };
        let exact = fraction * width as f64;
        let full = (exact.floor() as usize).min(width);
        let half = full < width && exact - full as f64 >= 0.5;
        let back = width - full - usize::from(half);

        let mut spans = vec![Span::styled(BAR_FULL.repeat(full), fill)];
        if half {
            spans.push(Span::styled(BAR_HALF, fill));
        }
        spans.push(Span::styled(BAR_FULL.repeat(back), BACK));
        spans
    }

    fn row(&self, task: &Task, desc_width: usize, bar_width: usize, tick: u64) -> Line {
        let mut line = Line::new();
        let description = Line::styled(task.description(), task.style()).truncated(desc_width);
        let pad = desc_width.saturating_sub(description.width());
        for span in description.spans() {
            line.push(span.clone());
        }
        line.push(Span::raw(" ".repeat(pad)));
        if bar_width > 0 {
            line.push(Span::raw(" "));
            for span in self.bar(task, bar_width, tick) {
                line.push(span);
            }
        }
        if self.show_percentage {
            let pct = task
                .percentage()
                .map_or_else(|| "    ".to_string(), |p| format!("{:>3.0}%", p.floor()));
            line.push(Span::raw(" "));
            line.push(Span::styled(pct, PERCENT));
        }
        if self.show_time {
            line.push(Span::raw(" "));
            line.push(if task.is_finished() {
                Span::styled(format_hms(task.elapsed()), ELAPSED)
            } else {
                let eta = task.eta().map_or_else(|| UNKNOWN_TIME.to_string(), format_hms);
                Span::styled(eta, REMAINING)
            });
        }
        line
    }
}

fn pulse(width: usize, tick: u64) -> Vec<Span> {
    if width == 0 {
        return Vec::new();
    }
    let segment = (width / 4).max(1);
    let offset = (tick % width as u64) as usize;
    (0..width)
        .map(|i| {
            let lit = (i + width - offset) % width < segment;
            Span::styled(BAR_FULL, if lit { COMPLETE } else { BACK })
        })
        .collect()
}

impl RenderSource for ProgressView {
    fn produce(&mut self, ctx: &RenderContext<'_>) -> Frame {
        let mut frame = ctx.frame();
        let width = ctx.width as usize;
        let desc_width = ctx
            .tasks
            .iter()
            .map(|t| t.description().width())
            .max()
            .unwrap_or(0)
            .min(width / 2);

        let mut fixed = desc_width + 1;
        if self.show_percentage {
            fixed += 5;
        }
        if self.show_time {
            fixed += 1 + UNKNOWN_TIME.len();
        }
        let room = width.saturating_sub(fixed);
        let bar_width = (self.bar_width as usize).min(room);
        let bar_width = if bar_width < MIN_BAR_WIDTH { 0 } else { bar_width };

        for task in ctx.tasks {
            frame.push(self.row(task, desc_width, bar_width, ctx.tick));
        }
        frame
    }
}
