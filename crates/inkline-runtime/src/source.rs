#![forbid(unsafe_code)]

//! The render-source seam: anything that can compose a frame from task state.
//!
//! Built-in sources live in [`progress`](crate::progress) and
//! [`status`](crate::status); ad-hoc sources wrap a closure with
//! [`from_fn`]; [`Stack`] places one source above another.

use std::time::Duration;

use inkline_render::frame::{Frame, Overflow};

use crate::registry::Task;

/// Everything a source may look at when composing a frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Visible tasks in insertion order, from one consistent snapshot.
    pub tasks: &'a [Task],
    /// Time since the session started.
    pub elapsed: Duration,
    /// Tick counter, starting at zero.
    pub tick: u64,
    /// Width bound for the frame.
    pub width: u16,
    /// Overflow policy configured for the session.
    pub overflow: Overflow,
}

impl RenderContext<'_> {
    /// An empty frame with the session's width and overflow policy.
    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame::with_overflow(self.width, self.overflow)
    }
}

/// Produces the live region's content for one tick.
///
/// Implementations must not block; they run on the refresh thread while
/// the terminal is owned by the controller.
pub trait RenderSource {
    fn produce(&mut self, ctx: &RenderContext<'_>) -> Frame;
}

/// A source backed by a closure. See [`from_fn`].
#[derive(Clone)]
pub struct FnSource<F>(F);

impl<F> std::fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnSource")
    }
}

/// Turn a closure into a [`RenderSource`].
///
/// ```
/// use inkline_runtime::source::{RenderContext, RenderSource, from_fn};
/// # use inkline_render::frame::Overflow;
/// # use std::time::Duration;
///
/// let mut source = from_fn(|ctx| ctx.frame().with_line(format!("{} tasks", ctx.tasks.len())));
/// # let ctx = RenderContext { tasks: &[], elapsed: Duration::ZERO, tick: 0, width: 20, overflow: Overflow::Truncate };
/// assert_eq!(source.produce(&ctx).plain_lines(), vec!["0 tasks"]);
/// ```
pub fn from_fn<F>(f: F) -> FnSource<F>
where
    F: FnMut(&RenderContext<'_>) -> Frame,
{
    FnSource(f)
}

impl<F> RenderSource for FnSource<F>
where
    F: FnMut(&RenderContext<'_>) -> Frame,
{
    fn produce(&mut self, ctx: &RenderContext<'_>) -> Frame {
        (self.0)(ctx)
    }
}

/// Two sources stacked vertically: `top` above `bottom`.
#[derive(Debug, Clone)]
pub struct Stack<A, B> {
    pub top: A,
    pub bottom: B,
}

impl<A, B> Stack<A, B> {
    pub fn new(top: A, bottom: B) -> Self {
        Self { top, bottom }
    }
}

impl<A: RenderSource, B: RenderSource> RenderSource for Stack<A, B> {
    fn produce(&mut self, ctx: &RenderContext<'_>) -> Frame {
        let mut frame = ctx.frame();
        frame.extend(self.top.produce(ctx).lines().iter().cloned());
        frame.extend(self.bottom.produce(ctx).lines().iter().cloned());
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkline_render::frame::Line;

    fn ctx(width: u16) -> RenderContext<'static> {
        RenderContext {
            tasks: &[],
            elapsed: Duration::ZERO,
            tick: 7,
            width,
            overflow: Overflow::Truncate,
        }
    }

    #[test]
    fn closures_are_sources() {
        let mut source = from_fn(|ctx| ctx.frame().with_line(format!("tick {}", ctx.tick)));
        let frame = source.produce(&ctx(20));
        assert_eq!(frame.plain_lines(), vec!["tick 7"]);
        assert_eq!(frame.width(), 20);
    }

    #[test]
    fn stack_concatenates() {
        let top = from_fn(|ctx| ctx.frame().with_line("status"));
        let bottom = from_fn(|ctx| {
            let mut f = ctx.frame();
            f.extend([Line::raw("a"), Line::raw("b")]);
            f
        });
        let mut stack = Stack::new(top, bottom);
        assert_eq!(stack.produce(&ctx(10)).plain_lines(), vec!["status", "a", "b"]);
    }

    #[test]
    fn boxed_sources_delegate() {
        let mut boxed: Box<dyn RenderSource + Send> =
            Box::new(from_fn(|ctx| ctx.frame().with_line("boxed")));
        assert_eq!(boxed.produce(&ctx(10)).len(), 1);
    }
}
