#![forbid(unsafe_code)]

//! Progress for plain iteration.
//!
//! [`TaskRegistry::track`] wraps an iterator in a task that advances by one
//! for every item consumed. The task's total comes from an exact size hint;
//! otherwise it stays unknown until the iterator runs dry, at which point
//! the total is set to the number of items seen.

use std::iter::FusedIterator;

use crate::error::LiveError;
use crate::registry::{TaskId, TaskRegistry, TaskUpdate};

/// Iterator adapter returned by [`TaskRegistry::track`].
#[derive(Debug)]
pub struct Track<I> {
    inner: I,
    registry: TaskRegistry,
    id: TaskId,
    pending: bool,
    seen: u64,
    done: bool,
}

impl TaskRegistry {
    /// Add a task described by `description` and advance it once per item.
    ///
    /// An item counts as done when the next one is requested, so the task
    /// reaches 100% only after the last item's work finishes.
    ///
    /// ```
    /// use inkline_runtime::TaskRegistry;
    ///
    /// let tasks = TaskRegistry::new();
    /// let sum: u32 = tasks.track(1..=4, "Summing").sum();
    /// assert_eq!(sum, 10);
    /// assert!(tasks.is_finished());
    /// ```
    pub fn track<I>(&self, iter: I, description: impl Into<String>) -> Track<I::IntoIter>
    where
        I: IntoIterator,
    {
        let inner = iter.into_iter();
        let total = match inner.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(lower as f64),
            _ => None,
        };
        let id = self.add(description, total);
        Track {
            inner,
            registry: self.clone(),
            id,
            pending: false,
            seen: 0,
            done: false,
        }
    }
}

impl<I> Track<I> {
    /// The task driven by this iterator.
    pub fn task_id(&self) -> TaskId {
        self.id
    }

    fn settle(&mut self) {
        if std::mem::take(&mut self.pending) {
            // The task may have been removed meanwhile; iteration goes on.
            let _ = self.registry.advance(self.id, 1.0);
        }
    }
}

impl<I: Iterator> Iterator for Track<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.done {
            return None;
        }
        self.settle();
        match self.inner.next() {
            Some(item) => {
                self.pending = true;
                self.seen += 1;
                Some(item)
            }
            None => {
                self.done = true;
                let seen = self.seen as f64;
                let update = TaskUpdate::new().total(seen).completed(seen);
                match self.registry.update(self.id, update) {
                    // Removed while iterating: nothing left to finish.
                    Ok(()) | Err(LiveError::UnknownTask(_)) => {}
                    Err(e) => {
                        tracing::warn!(task = %self.id, error = %e, "tracked task not finished");
                    }
                }
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            self.inner.size_hint()
        }
    }
}

impl<I: Iterator> FusedIterator for Track<I> {}
