#![forbid(unsafe_code)]

//! Task registry: the progress state a live region renders.
//!
//! A [`TaskRegistry`] is a cheap, cloneable handle to a list of [`Task`]s
//! behind one mutex. Any number of producers may mutate it concurrently;
//! [`snapshot`](TaskRegistry::snapshot) clones the whole list under the same
//! lock, so a tick never observes a half-applied update.
//!
//! Mutations only touch memory. Changes that alter the shape of the region
//! (a task added, removed, finished, renamed, hidden or reset) additionally
//! wake the session's refresh thread; a plain `advance` is left to the next
//! periodic tick.
//!
//! ```
//! use inkline_runtime::registry::TaskRegistry;
//!
//! let tasks = TaskRegistry::new();
//! let download = tasks.add("download", Some(100.0));
//! tasks.advance(download, 40.0).unwrap();
//! tasks.advance(download, 70.0).unwrap();
//!
//! let task = tasks.get(download).unwrap();
//! assert_eq!(task.completed(), 100.0);
//! assert!(task.is_finished());
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use inkline_render::style::Style;

use crate::error::{LiveError, LiveResult};
use crate::signal::RefreshSignal;

/// Opaque task handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    /// Rebuild an id from its raw value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw value.
    #[must_use]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// What happens when an operation would push `completed` past `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalPolicy {
    /// Clamp `completed` to `total`.
    #[default]
    Clamp,
    /// Reject the operation with [`LiveError::InvalidTotal`].
    Strict,
}

/// What happens to finished tasks as ticks go by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retention {
    /// Keep rendering finished tasks until they are removed.
    #[default]
    Keep,
    /// Hide a finished task once it has been finished for this many ticks.
    HideAfter(u32),
    /// Remove a finished task once it has been finished for this many ticks.
    RemoveAfter(u32),
}

/// One trackable unit of progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    id: TaskId,
    description: String,
    style: Style,
    total: Option<f64>,
    completed: f64,
    started_at: Instant,
    finished_at: Option<Instant>,
    visible: bool,
    finished_ticks: u32,
}

impl Task {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Style the description is drawn with.
    pub fn style(&self) -> Style {
        self.style
    }

    /// Declared total, `None` while indeterminate.
    pub fn total(&self) -> Option<f64> {
        self.total
    }

    pub fn completed(&self) -> f64 {
        self.completed
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<Instant> {
        self.finished_at
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Units left, when the total is known.
    pub fn remaining(&self) -> Option<f64> {
        self.total.map(|t| (t - self.completed).max(0.0))
    }

    /// Completion in `0.0..=1.0`, when the total is known.
    pub fn fraction(&self) -> Option<f64> {
        self.total.map(|t| {
            if t <= 0.0 {
                1.0
            } else {
                (self.completed / t).clamp(0.0, 1.0)
            }
        })
    }

    /// Completion in `0.0..=100.0`, when the total is known.
    pub fn percentage(&self) -> Option<f64> {
        self.fraction().map(|f| f * 100.0)
    }

    /// Time since start, frozen once finished.
    pub fn elapsed(&self) -> Duration {
        let end = self.finished_at.unwrap_or_else(Instant::now);
        end.saturating_duration_since(self.started_at)
    }

    /// Average units per second since start.
    pub fn speed(&self) -> Option<f64> {
        let secs = self.elapsed().as_secs_f64();
        (secs > 0.0 && self.completed > 0.0).then(|| self.completed / secs)
    }

    /// Estimated time to completion at the average speed.
    pub fn eta(&self) -> Option<Duration> {
        if self.is_finished() {
            return Some(Duration::ZERO);
        }
        let remaining = self.remaining()?;
        let speed = self.speed()?;
        Duration::try_from_secs_f64(remaining / speed).ok()
    }

    fn check_finished(&mut self, now: Instant) -> bool {
        let done = self.total.is_some_and(|t| self.completed >= t);
        match (done, self.finished_at) {
            (true, None) => {
                self.finished_at = Some(now);
                self.finished_ticks = 0;
                true
            }
            (false, Some(_)) => {
                self.finished_at = None;
                true
            }
            _ => false,
        }
    }
}

/// Options for [`TaskRegistry::add_task`].
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
    description: String,
    style: Style,
    total: Option<f64>,
    completed: f64,
    visible: bool,
}

impl TaskSpec {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            style: Style::new(),
            total: None,
            completed: 0.0,
            visible: true,
        }
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn total(mut self, total: f64) -> Self {
        self.total = Some(total);
        self
    }

    /// Units already done when the task is added.
    #[must_use]
    pub fn completed(mut self, completed: f64) -> Self {
        self.completed = completed;
        self
    }

    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Field changes for [`TaskRegistry::update`]. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    /// New completion. Values below the current completion are ignored.
    pub completed: Option<f64>,
    /// New declared total.
    pub total: Option<f64>,
    pub description: Option<String>,
    pub style: Option<Style>,
    pub visible: Option<bool>,
}

impl TaskUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn completed(mut self, completed: f64) -> Self {
        self.completed = Some(completed);
        self
    }

    #[must_use]
    pub fn total(mut self, total: f64) -> Self {
        self.total = Some(total);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }
}

/// Negative and non-finite totals mean "unknown".
fn sanitize_total(total: Option<f64>) -> Option<f64> {
    total.filter(|t| t.is_finite() && *t >= 0.0)
}

#[derive(Debug)]
struct Inner {
    tasks: Vec<Task>,
    next_id: u64,
    policy: TotalPolicy,
}

/// Shared, insertion-ordered set of tasks.
#[derive(Debug, Clone)]
pub struct TaskRegistry {
    inner: Arc<Mutex<Inner>>,
    signal: RefreshSignal,
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRegistry {
    /// An empty registry with the clamping total policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(TotalPolicy::Clamp)
    }

    /// An empty registry with an explicit total policy.
    #[must_use]
    pub fn with_policy(policy: TotalPolicy) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                tasks: Vec::new(),
                next_id: 1,
                policy,
            })),
            signal: RefreshSignal::new(),
        }
    }

    pub fn policy(&self) -> TotalPolicy {
        self.lock().policy
    }

    pub(crate) fn refresh_signal(&self) -> RefreshSignal {
        self.signal.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every mutation validates before it writes, so a panic while the
        // lock is held cannot leave a task half-updated.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a task and return its id.
    pub fn add(&self, description: impl Into<String>, total: Option<f64>) -> TaskId {
        let mut spec = TaskSpec::new(description);
        spec.total = total;
        self.add_task(spec)
    }

    /// Add a task with the full option set.
    ///
    /// A starting completion past the total is clamped regardless of policy.
    pub fn add_task(&self, spec: TaskSpec) -> TaskId {
        let now = Instant::now();
        let id = {
            let mut inner = self.lock();
            let id = TaskId(inner.next_id);
            inner.next_id += 1;
            let total = sanitize_total(spec.total);
            let mut completed = if spec.completed.is_finite() {
                spec.completed.max(0.0)
            } else {
                0.0
            };
            if let Some(t) = total {
                completed = completed.min(t);
            }
            let mut task = Task {
                id,
                description: spec.description,
                style: spec.style,
                total,
                completed,
                started_at: now,
                finished_at: None,
                visible: spec.visible,
                finished_ticks: 0,
            };
            task.check_finished(now);
            inner.tasks.push(task);
            id
        };
        tracing::debug!(task = %id, "task added");
        self.signal.request();
        id
    }

    fn with_task<T>(
        &self,
        id: TaskId,
        f: impl FnOnce(&mut Task, TotalPolicy) -> LiveResult<T>,
    ) -> LiveResult<T> {
        let mut inner = self.lock();
        let policy = inner.policy;
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(LiveError::UnknownTask(id))?;
        f(task, policy)
    }

    /// Add `delta` units to a task's completion.
    ///
    /// Negative and non-finite deltas are ignored. Advancing a finished task
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// [`LiveError::UnknownTask`] for an unknown id; [`LiveError::InvalidTotal`]
    /// when the strict policy is active and the advance would overshoot.
    pub fn advance(&self, id: TaskId, delta: f64) -> LiveResult<()> {
        let finished = self.with_task(id, |task, policy| {
            if !delta.is_finite() || delta <= 0.0 || task.is_finished() {
                return Ok(false);
            }
            let attempted = task.completed + delta;
            let completed = match (task.total, policy) {
                (Some(total), TotalPolicy::Strict) if attempted > total => {
                    return Err(LiveError::InvalidTotal {
                        id,
                        total,
                        attempted,
                    });
                }
                (Some(total), _) => attempted.min(total),
                (None, _) => attempted,
            };
            task.completed = completed;
            Ok(task.check_finished(Instant::now()))
        })?;
        if finished {
            tracing::debug!(task = %id, "task finished");
            self.signal.request();
        }
        Ok(())
    }

    /// Change several fields of a task at once.
    ///
    /// The update is validated as a whole before anything is written.
    ///
    /// # Errors
    ///
    /// [`LiveError::UnknownTask`] for an unknown id; under the strict policy
    /// [`LiveError::InvalidTotal`] when the resulting completion would exceed
    /// the resulting total.
    pub fn update(&self, id: TaskId, update: TaskUpdate) -> LiveResult<()> {
        let significant = self.with_task(id, |task, policy| {
            let total = match update.total {
                Some(t) => sanitize_total(Some(t)),
                None => task.total,
            };
            let mut completed = match update.completed {
                Some(c) if c.is_finite() => c.max(task.completed),
                _ => task.completed,
            };
            if let Some(total) = total
                && completed > total
            {
                if policy == TotalPolicy::Strict {
                    return Err(LiveError::InvalidTotal {
                        id,
                        total,
                        attempted: completed,
                    });
                }
                completed = total;
            }

            let mut significant = false;
            if let Some(description) = update.description
                && description != task.description
            {
                task.description = description;
                significant = true;
            }
            if let Some(style) = update.style
                && style != task.style
            {
                task.style = style;
                significant = true;
            }
            if let Some(visible) = update.visible
                && visible != task.visible
            {
                task.visible = visible;
                significant = true;
            }
            task.total = total;
            task.completed = completed;
            significant |= task.check_finished(Instant::now());
            Ok(significant)
        })?;
        if significant {
            self.signal.request();
        }
        Ok(())
    }

    /// Restart a task from zero.
    ///
    /// # Errors
    ///
    /// [`LiveError::UnknownTask`] for an unknown id.
    pub fn reset(&self, id: TaskId) -> LiveResult<()> {
        self.with_task(id, |task, _| {
            let now = Instant::now();
            task.completed = 0.0;
            task.started_at = now;
            task.finished_at = None;
            task.finished_ticks = 0;
            task.check_finished(now);
            Ok(())
        })?;
        self.signal.request();
        Ok(())
    }

    /// Remove a task, returning its final state.
    ///
    /// # Errors
    ///
    /// [`LiveError::UnknownTask`] for an unknown id.
    pub fn remove(&self, id: TaskId) -> LiveResult<Task> {
        let task = {
            let mut inner = self.lock();
            let index = inner
                .tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or(LiveError::UnknownTask(id))?;
            inner.tasks.remove(index)
        };
        tracing::debug!(task = %id, "task removed");
        self.signal.request();
        Ok(task)
    }

    /// A copy of one task.
    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.lock().tasks.iter().find(|t| t.id == id).cloned()
    }

    /// Every task in insertion order.
    pub fn snapshot(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    /// Visible tasks in insertion order.
    pub fn visible_snapshot(&self) -> Vec<Task> {
        self.lock()
            .tasks
            .iter()
            .filter(|t| t.visible)
            .cloned()
            .collect()
    }

    /// True when every task is finished (vacuously true when empty).
    pub fn is_finished(&self) -> bool {
        self.lock().tasks.iter().all(Task::is_finished)
    }

    pub fn len(&self) -> usize {
        self.lock().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().tasks.is_empty()
    }

    /// Age finished tasks by one tick and apply `retention`.
    ///
    /// Returns the number of tasks hidden or removed.
    pub(crate) fn retire(&self, retention: Retention) -> usize {
        let mut inner = self.lock();
        for task in inner.tasks.iter_mut().filter(|t| t.is_finished()) {
            task.finished_ticks = task.finished_ticks.saturating_add(1);
        }
        let expired = |t: &Task, after: u32| t.is_finished() && t.finished_ticks > after;
        let retired = match retention {
            Retention::Keep => 0,
            Retention::HideAfter(after) => {
                let mut hidden = 0;
                for task in inner.tasks.iter_mut() {
                    if task.visible && expired(task, after) {
                        task.visible = false;
                        hidden += 1;
                    }
                }
                hidden
            }
            Retention::RemoveAfter(after) => {
                let before = inner.tasks.len();
                inner.tasks.retain(|t| !expired(t, after));
                before - inner.tasks.len()
            }
        };
        if retired > 0 {
            tracing::debug!(retired, ?retention, "finished tasks retired");
        }
        retired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_clamps_and_finishes() {
        let tasks = TaskRegistry::new();
        let id = tasks.add("download", Some(100.0));
        tasks.advance(id, 40.0).unwrap();
        assert!(!tasks.get(id).unwrap().is_finished());
        tasks.advance(id, 70.0).unwrap();
        let task = tasks.get(id).unwrap();
        assert_eq!(task.completed(), 100.0);
        assert!(task.is_finished());
        assert_eq!(task.percentage(), Some(100.0));
        assert_eq!(task.eta(), Some(Duration::ZERO));
    }

    #[test]
    fn strict_policy_rejects_overshoot_without_change() {
        let tasks = TaskRegistry::with_policy(TotalPolicy::Strict);
        let id = tasks.add("upload", Some(10.0));
        tasks.advance(id, 8.0).unwrap();
        let err = tasks.advance(id, 5.0).unwrap_err();
        assert!(matches!(
            err,
            LiveError::InvalidTotal { total, attempted, .. } if total == 10.0 && attempted == 13.0
        ));
        assert_eq!(tasks.get(id).unwrap().completed(), 8.0);
        tasks.advance(id, 2.0).unwrap();
        assert!(tasks.get(id).unwrap().is_finished());
    }

    #[test]
    fn strict_policy_rejects_total_below_completion() {
        let tasks = TaskRegistry::with_policy(TotalPolicy::Strict);
        let id = tasks.add("scan", None);
        tasks.advance(id, 50.0).unwrap();
        assert!(tasks.update(id, TaskUpdate::new().total(20.0)).is_err());
        assert_eq!(tasks.get(id).unwrap().total(), None);
    }

    #[test]
    fn remove_middle_keeps_relative_order() {
        let tasks = TaskRegistry::new();
        let a = tasks.add("a", None);
        let b = tasks.add("b", None);
        let c = tasks.add("c", None);
        let removed = tasks.remove(b).unwrap();
        assert_eq!(removed.description(), "b");
        let ids: Vec<_> = tasks.snapshot().iter().map(Task::id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn unknown_ids_fail() {
        let tasks = TaskRegistry::new();
        let id = tasks.add("gone", None);
        tasks.remove(id).unwrap();
        assert!(matches!(tasks.advance(id, 1.0), Err(LiveError::UnknownTask(x)) if x == id));
        assert!(matches!(tasks.update(id, TaskUpdate::new()), Err(LiveError::UnknownTask(_))));
        assert!(matches!(tasks.reset(id), Err(LiveError::UnknownTask(_))));
        assert!(matches!(tasks.remove(id), Err(LiveError::UnknownTask(_))));
        assert!(tasks.get(id).is_none());
    }

    #[test]
    fn negative_and_nan_deltas_are_ignored() {
        let tasks = TaskRegistry::new();
        let id = tasks.add("x", Some(10.0));
        tasks.advance(id, 3.0).unwrap();
        tasks.advance(id, -2.0).unwrap();
        tasks.advance(id, f64::NAN).unwrap();
        tasks.advance(id, f64::INFINITY).unwrap();
        assert_eq!(tasks.get(id).unwrap().completed(), 3.0);
    }

    #[test]
    fn update_never_lowers_completion() {
        let tasks = TaskRegistry::new();
        let id = tasks.add("x", None);
        tasks.advance(id, 5.0).unwrap();
        tasks.update(id, TaskUpdate::new().completed(2.0)).unwrap();
        assert_eq!(tasks.get(id).unwrap().completed(), 5.0);
        tasks.update(id, TaskUpdate::new().completed(7.5)).unwrap();
        assert_eq!(tasks.get(id).unwrap().completed(), 7.5);
    }

    #[test]
    fn update_total_can_finish_and_unfinish() {
        let tasks = TaskRegistry::new();
        let id = tasks.add("x", None);
        tasks.advance(id, 5.0).unwrap();
        tasks.update(id, TaskUpdate::new().total(5.0)).unwrap();
        assert!(tasks.get(id).unwrap().is_finished());
        tasks.update(id, TaskUpdate::new().total(8.0)).unwrap();
        let task = tasks.get(id).unwrap();
        assert!(!task.is_finished());
        assert_eq!(task.remaining(), Some(3.0));
    }

    #[test]
    fn update_renames_and_hides() {
        let tasks = TaskRegistry::new();
        let id = tasks.add("old", None);
        tasks
            .update(id, TaskUpdate::new().description("new").visible(false))
            .unwrap();
        let task = tasks.get(id).unwrap();
        assert_eq!(task.description(), "new");
        assert!(!task.is_visible());
        assert!(tasks.visible_snapshot().is_empty());
        assert_eq!(tasks.snapshot().len(), 1);
    }

    #[test]
    fn reset_restarts_progress() {
        let tasks = TaskRegistry::new();
        let id = tasks.add("x", Some(2.0));
        tasks.advance(id, 2.0).unwrap();
        assert!(tasks.is_finished());
        tasks.reset(id).unwrap();
        let task = tasks.get(id).unwrap();
        assert_eq!(task.completed(), 0.0);
        assert!(!task.is_finished());
        assert!(!tasks.is_finished());
    }

    #[test]
    fn add_task_options() {
        let tasks = TaskRegistry::new();
        let id = tasks.add_task(TaskSpec::new("pre").total(4.0).completed(9.0).visible(false));
        let task = tasks.get(id).unwrap();
        assert_eq!(task.completed(), 4.0);
        assert!(task.is_finished());
        assert!(!task.is_visible());
    }

    #[test]
    fn invalid_total_means_unknown() {
        let tasks = TaskRegistry::new();
        let id = tasks.add("x", Some(-5.0));
        assert_eq!(tasks.get(id).unwrap().total(), None);
        assert_eq!(tasks.get(id).unwrap().fraction(), None);
    }

    #[test]
    fn finished_tracks_all_tasks() {
        let tasks = TaskRegistry::new();
        assert!(tasks.is_finished());
        let a = tasks.add("a", Some(1.0));
        let b = tasks.add("b", Some(1.0));
        tasks.advance(a, 1.0).unwrap();
        assert!(!tasks.is_finished());
        tasks.advance(b, 1.0).unwrap();
        assert!(tasks.is_finished());
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn retention_hide_after_ticks() {
        let tasks = TaskRegistry::new();
        let id = tasks.add("x", Some(1.0));
        tasks.advance(id, 1.0).unwrap();
        assert_eq!(tasks.retire(Retention::HideAfter(2)), 0);
        assert_eq!(tasks.retire(Retention::HideAfter(2)), 0);
        assert_eq!(tasks.retire(Retention::HideAfter(2)), 1);
        assert!(!tasks.get(id).unwrap().is_visible());
        assert_eq!(tasks.retire(Retention::HideAfter(2)), 0);
    }

    #[test]
    fn retention_remove_after_ticks() {
        let tasks = TaskRegistry::new();
        let done = tasks.add("done", Some(1.0));
        let running = tasks.add("running", Some(1.0));
        tasks.advance(done, 1.0).unwrap();
        assert_eq!(tasks.retire(Retention::RemoveAfter(0)), 1);
        let ids: Vec<_> = tasks.snapshot().iter().map(Task::id).collect();
        assert_eq!(ids, vec![running]);
    }

    #[test]
    fn keep_retention_never_retires() {
        let tasks = TaskRegistry::new();
        let id = tasks.add("x", Some(1.0));
        tasks.advance(id, 1.0).unwrap();
        for _ in 0..10 {
            assert_eq!(tasks.retire(Retention::Keep), 0);
        }
        assert!(tasks.get(id).unwrap().is_visible());
    }

    #[test]
    fn significant_mutations_raise_refresh() {
        use crate::signal::Wake;

        let tasks = TaskRegistry::new();
        let signal = tasks.refresh_signal();
        let id = tasks.add("x", Some(10.0));
        assert_eq!(signal.wait_timeout(Duration::ZERO), Wake::Requested);

        tasks.advance(id, 1.0).unwrap();
        assert_eq!(signal.wait_timeout(Duration::ZERO), Wake::Timeout);

        tasks.advance(id, 9.0).unwrap();
        assert_eq!(signal.wait_timeout(Duration::ZERO), Wake::Requested);
    }

    #[test]
    fn concurrent_producers_serialize() {
        let tasks = TaskRegistry::new();
        let ids: Vec<_> = (0..4).map(|i| tasks.add(format!("w{i}"), None)).collect();
        let handles: Vec<_> = ids
            .iter()
            .map(|&id| {
                let tasks = tasks.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        tasks.advance(id, 0.5).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        for task in tasks.snapshot() {
            assert_eq!(task.completed(), 500.0);
        }
    }
}
