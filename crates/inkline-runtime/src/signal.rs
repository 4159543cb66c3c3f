#![forbid(unsafe_code)]

//! Wakeup primitive for the refresh thread.
//!
//! The refresh thread sleeps on a condition variable with a timeout equal to
//! the refresh interval. Significant registry mutations, queued log lines
//! and explicit refresh requests cut the sleep short; stopping the session
//! ends it for good. Several requests raised during one sleep collapse
//! into a single wakeup.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Why a wait returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wake {
    /// The session is stopping.
    Stopped,
    /// A refresh was requested before the timeout.
    Requested,
    /// The refresh interval elapsed.
    Timeout,
}

#[derive(Debug, Default)]
struct SignalState {
    requested: bool,
    stopped: bool,
}

/// Shared wakeup flag between mutators and the refresh thread.
#[derive(Debug, Clone, Default)]
pub(crate) struct RefreshSignal {
    inner: Arc<(Mutex<SignalState>, Condvar)>,
}

impl RefreshSignal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SignalState> {
        self.inner
            .0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Ask for a tick as soon as possible.
    pub(crate) fn request(&self) {
        let mut state = self.lock();
        if !state.requested {
            state.requested = true;
            self.inner.1.notify_all();
        }
    }

    /// Stop the waiter. Permanent.
    pub(crate) fn stop(&self) {
        self.lock().stopped = true;
        self.inner.1.notify_all();
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Block until a request, a stop, or `timeout`, whichever comes first.
    ///
    /// Spurious wakeups are absorbed: the wait resumes with the remaining
    /// time. A timeout past the clock's range waits for a request or stop.
    pub(crate) fn wait_timeout(&self, timeout: Duration) -> Wake {
        let (_, cvar) = &*self.inner;
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.lock();
        loop {
            if state.stopped {
                return Wake::Stopped;
            }
            if state.requested {
                state.requested = false;
                return Wake::Requested;
            }
            let Some(deadline) = deadline else {
                state = cvar
                    .wait(state)
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                continue;
            };
            let now = Instant::now();
            if now >= deadline {
                return Wake::Timeout;
            }
            let (guard, _) = cvar
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            state = guard;
        }
    }

    /// Block until stopped.
    pub(crate) fn wait_stopped(&self) {
        let (_, cvar) = &*self.inner;
        let mut state = self.lock();
        while !state.stopped {
            state = cvar
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn timeout_without_requests() {
        let signal = RefreshSignal::new();
        let start = Instant::now();
        assert_eq!(signal.wait_timeout(Duration::from_millis(20)), Wake::Timeout);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn requests_coalesce_into_one_wakeup() {
        let signal = RefreshSignal::new();
        signal.request();
        signal.request();
        signal.request();
        assert_eq!(signal.wait_timeout(Duration::from_secs(5)), Wake::Requested);
        assert_eq!(signal.wait_timeout(Duration::from_millis(10)), Wake::Timeout);
    }

    #[test]
    fn request_from_other_thread_cuts_wait_short() {
        let signal = RefreshSignal::new();
        let remote = signal.clone();
        let start = Instant::now();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            remote.request();
        });
        assert_eq!(signal.wait_timeout(Duration::from_secs(10)), Wake::Requested);
        assert!(start.elapsed() < Duration::from_secs(5));
        handle.join().unwrap();
    }

    #[test]
    fn unrepresentable_timeout_waits_until_woken() {
        let signal = RefreshSignal::new();
        let remote = signal.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            remote.stop();
        });
        assert_eq!(signal.wait_timeout(Duration::MAX), Wake::Stopped);
        handle.join().unwrap();
    }

    #[test]
    fn stop_wins_over_request() {
        let signal = RefreshSignal::new();
        signal.request();
        signal.stop();
        assert!(signal.is_stopped());
        assert_eq!(signal.wait_timeout(Duration::from_secs(5)), Wake::Stopped);
        signal.wait_stopped();
    }
}
