#![forbid(unsafe_code)]

//! Output stream identity and the one-session-per-stream registry.
//!
//! A live region assumes it is the only thing repainting its rows. Two
//! sessions on the same stream would fight over the cursor, so every session
//! must first [`claim`](StreamRegistry::claim) its stream. The registry is an
//! explicit value handed to whoever starts sessions; there is no hidden
//! process-wide console.
//!
//! ```
//! use inkline_core::stream::{StreamId, StreamRegistry};
//!
//! let streams = StreamRegistry::new();
//! let claim = streams.claim(StreamId::Stdout).expect("first claim");
//! assert!(streams.claim(StreamId::Stdout).is_none());
//! drop(claim);
//! assert!(streams.claim(StreamId::Stdout).is_some());
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

static NEXT_CUSTOM_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamId {
    /// The process standard output.
    Stdout,
    /// The process standard error.
    Stderr,
    /// Any other sink (file, pipe, in-memory buffer), keyed by caller.
    Custom(u64),
}

impl StreamId {
    /// Allocate a fresh id that no other call will return.
    #[must_use]
    pub fn unique() -> Self {
        Self::Custom(NEXT_CUSTOM_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// True for stdout and stderr.
    #[must_use]
    pub const fn is_std(&self) -> bool {
        matches!(self, Self::Stdout | Self::Stderr)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
            Self::Custom(id) => write!(f, "stream#{id}"),
        }
    }
}

type ActiveSet = Arc<Mutex<HashSet<StreamId>>>;

fn lock(set: &ActiveSet) -> MutexGuard<'_, HashSet<StreamId>> {
    // The set is only ever inserted into or removed from; a panic elsewhere
    // cannot leave it half-updated.
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Registry of streams that currently have an active live session.
///
/// Cloning is cheap and every clone observes the same set.
#[derive(Debug, Clone, Default)]
pub struct StreamRegistry {
    active: ActiveSet,
}

impl StreamRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id` for exclusive use.
    ///
    /// Returns `None` when the stream is already claimed. The claim is
    /// released when the returned [`StreamClaim`] is dropped.
    #[must_use]
    pub fn claim(&self, id: StreamId) -> Option<StreamClaim> {
        if !lock(&self.active).insert(id) {
            crate::debug!(stream = %id, "stream already claimed");
            return None;
        }
        crate::debug!(stream = %id, "stream claimed");
        Some(StreamClaim {
            id,
            active: Arc::clone(&self.active),
        })
    }

    /// True when `id` is currently claimed.
    #[must_use]
    pub fn is_active(&self, id: StreamId) -> bool {
        lock(&self.active).contains(&id)
    }

    /// Number of claimed streams.
    #[must_use]
    pub fn active_count(&self) -> usize {
        lock(&self.active).len()
    }
}

/// Exclusive claim on a stream. Dropping it releases the stream.
#[derive(Debug)]
pub struct StreamClaim {
    id: StreamId,
    active: ActiveSet,
}

impl StreamClaim {
    /// The claimed stream.
    #[must_use]
    pub fn id(&self) -> StreamId {
        self.id
    }
}

impl Drop for StreamClaim {
    fn drop(&mut self) {
        lock(&self.active).remove(&self.id);
        crate::debug!(stream = %self.id, "stream released");
    }
}
