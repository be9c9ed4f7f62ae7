//! Pending-path work queue
//!
//! An explicit FIFO owned by a single share's spider invocation. Paths
//! are processed in discovery (breadth-first) order; depth is derived
//! from the separator count, so no per-entry depth field is needed.

use std::collections::VecDeque;

/// One unit of spider work: a subdirectory awaiting a listing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPath {
    /// Trimmed name of the share this path belongs to
    pub share: String,

    /// Relative path within the share, `\`-separated, "" for the root
    pub path: String,
}

impl PendingPath {
    pub fn new(share: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            share: share.into(),
            path: path.into(),
        }
    }

    /// The share root
    pub fn root(share: impl Into<String>) -> Self {
        Self::new(share, "")
    }

    /// A child of this path; its depth is always this depth + 1
    pub fn child(&self, name: &str) -> Self {
        Self {
            share: self.share.clone(),
            path: format!("{}\\{}", self.path, name),
        }
    }

    /// Depth, derived as the count of path separators
    pub fn depth(&self) -> u32 {
        self.path.matches('\\').count() as u32
    }
}

/// FIFO queue of pending paths for one share walk
#[derive(Debug, Default)]
pub struct SpiderQueue {
    inner: VecDeque<PendingPath>,
}

impl SpiderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a discovered subdirectory to the tail
    pub fn push(&mut self, pending: PendingPath) {
        self.inner.push_back(pending);
    }

    /// Seed the queue with a batch of paths
    pub fn extend(&mut self, paths: impl IntoIterator<Item = PendingPath>) {
        self.inner.extend(paths);
    }

    /// Remove and return the head of the queue
    pub fn pop(&mut self) -> Option<PendingPath> {
        self.inner.pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
