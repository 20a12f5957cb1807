// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Work deferred to the next frame boundary.
//!
//! The queue has a single slot. Scheduling while a task is already pending is
//! a no-op, which is what debounces listener resorts: any number of
//! registrations within one frame cost one resort at the next frame start.

/// A task that runs at the next frame boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Deferred {
    /// Recompute listener dispatch order.
    Resort,
}

/// Single-slot deferred task queue.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameQueue {
    pending: Option<Deferred>,
}

impl FrameQueue {
    /// An empty queue.
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Queue `task`. Returns false when a task was already pending.
    pub fn schedule(&mut self, task: Deferred) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(task);
        true
    }

    /// Whether a task is waiting for the next frame.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Remove and return the pending task.
    pub fn take(&mut self) -> Option<Deferred> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_schedule_is_debounced() {
        let mut q = FrameQueue::new();
        assert!(q.schedule(Deferred::Resort));
        assert!(!q.schedule(Deferred::Resort));
        assert!(q.is_pending());
        assert_eq!(q.take(), Some(Deferred::Resort));
        assert_eq!(q.take(), None);
        assert!(q.schedule(Deferred::Resort), "slot reopens once drained");
    }
}
