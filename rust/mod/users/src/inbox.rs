use std::collections::VecDeque;

use crate::notification::Notification;

/// A user's notification inbox: a bounded FIFO of pending notifications and
/// an unbounded log of the ones already shown.
///
/// Notifications are never modified once created; they are only moved from
/// `pending` to `shown` or evicted from the front of `pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationInbox {
    pending: VecDeque<Notification>,
    shown: Vec<Notification>,
    capacity: usize,
}

impl NotificationInbox {
    pub fn new(capacity: usize) -> Self {
        Self::from_parts(VecDeque::new(), Vec::new(), capacity)
    }

    /// Rebuild an inbox from stored sequences. A stored `pending` longer than
    /// `capacity` is trimmed on the next push.
    pub fn from_parts(
        pending: VecDeque<Notification>,
        shown: Vec<Notification>,
        capacity: usize,
    ) -> Self {
        Self {
            pending,
            shown,
            capacity,
        }
    }

    pub fn into_parts(self) -> (VecDeque<Notification>, Vec<Notification>) {
        (self.pending, self.shown)
    }

    /// Oldest first.
    pub fn pending(&self) -> &VecDeque<Notification> {
        &self.pending
    }

    pub fn shown(&self) -> &[Notification] {
        &self.shown
    }

    /// Append to `pending`, evicting the oldest entries beyond capacity.
    /// Returns how many were evicted.
    pub fn push(&mut self, notification: Notification) -> usize {
        self.pending.push_back(notification);

        let mut evicted = 0;
        while self.pending.len() > self.capacity {
            self.pending.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Move every pending notification with `timestamp` to the end of
    /// `shown`, keeping their relative order. Returns how many moved.
    pub fn take_pending(&mut self, timestamp: i64) -> usize {
        let (moved, kept): (VecDeque<_>, VecDeque<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|n| n.timestamp == timestamp);

        self.pending = kept;
        let count = moved.len();
        self.shown.extend(moved);
        count
    }

    /// Pending notifications followed by shown ones.
    pub fn merged(&self) -> Vec<Notification> {
        self.pending
            .iter()
            .chain(self.shown.iter())
            .cloned()
            .collect()
    }

    /// Mark everything as shown: the merged history becomes `shown` and
    /// `pending` is emptied. Returns the merged history.
    pub fn reset(&mut self) -> Vec<Notification> {
        let merged = self.merged();
        self.shown = merged.clone();
        self.pending.clear();
        merged
    }
}
