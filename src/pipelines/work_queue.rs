//! Lock-free work queue.
use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;

/// Fixed list of items handed out once each, through an atomic cursor.
///
/// `next` returning `None` means that there is no more work.
#[derive(Debug)]
pub struct WorkQueue<S> {
    items: Vec<S>,
    cursor: AtomicUsize,
}

impl<S> WorkQueue<S> {
    pub fn new(items: Vec<S>) -> Self {
        Self {
            items,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Create queue, keeping only items that pass the filter (resume support)
    pub fn filtered(items: Vec<S>, keep: impl Fn(&S) -> bool) -> Self {
        let filtered: Vec<S> = items.into_iter().filter(|s| keep(s)).collect();
        debug!("{} items in work queue", filtered.len());
        Self::new(filtered)
    }

    /// Get next item to process
    pub fn next(&self) -> Option<&S> {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.items.get(i)
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }
}
