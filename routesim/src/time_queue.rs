use core::cmp::Reverse;
use std::{collections::BinaryHeap, time::Duration};

/// Min-heap of items keyed by their due time on the simulated clock.
///
/// Due times are [`Duration`]s since the context's epoch, not wall
/// clock instants: the whole scheduler runs on simulated time so a
/// batch can be pumped as fast (or as slow) as the caller likes.
pub(crate) struct TimeQueue<T> {
    heap: BinaryHeap<Reverse<Scheduled<T>>>,
}

struct Scheduled<T> {
    due: Duration,
    item: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due
    }
}

impl<T> Eq for Scheduled<T> {}

#[allow(clippy::non_canonical_partial_ord_impl)]
impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.due.partial_cmp(&other.due)
    }
}
impl<T> Ord for Scheduled<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.due.cmp(&other.due)
    }
}

impl<T> TimeQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Due time of the earliest scheduled item, if any.
    #[inline]
    pub fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|scheduled| scheduled.0.due)
    }

    pub fn push(&mut self, due: Duration, item: T) {
        self.heap.push(Reverse(Scheduled { due, item }))
    }

    pub fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|scheduled| scheduled.0.item)
    }

    /// Remove and return every item due at or before `now`, earliest
    /// first.
    pub fn pop_all_elapsed(&mut self, now: Duration) -> Vec<T> {
        let mut items = Vec::new();
        loop {
            match self.heap.peek() {
                None => break,
                Some(scheduled) => {
                    if scheduled.0.due <= now {
                        let item = self
                            .pop()
                            .expect("We just peeked the heap, so a pop should always work");
                        items.push(item)
                    } else {
                        break;
                    }
                }
            }
        }
        items
    }
}

impl<T> Default for TimeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
