//! Binary max-heap over dense keys with in-place priority updates.

use std::cmp::Ordering;

/// Max-heap of keys `0..capacity` ranked by an `f64` priority.
///
/// A position index makes `update` and `remove` O(log n). Equal
/// priorities pop the smaller key first.
#[derive(Debug, Clone)]
pub struct IndexedMaxHeap {
    heap: Vec<usize>,
    position: Vec<Option<usize>>,
    priority: Vec<f64>,
}

impl IndexedMaxHeap {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            position: vec![None; capacity],
            priority: vec![0.0; capacity],
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, key: usize) -> bool {
        self.position.get(key).is_some_and(Option::is_some)
    }

    pub fn priority(&self, key: usize) -> Option<f64> {
        self.contains(key).then(|| self.priority[key])
    }

    /// Insert `key`, or reprioritize it when already queued.
    pub fn push(&mut self, key: usize, priority: f64) {
        if key >= self.position.len() {
            self.position.resize(key + 1, None);
            self.priority.resize(key + 1, 0.0);
        }
        if self.contains(key) {
            self.update(key, priority);
            return;
        }
        self.priority[key] = priority;
        self.heap.push(key);
        let slot = self.heap.len() - 1;
        self.position[key] = Some(slot);
        self.sift_up(slot);
    }

    pub fn peek(&self) -> Option<(usize, f64)> {
        self.heap.first().map(|&k| (k, self.priority[k]))
    }

    pub fn pop(&mut self) -> Option<(usize, f64)> {
        let top = *self.heap.first()?;
        self.remove_at(0);
        Some((top, self.priority[top]))
    }

    /// Change the priority of a queued key. Returns `false` if absent.
    pub fn update(&mut self, key: usize, priority: f64) -> bool {
        let Some(slot) = self.position.get(key).copied().flatten() else {
            return false;
        };
        let old = self.priority[key];
        self.priority[key] = priority;
        match priority.total_cmp(&old) {
            Ordering::Greater => self.sift_up(slot),
            Ordering::Less => self.sift_down(slot),
            Ordering::Equal => {}
        }
        true
    }

    pub fn remove(&mut self, key: usize) -> bool {
        match self.position.get(key).copied().flatten() {
            Some(slot) => {
                self.remove_at(slot);
                true
            }
            None => false,
        }
    }

    fn remove_at(&mut self, slot: usize) {
        let key = self.heap[slot];
        let last = self.heap.len() - 1;
        self.swap(slot, last);
        self.heap.pop();
        self.position[key] = None;
        if slot < self.heap.len() {
            self.sift_up(slot);
            self.sift_down(slot);
        }
    }

    /// Whether the key at slot `i` ranks above the key at slot `j`.
    fn above(&self, i: usize, j: usize) -> bool {
        let (a, b) = (self.heap[i], self.heap[j]);
        match self.priority[a].total_cmp(&self.priority[b]) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => a < b,
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.position[self.heap[i]] = Some(i);
        self.position[self.heap[j]] = Some(j);
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.above(slot, parent) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut best = slot;
            if left < self.heap.len() && self.above(left, best) {
                best = left;
            }
            if right < self.heap.len() && self.above(right, best) {
                best = right;
            }
            if best == slot {
                break;
            }
            self.swap(slot, best);
            slot = best;
        }
    }
}
