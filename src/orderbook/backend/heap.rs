//! Array binary heap, best level at the root.
//!
//! A heap alone cannot find an arbitrary price without a linear scan, so
//! `positions` maps each price to its slot and is updated on every swap.
//! With it, closing any level is a swap with the last slot followed by one
//! sift, O(log n). The worst level is always a leaf, so finding it scans
//! the bottom half of the array.

use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

use crate::config::Backend;
use crate::orderbook::level::PriceLevel;
use crate::orderbook::side::LevelStore;
use crate::types::{Price, Side};

/// Heap of levels ordered by the side's ranking
#[derive(Debug, Clone)]
pub struct HeapStore {
    side: Side,
    heap: Vec<PriceLevel>,
    positions: FxHashMap<Price, usize>,
}

#[inline]
fn parent(i: usize) -> usize {
    (i - 1) / 2
}

#[inline]
fn left_child(i: usize) -> usize {
    2 * i + 1
}

impl HeapStore {
    /// Create an empty store
    pub fn new(side: Side) -> Self {
        Self {
            side,
            heap: Vec::new(),
            positions: FxHashMap::default(),
        }
    }

    #[inline]
    fn outranks(&self, a: usize, b: usize) -> bool {
        self.side
            .is_better(self.heap[a].price(), self.heap[b].price())
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions.insert(self.heap[a].price(), a);
        self.positions.insert(self.heap[b].price(), b);
    }

    fn sift_up(&mut self, mut i: usize) -> usize {
        while i > 0 && self.outranks(i, parent(i)) {
            self.swap(i, parent(i));
            i = parent(i);
        }
        i
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let left = left_child(i);
            let right = left + 1;
            let mut top = i;

            if left < self.heap.len() && self.outranks(left, top) {
                top = left;
            }
            if right < self.heap.len() && self.outranks(right, top) {
                top = right;
            }
            if top == i {
                return;
            }
            self.swap(i, top);
            i = top;
        }
    }

    /// Check the heap property and the position index
    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        let ordered = (1..self.heap.len()).all(|i| !self.outranks(i, parent(i)));
        let indexed = self.positions.len() == self.heap.len()
            && self
                .heap
                .iter()
                .enumerate()
                .all(|(i, level)| self.positions.get(&level.price()) == Some(&i));
        ordered && indexed
    }
}

impl LevelStore for HeapStore {
    fn backend(&self) -> Backend {
        Backend::BinaryHeap
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn get(&self, price: Price) -> Option<&PriceLevel> {
        self.positions.get(&price).map(|&i| &self.heap[i])
    }

    fn get_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        let i = *self.positions.get(&price)?;
        self.heap.get_mut(i)
    }

    fn insert_level(&mut self, level: PriceLevel) {
        let i = self.heap.len();
        self.positions.insert(level.price(), i);
        self.heap.push(level);
        self.sift_up(i);
    }

    fn remove_level(&mut self, price: Price) -> Option<PriceLevel> {
        let i = *self.positions.get(&price)?;
        let last = self.heap.len() - 1;
        if i != last {
            self.swap(i, last);
        }
        let level = self.heap.pop()?;
        self.positions.remove(&price);

        if i < self.heap.len() {
            // The element moved into the hole may belong above or below it.
            if self.sift_up(i) == i {
                self.sift_down(i);
            }
        }
        Some(level)
    }

    fn best(&self) -> Option<&PriceLevel> {
        self.heap.first()
    }

    fn worst_price(&self) -> Option<Price> {
        let side = self.side;
        let first_leaf = self.heap.len() / 2;
        self.heap[first_leaf..]
            .iter()
            .map(PriceLevel::price)
            .min_by_key(|&p| side.rank(p))
    }

    /// Walks the heap from the root, expanding the best frontier node
    /// each step: O(k log k) for `k` levels.
    fn best_levels(&self, n: usize) -> Vec<&PriceLevel> {
        let mut out = Vec::with_capacity(n.min(self.heap.len()));
        let mut frontier = BinaryHeap::new();
        if !self.heap.is_empty() {
            frontier.push((self.side.rank(self.heap[0].price()), 0usize));
        }

        while out.len() < n {
            let Some((_, i)) = frontier.pop() else { break };
            out.push(&self.heap[i]);

            let left = left_child(i);
            for child in [left, left + 1] {
                if let Some(level) = self.heap.get(child) {
                    frontier.push((self.side.rank(level.price()), child));
                }
            }
        }
        out
    }

    fn clear(&mut self) {
        self.heap.clear();
        self.positions.clear();
    }
}
