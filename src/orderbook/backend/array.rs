//! Flat sorted array.
//!
//! Levels are kept worst-first so the best level is the last element:
//! best and worst are O(1), and lookups binary-search. Opening or closing a
//! level shifts the tail of the vector, which makes this the simplest
//! backend and the slowest under heavy level churn.

use std::cmp::Ordering;

use crate::config::Backend;
use crate::orderbook::level::PriceLevel;
use crate::orderbook::side::LevelStore;
use crate::types::{Price, Side};

/// `Vec` of levels sorted from worst to best
#[derive(Debug, Clone)]
pub struct SortedArrayStore {
    side: Side,
    levels: Vec<PriceLevel>,
}

impl SortedArrayStore {
    /// Create an empty store
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: Vec::new(),
        }
    }

    /// Index of `price`, or where it would be inserted
    fn search(&self, price: Price) -> Result<usize, usize> {
        let side = self.side;
        self.levels.binary_search_by(|level| {
            if level.price() == price {
                Ordering::Equal
            } else if side.is_worse(level.price(), price) {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        })
    }
}

impl LevelStore for SortedArrayStore {
    fn backend(&self) -> Backend {
        Backend::SortedArray
    }

    fn len(&self) -> usize {
        self.levels.len()
    }

    fn get(&self, price: Price) -> Option<&PriceLevel> {
        self.search(price).ok().map(|i| &self.levels[i])
    }

    fn get_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.search(price).ok().map(|i| &mut self.levels[i])
    }

    fn insert_level(&mut self, level: PriceLevel) {
        match self.search(level.price()) {
            Ok(i) => self.levels[i] = level,
            Err(i) => self.levels.insert(i, level),
        }
    }

    fn remove_level(&mut self, price: Price) -> Option<PriceLevel> {
        self.search(price).ok().map(|i| self.levels.remove(i))
    }

    fn best(&self) -> Option<&PriceLevel> {
        self.levels.last()
    }

    fn worst_price(&self) -> Option<Price> {
        self.levels.first().map(PriceLevel::price)
    }

    fn best_levels(&self, n: usize) -> Vec<&PriceLevel> {
        self.levels.iter().rev().take(n).collect()
    }

    fn clear(&mut self) {
        self.levels.clear();
    }
}
