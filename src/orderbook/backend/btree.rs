//! `BTreeMap` levels.
//!
//! The standard library's ordered map: O(log n) for everything, with
//! best/worst read from `first_key_value` / `last_key_value`. Prices are
//! stored ascending; which end is best depends on the side.

use std::collections::BTreeMap;

use crate::config::Backend;
use crate::orderbook::level::PriceLevel;
use crate::orderbook::side::LevelStore;
use crate::types::{Price, Side};

/// Ordered map of levels, ascending by price
#[derive(Debug, Clone)]
pub struct BTreeStore {
    side: Side,
    levels: BTreeMap<Price, PriceLevel>,
}

impl BTreeStore {
    /// Create an empty store
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }
}

impl LevelStore for BTreeStore {
    fn backend(&self) -> Backend {
        Backend::BTree
    }

    fn len(&self) -> usize {
        self.levels.len()
    }

    fn get(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    fn get_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    fn insert_level(&mut self, level: PriceLevel) {
        self.levels.insert(level.price(), level);
    }

    fn remove_level(&mut self, price: Price) -> Option<PriceLevel> {
        self.levels.remove(&price)
    }

    fn best(&self) -> Option<&PriceLevel> {
        match self.side {
            Side::Bid => self.levels.last_key_value(),
            Side::Ask => self.levels.first_key_value(),
        }
        .map(|(_, level)| level)
    }

    fn worst_price(&self) -> Option<Price> {
        match self.side {
            Side::Bid => self.levels.first_key_value(),
            Side::Ask => self.levels.last_key_value(),
        }
        .map(|(&price, _)| price)
    }

    fn best_levels(&self, n: usize) -> Vec<&PriceLevel> {
        match self.side {
            Side::Bid => self.levels.values().rev().take(n).collect(),
            Side::Ask => self.levels.values().take(n).collect(),
        }
    }

    fn clear(&mut self) {
        self.levels.clear();
    }
}
