//! Hash map of price to level.
//!
//! Opening and closing levels is O(1). A plain hash index would need a
//! full scan to answer "what is the best price", so the best price is
//! cached: compared on every insert, and recomputed by a scan only when the
//! best level itself closes.

use rustc_hash::FxHashMap;

use crate::config::Backend;
use crate::orderbook::level::PriceLevel;
use crate::orderbook::side::LevelStore;
use crate::types::{Price, Side};

/// `FxHashMap` of levels plus the cached best price
#[derive(Debug, Clone)]
pub struct HashedStore {
    side: Side,
    levels: FxHashMap<Price, PriceLevel>,
    best: Option<Price>,
}

impl HashedStore {
    /// Create an empty store
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: FxHashMap::default(),
            best: None,
        }
    }

    fn scan_best(&self) -> Option<Price> {
        let side = self.side;
        self.levels.keys().copied().max_by_key(|&p| side.rank(p))
    }
}

impl LevelStore for HashedStore {
    fn backend(&self) -> Backend {
        Backend::HashMap
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
        let price = level.price();
        if self.best.map_or(true, |best| self.side.is_better(price, best)) {
            self.best = Some(price);
        }
        self.levels.insert(price, level);
    }

    fn remove_level(&mut self, price: Price) -> Option<PriceLevel> {
        let level = self.levels.remove(&price)?;
        if self.best == Some(price) {
            self.best = self.scan_best();
        }
        Some(level)
    }

    fn best(&self) -> Option<&PriceLevel> {
        self.best.and_then(|price| self.levels.get(&price))
    }

    fn worst_price(&self) -> Option<Price> {
        let side = self.side;
        self.levels.keys().copied().min_by_key(|&p| side.rank(p))
    }

    fn best_levels(&self, n: usize) -> Vec<&PriceLevel> {
        let side = self.side;
        let mut levels: Vec<&PriceLevel> = self.levels.values().collect();
        levels.sort_unstable_by_key(|level| std::cmp::Reverse(side.rank(level.price())));
        levels.truncate(n);
        levels
    }

    fn clear(&mut self) {
        self.levels.clear();
        self.best = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Order;

    #[test]
    fn test_cached_best_follows_removals() {
        let mut store = HashedStore::new(Side::Bid);
        for price in [100, 105, 102] {
            store.insert_level(PriceLevel::with_order(Order::bid(price as u64, price, 1)));
        }
        assert_eq!(store.best, Some(105));

        store.remove_level(105);
        assert_eq!(store.best, Some(102));

        store.remove_level(100);
        assert_eq!(store.best, Some(102));

        store.remove_level(102);
        assert_eq!(store.best, None);
        assert!(store.best().is_none());
    }

    #[test]
    fn test_ask_extremes() {
        let mut store = HashedStore::new(Side::Ask);
        for price in [100, 95, 110] {
            store.insert_level(PriceLevel::with_order(Order::ask(price as u64, price, 1)));
        }
        assert_eq!(store.best().map(PriceLevel::price), Some(95));
        assert_eq!(store.worst_price(), Some(110));
    }
}
