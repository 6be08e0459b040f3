//! Market-data views copied out of a book.
//!
//! These values never borrow from the book, so they can be handed to
//! readers on other threads while the writer keeps mutating.

use serde::{Deserialize, Serialize};

use super::{Price, Quantity};

/// Best price on one side together with the quantity resting there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    /// Price in ticks
    pub price: Price,
    /// Aggregate quantity at that price
    pub quantity: Quantity,
}

/// Best bid and best ask.
///
/// A side with no resting interest is `None`; there is no numeric
/// placeholder for "empty".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TopOfBook {
    /// Highest resting bid
    pub bid: Option<Quote>,
    /// Lowest resting ask
    pub ask: Option<Quote>,
}

impl TopOfBook {
    /// Best bid price, if any
    pub fn bid_price(&self) -> Option<Price> {
        self.bid.map(|q| q.price)
    }

    /// Best ask price, if any
    pub fn ask_price(&self) -> Option<Price> {
        self.ask.map(|q| q.price)
    }

    /// Ask minus bid, if both sides are present
    pub fn spread(&self) -> Option<Price> {
        Some(self.ask_price()? - self.bid_price()?)
    }

    /// Average of best bid and best ask, if both sides are present
    pub fn mid_price(&self) -> Option<f64> {
        Some((self.bid_price()? as f64 + self.ask_price()? as f64) / 2.0)
    }
}

/// Aggregated view of one price level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelSummary {
    /// Level price
    pub price: Price,
    /// Sum of resting quantity
    pub quantity: Quantity,
    /// Number of resting orders
    pub order_count: usize,
}

/// Best `n` levels of each side, best first
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Instrument the book tracks
    pub symbol: String,
    /// Bid levels, highest price first
    pub bids: Vec<LevelSummary>,
    /// Ask levels, lowest price first
    pub asks: Vec<LevelSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_of_book_derived() {
        let top = TopOfBook {
            bid: Some(Quote {
                price: 99,
                quantity: 5,
            }),
            ask: Some(Quote {
                price: 101,
                quantity: 3,
            }),
        };
        assert_eq!(top.spread(), Some(2));
        assert_eq!(top.mid_price(), Some(100.0));
    }

    #[test]
    fn test_one_sided_book() {
        let top = TopOfBook {
            bid: None,
            ask: Some(Quote {
                price: 101,
                quantity: 3,
            }),
        };
        assert_eq!(top.bid_price(), None);
        assert_eq!(top.spread(), None);
        assert_eq!(top.mid_price(), None);
    }
}
