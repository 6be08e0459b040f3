//! Core value types shared by every layer of the book.
//!
//! - [`order`] - Orders and eviction notices
//! - [`market`] - Read-only market-data views (quotes, level summaries, snapshots)
//! - [`messages`] - The add / cancel / amend event contract

pub mod market;
pub mod messages;
pub mod order;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use market::{BookSnapshot, LevelSummary, Quote, TopOfBook};
pub use messages::{EventOutcome, OrderEvent};
pub use order::{Eviction, Order};

/// Price in ticks
///
/// Prices are fixed-point integers; the caller chooses the tick size
/// (e.g. 1 tick = $0.01). Using `i64` instead of floating point for:
/// - Exact arithmetic and comparisons (no aliasing of nearly-equal prices)
/// - Use as an ordered / hashed map key
///
/// Valid resting prices are strictly positive.
pub type Price = i64;

/// Quantity of units resting on the book
pub type Quantity = u64;

/// Caller-assigned order identifier, unique across both sides of a book.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        OrderId(id)
    }
}

/// Trading direction of an order and of a book side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy interest; the highest price is best
    Bid,
    /// Sell interest; the lowest price is best
    Ask,
}

impl Side {
    /// Get the opposite side
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// Returns `true` if `a` ranks strictly ahead of `b` on this side.
    ///
    /// ```rust
    /// use pricebook::types::Side;
    ///
    /// assert!(Side::Bid.is_better(101, 100));
    /// assert!(Side::Ask.is_better(100, 101));
    /// ```
    #[inline]
    #[must_use]
    pub fn is_better(self, a: Price, b: Price) -> bool {
        match self {
            Side::Bid => a > b,
            Side::Ask => a < b,
        }
    }

    /// Returns `true` if `a` ranks strictly behind `b` on this side.
    #[inline]
    #[must_use]
    pub fn is_worse(self, a: Price, b: Price) -> bool {
        self.is_better(b, a)
    }

    /// Monotone sort key: a larger rank is a better price on this side.
    #[inline]
    #[must_use]
    pub fn rank(self, price: Price) -> i64 {
        match self {
            Side::Bid => price,
            Side::Ask => -price,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => f.write_str("bid"),
            Side::Ask => f.write_str("ask"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_ordering() {
        assert!(Side::Bid.is_better(101, 100));
        assert!(!Side::Bid.is_better(100, 100));
        assert!(Side::Ask.is_better(99, 100));
        assert!(Side::Ask.is_worse(101, 100));
        assert!(Side::Ask.rank(99) > Side::Ask.rank(100));
        assert_eq!(Side::Bid.opposite(), Side::Ask);
    }

    #[test]
    fn test_display() {
        assert_eq!(Side::Bid.to_string(), "bid");
        assert_eq!(OrderId(7).to_string(), "#7");
    }
}
