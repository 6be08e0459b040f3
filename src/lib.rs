//! # pricebook
//!
//! A price-indexed limit order book with interchangeable level storage.
//!
//! ## Features
//!
//! - **Pluggable sides** - sorted array, hash map, binary heap, linked list,
//!   red-black tree or `BTreeMap`, all behind one contract
//! - **Depth bound** - optional cap on distinct levels per side, with the
//!   worst level evicted and reported
//! - **FIFO levels** - orders at one price keep arrival order
//! - **Async engine** - a Tokio task owning the write path, fed by a bounded
//!   queue and publishing evictions
//!
//! ## Quick Start
//!
//! ```rust
//! use pricebook::{Backend, BookConfig, LimitOrderBook};
//! use pricebook::types::{Order, OrderId, Side};
//!
//! # fn main() -> pricebook::Result<()> {
//! let config = BookConfig::new("ETH-USD").with_backend(Backend::BinaryHeap);
//! let mut book = LimitOrderBook::new(config)?;
//!
//! book.add_order(Order::bid(1, 100, 10))?;
//! book.add_order(Order::bid(2, 101, 5))?;
//! book.add_order(Order::ask(3, 103, 7))?;
//!
//! let top = book.top_of_book();
//! assert_eq!(top.bid_price(), Some(101));
//! assert_eq!(top.spread(), Some(2));
//!
//! book.cancel_order(OrderId(2), Side::Bid, 101)?;
//! assert_eq!(book.best_bid().map(|q| q.price), Some(100));
//! # Ok(())
//! # }
//! ```
//!
//! ## Price Representation
//!
//! Prices are `i64` tick counts. The caller picks the tick size (for
//! example 1 tick = $0.0001), which keeps level lookup exact. Only positive
//! prices are accepted.
//!
//! ## Architecture
//!
//! - [`orderbook`] - levels, sides, storage backends and the book itself
//! - [`engine`] - the event loop and its producer handles
//! - [`types`] - orders, events, evictions and query results
//! - [`config`] - book and engine configuration
//! - [`error`] - error types for the crate

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod orderbook;
pub mod types;

// Re-export main types at crate root for convenience
pub use config::{Backend, BookConfig, EngineConfig};
pub use engine::{BookEngine, EngineHandle};
pub use error::Error;
pub use orderbook::{LimitOrderBook, SharedBook};

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports() {
        let book = LimitOrderBook::new(BookConfig::new("TEST")).unwrap();
        let shared = SharedBook::from(book);
        assert!(shared.is_empty());
        assert!(BookEngine::new(shared, EngineConfig::default()).is_ok());
    }
}
