//! Price-indexed limit order book.
//!
//! The book is layered:
//!
//! - [`PriceLevel`] - FIFO queue of orders at one price
//! - [`BookSide`] - one direction's levels, stored in a pluggable
//!   [`LevelStore`] picked from [`Backend`](crate::Backend)
//! - [`DepthPolicy`] - the optional per-side bound on distinct levels
//! - [`LimitOrderBook`] - two sides plus an id index
//! - [`SharedBook`] - a lock-protected handle for concurrent readers
//!
//! # Example
//!
//! ```rust
//! use pricebook::{Backend, BookConfig, LimitOrderBook};
//! use pricebook::types::{Order, Side};
//!
//! let config = BookConfig::new("KXBTC")
//!     .with_backend(Backend::LinkedList)
//!     .with_max_depth(Some(2));
//! let mut book = LimitOrderBook::new(config).unwrap();
//!
//! book.add_order(Order::bid(1, 100, 10)).unwrap();
//! book.add_order(Order::bid(2, 101, 10)).unwrap();
//!
//! // A third level evicts the worst one.
//! let eviction = book.add_order(Order::bid(3, 102, 10)).unwrap().unwrap();
//! assert_eq!(eviction.price, 100);
//! assert_eq!(book.depth(Side::Bid, 10).len(), 2);
//! ```

pub mod backend;
pub mod book;
pub mod depth;
pub mod level;
pub mod shared;
pub mod side;

pub use book::LimitOrderBook;
pub use depth::{DepthDecision, DepthPolicy};
pub use level::PriceLevel;
pub use shared::SharedBook;
pub use side::{BookSide, LevelStore};
