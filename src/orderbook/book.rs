//! Two-sided limit order book.
//!
//! [`LimitOrderBook`] owns a bid [`BookSide`] and an ask [`BookSide`] built
//! on the same backend, plus an id index used to reject duplicate ids
//! across both sides in O(1).

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::config::{Backend, BookConfig};
use crate::error::Error;
use crate::types::{
    BookSnapshot, EventOutcome, Eviction, LevelSummary, Order, OrderEvent, OrderId, Price,
    Quantity, Quote, Side, TopOfBook,
};

use super::depth::DepthPolicy;
use super::side::BookSide;

/// Price-indexed order book for a single instrument.
///
/// # Design Decisions
///
/// 1. **Integer prices**: Prices are `i64` ticks, so equal prices always
///    land on the same level.
///
/// 2. **Pluggable sides**: both sides use the [`Backend`] chosen in the
///    [`BookConfig`]; the contract is identical whichever is picked.
///
/// 3. **Atomic operations**: each call validates everything first, then
///    mutates. A failed call leaves the book untouched; depth-bound eviction
///    happens inside the insert that caused it.
///
/// # Thread Safety
///
/// This struct is `Send + Sync` but not internally synchronized. For
/// concurrent access, use [`SharedBook`](super::SharedBook).
///
/// # Example
///
/// ```rust
/// use pricebook::{BookConfig, LimitOrderBook};
/// use pricebook::types::{Order, OrderId, Side};
///
/// let mut book = LimitOrderBook::new(BookConfig::new("TEST")).unwrap();
/// book.add_order(Order::bid(1, 100, 10)).unwrap();
/// book.add_order(Order::bid(2, 101, 5)).unwrap();
/// assert_eq!(book.top_of_book().bid_price(), Some(101));
///
/// book.cancel_order(OrderId(2), Side::Bid, 101).unwrap();
/// assert_eq!(book.top_of_book().bid_price(), Some(100));
/// ```
#[derive(Debug)]
pub struct LimitOrderBook {
    /// Instrument symbol
    symbol: String,

    /// Bid levels, best (highest) first
    bids: BookSide,

    /// Ask levels, best (lowest) first
    asks: BookSide,

    /// Where every resting order lives
    index: FxHashMap<OrderId, (Side, Price)>,
}

impl LimitOrderBook {
    /// Create an empty book from a configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn new(config: BookConfig) -> Result<Self, Error> {
        let policy = config.depth_policy()?;
        Ok(Self::with_policy(
            config.symbol(),
            config.backend(),
            policy,
        ))
    }

    /// Create an empty book with an explicit depth policy
    pub fn with_policy(symbol: impl Into<String>, backend: Backend, policy: DepthPolicy) -> Self {
        Self {
            symbol: symbol.into(),
            bids: BookSide::new(Side::Bid, backend, policy),
            asks: BookSide::new(Side::Ask, backend, policy),
            index: FxHashMap::default(),
        }
    }

    /// Create an unbounded book on the given backend
    #[must_use]
    pub fn with_backend(symbol: impl Into<String>, backend: Backend) -> Self {
        Self::with_policy(symbol, backend, DepthPolicy::unbounded())
    }

    /// Get the instrument symbol
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the backend both sides use
    #[must_use]
    pub fn backend(&self) -> Backend {
        self.bids.backend()
    }

    /// Get the per-side depth bound
    #[must_use]
    pub fn max_depth(&self) -> Option<usize> {
        self.bids.policy().max_depth()
    }

    /// Read-only access to one side
    #[must_use]
    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    /// Place a resting order.
    ///
    /// Returns the level evicted to respect the depth bound, if any. When the
    /// incoming price is worse than every level on a full side, the eviction
    /// holds only the incoming order: it is accepted but never rests.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidQuantity`] for a zero quantity
    /// - [`Error::InvalidPrice`] for a zero or negative price
    /// - [`Error::DuplicateId`] if the id already rests on either side
    /// - [`Error::QuantityOverflow`] if the level's aggregate would overflow
    pub fn add_order(&mut self, order: Order) -> Result<Option<Eviction>, Error> {
        if order.quantity == 0 {
            return Err(Error::InvalidQuantity(order.quantity));
        }
        if order.price <= 0 {
            return Err(Error::InvalidPrice(order.price));
        }
        if self.index.contains_key(&order.id) {
            return Err(Error::DuplicateId(order.id));
        }

        let eviction = self.side_mut(order.side).insert(order)?;
        let rejected_on_arrival = eviction.as_ref().is_some_and(|e| e.contains(order.id));
        if !rejected_on_arrival {
            self.index.insert(order.id, (order.side, order.price));
        }
        if let Some(eviction) = &eviction {
            for evicted in &eviction.orders {
                self.index.remove(&evicted.id);
            }
        }

        if rejected_on_arrival {
            trace!(
                symbol = %self.symbol,
                id = %order.id,
                side = %order.side,
                price = order.price,
                "order evicted on arrival"
            );
        } else {
            trace!(
                symbol = %self.symbol,
                id = %order.id,
                side = %order.side,
                price = order.price,
                quantity = order.quantity,
                "order added"
            );
        }
        Ok(eviction)
    }

    /// Cancel a resting order
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the order does not rest at `price` on
    /// `side`.
    pub fn cancel_order(&mut self, id: OrderId, side: Side, price: Price) -> Result<Order, Error> {
        let order = self.side_mut(side).remove(id, price)?;
        self.index.remove(&id);
        trace!(symbol = %self.symbol, id = %id, %side, price, "order cancelled");
        Ok(order)
    }

    /// Replace the quantity of a resting order. The order moves to the back
    /// of its level's queue.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidQuantity`] for a zero quantity (nothing changes)
    /// - [`Error::NotFound`] if the order does not rest at `price` on `side`
    pub fn amend_order(
        &mut self,
        id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<Order, Error> {
        if quantity == 0 {
            return Err(Error::InvalidQuantity(quantity));
        }
        let order = self.side_mut(side).update(id, price, quantity)?;
        trace!(symbol = %self.symbol, id = %id, %side, price, quantity, "order amended");
        Ok(order)
    }

    /// Apply an event from the event contract
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying add / cancel / amend.
    pub fn apply(&mut self, event: OrderEvent) -> Result<EventOutcome, Error> {
        let outcome = match event {
            OrderEvent::Add {
                id,
                side,
                price,
                quantity,
            } => EventOutcome::Added {
                eviction: self.add_order(Order::new(id, side, price, quantity))?,
            },
            OrderEvent::Cancel { id, side, price } => EventOutcome::Cancelled {
                order: self.cancel_order(id, side, price)?,
            },
            OrderEvent::Amend {
                id,
                side,
                price,
                quantity,
            } => EventOutcome::Amended {
                order: self.amend_order(id, side, price, quantity)?,
            },
        };
        debug!(symbol = %self.symbol, ?event, "applied order event");
        Ok(outcome)
    }

    /// Get the best bid (highest price) with its aggregate quantity
    ///
    /// Returns `None` if no bids.
    #[must_use]
    pub fn best_bid(&self) -> Option<Quote> {
        self.bids.best().map(|l| Quote {
            price: l.price,
            quantity: l.quantity,
        })
    }

    /// Get the best ask (lowest price) with its aggregate quantity
    ///
    /// Returns `None` if no asks.
    #[must_use]
    pub fn best_ask(&self) -> Option<Quote> {
        self.asks.best().map(|l| Quote {
            price: l.price,
            quantity: l.quantity,
        })
    }

    /// Best bid and best ask together
    #[must_use]
    pub fn top_of_book(&self) -> TopOfBook {
        TopOfBook {
            bid: self.best_bid(),
            ask: self.best_ask(),
        }
    }

    /// Get the mid price
    ///
    /// Returns the average of best bid and best ask, or `None` if either is missing.
    #[must_use]
    pub fn mid_price(&self) -> Option<f64> {
        self.top_of_book().mid_price()
    }

    /// Get the spread in ticks
    #[must_use]
    pub fn spread(&self) -> Option<Price> {
        self.top_of_book().spread()
    }

    /// Check if the book is crossed (best bid >= best ask)
    ///
    /// This book never matches, so a crossed book means the feeding
    /// collaborator sent crossing orders.
    #[must_use]
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => bid.price >= ask.price,
            _ => false,
        }
    }

    /// Get the top `n` levels of one side, best first
    #[must_use]
    pub fn depth(&self, side: Side, n: usize) -> Vec<LevelSummary> {
        self.side(side).levels(n)
    }

    /// Copy out the top `n` levels of both sides
    #[must_use]
    pub fn snapshot(&self, n: usize) -> BookSnapshot {
        BookSnapshot {
            symbol: self.symbol.clone(),
            bids: self.bids.levels(n),
            asks: self.asks.levels(n),
        }
    }

    /// Look up a resting order by id
    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        let &(side, price) = self.index.get(&id)?;
        self.side(side).level(price)?.get(id)
    }

    /// Orders resting at one price, in arrival order
    #[must_use]
    pub fn orders_at(&self, side: Side, price: Price) -> Vec<Order> {
        self.side(side)
            .level(price)
            .map(|level| level.orders().copied().collect())
            .unwrap_or_default()
    }

    /// Number of resting orders on both sides
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the book is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Get the number of price levels
    #[must_use]
    pub fn num_levels(&self) -> (usize, usize) {
        (self.bids.depth(), self.asks.depth())
    }

    /// Drop every order on both sides
    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.index.clear();
    }
}
