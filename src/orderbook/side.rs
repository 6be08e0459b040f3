//! One side of the book.
//!
//! [`BookSide`] implements the insert / remove / update / best-price
//! contract once, on top of a [`LevelStore`]: the small set of primitives
//! each backend provides over its own representation. Which store is used
//! is fixed when the side is constructed.

use std::fmt;

use tracing::{debug, warn};

use crate::config::Backend;
use crate::error::Error;
use crate::types::{Eviction, LevelSummary, Order, OrderId, Price, Quantity, Side};

use super::backend;
use super::depth::{DepthDecision, DepthPolicy};
use super::level::PriceLevel;

/// Price-keyed storage of levels for one side.
///
/// Implementations keep levels ordered by the side's comparison
/// ([`Side::is_better`]) and never hold two levels at the same price.
/// They do not enforce a depth bound and do not drop empty levels; both
/// are the job of [`BookSide`].
pub trait LevelStore: fmt::Debug + Send + Sync {
    /// Which backend this is
    fn backend(&self) -> Backend;

    /// Number of distinct price levels
    fn len(&self) -> usize;

    /// Returns `true` if no levels are held
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Level at `price`
    fn get(&self, price: Price) -> Option<&PriceLevel>;

    /// Mutable level at `price`. Mutating a level's orders never changes
    /// its position, since the position depends only on the price.
    fn get_mut(&mut self, price: Price) -> Option<&mut PriceLevel>;

    /// Insert a level whose price is not yet present
    fn insert_level(&mut self, level: PriceLevel);

    /// Remove and return the level at `price`
    fn remove_level(&mut self, price: Price) -> Option<PriceLevel>;

    /// Level with the best price
    fn best(&self) -> Option<&PriceLevel>;

    /// Price of the level with the worst price
    fn worst_price(&self) -> Option<Price>;

    /// Up to `n` levels, best first
    fn best_levels(&self, n: usize) -> Vec<&PriceLevel>;

    /// Drop every level
    fn clear(&mut self);
}

/// An ordered collection of price levels for one trading direction.
///
/// # Example
///
/// ```rust
/// use pricebook::orderbook::{BookSide, DepthPolicy};
/// use pricebook::types::{Order, Side};
/// use pricebook::Backend;
///
/// let mut bids = BookSide::new(Side::Bid, Backend::BinaryHeap, DepthPolicy::unbounded());
/// bids.insert(Order::bid(1, 100, 10)).unwrap();
/// bids.insert(Order::bid(2, 101, 5)).unwrap();
///
/// assert_eq!(bids.best_price(), Ok(101));
/// assert_eq!(bids.depth(), 2);
/// ```
#[derive(Debug)]
pub struct BookSide {
    side: Side,
    policy: DepthPolicy,
    store: Box<dyn LevelStore>,
}

impl BookSide {
    /// Create an empty side backed by `backend`
    pub fn new(side: Side, backend: Backend, policy: DepthPolicy) -> Self {
        Self {
            side,
            policy,
            store: backend::store_for(backend, side),
        }
    }

    /// Direction of this side
    pub fn side(&self) -> Side {
        self.side
    }

    /// Backend holding the levels
    pub fn backend(&self) -> Backend {
        self.store.backend()
    }

    /// Depth bound in force
    pub fn policy(&self) -> DepthPolicy {
        self.policy
    }

    /// Add an order to its price level, creating the level if needed.
    ///
    /// When a new level would push the side past its depth bound, the worst
    /// level is evicted as part of this call and returned. If the incoming
    /// price is itself the worst, the eviction holds just the incoming order
    /// and nothing else changes.
    ///
    /// Id uniqueness is not checked here; [`LimitOrderBook`](crate::LimitOrderBook)
    /// guarantees it across both sides.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidQuantity`] for a zero quantity
    /// - [`Error::InvalidPrice`] for a zero or negative price
    /// - [`Error::QuantityOverflow`] if the level's aggregate would overflow
    pub fn insert(&mut self, order: Order) -> Result<Option<Eviction>, Error> {
        debug_assert_eq!(order.side, self.side, "order routed to the wrong side");
        if order.quantity == 0 {
            return Err(Error::InvalidQuantity(order.quantity));
        }
        if order.price <= 0 {
            return Err(Error::InvalidPrice(order.price));
        }

        if let Some(level) = self.store.get_mut(order.price) {
            level.add_order(order)?;
            return Ok(None);
        }

        let incoming_is_worst = self
            .store
            .worst_price()
            .is_some_and(|worst| !self.side.is_better(order.price, worst));

        let eviction = match self.policy.decide(self.store.len(), incoming_is_worst) {
            DepthDecision::Admit => None,
            DepthDecision::EvictAfterInsert => {
                return Ok(Some(self.evicted(order.price, vec![order])));
            }
            DepthDecision::EvictBeforeInsert => self
                .store
                .worst_price()
                .and_then(|worst| self.store.remove_level(worst))
                .map(|level| self.evicted(level.price(), level.into_orders())),
        };

        debug!(side = %self.side, price = order.price, "opening price level");
        self.store.insert_level(PriceLevel::with_order(order));
        Ok(eviction)
    }

    fn evicted(&self, price: Price, orders: Vec<Order>) -> Eviction {
        warn!(
            side = %self.side,
            price,
            orders = orders.len(),
            max_depth = ?self.policy.max_depth(),
            "depth bound evicted price level"
        );
        Eviction {
            side: self.side,
            price,
            orders,
        }
    }

    /// Remove an order, dropping its level if it becomes empty
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no level at `price` or the
    /// order does not rest in it.
    pub fn remove(&mut self, id: OrderId, price: Price) -> Result<Order, Error> {
        let level = self
            .store
            .get_mut(price)
            .ok_or(Error::NotFound { id, price })?;
        let order = level.remove_order(id)?;

        if level.is_empty() {
            self.store.remove_level(price);
            debug!(side = %self.side, price, "closed price level");
        }
        Ok(order)
    }

    /// Replace an order's quantity.
    ///
    /// Behaves as a remove followed by an insert at the same price: the
    /// order loses its place and joins the back of the level's queue. The
    /// level count never grows, so no eviction can happen.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidQuantity`] for a zero quantity,
    /// [`Error::NotFound`] if the order is absent and
    /// [`Error::QuantityOverflow`] if the new aggregate would not fit. All
    /// are checked before anything changes.
    pub fn update(&mut self, id: OrderId, price: Price, quantity: Quantity) -> Result<Order, Error> {
        if quantity == 0 {
            return Err(Error::InvalidQuantity(quantity));
        }
        let level = self
            .store
            .get(price)
            .ok_or(Error::NotFound { id, price })?;
        let resting = level.get(id).ok_or(Error::NotFound { id, price })?;

        // The aggregate always covers each of its orders, so this cannot underflow.
        let others = level.total_quantity() - resting.quantity;
        others
            .checked_add(quantity)
            .ok_or(Error::QuantityOverflow { price, quantity })?;

        let amended = self.remove(id, price)?.with_quantity(quantity);
        match self.store.get_mut(price) {
            Some(level) => level.add_order(amended)?,
            None => self.store.insert_level(PriceLevel::with_order(amended)),
        }
        Ok(amended)
    }

    /// Best resting price
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBook`] if the side holds no levels.
    pub fn best_price(&self) -> Result<Price, Error> {
        self.store
            .best()
            .map(PriceLevel::price)
            .ok_or(Error::EmptyBook(self.side))
    }

    /// Best level, aggregated
    pub fn best(&self) -> Option<LevelSummary> {
        self.store.best().map(PriceLevel::summary)
    }

    /// Worst resting price (the next eviction candidate)
    pub fn worst_price(&self) -> Option<Price> {
        self.store.worst_price()
    }

    /// Number of distinct price levels
    pub fn depth(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing rests on this side
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Level at `price`
    pub fn level(&self, price: Price) -> Option<&PriceLevel> {
        self.store.get(price)
    }

    /// Up to `n` levels, best first
    pub fn levels(&self, n: usize) -> Vec<LevelSummary> {
        self.store
            .best_levels(n)
            .into_iter()
            .map(PriceLevel::summary)
            .collect()
    }

    /// Total quantity across all levels
    pub fn total_quantity(&self) -> Quantity {
        self.store
            .best_levels(self.store.len())
            .into_iter()
            .map(PriceLevel::total_quantity)
            .sum()
    }

    /// Total number of resting orders across all levels
    pub fn order_count(&self) -> usize {
        self.store
            .best_levels(self.store.len())
            .into_iter()
            .map(PriceLevel::order_count)
            .sum()
    }

    /// Drop every level
    pub fn clear(&mut self) {
        self.store.clear();
    }
}
