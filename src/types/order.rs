//! Order-related types.
//!
//! This module contains the resting [`Order`] and the [`Eviction`] notice
//! emitted when a depth bound drops a whole price level.

use serde::{Deserialize, Serialize};

use super::{OrderId, Price, Quantity, Side};

/// A limit order resting (or about to rest) on the book.
///
/// The price is the level key, so it never changes while the order rests;
/// a price change is a cancel followed by a fresh add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    /// Caller-assigned identifier
    pub id: OrderId,
    /// Book side the order rests on
    pub side: Side,
    /// Limit price in ticks
    pub price: Price,
    /// Remaining quantity
    pub quantity: Quantity,
}

impl Order {
    /// Create a new order
    pub fn new(id: impl Into<OrderId>, side: Side, price: Price, quantity: Quantity) -> Self {
        Self {
            id: id.into(),
            side,
            price,
            quantity,
        }
    }

    /// Create a buy order
    ///
    /// # Example
    ///
    /// ```rust
    /// use pricebook::types::{Order, Side};
    ///
    /// let order = Order::bid(1, 100, 10);
    /// assert_eq!(order.side, Side::Bid);
    /// ```
    pub fn bid(id: impl Into<OrderId>, price: Price, quantity: Quantity) -> Self {
        Self::new(id, Side::Bid, price, quantity)
    }

    /// Create a sell order
    pub fn ask(id: impl Into<OrderId>, price: Price, quantity: Quantity) -> Self {
        Self::new(id, Side::Ask, price, quantity)
    }

    /// Copy of this order with a different remaining quantity
    #[must_use]
    pub fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self
    }
}

/// A price level dropped to keep a side within its depth bound.
///
/// Every order in `orders` was silently cancelled; the owner of the book
/// must reconcile them with whoever submitted them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eviction {
    /// Side the level was evicted from
    pub side: Side,
    /// Price of the evicted level
    pub price: Price,
    /// Orders that were resting at the level, in arrival order
    pub orders: Vec<Order>,
}

impl Eviction {
    /// Ids of the cancelled orders, in arrival order
    pub fn order_ids(&self) -> Vec<OrderId> {
        self.orders.iter().map(|o| o.id).collect()
    }

    /// Total quantity removed from the book
    pub fn quantity(&self) -> Quantity {
        self.orders.iter().map(|o| o.quantity).sum()
    }

    /// Returns `true` if the given order was cancelled by this eviction
    pub fn contains(&self, id: OrderId) -> bool {
        self.orders.iter().any(|o| o.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_constructors() {
        let bid = Order::bid(1, 100, 10);
        assert_eq!(bid.id, OrderId(1));
        assert_eq!(bid.side, Side::Bid);

        let ask = Order::ask(2, 101, 5).with_quantity(7);
        assert_eq!(ask.side, Side::Ask);
        assert_eq!(ask.quantity, 7);
    }

    #[test]
    fn test_eviction_ids() {
        let eviction = Eviction {
            side: Side::Bid,
            price: 100,
            orders: vec![Order::bid(3, 100, 1), Order::bid(9, 100, 4)],
        };
        assert_eq!(eviction.order_ids(), vec![OrderId(3), OrderId(9)]);
        assert_eq!(eviction.quantity(), 5);
        assert!(eviction.contains(OrderId(9)));
        assert!(!eviction.contains(OrderId(4)));
    }
}
