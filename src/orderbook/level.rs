//! A single price level: resting orders in arrival order plus their
//! cached aggregate quantity.

use std::collections::VecDeque;

use crate::error::Error;
use crate::types::{LevelSummary, Order, OrderId, Price, Quantity};

/// All resting interest at one price on one side.
///
/// Orders keep their arrival order (price/time priority). The aggregate
/// quantity is maintained on every mutation and never recomputed by
/// summation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLevel {
    price: Price,
    orders: VecDeque<Order>,
    total_quantity: Quantity,
}

impl PriceLevel {
    /// Create an empty level at `price`
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            total_quantity: 0,
        }
    }

    /// Create a level holding a single order
    pub fn with_order(order: Order) -> Self {
        Self {
            price: order.price,
            orders: VecDeque::from([order]),
            total_quantity: order.quantity,
        }
    }

    /// Level price
    #[inline]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Append an order to the back of the queue.
    ///
    /// The caller guarantees `order.price == self.price()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QuantityOverflow`] if the aggregate would exceed
    /// `u64::MAX`; the level is unchanged.
    pub fn add_order(&mut self, order: Order) -> Result<(), Error> {
        debug_assert_eq!(order.price, self.price, "order added to the wrong level");
        self.total_quantity = self.checked_total(order.quantity)?;
        self.orders.push_back(order);
        Ok(())
    }

    /// Aggregate after adding `quantity`
    ///
    /// # Errors
    ///
    /// Returns [`Error::QuantityOverflow`] if the sum does not fit.
    pub fn checked_total(&self, quantity: Quantity) -> Result<Quantity, Error> {
        self.total_quantity
            .checked_add(quantity)
            .ok_or(Error::QuantityOverflow {
                price: self.price,
                quantity,
            })
    }

    /// Remove an order by id, returning it
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no order with that id rests here.
    pub fn remove_order(&mut self, id: OrderId) -> Result<Order, Error> {
        let position = self
            .orders
            .iter()
            .position(|o| o.id == id)
            .ok_or(Error::NotFound {
                id,
                price: self.price,
            })?;

        let order = self.orders.remove(position).ok_or(Error::NotFound {
            id,
            price: self.price,
        })?;
        self.total_quantity -= order.quantity;
        Ok(order)
    }

    /// Cached sum of resting quantity
    #[inline]
    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    /// Number of resting orders
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Returns `true` once the last order has left; the owning side drops
    /// empty levels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Orders in arrival order
    pub fn orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.orders.iter()
    }

    /// Oldest order at this price
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Look up a resting order by id
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Returns `true` if an order with this id rests here
    pub fn contains(&self, id: OrderId) -> bool {
        self.get(id).is_some()
    }

    /// Aggregated view of this level
    pub fn summary(&self) -> LevelSummary {
        LevelSummary {
            price: self.price,
            quantity: self.total_quantity,
            order_count: self.orders.len(),
        }
    }

    /// Consume the level, yielding its orders in arrival order
    pub fn into_orders(self) -> Vec<Order> {
        self.orders.into()
    }
}
