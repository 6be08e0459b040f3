//! Order events accepted by a book, and what applying them produced.
//!
//! Events are tagged JSON objects so an intake layer can decode them
//! straight off the wire:
//!
//! ```json
//! {"type": "add", "id": 1, "side": "bid", "price": 100, "quantity": 10}
//! {"type": "cancel", "id": 1, "side": "bid", "price": 100}
//! {"type": "amend", "id": 1, "side": "bid", "price": 100, "quantity": 4}
//! ```

use serde::{Deserialize, Serialize};

use super::{Eviction, Order, OrderId, Price, Quantity, Side};

/// An instruction for the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    /// Place a new resting order
    Add {
        /// Order id (must not already rest on the book)
        id: OrderId,
        /// Book side
        side: Side,
        /// Limit price
        price: Price,
        /// Quantity (must be positive)
        quantity: Quantity,
    },
    /// Cancel a resting order
    Cancel {
        /// Order id
        id: OrderId,
        /// Side the order rests on
        side: Side,
        /// Price the order rests at
        price: Price,
    },
    /// Replace the quantity of a resting order
    Amend {
        /// Order id
        id: OrderId,
        /// Side the order rests on
        side: Side,
        /// Price the order rests at
        price: Price,
        /// New quantity (must be positive)
        quantity: Quantity,
    },
}

impl OrderEvent {
    /// Add event for an order
    pub fn add(order: Order) -> Self {
        OrderEvent::Add {
            id: order.id,
            side: order.side,
            price: order.price,
            quantity: order.quantity,
        }
    }

    /// Cancel event
    pub fn cancel(id: impl Into<OrderId>, side: Side, price: Price) -> Self {
        OrderEvent::Cancel {
            id: id.into(),
            side,
            price,
        }
    }

    /// Amend event
    pub fn amend(id: impl Into<OrderId>, side: Side, price: Price, quantity: Quantity) -> Self {
        OrderEvent::Amend {
            id: id.into(),
            side,
            price,
            quantity,
        }
    }

    /// Id of the order this event targets
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderEvent::Add { id, .. }
            | OrderEvent::Cancel { id, .. }
            | OrderEvent::Amend { id, .. } => *id,
        }
    }

    /// Side this event is routed to
    pub fn side(&self) -> Side {
        match self {
            OrderEvent::Add { side, .. }
            | OrderEvent::Cancel { side, .. }
            | OrderEvent::Amend { side, .. } => *side,
        }
    }
}

/// Successful result of applying an [`OrderEvent`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventOutcome {
    /// The order was accepted. If a depth bound forced a level out,
    /// `eviction` lists the cancelled orders (possibly the new one itself).
    Added {
        /// Level dropped by the depth bound, if any
        eviction: Option<Eviction>,
    },
    /// The order was removed from the book
    Cancelled {
        /// The removed order
        order: Order,
    },
    /// The order now rests with its new quantity
    Amended {
        /// The order as it rests after the amendment
        order: Order,
    },
}

impl EventOutcome {
    /// The eviction caused by this event, if any
    pub fn eviction(&self) -> Option<&Eviction> {
        match self {
            EventOutcome::Added { eviction } => eviction.as_ref(),
            _ => None,
        }
    }
}
