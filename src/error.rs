//! Error types for the pricebook crate.
//!
//! Every failure is reported as an explicit [`Error`] value; no operation
//! signals "empty" or "missing" through a magic price. A failed call leaves
//! the book exactly as it was.

use thiserror::Error;

use crate::types::{OrderId, Price, Quantity, Side};

/// The main error type for this crate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The targeted side has no such order (or no level at that price)
    #[error("order {id} not found at price {price}")]
    NotFound {
        /// Requested order id
        id: OrderId,
        /// Requested price level
        price: Price,
    },

    /// An add reused an id that already rests on the book
    #[error("order {0} already rests on the book")]
    DuplicateId(OrderId),

    /// Zero quantity on add or amend
    #[error("invalid quantity {0}: must be positive")]
    InvalidQuantity(Quantity),

    /// Zero or negative price on add
    #[error("invalid price {0}: must be positive")]
    InvalidPrice(Price),

    /// Adding the quantity would overflow the level's aggregate
    #[error("quantity {quantity} overflows the level at price {price}")]
    QuantityOverflow {
        /// Level price
        price: Price,
        /// Quantity that did not fit
        quantity: Quantity,
    },

    /// Best-price query on a side with no levels
    #[error("{0} side of the book is empty")]
    EmptyBook(Side),

    /// Invalid configuration (zero depth bound, zero channel capacity)
    #[error("configuration error: {0}")]
    Config(String),

    /// The book engine is not running or shut down before replying
    #[error("book engine is not running")]
    EngineStopped,

    /// Book engine lifecycle misuse
    #[error("book engine error: {0}")]
    Engine(String),
}

impl Error {
    /// Check if this error was caused by the request rather than the book's
    /// state or configuration
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::DuplicateId(_)
                | Error::InvalidQuantity(_)
                | Error::InvalidPrice(_)
                | Error::QuantityOverflow { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::NotFound {
            id: OrderId(42),
            price: 100,
        };
        assert!(err.to_string().contains("#42"));
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn test_empty_book_display() {
        let err = Error::EmptyBook(Side::Ask);
        assert_eq!(err.to_string(), "ask side of the book is empty");
    }

    #[test]
    fn test_rejection_kinds() {
        assert!(Error::DuplicateId(OrderId(1)).is_rejection());
        assert!(Error::InvalidQuantity(0).is_rejection());
        assert!(Error::QuantityOverflow {
            price: 100,
            quantity: 1
        }
        .is_rejection());
        assert!(!Error::EmptyBook(Side::Bid).is_rejection());
        assert!(!Error::EngineStopped.is_rejection());
    }
}
