//! Thread-safe handle to a single book.
//!
//! [`SharedBook`] puts a [`LimitOrderBook`] behind `parking_lot::RwLock`.
//! The only writer is the [`BookEngine`](crate::BookEngine) loop, which holds
//! the write lock for the whole atomic operation, eviction included. Readers
//! copy views out under the read lock and never see a half-applied event.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Error;
use crate::types::{BookSnapshot, EventOutcome, LevelSummary, OrderEvent, Side, TopOfBook};

use super::LimitOrderBook;

/// Cloneable, lock-protected book.
///
/// Clones share the same book and are read-only; events reach it through
/// a running [`BookEngine`](crate::BookEngine).
///
/// # Example
///
/// ```rust
/// use pricebook::{Backend, LimitOrderBook, SharedBook};
/// use pricebook::types::Order;
///
/// let mut book = LimitOrderBook::with_backend("TEST", Backend::SortedArray);
/// book.add_order(Order::ask(1, 101, 3)).unwrap();
///
/// let reader = SharedBook::new(book);
/// assert_eq!(reader.clone().top_of_book().ask_price(), Some(101));
/// ```
///
/// A reader cannot write to the book:
///
/// ```compile_fail
/// use pricebook::{Backend, LimitOrderBook, SharedBook};
/// use pricebook::types::{Order, OrderEvent};
///
/// let reader = SharedBook::new(LimitOrderBook::with_backend("TEST", Backend::BTree));
/// reader.apply(OrderEvent::add(Order::bid(1, 100, 1))).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SharedBook {
    inner: Arc<RwLock<LimitOrderBook>>,
}

impl SharedBook {
    /// Wrap a book
    pub fn new(book: LimitOrderBook) -> Self {
        Self {
            inner: Arc::new(RwLock::new(book)),
        }
    }

    /// Apply one event under the write lock
    ///
    /// # Errors
    ///
    /// Propagates the book's error; the book is unchanged on error.
    pub(crate) fn apply(&self, event: OrderEvent) -> Result<EventOutcome, Error> {
        self.inner.write().apply(event)
    }

    /// Run `f` with shared access to the book
    pub fn read<R>(&self, f: impl FnOnce(&LimitOrderBook) -> R) -> R {
        f(&self.inner.read())
    }

    /// Get the symbol
    pub fn symbol(&self) -> String {
        self.inner.read().symbol().to_string()
    }

    /// Best bid and ask
    pub fn top_of_book(&self) -> TopOfBook {
        self.inner.read().top_of_book()
    }

    /// Top `n` levels of one side, best first
    pub fn depth(&self, side: Side, n: usize) -> Vec<LevelSummary> {
        self.inner.read().depth(side, n)
    }

    /// Top `n` levels of both sides
    pub fn snapshot(&self, n: usize) -> BookSnapshot {
        self.inner.read().snapshot(n)
    }

    /// Get mid price
    pub fn mid_price(&self) -> Option<f64> {
        self.inner.read().mid_price()
    }

    /// Get spread
    pub fn spread(&self) -> Option<i64> {
        self.inner.read().spread()
    }

    /// Number of resting orders
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if no orders rest
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl From<LimitOrderBook> for SharedBook {
    fn from(book: LimitOrderBook) -> Self {
        Self::new(book)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::config::Backend;
    use crate::types::Order;

    fn shared() -> SharedBook {
        SharedBook::new(LimitOrderBook::with_backend("TEST", Backend::BTree))
    }

    #[test]
    fn test_clones_share_state() {
        let book = shared();
        let reader = book.clone();

        book.apply(OrderEvent::add(Order::bid(1, 50, 100))).unwrap();
        book.apply(OrderEvent::add(Order::ask(2, 55, 150))).unwrap();

        assert_eq!(reader.len(), 2);
        assert_eq!(reader.spread(), Some(5));
        assert_eq!(reader.symbol(), "TEST");
    }

    #[test]
    fn test_failed_apply_leaves_book() {
        let book = shared();
        book.apply(OrderEvent::add(Order::bid(1, 50, 100))).unwrap();
        let before = book.snapshot(10);

        let err = book.apply(OrderEvent::add(Order::bid(1, 51, 1))).unwrap_err();
        assert_eq!(err, Error::DuplicateId(1.into()));
        assert_eq!(book.snapshot(10), before);
    }

    #[test]
    fn test_concurrent_writers() {
        let book = shared();
        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let book = book.clone();
                thread::spawn(move || {
                    for i in 0..100u64 {
                        let id = t * 1000 + i;
                        book.apply(OrderEvent::add(Order::bid(id, 100 + i as i64, 1)))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(book.len(), 400);
        assert_eq!(book.read(|b| b.num_levels()), (100, 0));
        assert_eq!(book.depth(Side::Bid, 1)[0].order_count, 4);
    }
}
