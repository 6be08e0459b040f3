//! Level storage backends.
//!
//! Each module implements [`LevelStore`] over a different structure:
//!
//! | Backend | open level | close level | best | worst |
//! |---|---|---|---|---|
//! | [`array`] | O(n) | O(n) | O(1) | O(1) |
//! | [`hashed`] | O(1) | O(1), O(n) if best closes | O(1) | O(n) |
//! | [`heap`] | O(log n) | O(log n) | O(1) | O(n) |
//! | [`list`] | O(n) | O(n) | O(1) | O(1) |
//! | [`rbtree`] | O(log n) | O(log n) | O(1) | O(log n) |
//! | [`btree`] | O(log n) | O(log n) | O(log n) | O(log n) |

pub mod array;
pub mod btree;
pub mod hashed;
pub mod heap;
pub mod list;
pub mod rbtree;

use crate::config::Backend;
use crate::types::Side;

use super::side::LevelStore;

pub use array::SortedArrayStore;
pub use btree::BTreeStore;
pub use hashed::HashedStore;
pub use heap::HeapStore;
pub use list::LinkedListStore;
pub use rbtree::RedBlackStore;

/// Construct an empty store of the requested kind for `side`
pub fn store_for(backend: Backend, side: Side) -> Box<dyn LevelStore> {
    match backend {
        Backend::SortedArray => Box::new(SortedArrayStore::new(side)),
        Backend::HashMap => Box::new(HashedStore::new(side)),
        Backend::BinaryHeap => Box::new(HeapStore::new(side)),
        Backend::LinkedList => Box::new(LinkedListStore::new(side)),
        Backend::RedBlackTree => Box::new(RedBlackStore::new(side)),
        Backend::BTree => Box::new(BTreeStore::new(side)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_for_reports_backend() {
        for backend in Backend::ALL {
            let store = store_for(backend, Side::Bid);
            assert_eq!(store.backend(), backend);
            assert!(store.is_empty());
        }
    }
}
