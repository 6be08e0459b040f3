//! Sorted singly-linked list, best level at the head.
//!
//! Nodes live in a `Slab` and link by index. The head is the best level
//! and the tail index is kept so eviction finds the worst level in O(1);
//! every other mutation walks the list from the head.

use slab::Slab;

use crate::config::Backend;
use crate::orderbook::level::PriceLevel;
use crate::orderbook::side::LevelStore;
use crate::types::{Price, Side};

#[derive(Debug, Clone)]
struct ListNode {
    level: PriceLevel,
    next: Option<usize>,
}

/// Linked list of levels sorted best-first
#[derive(Debug, Clone)]
pub struct LinkedListStore {
    side: Side,
    nodes: Slab<ListNode>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl LinkedListStore {
    /// Create an empty store
    pub fn new(side: Side) -> Self {
        Self {
            side,
            nodes: Slab::new(),
            head: None,
            tail: None,
        }
    }

    /// Walk from the head to the node holding `price`, returning it and its
    /// predecessor. Stops early once the walk passes where `price` would sit.
    fn locate(&self, price: Price) -> Option<(Option<usize>, usize)> {
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(i) = cursor {
            let here = self.nodes[i].level.price();
            if here == price {
                return Some((prev, i));
            }
            if self.side.is_worse(here, price) {
                return None;
            }
            prev = Some(i);
            cursor = self.nodes[i].next;
        }
        None
    }

    fn iter(&self) -> impl Iterator<Item = &PriceLevel> + '_ {
        std::iter::successors(self.head, move |&i| self.nodes[i].next)
            .map(move |i| &self.nodes[i].level)
    }
}

impl LevelStore for LinkedListStore {
    fn backend(&self) -> Backend {
        Backend::LinkedList
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn get(&self, price: Price) -> Option<&PriceLevel> {
        self.locate(price).map(|(_, i)| &self.nodes[i].level)
    }

    fn get_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        let (_, i) = self.locate(price)?;
        Some(&mut self.nodes[i].level)
    }

    fn insert_level(&mut self, level: PriceLevel) {
        let price = level.price();

        // Last node that still ranks ahead of the new price.
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(i) = cursor {
            if !self.side.is_better(self.nodes[i].level.price(), price) {
                break;
            }
            prev = Some(i);
            cursor = self.nodes[i].next;
        }

        let node = self.nodes.insert(ListNode {
            level,
            next: cursor,
        });
        match prev {
            Some(p) => self.nodes[p].next = Some(node),
            None => self.head = Some(node),
        }
        if cursor.is_none() {
            self.tail = Some(node);
        }
    }

    fn remove_level(&mut self, price: Price) -> Option<PriceLevel> {
        let (prev, i) = self.locate(price)?;
        let next = self.nodes[i].next;
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        if self.tail == Some(i) {
            self.tail = prev;
        }
        Some(self.nodes.remove(i).level)
    }

    fn best(&self) -> Option<&PriceLevel> {
        self.head.map(|i| &self.nodes[i].level)
    }

    fn worst_price(&self) -> Option<Price> {
        self.tail.map(|i| self.nodes[i].level.price())
    }

    fn best_levels(&self, n: usize) -> Vec<&PriceLevel> {
        self.iter().take(n).collect()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }
}
