//! Configuration for books and the book engine.
//!
//! This module provides [`BookConfig`] (which backend, which depth bound)
//! and [`EngineConfig`] (queue sizes for the event loop).

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::orderbook::DepthPolicy;

/// Storage strategy behind each side of a book
///
/// All backends honour the same contract; they differ only in what each
/// operation costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Sorted `Vec` with the best level at the end
    SortedArray,
    /// Hash map keyed by price with an incrementally cached best price
    HashMap,
    /// Array binary heap with a price-to-position index
    BinaryHeap,
    /// Sorted singly-linked list, best level at the head
    LinkedList,
    /// Arena-indexed red-black tree with a cached best node
    #[default]
    RedBlackTree,
    /// `std::collections::BTreeMap`
    BTree,
}

impl Backend {
    /// Every backend, in declaration order
    pub const ALL: [Backend; 6] = [
        Backend::SortedArray,
        Backend::HashMap,
        Backend::BinaryHeap,
        Backend::LinkedList,
        Backend::RedBlackTree,
        Backend::BTree,
    ];

    /// Stable snake_case name
    pub fn name(&self) -> &'static str {
        match self {
            Backend::SortedArray => "sorted_array",
            Backend::HashMap => "hash_map",
            Backend::BinaryHeap => "binary_heap",
            Backend::LinkedList => "linked_list",
            Backend::RedBlackTree => "red_black_tree",
            Backend::BTree => "b_tree",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Config(format!("unknown backend: {}", s)))
    }
}

/// Configuration for a [`LimitOrderBook`](crate::LimitOrderBook)
///
/// # Example
///
/// ```rust
/// use pricebook::{Backend, BookConfig};
///
/// let config = BookConfig::new("BTC-USD")
///     .with_backend(Backend::BinaryHeap)
///     .with_max_depth(Some(50));
///
/// assert_eq!(config.max_depth(), Some(50));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookConfig {
    /// Instrument the book tracks
    symbol: String,

    /// Storage strategy for both sides
    backend: Backend,

    /// Maximum distinct price levels per side (None = unbounded)
    max_depth: Option<usize>,
}

impl BookConfig {
    /// Create an unbounded configuration using the default backend
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            backend: Backend::default(),
            max_depth: None,
        }
    }

    /// Set the storage backend
    #[must_use]
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the per-side depth bound (None for unbounded)
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Get the symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the backend
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Get the depth bound
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Check the configuration for values no book can honour
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the depth bound is zero.
    pub fn validate(&self) -> Result<(), Error> {
        self.depth_policy().map(|_| ())
    }

    /// Depth policy for this configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the depth bound is zero.
    pub fn depth_policy(&self) -> Result<DepthPolicy, Error> {
        match self.max_depth {
            None => Ok(DepthPolicy::unbounded()),
            Some(max) => NonZeroUsize::new(max)
                .map(DepthPolicy::bounded)
                .ok_or_else(|| Error::Config("max_depth must be at least 1".to_string())),
        }
    }
}

impl Default for BookConfig {
    fn default() -> Self {
        Self::new("")
    }
}

/// Configuration for the [`BookEngine`](crate::engine::BookEngine) event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Bounded capacity of the command queue
    command_capacity: usize,

    /// Capacity of the eviction broadcast channel
    eviction_capacity: usize,
}

impl EngineConfig {
    /// Create the default engine configuration
    pub fn new() -> Self {
        Self {
            command_capacity: 1024,
            eviction_capacity: 256,
        }
    }

    /// Set the command queue capacity
    #[must_use]
    pub fn with_command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity;
        self
    }

    /// Set the eviction broadcast capacity
    #[must_use]
    pub fn with_eviction_capacity(mut self, capacity: usize) -> Self {
        self.eviction_capacity = capacity;
        self
    }

    /// Get the command queue capacity
    pub fn command_capacity(&self) -> usize {
        self.command_capacity
    }

    /// Get the eviction broadcast capacity
    pub fn eviction_capacity(&self) -> usize {
        self.eviction_capacity
    }

    /// Check that both channels can be created
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either capacity is zero.
    pub fn validate(&self) -> Result<(), Error> {
        if self.command_capacity == 0 {
            return Err(Error::Config("command_capacity must be at least 1".to_string()));
        }
        if self.eviction_capacity == 0 {
            return Err(Error::Config("eviction_capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BookConfig::new("TEST");
        assert_eq!(config.symbol(), "TEST");
        assert_eq!(config.backend(), Backend::RedBlackTree);
        assert_eq!(config.max_depth(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = BookConfig::new("TEST")
            .with_backend(Backend::LinkedList)
            .with_max_depth(Some(3));

        assert_eq!(config.backend(), Backend::LinkedList);
        assert_eq!(config.max_depth(), Some(3));
        assert_eq!(config.depth_policy().unwrap().max_depth(), Some(3));
    }

    #[test]
    fn test_zero_depth_rejected() {
        let config = BookConfig::new("TEST").with_max_depth(Some(0));
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_backend_from_str() {
        for backend in Backend::ALL {
            assert_eq!(backend.name().parse::<Backend>().unwrap(), backend);
        }
        assert_eq!("RED_BLACK_TREE".parse::<Backend>().unwrap(), Backend::RedBlackTree);
        assert!("skiplist".parse::<Backend>().is_err());
    }

    #[test]
    fn test_engine_config() {
        let config = EngineConfig::default()
            .with_command_capacity(8)
            .with_eviction_capacity(4);
        assert_eq!(config.command_capacity(), 8);
        assert_eq!(config.eviction_capacity(), 4);
        assert!(config.validate().is_ok());
        assert!(EngineConfig::new().with_command_capacity(0).validate().is_err());
    }
}
