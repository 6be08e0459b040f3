//! Depth bound decisions.

use std::num::NonZeroUsize;

/// What an insert that opens a new price level has to do about the bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthDecision {
    /// Room left: just insert
    Admit,
    /// Side is full and the incoming level outranks the current worst:
    /// drop the worst level, then insert
    EvictBeforeInsert,
    /// Side is full and the incoming level would itself be the worst:
    /// it is evicted as soon as it is inserted, so it never rests
    EvictAfterInsert,
}

/// Optional cap on the number of distinct price levels per side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DepthPolicy {
    max_depth: Option<NonZeroUsize>,
}

impl DepthPolicy {
    /// No bound
    pub const fn unbounded() -> Self {
        Self { max_depth: None }
    }

    /// At most `max_depth` levels per side
    pub const fn bounded(max_depth: NonZeroUsize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }

    /// Configured bound, if any
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth.map(NonZeroUsize::get)
    }

    /// Returns `true` if a side holding `level_count` levels cannot take
    /// another one without evicting
    pub fn is_full(&self, level_count: usize) -> bool {
        self.max_depth
            .is_some_and(|max| level_count >= max.get())
    }

    /// Decide how to open a new level on a side currently holding
    /// `level_count` levels.
    ///
    /// `incoming_is_worst` says whether the new price ranks behind every
    /// resting level; it only matters when the side is full.
    pub fn decide(&self, level_count: usize, incoming_is_worst: bool) -> DepthDecision {
        if !self.is_full(level_count) {
            DepthDecision::Admit
        } else if incoming_is_worst {
            DepthDecision::EvictAfterInsert
        } else {
            DepthDecision::EvictBeforeInsert
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded(max: usize) -> DepthPolicy {
        DepthPolicy::bounded(NonZeroUsize::new(max).unwrap())
    }

    #[test]
    fn test_unbounded_always_admits() {
        let policy = DepthPolicy::unbounded();
        assert_eq!(policy.max_depth(), None);
        assert_eq!(policy.decide(1_000_000, true), DepthDecision::Admit);
    }

    #[test]
    fn test_bounded_admits_below_limit() {
        let policy = bounded(2);
        assert_eq!(policy.decide(0, false), DepthDecision::Admit);
        assert_eq!(policy.decide(1, true), DepthDecision::Admit);
    }

    #[test]
    fn test_bounded_full() {
        let policy = bounded(2);
        assert!(policy.is_full(2));
        assert_eq!(policy.decide(2, false), DepthDecision::EvictBeforeInsert);
        assert_eq!(policy.decide(2, true), DepthDecision::EvictAfterInsert);
    }
}
