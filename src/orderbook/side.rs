//! One side of the book: the ordered price structure.
//!
//! ## Design
//!
//! `BookSide` owns an ascending `BTreeMap<u64, OrderQueue>` and answers all
//! navigation relative to its own side's match priority: the best bid is the
//! highest price, the best ask the lowest. Keeping both maps ascending (and
//! flipping the direction per side) lets successor/predecessor navigation
//! share one code path for depth queries and for the matching walk's
//! level-advance step.
//!
//! ## Invariant
//!
//! A price is present iff its queue is non-empty. Every operation that
//! empties a queue removes the level in the same call; every append creates
//! the level if it was absent. O(log n) insert/remove/navigation comes from
//! the BTreeMap.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

use slab::Slab;

use crate::orderbook::{OrderNode, OrderQueue};
use crate::types::Side;

/// Ordered price levels for one side of the book.
#[derive(Debug, Clone)]
pub struct BookSide {
    side: Side,
    levels: BTreeMap<u64, OrderQueue>,
}

impl BookSide {
    /// Create an empty side
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    /// Which side this is
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of non-empty price levels
    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Check if the side has no resting orders
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Check if a price level exists (i.e. has at least one order)
    #[inline]
    pub fn contains_price(&self, price: u64) -> bool {
        self.levels.contains_key(&price)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// The best price of this side: highest bid, lowest ask
    pub fn best_price(&self) -> Option<u64> {
        match self.side {
            Side::Buy => self.levels.keys().next_back().copied(),
            Side::Sell => self.levels.keys().next().copied(),
        }
    }

    /// The worst price of this side: lowest bid, highest ask
    pub fn worst_price(&self) -> Option<u64> {
        match self.side {
            Side::Buy => self.levels.keys().next().copied(),
            Side::Sell => self.levels.keys().next_back().copied(),
        }
    }

    /// The next price after `price` in match-priority order.
    ///
    /// For bids that is the predecessor (next lower price), for asks the
    /// successor (next higher price). O(log n) via a range query.
    pub fn next_price(&self, price: u64) -> Option<u64> {
        match self.side {
            Side::Buy => self.levels.range(..price).next_back().map(|(p, _)| *p),
            Side::Sell => self
                .levels
                .range((Excluded(price), Unbounded))
                .next()
                .map(|(p, _)| *p),
        }
    }

    /// Up to `count` prices strictly worse than `price`, in priority order.
    pub fn prices_from(&self, price: u64, count: usize) -> Vec<u64> {
        match self.side {
            Side::Buy => self
                .levels
                .range(..price)
                .rev()
                .take(count)
                .map(|(p, _)| *p)
                .collect(),
            Side::Sell => self
                .levels
                .range((Excluded(price), Unbounded))
                .take(count)
                .map(|(p, _)| *p)
                .collect(),
        }
    }

    /// All prices in match-priority order (best first).
    ///
    /// Used for deterministic full-book walks (state root, depth dumps).
    pub fn prices_in_priority(&self) -> Vec<u64> {
        match self.side {
            Side::Buy => self.levels.keys().rev().copied().collect(),
            Side::Sell => self.levels.keys().copied().collect(),
        }
    }

    // ========================================================================
    // Queue access
    // ========================================================================

    /// The queue at a price, if the level exists
    #[inline]
    pub fn queue(&self, price: u64) -> Option<&OrderQueue> {
        self.levels.get(&price)
    }

    /// Mutable queue access
    #[inline]
    pub fn queue_mut(&mut self, price: u64) -> Option<&mut OrderQueue> {
        self.levels.get_mut(&price)
    }

    /// Append an order at the tail of its price's queue, creating the level
    /// if it was absent.
    pub fn append(&mut self, price: u64, key: usize, arena: &mut Slab<OrderNode>) {
        let queue = self
            .levels
            .entry(price)
            .or_insert_with(|| OrderQueue::new(price));
        queue.push_back(key, arena);
    }

    /// Unlink an order from its price's queue, pruning the level if that
    /// left it empty.
    ///
    /// Returns the removed remainder, or None if the level does not exist.
    pub fn remove(&mut self, price: u64, key: usize, arena: &mut Slab<OrderNode>) -> Option<u64> {
        let queue = self.levels.get_mut(&price)?;
        let removed = queue.remove(key, arena);
        if queue.is_empty() {
            self.levels.remove(&price);
        }
        Some(removed)
    }

    /// Drop a price level outright. Returns false if it was absent, which
    /// well-formed callers never trigger.
    pub fn remove_level(&mut self, price: u64) -> bool {
        self.levels.remove(&price).is_some()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Order;

    fn insert_order(arena: &mut Slab<OrderNode>, id: u64, side: Side, price: u64) -> usize {
        let order = Order::new(id, 100, side, price, 100_000_000, 0, 0);
        arena.insert(OrderNode::new(order))
    }

    fn populated_side(side: Side, arena: &mut Slab<OrderNode>) -> BookSide {
        let mut book_side = BookSide::new(side);
        for (i, price) in [4_900u64, 5_000, 5_100].iter().enumerate() {
            let key = insert_order(arena, i as u64 + 1, side, *price);
            book_side.append(*price, key, arena);
        }
        book_side
    }

    #[test]
    fn test_best_and_worst_price_bid() {
        let mut arena = Slab::new();
        let bids = populated_side(Side::Buy, &mut arena);

        assert_eq!(bids.best_price(), Some(5_100));
        assert_eq!(bids.worst_price(), Some(4_900));
    }

    #[test]
    fn test_best_and_worst_price_ask() {
        let mut arena = Slab::new();
        let asks = populated_side(Side::Sell, &mut arena);

        assert_eq!(asks.best_price(), Some(4_900));
        assert_eq!(asks.worst_price(), Some(5_100));
    }

    #[test]
    fn test_next_price_navigation() {
        let mut arena = Slab::new();
        let bids = populated_side(Side::Buy, &mut arena);
        let asks = populated_side(Side::Sell, &mut arena);

        // Bids walk downward
        assert_eq!(bids.next_price(5_100), Some(5_000));
        assert_eq!(bids.next_price(5_000), Some(4_900));
        assert_eq!(bids.next_price(4_900), None);

        // Asks walk upward
        assert_eq!(asks.next_price(4_900), Some(5_000));
        assert_eq!(asks.next_price(5_000), Some(5_100));
        assert_eq!(asks.next_price(5_100), None);
    }

    #[test]
    fn test_prices_from() {
        let mut arena = Slab::new();
        let bids = populated_side(Side::Buy, &mut arena);
        let asks = populated_side(Side::Sell, &mut arena);

        assert_eq!(bids.prices_from(5_100, 5), vec![5_000, 4_900]);
        assert_eq!(bids.prices_from(5_100, 1), vec![5_000]);
        assert_eq!(asks.prices_from(4_900, 5), vec![5_000, 5_100]);
        assert_eq!(asks.prices_from(5_100, 5), Vec::<u64>::new());
    }

    #[test]
    fn test_prices_in_priority() {
        let mut arena = Slab::new();
        let bids = populated_side(Side::Buy, &mut arena);
        let asks = populated_side(Side::Sell, &mut arena);

        assert_eq!(bids.prices_in_priority(), vec![5_100, 5_000, 4_900]);
        assert_eq!(asks.prices_in_priority(), vec![4_900, 5_000, 5_100]);
    }

    #[test]
    fn test_append_creates_level() {
        let mut arena = Slab::new();
        let mut side = BookSide::new(Side::Buy);

        assert!(!side.contains_price(5_000));

        let key = insert_order(&mut arena, 1, Side::Buy, 5_000);
        side.append(5_000, key, &mut arena);

        assert!(side.contains_price(5_000));
        assert_eq!(side.level_count(), 1);
        assert_eq!(side.queue(5_000).unwrap().order_count, 1);
    }

    #[test]
    fn test_remove_prunes_empty_level() {
        let mut arena = Slab::new();
        let mut side = BookSide::new(Side::Buy);

        let key1 = insert_order(&mut arena, 1, Side::Buy, 5_000);
        let key2 = insert_order(&mut arena, 2, Side::Buy, 5_000);
        side.append(5_000, key1, &mut arena);
        side.append(5_000, key2, &mut arena);

        side.remove(5_000, key1, &mut arena).unwrap();
        assert!(side.contains_price(5_000));

        side.remove(5_000, key2, &mut arena).unwrap();
        assert!(!side.contains_price(5_000));
        assert!(side.is_empty());
    }

    #[test]
    fn test_remove_missing_level_is_noop() {
        let mut arena = Slab::new();
        let mut side = BookSide::new(Side::Sell);

        assert_eq!(side.remove(9_999, 0, &mut arena), None);
        assert!(!side.remove_level(9_999));
    }
}
