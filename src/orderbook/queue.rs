//! FIFO order queue for a single (side, price) level.
//!
//! ## Queue Structure
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! - New orders are appended at the tail; this encodes time priority.
//! - Matching consumes orders from the head.
//! - Any order can be removed in O(1) given its slab key.
//!
//! ## Aggregates
//!
//! `order_count` and `total_volume` (sum of remaining quantity) are
//! maintained incrementally on every append, removal and partial fill.
//! They are never recomputed by scanning, which keeps all queue operations
//! O(1).

use slab::Slab;

use crate::orderbook::OrderNode;

/// FIFO queue of resting orders at a single price.
///
/// The order data lives in the shared slab arena; this struct only holds
/// the queue metadata.
#[derive(Debug, Clone)]
pub struct OrderQueue {
    /// Price for this queue (fixed-point, scaled by 10^8)
    pub price: u64,

    /// Sum of remaining quantity over all queued orders
    pub total_volume: u64,

    /// Head of the queue (oldest order, slab key); matched first
    pub head: Option<usize>,

    /// Tail of the queue (newest order, slab key); appended here
    pub tail: Option<usize>,

    /// Number of orders in the queue
    pub order_count: usize,
}

impl OrderQueue {
    /// Create a new empty queue for the given price
    pub fn new(price: u64) -> Self {
        Self {
            price,
            total_volume: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    /// Check if the queue is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Append an order at the tail, preserving arrival order.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not present in the slab.
    pub fn push_back(&mut self, key: usize, arena: &mut Slab<OrderNode>) {
        let node = arena.get_mut(key).expect("invalid slab key");
        let remaining = node.remaining();

        node.prev = self.tail;
        node.next = None;

        if let Some(tail_key) = self.tail {
            let tail_node = arena.get_mut(tail_key).expect("invalid tail key");
            tail_node.next = Some(key);
        } else {
            // Empty queue: this is also the head
            self.head = Some(key);
        }

        self.tail = Some(key);
        self.order_count += 1;
        self.total_volume = self.total_volume.saturating_add(remaining);
    }

    /// Unlink an order from the queue by slab key.
    ///
    /// Relinks the neighbors (or updates head/tail when removing an end)
    /// and decrements the aggregates by exactly the removed remainder.
    ///
    /// # Returns
    ///
    /// The remaining quantity of the removed order.
    ///
    /// # Panics
    ///
    /// Panics if `key` or a linked neighbor is not present in the slab.
    pub fn remove(&mut self, key: usize, arena: &mut Slab<OrderNode>) -> u64 {
        let node = arena.get(key).expect("invalid slab key");
        let remaining = node.remaining();
        let prev_key = node.prev;
        let next_key = node.next;

        if let Some(prev) = prev_key {
            let prev_node = arena.get_mut(prev).expect("invalid prev key");
            prev_node.next = next_key;
        } else {
            // This was the head
            self.head = next_key;
        }

        if let Some(next) = next_key {
            let next_node = arena.get_mut(next).expect("invalid next key");
            next_node.prev = prev_key;
        } else {
            // This was the tail
            self.tail = prev_key;
        }

        let node = arena.get_mut(key).expect("invalid slab key");
        node.prev = None;
        node.next = None;

        self.order_count -= 1;
        self.total_volume = self.total_volume.saturating_sub(remaining);

        remaining
    }

    /// The oldest order's slab key; matched first at this price
    #[inline]
    pub fn peek_head(&self) -> Option<usize> {
        self.head
    }

    /// Decrement the running volume after a partial fill
    pub fn reduce_volume(&mut self, executed: u64) {
        self.total_volume = self.total_volume.saturating_sub(executed);
    }

    /// Iterate the queue's slab keys from head to tail
    pub fn iter<'a>(&self, arena: &'a Slab<OrderNode>) -> QueueIter<'a> {
        QueueIter {
            arena,
            cursor: self.head,
        }
    }
}

/// Iterator over a queue's slab keys in FIFO order
pub struct QueueIter<'a> {
    arena: &'a Slab<OrderNode>,
    cursor: Option<usize>,
}

impl<'a> Iterator for QueueIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let key = self.cursor?;
        self.cursor = self.arena.get(key).and_then(|node| node.next);
        Some(key)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
