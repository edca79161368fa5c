//! The order book: registry, price sides, and id assignment.
//!
//! ## Architecture
//!
//! A hybrid structure keeps every operation at its contract complexity:
//!
//! - **Slab arena**: the canonical order records, O(1) insert/remove/lookup
//! - **HashMap**: order id to slab key, O(1) cancel and lookup by id
//! - **BookSide x2**: ascending BTreeMaps of price levels, O(log n)
//!   navigation
//!
//! All mutation of the registry and the sides flows through this type, so
//! the id index, the queues and the price levels can never disagree: the
//! same call that empties a queue prunes its level, and the same call that
//! unlinks an order purges its record.
//!
//! ## Example
//!
//! ```
//! use matchbook::orderbook::OrderBook;
//! use matchbook::types::{Order, Side};
//!
//! let mut book = OrderBook::with_capacity(10_000);
//!
//! let id = book.assign_order_id();
//! book.insert_resting(Order::new(id, 100, Side::Buy, 5_000_000_000_000, 100_000_000, 0, 0));
//!
//! assert_eq!(book.best(Side::Buy), Some((5_000_000_000_000, 100_000_000)));
//! ```

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use slab::Slab;

use crate::orderbook::{BookSide, OrderNode};
use crate::types::{Order, Side};

/// Central order registry with one [`BookSide`] per side.
#[derive(Debug)]
pub struct OrderBook {
    /// Canonical order storage
    arena: Slab<OrderNode>,

    /// Order id to slab key (for O(1) cancel and lookup)
    ids: HashMap<u64, usize>,

    /// Resting buy orders
    bids: BookSide,

    /// Resting sell orders
    asks: BookSide,

    /// Next order id to assign (ids start at 1; 0 is never valid)
    next_order_id: u64,

    /// Next trade id to assign
    next_trade_id: u64,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create a new empty book
    pub fn new() -> Self {
        Self {
            arena: Slab::new(),
            ids: HashMap::new(),
            bids: BookSide::new(Side::Buy),
            asks: BookSide::new(Side::Sell),
            next_order_id: 1,
            next_trade_id: 1,
        }
    }

    /// Create a book with pre-allocated arena capacity
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            arena: Slab::with_capacity(order_capacity),
            ids: HashMap::with_capacity(order_capacity),
            bids: BookSide::new(Side::Buy),
            asks: BookSide::new(Side::Sell),
            next_order_id: 1,
            next_trade_id: 1,
        }
    }

    // ========================================================================
    // Capacity and size
    // ========================================================================

    /// Pre-allocated arena slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Total number of resting orders
    #[inline]
    pub fn resting_count(&self) -> usize {
        self.arena.len()
    }

    /// Check if the book holds no orders
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Shared access to one side
    #[inline]
    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// Mutable access to one side
    #[inline]
    pub fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Shared access to the arena (for queue walks)
    #[inline]
    pub fn arena(&self) -> &Slab<OrderNode> {
        &self.arena
    }

    // ========================================================================
    // Id assignment
    // ========================================================================

    /// Take the next order id and advance the counter
    #[inline]
    pub fn assign_order_id(&mut self) -> u64 {
        let id = self.next_order_id;
        self.next_order_id += 1;
        id
    }

    /// Take the next trade id and advance the counter
    #[inline]
    pub fn assign_trade_id(&mut self) -> u64 {
        let id = self.next_trade_id;
        self.next_trade_id += 1;
        id
    }

    // ========================================================================
    // Order management
    // ========================================================================

    /// Insert a resting order into its side's queue and index.
    ///
    /// The order's id must be non-zero and previously assigned by
    /// [`assign_order_id`](Self::assign_order_id).
    ///
    /// # Returns
    ///
    /// The slab key of the inserted record.
    pub fn insert_resting(&mut self, order: Order) -> usize {
        debug_assert_ne!(order.id, 0, "order id must be non-zero");

        let order_id = order.id;
        let price = order.price;
        let side = order.side();

        let key = self.arena.insert(OrderNode::new(order));
        self.ids.insert(order_id, key);
        match side {
            Side::Buy => self.bids.append(price, key, &mut self.arena),
            Side::Sell => self.asks.append(price, key, &mut self.arena),
        }

        key
    }

    /// Unlink and purge an order by slab key.
    ///
    /// Removes it from its queue (pruning the level if emptied), drops the
    /// id index entry and frees the arena slot.
    ///
    /// # Returns
    ///
    /// The removed order, or None if the key is vacant.
    pub fn remove_by_key(&mut self, key: usize) -> Option<Order> {
        let node = self.arena.get(key)?;
        let order_id = node.order_id();
        let price = node.price();
        let side = node.order.side();

        match side {
            Side::Buy => self.bids.remove(price, key, &mut self.arena),
            Side::Sell => self.asks.remove(price, key, &mut self.arena),
        };

        self.ids.remove(&order_id);
        Some(self.arena.remove(key).order)
    }

    /// Unlink and purge an order by id
    pub fn remove_by_id(&mut self, order_id: u64) -> Option<Order> {
        let key = *self.ids.get(&order_id)?;
        self.remove_by_key(key)
    }

    /// Slab key for an order id
    #[inline]
    pub fn key_of(&self, order_id: u64) -> Option<usize> {
        self.ids.get(&order_id).copied()
    }

    /// Check if an order is on the book
    #[inline]
    pub fn contains_order(&self, order_id: u64) -> bool {
        self.ids.contains_key(&order_id)
    }

    /// Shared order access by slab key
    #[inline]
    pub fn order(&self, key: usize) -> Option<&Order> {
        self.arena.get(key).map(|node| &node.order)
    }

    /// Mutable order access by slab key
    #[inline]
    pub fn order_mut(&mut self, key: usize) -> Option<&mut Order> {
        self.arena.get_mut(key).map(|node| &mut node.order)
    }

    /// Shared order access by id
    pub fn order_by_id(&self, order_id: u64) -> Option<&Order> {
        self.key_of(order_id).and_then(|key| self.order(key))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Best price and its total resting volume for one side
    pub fn best(&self, side: Side) -> Option<(u64, u64)> {
        let book_side = self.side(side);
        let price = book_side.best_price()?;
        let queue = book_side.queue(price)?;
        Some((price, queue.total_volume))
    }

    /// Order count and total volume at a price level
    pub fn queue_at(&self, side: Side, price: u64) -> Option<(usize, u64)> {
        self.side(side)
            .queue(price)
            .map(|queue| (queue.order_count, queue.total_volume))
    }

    /// Up to `count` (price, volume) pairs strictly worse than `price`,
    /// in match-priority order.
    pub fn next_best_prices(&self, side: Side, price: u64, count: usize) -> Vec<(u64, u64)> {
        let book_side = self.side(side);
        book_side
            .prices_from(price, count)
            .into_iter()
            .map(|p| {
                let volume = book_side.queue(p).map(|q| q.total_volume).unwrap_or(0);
                (p, volume)
            })
            .collect()
    }

    /// All resting orders belonging to `owner`, sorted by id.
    ///
    /// Lazily-expired orders that no matching walk has touched yet are
    /// still on the book and still reported.
    pub fn user_active_orders(&self, owner: u64) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .arena
            .iter()
            .filter(|(_, node)| node.owner() == owner)
            .map(|(_, node)| node.order.clone())
            .collect();
        orders.sort_by_key(|order| order.id);
        orders
    }

    // ========================================================================
    // State root
    // ========================================================================

    /// SHA-256 digest of the book state.
    ///
    /// Hashes the SSZ encoding of every resting order in deterministic walk
    /// order (bids best-first, then asks best-first, FIFO within a level),
    /// so two books with identical contents always produce identical roots.
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();

        for book_side in [&self.bids, &self.asks] {
            for price in book_side.prices_in_priority() {
                if let Some(queue) = book_side.queue(price) {
                    for key in queue.iter(&self.arena) {
                        let node = self.arena.get(key).expect("invalid slab key");
                        let bytes = ssz_rs::serialize(&node.order)
                            .expect("fixed-size order container serializes");
                        hasher.update(&bytes);
                    }
                }
            }
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        root
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
