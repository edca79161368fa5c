//! Price-time priority matching.
//!
//! ## Algorithm
//!
//! An incoming order runs three phases inside one synchronous call:
//!
//! 1. **Plan**: a read-only walk of the opposite side collects, in priority
//!    order, the expired entries to evict, the FIFO fills to execute and the
//!    quantity left over. Nothing is mutated.
//! 2. **Settle**: every value movement the plan requires is issued against
//!    the injected [`SettlementAdapter`], one call per leg. An adapter
//!    rejection aborts here, before the book has changed, so no partial
//!    match is ever visible.
//! 3. **Commit**: evictions and fills are applied to the book, trades are
//!    emitted, and a limit remainder is rested (a market remainder is
//!    dropped: market orders are immediate-or-cancel).
//!
//! ## Walk rules
//!
//! - Fills consume the opposite side best-price-first, FIFO within a level;
//!   a trade always executes at the maker's resting price.
//! - An expired resting order is evicted where the walk finds it and
//!   consumes no quantity. There is no proactive sweep; expiry discovery is
//!   strictly lazy.
//! - A resting order with the taker's own owner is skipped silently: no
//!   fill, no event.
//! - A level where every entry was skipped advances the walk to the next
//!   price, so the loop always makes forward progress.

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::orderbook::OrderBook;
use crate::settlement::{Asset, SettlementAdapter};
use crate::types::price::notional;
use crate::types::{Order, OrderStatus, OrderType, Side, TimeInForce, Trade};

// ============================================================================
// MatchResult
// ============================================================================

/// Outcome of a placement call.
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    /// The id assigned to the incoming order
    pub order_id: u64,

    /// The incoming order's status after the call
    pub status: OrderStatus,

    /// Quantity executed for the incoming order.
    ///
    /// For market orders a shortfall of liquidity is reported here, not as
    /// an error.
    pub filled: u64,

    /// Trades emitted, in execution order (maker-priced)
    pub trades: Vec<Trade>,

    /// Ids of resting orders evicted as expired during the walk
    pub expired: Vec<u64>,
}

impl MatchResult {
    /// Check if the incoming order executed in full
    pub fn fully_filled(&self) -> bool {
        self.status == OrderStatus::Filled
    }
}

// ============================================================================
// Match plan (internal)
// ============================================================================

/// One planned execution against a resting order
#[derive(Debug, Clone)]
struct PlannedFill {
    key: usize,
    maker_id: u64,
    maker_owner: u64,
    price: u64,
    quantity: u64,
}

/// One planned eviction of an expired resting order
#[derive(Debug, Clone)]
struct PlannedEvict {
    key: usize,
    order_id: u64,
    owner: u64,
    side: Side,
    price: u64,
    remaining: u64,
}

/// Everything a matching walk decided, before any state change
#[derive(Debug, Default)]
struct MatchPlan {
    fills: Vec<PlannedFill>,
    evictions: Vec<PlannedEvict>,
    executed: u64,
}

/// A single settlement invocation owed by a plan
#[derive(Debug, Clone, Copy)]
enum Leg {
    Lock { owner: u64, asset: Asset, amount: u64 },
    Unlock { owner: u64, asset: Asset, amount: u64 },
    Transfer { payer: u64, payee: u64, asset: Asset, amount: u64 },
    TransferLocked { payer: u64, payee: u64, asset: Asset, amount: u64 },
}

/// The asset a resting order of `side` reserves, and how much of it the
/// given remainder is worth.
fn reserved_amount(side: Side, price: u64, remaining: u64) -> EngineResult<(Asset, u64)> {
    match side {
        Side::Buy => {
            let quote = notional(price, remaining).ok_or(EngineError::Overflow)?;
            Ok((Asset::Quote, quote))
        }
        Side::Sell => Ok((Asset::Base, remaining)),
    }
}

/// Does a resting level at `level_price` satisfy a limit taker?
fn crosses(taker_side: Side, limit_price: u64, level_price: u64) -> bool {
    match taker_side {
        Side::Buy => level_price <= limit_price,
        Side::Sell => level_price >= limit_price,
    }
}

// ============================================================================
// MatchingEngine
// ============================================================================

/// The matching engine: an [`OrderBook`] plus an injected settlement
/// collaborator.
///
/// Execution is single-threaded and transactional. Every mutating entry
/// point is covered by a single in-flight-operation flag, so the settlement
/// adapter can never re-enter matching mid-operation.
///
/// # Example
///
/// ```
/// use matchbook::engine::MatchingEngine;
/// use matchbook::settlement::{Asset, MemorySettlement};
/// use matchbook::types::{Side, TimeInForce};
///
/// let mut settlement = MemorySettlement::new();
/// settlement.deposit(1, Asset::Quote, 1_000_000_000_000);
///
/// let mut engine = MatchingEngine::new(settlement);
/// let result = engine
///     .place_order(1, Side::Buy, 1_000_000_000, 10_000_000_000, TimeInForce::GoodTillCancel, 0)
///     .unwrap();
///
/// assert_eq!(engine.best_price(Side::Buy), Some((1_000_000_000, 10_000_000_000)));
/// assert!(result.trades.is_empty());
/// ```
#[derive(Debug)]
pub struct MatchingEngine<S: SettlementAdapter> {
    book: OrderBook,
    settlement: S,
    in_flight: bool,
}

impl<S: SettlementAdapter> MatchingEngine<S> {
    /// Create an engine over an empty book
    pub fn new(settlement: S) -> Self {
        Self {
            book: OrderBook::new(),
            settlement,
            in_flight: false,
        }
    }

    /// Create an engine with pre-allocated book capacity
    pub fn with_capacity(settlement: S, order_capacity: usize) -> Self {
        Self {
            book: OrderBook::with_capacity(order_capacity),
            settlement,
            in_flight: false,
        }
    }

    /// Shared access to the book
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Shared access to the settlement adapter
    pub fn settlement(&self) -> &S {
        &self.settlement
    }

    // ========================================================================
    // Placement
    // ========================================================================

    /// Place a limit order.
    ///
    /// Matches against the opposite side while the crossing condition holds;
    /// any remainder is rested at `price` with the given time-in-force.
    ///
    /// # Errors
    ///
    /// `InvalidOrder` for zero quantity or zero price (no state change);
    /// `Settlement` if the adapter rejects a leg (operation aborted, book
    /// untouched).
    pub fn place_order(
        &mut self,
        owner: u64,
        side: Side,
        price: u64,
        quantity: u64,
        time_in_force: TimeInForce,
        now: u64,
    ) -> EngineResult<MatchResult> {
        self.begin()?;
        let result = self.place_order_inner(owner, side, price, quantity, time_in_force, now);
        self.in_flight = false;
        result
    }

    /// Place a market order.
    ///
    /// Matches against the opposite side's unconditional best prices.
    /// Market orders are immediate-or-cancel: an unfilled remainder is
    /// dropped, never rested, and a liquidity shortfall is reported through
    /// `MatchResult::filled` rather than as an error.
    pub fn place_market_order(
        &mut self,
        owner: u64,
        side: Side,
        quantity: u64,
        now: u64,
    ) -> EngineResult<MatchResult> {
        self.begin()?;
        let result = self.place_market_order_inner(owner, side, quantity, now);
        self.in_flight = false;
        result
    }

    /// Cancel a resting order. Owner-only, O(1).
    ///
    /// Unlocks the order's reserved remainder and removes it from its queue
    /// and, if the queue empties, from the price index, in the same call.
    ///
    /// # Errors
    ///
    /// `OrderNotFound` if no such order rests on the book; `Unauthorized`
    /// if `owner` does not own it. Neither changes any state.
    pub fn cancel_order(&mut self, owner: u64, order_id: u64) -> EngineResult<Order> {
        self.begin()?;
        let result = self.cancel_order_inner(owner, order_id);
        self.in_flight = false;
        result
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Best price and total resting volume for one side
    pub fn best_price(&self, side: Side) -> Option<(u64, u64)> {
        self.book.best(side)
    }

    /// Order count and total volume at a price level
    pub fn order_queue(&self, side: Side, price: u64) -> Option<(usize, u64)> {
        self.book.queue_at(side, price)
    }

    /// All resting orders belonging to `owner`, sorted by id
    pub fn user_active_orders(&self, owner: u64) -> Vec<Order> {
        self.book.user_active_orders(owner)
    }

    /// Up to `count` (price, volume) levels strictly worse than `price`
    pub fn next_best_prices(&self, side: Side, price: u64, count: usize) -> Vec<(u64, u64)> {
        self.book.next_best_prices(side, price, count)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn begin(&mut self) -> EngineResult<()> {
        if self.in_flight {
            return Err(EngineError::ReentrantCall);
        }
        self.in_flight = true;
        Ok(())
    }

    fn place_order_inner(
        &mut self,
        owner: u64,
        side: Side,
        price: u64,
        quantity: u64,
        time_in_force: TimeInForce,
        now: u64,
    ) -> EngineResult<MatchResult> {
        if quantity == 0 {
            return Err(EngineError::InvalidOrder("zero quantity"));
        }
        if price == 0 {
            return Err(EngineError::InvalidOrder("zero price"));
        }

        let id = self.book.assign_order_id();
        let order = Order::new(id, owner, side, price, quantity, now, time_in_force.expires_at());
        debug!(order_id = id, ?side, price, quantity, "limit order accepted");
        self.execute(order, now)
    }

    fn place_market_order_inner(
        &mut self,
        owner: u64,
        side: Side,
        quantity: u64,
        now: u64,
    ) -> EngineResult<MatchResult> {
        if quantity == 0 {
            return Err(EngineError::InvalidOrder("zero quantity"));
        }

        let id = self.book.assign_order_id();
        let order = Order::new_market(id, owner, side, quantity, now);
        debug!(order_id = id, ?side, quantity, "market order accepted");
        self.execute(order, now)
    }

    /// Run plan, settle and commit for an accepted incoming order.
    fn execute(&mut self, mut taker: Order, now: u64) -> EngineResult<MatchResult> {
        let is_market = taker.order_type() == OrderType::Market;

        // Phase 1: read-only plan
        let plan = plan_match(&self.book, &taker, is_market, now);

        // Phase 2: all settlement legs, before the book changes. Building
        // the legs also surfaces any Overflow before the first adapter call.
        let legs = build_legs(&taker, &plan, is_market)?;
        for leg in &legs {
            apply_leg(&mut self.settlement, leg)?;
        }

        // Phase 3: commit
        let mut result = MatchResult {
            order_id: taker.id,
            ..MatchResult::default()
        };

        for evict in &plan.evictions {
            if let Some(node) = self.book.order_mut(evict.key) {
                node.set_status(OrderStatus::Expired);
            }
            self.book.remove_by_key(evict.key);
            debug!(order_id = evict.order_id, price = evict.price, "resting order expired");
            result.expired.push(evict.order_id);
        }

        for fill in &plan.fills {
            // Volume drops by the executed amount; a fully filled maker then
            // leaves with a zero remainder so nothing is counted twice.
            taker.fill(fill.quantity);

            let maker_side = taker.side().opposite();
            if let Some(queue) = self.book.side_mut(maker_side).queue_mut(fill.price) {
                queue.reduce_volume(fill.quantity);
            }

            let maker_filled = {
                let maker = self
                    .book
                    .order_mut(fill.key)
                    .ok_or(EngineError::OrderNotFound(fill.maker_id))?;
                maker.fill(fill.quantity);
                maker.is_filled()
            };
            if maker_filled {
                self.book.remove_by_key(fill.key);
            }

            let trade = Trade::new(
                self.book.assign_trade_id(),
                fill.maker_id,
                taker.id,
                fill.maker_owner,
                taker.owner,
                fill.price,
                fill.quantity,
                now,
            );
            debug!(
                trade_id = trade.id,
                maker = fill.maker_id,
                taker = taker.id,
                price = fill.price,
                quantity = fill.quantity,
                "trade"
            );
            result.trades.push(trade);
        }

        if taker.remaining() > 0 {
            if is_market {
                // Immediate-or-cancel: the remainder is dropped
                taker.set_status(OrderStatus::Cancelled);
                debug!(order_id = taker.id, dropped = taker.remaining(), "market remainder dropped");
            } else {
                debug!(order_id = taker.id, resting = taker.remaining(), "limit remainder rests");
                self.book.insert_resting(taker.clone());
            }
        }

        result.status = taker.status();
        result.filled = taker.filled;
        Ok(result)
    }

    fn cancel_order_inner(&mut self, owner: u64, order_id: u64) -> EngineResult<Order> {
        let key = self
            .book
            .key_of(order_id)
            .ok_or(EngineError::OrderNotFound(order_id))?;
        let (order_owner, side, price, remaining) = {
            let order = self
                .book
                .order(key)
                .ok_or(EngineError::OrderNotFound(order_id))?;
            (order.owner, order.side(), order.price, order.remaining())
        };
        if order_owner != owner {
            return Err(EngineError::Unauthorized(order_id));
        }

        // Unlock first: if the adapter rejects, the book stays untouched
        let (asset, amount) = reserved_amount(side, price, remaining)?;
        self.settlement.unlock(owner, asset, amount)?;

        let mut order = self
            .book
            .remove_by_key(key)
            .ok_or(EngineError::OrderNotFound(order_id))?;
        order.set_status(OrderStatus::Cancelled);
        debug!(order_id, ?side, price, remaining, "order cancelled");
        Ok(order)
    }
}

// ============================================================================
// Planning (read-only)
// ============================================================================

/// Walk the opposite side and decide every eviction and fill without
/// touching the book.
fn plan_match(book: &OrderBook, taker: &Order, is_market: bool, now: u64) -> MatchPlan {
    let mut plan = MatchPlan::default();
    let mut remaining = taker.remaining();
    let opposite = book.side(taker.side().opposite());
    let arena = book.arena();

    let mut cursor = opposite.best_price();
    while remaining > 0 {
        let Some(level_price) = cursor else { break };
        if !is_market && !crosses(taker.side(), taker.price, level_price) {
            break;
        }

        let queue = opposite.queue(level_price).expect("indexed level has a queue");
        for key in queue.iter(arena) {
            let node = arena.get(key).expect("invalid slab key");

            if node.order.is_expired(now) {
                plan.evictions.push(PlannedEvict {
                    key,
                    order_id: node.order_id(),
                    owner: node.owner(),
                    side: node.order.side(),
                    price: node.price(),
                    remaining: node.remaining(),
                });
                continue;
            }

            // Self-trade prevention: skip without filling, no event
            if node.owner() == taker.owner {
                continue;
            }

            let executed = remaining.min(node.remaining());
            if executed > 0 {
                plan.fills.push(PlannedFill {
                    key,
                    maker_id: node.order_id(),
                    maker_owner: node.owner(),
                    price: level_price,
                    quantity: executed,
                });
                remaining -= executed;
            }
            if remaining == 0 {
                break;
            }
        }

        if remaining == 0 {
            break;
        }
        // Whatever was fillable here is in the plan; anything left at this
        // level was skipped. Advance so the walk always makes progress.
        cursor = opposite.next_price(level_price);
    }

    plan.executed = taker.remaining() - remaining;
    plan
}

/// Translate a plan into the exact settlement invocations it owes.
///
/// Fails with `Overflow` before any adapter call if a notional amount does
/// not fit the fixed-point range.
fn build_legs(taker: &Order, plan: &MatchPlan, is_market: bool) -> EngineResult<Vec<Leg>> {
    let mut legs = Vec::with_capacity(plan.evictions.len() + plan.fills.len() * 2 + 1);

    for evict in &plan.evictions {
        let (asset, amount) = reserved_amount(evict.side, evict.price, evict.remaining)?;
        legs.push(Leg::Unlock {
            owner: evict.owner,
            asset,
            amount,
        });
    }

    for fill in &plan.fills {
        let quote = notional(fill.price, fill.quantity).ok_or(EngineError::Overflow)?;
        match taker.side() {
            // Maker sells base out of its lock, taker pays quote
            Side::Buy => {
                legs.push(Leg::TransferLocked {
                    payer: fill.maker_owner,
                    payee: taker.owner,
                    asset: Asset::Base,
                    amount: fill.quantity,
                });
                legs.push(Leg::Transfer {
                    payer: taker.owner,
                    payee: fill.maker_owner,
                    asset: Asset::Quote,
                    amount: quote,
                });
            }
            // Maker pays quote out of its lock, taker sells base
            Side::Sell => {
                legs.push(Leg::TransferLocked {
                    payer: fill.maker_owner,
                    payee: taker.owner,
                    asset: Asset::Quote,
                    amount: quote,
                });
                legs.push(Leg::Transfer {
                    payer: taker.owner,
                    payee: fill.maker_owner,
                    asset: Asset::Base,
                    amount: fill.quantity,
                });
            }
        }
    }

    let remainder = taker.remaining() - plan.executed;
    if !is_market && remainder > 0 {
        let (asset, amount) = reserved_amount(taker.side(), taker.price, remainder)?;
        legs.push(Leg::Lock {
            owner: taker.owner,
            asset,
            amount,
        });
    }

    Ok(legs)
}

fn apply_leg<S: SettlementAdapter>(settlement: &mut S, leg: &Leg) -> EngineResult<()> {
    match *leg {
        Leg::Lock { owner, asset, amount } => settlement.lock(owner, asset, amount)?,
        Leg::Unlock { owner, asset, amount } => settlement.unlock(owner, asset, amount)?,
        Leg::Transfer { payer, payee, asset, amount } => {
            settlement.transfer_from(payer, payee, asset, amount)?
        }
        Leg::TransferLocked { payer, payee, asset, amount } => {
            settlement.transfer_locked_from(payer, payee, asset, amount)?
        }
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
