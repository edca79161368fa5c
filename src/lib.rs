//! # matchbook
//!
//! A price-time priority Central Limit Order Book and matching engine.
//!
//! ## Architecture
//!
//! - **Types**: core data structures (`Order`, `Trade`, fixed-point helpers,
//!   compact key encoding)
//! - **OrderBook**: slab-backed registry with one ordered price side per
//!   direction and per-price FIFO queues
//! - **Engine**: the deterministic matching engine, generic over an injected
//!   [`settlement::SettlementAdapter`]
//! - **Settlement**: the value-movement boundary; custody and decimal
//!   conversion live behind it, not in the engine
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical input sequences produce identical books and
//!    state roots
//! 2. **No Floating Point**: all math is fixed-point (10^8 scaling)
//! 3. **Pre-allocated Memory**: slab allocation for O(1) order operations
//! 4. **Transactional Operations**: a call either fully applies or leaves no
//!    partial state
//!
//! ## Example
//!
//! ```
//! use matchbook::engine::MatchingEngine;
//! use matchbook::settlement::{Asset, MemorySettlement};
//! use matchbook::types::{Side, TimeInForce};
//!
//! let mut settlement = MemorySettlement::new();
//! settlement.deposit(1, Asset::Base, 1_000_000_000_000);
//! settlement.deposit(2, Asset::Quote, 1_000_000_000_000);
//!
//! let mut engine = MatchingEngine::new(settlement);
//!
//! // Owner 1 offers 1.0 at 50.0; owner 2 lifts it
//! engine.place_order(1, Side::Sell, 5_000_000_000, 100_000_000,
//!     TimeInForce::GoodTillCancel, 0).unwrap();
//! let result = engine.place_market_order(2, Side::Buy, 100_000_000, 1).unwrap();
//!
//! assert!(result.fully_filled());
//! assert_eq!(result.trades.len(), 1);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Trade, fixed-point and key encoding
pub mod types;

/// Order book: registry, price sides, FIFO queues
pub mod orderbook;

/// Matching engine: deterministic price-time priority matching
pub mod engine;

/// Settlement boundary: the injected value-movement collaborator
pub mod settlement;

/// Error taxonomy
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use engine::{MatchResult, MatchingEngine};
pub use error::{EngineError, EngineResult};
pub use orderbook::OrderBook;
pub use settlement::{Asset, MemorySettlement, SettlementAdapter};
pub use types::{Order, OrderStatus, OrderType, Side, TimeInForce, Trade};
