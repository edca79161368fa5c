//! Matching engine module.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: same input sequence always produces the same book,
//!    trades and state root
//! 2. **Fixed-Point Math**: no floating-point operations anywhere
//! 3. **Synchronous Execution**: one operation runs to completion with no
//!    suspension points
//! 4. **Price-Time Priority**: best price first, FIFO within a price
//! 5. **Atomicity**: an operation either fully applies or leaves the book
//!    untouched; settlement legs are issued before any book mutation
//!
//! ## Matching Rules
//!
//! - Buy orders match against asks, lowest price first
//! - Sell orders match against bids, highest price first
//! - Trades execute at the maker's resting price
//! - Limit remainders rest on the book; market remainders are dropped (IOC)
//! - Same-owner resting orders are skipped (self-trade prevention)
//! - Expired resting orders are evicted lazily when the walk reaches them

pub mod matcher;

pub use matcher::{MatchResult, MatchingEngine};
