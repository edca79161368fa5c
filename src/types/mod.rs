//! Core data types for the matchbook order book
//!
//! All serialized types implement SSZ for deterministic encoding.
//! All numeric values use fixed-point representation (scaled by 10^8).
//!
//! ## Types
//!
//! - [`Order`]: an order record with fill and lifecycle state
//! - [`Side`]: Buy or Sell
//! - [`OrderType`]: Limit or Market
//! - [`OrderStatus`]: lifecycle state machine
//! - [`TimeInForce`]: resting duration for limit orders
//! - [`Trade`]: an executed match between two orders

mod order;
mod trade;
pub mod encoding;
pub mod price;

// Re-export all types at module level
pub use order::{Order, OrderStatus, OrderType, Side, TimeInForce};
pub use trade::Trade;
