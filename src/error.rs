//! Error taxonomy for book and engine operations.
//!
//! Validation errors are raised before any state mutation; a settlement
//! rejection aborts the whole operation with the book untouched. Shortfalls
//! of liquidity for market orders are NOT errors: the match result reports
//! the actual filled quantity.

use thiserror::Error;

use crate::settlement::SettlementError;

/// Errors surfaced by [`crate::engine::MatchingEngine`] and
/// [`crate::orderbook::OrderBook`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The order is malformed (zero quantity, or zero price on a limit order)
    #[error("invalid order: {0}")]
    InvalidOrder(&'static str),

    /// No order with this id is on the book
    #[error("order {0} not found")]
    OrderNotFound(u64),

    /// The caller does not own the order it tried to cancel
    #[error("order {0} does not belong to the caller")]
    Unauthorized(u64),

    /// Removal was attempted on an empty queue (internal invariant)
    #[error("order queue at price {0} is empty")]
    QueueEmpty(u64),

    /// A price level expected to exist was absent (internal invariant)
    #[error("price level {0} not found")]
    PriceNotFound(u64),

    /// A settlement amount overflowed the fixed-point range
    #[error("arithmetic overflow computing settlement amount")]
    Overflow,

    /// A mutating call arrived while another operation was in flight
    #[error("matching operation already in flight")]
    ReentrantCall,

    /// The settlement adapter rejected a leg; the operation was aborted
    #[error("settlement rejected: {0}")]
    Settlement(#[from] SettlementError),
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            EngineError::InvalidOrder("zero quantity").to_string(),
            "invalid order: zero quantity"
        );
        assert_eq!(EngineError::OrderNotFound(7).to_string(), "order 7 not found");
        assert_eq!(
            EngineError::Unauthorized(7).to_string(),
            "order 7 does not belong to the caller"
        );
    }

    #[test]
    fn test_settlement_error_converts() {
        let err: EngineError = SettlementError::InsufficientBalance {
            owner: 1,
            needed: 10,
            available: 5,
        }
        .into();
        assert!(matches!(err, EngineError::Settlement(_)));
    }
}
