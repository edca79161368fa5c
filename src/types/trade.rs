//! Trade type representing an executed match between two orders.
//!
//! ## SSZ Serialization
//!
//! Trades derive `SimpleSerialize` for deterministic encoding, so a trade
//! stream can be hashed or persisted byte-identically across runs.

use ssz_rs::prelude::*;

/// A trade is a single match between a maker and a taker order.
///
/// ## Terminology
///
/// - **Maker**: the resting order that was already on the book
/// - **Taker**: the incoming order that triggered the match
///
/// ## Price Discovery
///
/// The trade always executes at the maker's price (the resting order's
/// price). This is standard price-time priority behavior.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Trade {
    /// Unique trade identifier (assigned by the book)
    pub id: u64,

    /// Maker order ID (the resting order)
    pub maker_order_id: u64,

    /// Taker order ID (the incoming order)
    pub taker_order_id: u64,

    /// Maker owner/account ID
    pub maker_owner: u64,

    /// Taker owner/account ID
    pub taker_owner: u64,

    /// Execution price in fixed-point (scaled by 10^8), always the maker's
    pub price: u64,

    /// Executed quantity in fixed-point (scaled by 10^8)
    pub quantity: u64,

    /// Execution timestamp in milliseconds
    pub timestamp: u64,
}

impl Trade {
    /// Create a new trade
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        maker_order_id: u64,
        taker_order_id: u64,
        maker_owner: u64,
        taker_owner: u64,
        price: u64,
        quantity: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            id,
            maker_order_id,
            taker_order_id,
            maker_owner,
            taker_owner,
            price,
            quantity,
            timestamp,
        }
    }

    /// Notional value of this trade (price * quantity), unscaled.
    ///
    /// The result carries a 10^16 scale (10^8 * 10^8); divide by SCALE to
    /// get a quote amount in fixed-point.
    pub fn notional_raw(&self) -> u128 {
        (self.price as u128) * (self.quantity as u128)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_new() {
        let trade = Trade::new(
            1,
            100,
            200,
            10,
            20,
            5_000_000_000_000, // 50000.00000000
            50_000_000,        // 0.50000000
            1703577600000,
        );

        assert_eq!(trade.id, 1);
        assert_eq!(trade.maker_order_id, 100);
        assert_eq!(trade.taker_order_id, 200);
        assert_eq!(trade.maker_owner, 10);
        assert_eq!(trade.taker_owner, 20);
        assert_eq!(trade.price, 5_000_000_000_000);
        assert_eq!(trade.quantity, 50_000_000);
        assert_eq!(trade.timestamp, 1703577600000);
    }

    #[test]
    fn test_trade_notional() {
        let trade = Trade::new(1, 100, 200, 10, 20, 5_000_000_000_000, 100_000_000, 0);

        let expected = 5_000_000_000_000u128 * 100_000_000u128;
        assert_eq!(trade.notional_raw(), expected);
    }

    #[test]
    fn test_trade_ssz_roundtrip() {
        let trade = Trade::new(1, 100, 200, 10, 20, 5_000_000_000_000, 50_000_000, 1703577600000);

        let serialized = ssz_rs::serialize(&trade).expect("Failed to serialize");
        let deserialized: Trade = ssz_rs::deserialize(&serialized).expect("Failed to deserialize");

        assert_eq!(trade, deserialized);
    }

    #[test]
    fn test_trade_deterministic_serialization() {
        let trade = Trade::new(1, 100, 200, 10, 20, 5_000_000_000_000, 50_000_000, 1703577600000);

        let bytes1 = ssz_rs::serialize(&trade).expect("Failed to serialize");
        let bytes2 = ssz_rs::serialize(&trade).expect("Failed to serialize");

        assert_eq!(bytes1, bytes2, "SSZ serialization must be deterministic");
    }
}
