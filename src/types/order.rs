//! Order record and its enumerations.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs for deterministic encoding.
//! Enum-valued fields (side, status, order type) are stored as `u8` so the
//! struct stays a fixed-size SSZ container; typed accessors wrap the raw
//! fields.
//!
//! ## Fixed-Point Representation
//!
//! Prices and quantities are `u64` scaled by 10^8 (see [`crate::types::price`]).
//!
//! ## Queue membership
//!
//! The intrusive next/prev links live on the arena node
//! ([`crate::orderbook::OrderNode`]), not here: a serialized order carries no
//! book-structure state.

use ssz_rs::prelude::*;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy or Sell
///
/// Represented as u8 in serialized form:
/// - Buy = 0
/// - Sell = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Buy order (bid) - wants to purchase the base asset
    #[default]
    Buy,
    /// Sell order (ask) - wants to sell the base asset
    Sell,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

// ============================================================================
// OrderType enum
// ============================================================================

/// Order type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderType {
    /// Limit order - executes at the given price or better, remainder rests
    #[default]
    Limit,
    /// Market order - executes at the best available price, remainder is
    /// discarded (immediate-or-cancel), never rests on the book
    Market,
}

impl OrderType {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            OrderType::Limit => 0,
            OrderType::Market => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OrderType::Limit),
            1 => Some(OrderType::Market),
            _ => None,
        }
    }
}

// ============================================================================
// OrderStatus enum
// ============================================================================

/// Order lifecycle status.
///
/// Transitions: Open -> PartiallyFilled -> Filled;
/// Open/PartiallyFilled -> Cancelled (explicit) or Expired (lazy eviction).
/// Filled, Cancelled and Expired are terminal: the order leaves its queue
/// and its record is purged from the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    /// Resting or incoming, nothing executed yet
    #[default]
    Open,
    /// Some quantity executed, some still working
    PartiallyFilled,
    /// Fully executed
    Filled,
    /// Cancelled by its owner (or the unfilled remainder of a market order)
    Cancelled,
    /// Evicted after its expiry passed
    Expired,
}

impl OrderStatus {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            OrderStatus::Open => 0,
            OrderStatus::PartiallyFilled => 1,
            OrderStatus::Filled => 2,
            OrderStatus::Cancelled => 3,
            OrderStatus::Expired => 4,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OrderStatus::Open),
            1 => Some(OrderStatus::PartiallyFilled),
            2 => Some(OrderStatus::Filled),
            3 => Some(OrderStatus::Cancelled),
            4 => Some(OrderStatus::Expired),
            _ => None,
        }
    }

    /// Terminal statuses remove the order from the book
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Expired
        )
    }
}

// ============================================================================
// TimeInForce
// ============================================================================

/// How long a limit order stays on the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeInForce {
    /// Rest until filled or cancelled
    #[default]
    GoodTillCancel,
    /// Rest until the given timestamp (ms); evicted lazily once passed
    GoodTillTime(u64),
}

impl TimeInForce {
    /// The expiry encoded on the order record (0 = no expiry)
    pub fn expires_at(self) -> u64 {
        match self {
            TimeInForce::GoodTillCancel => 0,
            TimeInForce::GoodTillTime(at) => at,
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// An order record.
///
/// ## Fields
///
/// Price and quantities use fixed-point representation (scaled by 10^8).
/// `filled` is cumulative executed quantity; the invariant
/// `filled <= quantity` holds at all times and `remaining()` derives from it.
///
/// ## Example
///
/// ```
/// use matchbook::types::{Order, Side};
///
/// // Buy 1.0 at 50000.0
/// let order = Order::new(1, 100, Side::Buy, 5_000_000_000_000, 100_000_000, 0, 0);
/// assert_eq!(order.remaining(), 100_000_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Unique order identifier, non-zero, assigned by the book
    pub id: u64,

    /// Owner/account identifier
    pub owner: u64,

    /// Order side as u8 (0=Buy, 1=Sell)
    pub side_raw: u8,

    /// Limit price in fixed-point (scaled by 10^8); 0 for market orders
    pub price: u64,

    /// Original quantity in fixed-point (scaled by 10^8)
    pub quantity: u64,

    /// Cumulative executed quantity; filled <= quantity
    pub filled: u64,

    /// Lifecycle status as u8 (see [`OrderStatus`])
    pub status_raw: u8,

    /// Order type as u8 (0=Limit, 1=Market)
    pub order_type_raw: u8,

    /// Unix timestamp in milliseconds when the order was created
    pub timestamp: u64,

    /// Expiry timestamp in milliseconds; 0 means no expiry
    pub expires_at: u64,
}

impl Order {
    /// Create a new limit order in the Open state.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique order identifier (non-zero)
    /// * `owner` - Owner/account identifier
    /// * `side` - Buy or Sell
    /// * `price` - Limit price in fixed-point
    /// * `quantity` - Quantity in fixed-point
    /// * `timestamp` - Creation time in milliseconds
    /// * `expires_at` - Expiry in milliseconds, 0 for none
    pub fn new(
        id: u64,
        owner: u64,
        side: Side,
        price: u64,
        quantity: u64,
        timestamp: u64,
        expires_at: u64,
    ) -> Self {
        Self {
            id,
            owner,
            side_raw: side.to_u8(),
            price,
            quantity,
            filled: 0,
            status_raw: OrderStatus::Open.to_u8(),
            order_type_raw: OrderType::Limit.to_u8(),
            timestamp,
            expires_at,
        }
    }

    /// Create a new market order in the Open state.
    ///
    /// Market orders carry no price and never rest on the book.
    pub fn new_market(id: u64, owner: u64, side: Side, quantity: u64, timestamp: u64) -> Self {
        Self {
            id,
            owner,
            side_raw: side.to_u8(),
            price: 0,
            quantity,
            filled: 0,
            status_raw: OrderStatus::Open.to_u8(),
            order_type_raw: OrderType::Market.to_u8(),
            timestamp,
            expires_at: 0,
        }
    }

    /// Get the order side
    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or(Side::Buy)
    }

    /// Get the order type
    pub fn order_type(&self) -> OrderType {
        OrderType::from_u8(self.order_type_raw).unwrap_or(OrderType::Limit)
    }

    /// Get the lifecycle status
    pub fn status(&self) -> OrderStatus {
        OrderStatus::from_u8(self.status_raw).unwrap_or(OrderStatus::Open)
    }

    /// Set the lifecycle status
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status_raw = status.to_u8();
    }

    /// Quantity still working: quantity - filled
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.quantity.saturating_sub(self.filled)
    }

    /// Check if the order is fully filled
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.filled >= self.quantity
    }

    /// Check whether the expiry has passed at `now` (0 expiry never passes)
    #[inline]
    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at != 0 && self.expires_at <= now
    }

    /// Execute a portion of this order.
    ///
    /// Increases `filled`, advances the status to PartiallyFilled or Filled,
    /// and returns the quantity actually executed (capped at remaining).
    pub fn fill(&mut self, quantity: u64) -> u64 {
        let executed = quantity.min(self.remaining());
        self.filled += executed;
        if self.is_filled() {
            self.set_status(OrderStatus::Filled);
        } else if self.filled > 0 {
            self.set_status(OrderStatus::PartiallyFilled);
        }
        executed
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_conversion() {
        assert_eq!(Side::Buy.to_u8(), 0);
        assert_eq!(Side::Sell.to_u8(), 1);
        assert_eq!(Side::from_u8(0), Some(Side::Buy));
        assert_eq!(Side::from_u8(1), Some(Side::Sell));
        assert_eq!(Side::from_u8(2), None);
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_order_type_conversion() {
        assert_eq!(OrderType::Limit.to_u8(), 0);
        assert_eq!(OrderType::Market.to_u8(), 1);
        assert_eq!(OrderType::from_u8(0), Some(OrderType::Limit));
        assert_eq!(OrderType::from_u8(1), Some(OrderType::Market));
        assert_eq!(OrderType::from_u8(2), None);
    }

    #[test]
    fn test_status_conversion_roundtrip() {
        for status in [
            OrderStatus::Open,
            OrderStatus::PartiallyFilled,
            OrderStatus::Filled,
            OrderStatus::Cancelled,
            OrderStatus::Expired,
        ] {
            assert_eq!(OrderStatus::from_u8(status.to_u8()), Some(status));
        }
        assert_eq!(OrderStatus::from_u8(5), None);
    }

    #[test]
    fn test_status_terminal() {
        assert!(!OrderStatus::Open.is_terminal());
        assert!(!OrderStatus::PartiallyFilled.is_terminal());
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Expired.is_terminal());
    }

    #[test]
    fn test_time_in_force() {
        assert_eq!(TimeInForce::GoodTillCancel.expires_at(), 0);
        assert_eq!(TimeInForce::GoodTillTime(1234).expires_at(), 1234);
    }

    #[test]
    fn test_order_new() {
        let order = Order::new(1, 100, Side::Buy, 5_000_000_000_000, 100_000_000, 42, 0);

        assert_eq!(order.id, 1);
        assert_eq!(order.owner, 100);
        assert_eq!(order.side(), Side::Buy);
        assert_eq!(order.price, 5_000_000_000_000);
        assert_eq!(order.quantity, 100_000_000);
        assert_eq!(order.filled, 0);
        assert_eq!(order.remaining(), 100_000_000);
        assert_eq!(order.status(), OrderStatus::Open);
        assert_eq!(order.order_type(), OrderType::Limit);
        assert_eq!(order.timestamp, 42);
        assert!(!order.is_filled());
    }

    #[test]
    fn test_market_order_new() {
        let order = Order::new_market(2, 100, Side::Sell, 50_000_000, 42);

        assert_eq!(order.price, 0);
        assert_eq!(order.order_type(), OrderType::Market);
        assert_eq!(order.expires_at, 0);
    }

    #[test]
    fn test_order_fill_transitions() {
        let mut order = Order::new(1, 100, Side::Buy, 5_000_000_000_000, 100_000_000, 0, 0);

        let executed = order.fill(30_000_000);
        assert_eq!(executed, 30_000_000);
        assert_eq!(order.filled, 30_000_000);
        assert_eq!(order.remaining(), 70_000_000);
        assert_eq!(order.status(), OrderStatus::PartiallyFilled);

        let executed = order.fill(70_000_000);
        assert_eq!(executed, 70_000_000);
        assert_eq!(order.remaining(), 0);
        assert_eq!(order.status(), OrderStatus::Filled);
        assert!(order.is_filled());
    }

    #[test]
    fn test_order_overfill_capped() {
        let mut order = Order::new(1, 100, Side::Buy, 5_000_000_000_000, 100_000_000, 0, 0);

        let executed = order.fill(200_000_000);
        assert_eq!(executed, 100_000_000);
        assert_eq!(order.filled, 100_000_000);
        assert!(order.is_filled());
    }

    #[test]
    fn test_order_expiry() {
        let order = Order::new(1, 100, Side::Buy, 10, 10, 0, 1000);
        assert!(!order.is_expired(999));
        assert!(order.is_expired(1000));
        assert!(order.is_expired(1001));

        // 0 means no expiry
        let order = Order::new(1, 100, Side::Buy, 10, 10, 0, 0);
        assert!(!order.is_expired(u64::MAX));
    }

    #[test]
    fn test_order_ssz_roundtrip() {
        let mut order = Order::new(1, 100, Side::Sell, 5_000_000_000_000, 100_000_000, 7, 9000);
        order.fill(40_000_000);

        let serialized = ssz_rs::serialize(&order).expect("Failed to serialize");
        let deserialized: Order = ssz_rs::deserialize(&serialized).expect("Failed to deserialize");

        assert_eq!(order, deserialized);
    }

    #[test]
    fn test_order_deterministic_serialization() {
        let order = Order::new(1, 100, Side::Buy, 5_000_000_000_000, 100_000_000, 7, 0);

        let bytes1 = ssz_rs::serialize(&order).expect("Failed to serialize");
        let bytes2 = ssz_rs::serialize(&order).expect("Failed to serialize");

        assert_eq!(bytes1, bytes2, "SSZ serialization must be deterministic");
    }
}
