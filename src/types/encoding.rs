//! Compact order-key encoding for dense storage.
//!
//! ## Layout
//!
//! A resting order is identified by (side, price, id). The three fit one
//! 128-bit word:
//!
//! ```text
//! bit 127 .. 113   unused, must be zero
//! bit 112          side (0 = Buy, 1 = Sell)
//! bits 111 .. 48   price (64 bits, fixed-point)
//! bits  47 .. 0    order id (48 bits, non-zero)
//! ```
//!
//! The encoding is a storage-cost optimization only; it carries no matching
//! semantics. Unpacking rejects a zero order id (ids start at 1) and any set
//! bit above the side bit, so corrupted words fail loudly instead of
//! resolving to a phantom order.

use thiserror::Error;

use crate::types::Side;

/// Number of bits reserved for the order id
pub const ID_BITS: u32 = 48;

/// Largest order id that fits the packed layout: 2^48 - 1
pub const MAX_PACKED_ID: u64 = (1 << ID_BITS) - 1;

const PRICE_SHIFT: u32 = ID_BITS;
const SIDE_SHIFT: u32 = ID_BITS + 64;

/// Errors from packing or unpacking an order key
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EncodingError {
    /// An order id of zero is never valid
    #[error("order id must be non-zero")]
    ZeroOrderId,

    /// The order id does not fit in 48 bits
    #[error("order id {0} exceeds the 48-bit packed range")]
    OrderIdOverflow(u64),

    /// Bits above the side bit were set in a packed word
    #[error("malformed packed key: high bits set")]
    MalformedKey,
}

/// Pack (side, price, id) into one u128 word.
///
/// # Example
///
/// ```
/// use matchbook::types::{Side, encoding};
///
/// let key = encoding::pack_order_key(Side::Sell, 5_000_000_000_000, 42).unwrap();
/// let (side, price, id) = encoding::unpack_order_key(key).unwrap();
/// assert_eq!((side, price, id), (Side::Sell, 5_000_000_000_000, 42));
/// ```
pub fn pack_order_key(side: Side, price: u64, id: u64) -> Result<u128, EncodingError> {
    if id == 0 {
        return Err(EncodingError::ZeroOrderId);
    }
    if id > MAX_PACKED_ID {
        return Err(EncodingError::OrderIdOverflow(id));
    }

    let word = ((side.to_u8() as u128) << SIDE_SHIFT)
        | ((price as u128) << PRICE_SHIFT)
        | (id as u128);
    Ok(word)
}

/// Unpack a u128 word into (side, price, id).
///
/// Rejects a zero id and any stray bits above the side bit.
pub fn unpack_order_key(word: u128) -> Result<(Side, u64, u64), EncodingError> {
    if word >> (SIDE_SHIFT + 1) != 0 {
        return Err(EncodingError::MalformedKey);
    }

    let id = (word & (MAX_PACKED_ID as u128)) as u64;
    if id == 0 {
        return Err(EncodingError::ZeroOrderId);
    }

    let price = ((word >> PRICE_SHIFT) & (u64::MAX as u128)) as u64;
    let side_bit = ((word >> SIDE_SHIFT) & 1) as u8;
    let side = Side::from_u8(side_bit).expect("side bit is 0 or 1");

    Ok((side, price, id))
}

// ============================================================================
// Unit Tests
// ============================================================================
