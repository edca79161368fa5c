//! Fixed-point price and quantity utilities.
//!
//! ## Overview
//!
//! All prices and quantities in the book use fixed-point representation to
//! avoid floating-point errors: values are stored as `u64` scaled by 10^8.
//! `rust_decimal` handles the string/decimal edge so no float ever enters
//! the matching path.
//!
//! ## Examples
//!
//! ```
//! use matchbook::types::price::{to_fixed, from_fixed};
//!
//! let price = to_fixed("50000.12345678").unwrap();
//! assert_eq!(price, 5_000_012_345_678);
//! assert_eq!(from_fixed(price), "50000.12345678");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point arithmetic: 10^8
///
/// This provides 8 decimal places of precision.
pub const SCALE: u64 = 100_000_000;

/// Maximum value that can be safely represented (u64::MAX / SCALE)
pub const MAX_VALUE: u64 = u64::MAX / SCALE;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to fixed-point u64
///
/// Returns `None` if parsing fails, the value is negative, or it is out of
/// range.
///
/// # Example
///
/// ```
/// use matchbook::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// assert_eq!(to_fixed("-1"), None);
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point u64 (None if negative or out of range)
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    let rounded = scaled.round_dp(0);
    rounded.to_u64()
}

/// Convert fixed-point u64 to a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Convert fixed-point u64 to a string with 8 decimal places
///
/// # Example
///
/// ```
/// use matchbook::types::price::from_fixed;
///
/// assert_eq!(from_fixed(100_000_000), "1.00000000");
/// assert_eq!(from_fixed(5_000_012_345_678), "50000.12345678");
/// ```
pub fn from_fixed(value: u64) -> String {
    let decimal = fixed_to_decimal(value);
    format!("{:.8}", decimal)
}

// ============================================================================
// Settlement Arithmetic
// ============================================================================

/// Quote-asset amount for a fill: price * quantity, rescaled to 10^8.
///
/// The multiplication widens to u128 so the intermediate (scale 10^16)
/// cannot overflow; the result must fit back in u64 or `None` is returned.
///
/// # Example
///
/// ```
/// use matchbook::types::price::notional;
///
/// // 50000.0 * 0.5 = 25000.0
/// let price = 5_000_000_000_000u64;
/// let quantity = 50_000_000u64;
/// assert_eq!(notional(price, quantity), Some(2_500_000_000_000));
/// ```
pub fn notional(price: u64, quantity: u64) -> Option<u64> {
    let wide = (price as u128) * (quantity as u128) / (SCALE as u128);
    u64::try_from(wide).ok()
}

// ============================================================================
// Unit Tests
// ============================================================================
