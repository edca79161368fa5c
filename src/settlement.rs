//! Settlement boundary: the collaborator that moves value for fills.
//!
//! The matching engine never touches balances directly. Every matched leg,
//! resting lock, and cancel/expiry unlock goes through the
//! [`SettlementAdapter`] trait, injected into the engine at construction.
//! The adapter owns custody and any currency-decimal conversion; the engine
//! passes book-unit fixed-point amounts.
//!
//! [`MemorySettlement`] is the in-memory implementation used by tests,
//! benchmarks and the demo binary.

use std::collections::HashMap;

use thiserror::Error;

/// The two assets of a trading pair, from the book's point of view.
///
/// A SELL order gives base and receives quote; a BUY order the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    /// The traded asset (quantities are denominated in it)
    Base,
    /// The pricing asset (notional amounts are denominated in it)
    Quote,
}

/// Errors an adapter may raise; any of them aborts the whole operation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettlementError {
    /// The owner's free balance cannot cover the amount
    #[error("owner {owner} has {available} free, needs {needed}")]
    InsufficientBalance { owner: u64, needed: u64, available: u64 },

    /// The owner's locked balance cannot cover the amount
    #[error("owner {owner} has {available} locked, needs {needed}")]
    InsufficientLocked { owner: u64, needed: u64, available: u64 },

    /// A balance update would overflow
    #[error("balance overflow for owner {0}")]
    BalanceOverflow(u64),
}

/// Value-movement primitives the engine requires.
///
/// Each is invoked exactly once per matched leg per fill:
/// - resting a limit order locks the asset it gives;
/// - a fill moves the maker's locked funds (`transfer_locked_from`) and the
///   taker's free funds (`transfer_from`);
/// - cancel and lazy expiry unlock the maker's remainder.
pub trait SettlementAdapter {
    /// Reserve `amount` of `owner`'s free balance
    fn lock(&mut self, owner: u64, asset: Asset, amount: u64) -> Result<(), SettlementError>;

    /// Release `amount` of `owner`'s locked balance back to free
    fn unlock(&mut self, owner: u64, asset: Asset, amount: u64) -> Result<(), SettlementError>;

    /// Move `amount` from `payer`'s free balance to `payee`'s free balance
    fn transfer_from(
        &mut self,
        payer: u64,
        payee: u64,
        asset: Asset,
        amount: u64,
    ) -> Result<(), SettlementError>;

    /// Move `amount` from `payer`'s locked balance to `payee`'s free balance
    fn transfer_locked_from(
        &mut self,
        payer: u64,
        payee: u64,
        asset: Asset,
        amount: u64,
    ) -> Result<(), SettlementError>;
}

// ============================================================================
// MemorySettlement
// ============================================================================

/// Free/locked balance pools for one (owner, asset)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Balance {
    /// Spendable amount
    pub free: u64,
    /// Amount reserved for resting orders
    pub locked: u64,
}

/// In-memory settlement adapter.
///
/// Balances live in a map keyed by (owner, asset). Useful as the test and
/// demo collaborator; a production adapter would sit on real custody.
///
/// # Example
///
/// ```
/// use matchbook::settlement::{Asset, MemorySettlement, SettlementAdapter};
///
/// let mut settlement = MemorySettlement::new();
/// settlement.deposit(1, Asset::Base, 1_000);
/// settlement.lock(1, Asset::Base, 400).unwrap();
/// assert_eq!(settlement.balance(1, Asset::Base).free, 600);
/// assert_eq!(settlement.balance(1, Asset::Base).locked, 400);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySettlement {
    accounts: HashMap<(u64, Asset), Balance>,
}

impl MemorySettlement {
    /// Create an adapter with no balances
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to the owner's free balance
    pub fn deposit(&mut self, owner: u64, asset: Asset, amount: u64) {
        let balance = self.accounts.entry((owner, asset)).or_default();
        balance.free = balance.free.saturating_add(amount);
    }

    /// Current balance for (owner, asset); zero if never touched
    pub fn balance(&self, owner: u64, asset: Asset) -> Balance {
        self.accounts.get(&(owner, asset)).copied().unwrap_or_default()
    }

    /// Sum of free + locked across all owners for one asset.
    ///
    /// Conserved by every engine operation; tests assert on it.
    pub fn total_supply(&self, asset: Asset) -> u128 {
        self.accounts
            .iter()
            .filter(|((_, a), _)| *a == asset)
            .map(|(_, b)| b.free as u128 + b.locked as u128)
            .sum()
    }

    fn entry(&mut self, owner: u64, asset: Asset) -> &mut Balance {
        self.accounts.entry((owner, asset)).or_default()
    }
}

impl SettlementAdapter for MemorySettlement {
    fn lock(&mut self, owner: u64, asset: Asset, amount: u64) -> Result<(), SettlementError> {
        let balance = self.entry(owner, asset);
        if balance.free < amount {
            return Err(SettlementError::InsufficientBalance {
                owner,
                needed: amount,
                available: balance.free,
            });
        }
        balance.free -= amount;
        balance.locked = balance
            .locked
            .checked_add(amount)
            .ok_or(SettlementError::BalanceOverflow(owner))?;
        Ok(())
    }

    fn unlock(&mut self, owner: u64, asset: Asset, amount: u64) -> Result<(), SettlementError> {
        let balance = self.entry(owner, asset);
        if balance.locked < amount {
            return Err(SettlementError::InsufficientLocked {
                owner,
                needed: amount,
                available: balance.locked,
            });
        }
        balance.locked -= amount;
        balance.free = balance
            .free
            .checked_add(amount)
            .ok_or(SettlementError::BalanceOverflow(owner))?;
        Ok(())
    }

    fn transfer_from(
        &mut self,
        payer: u64,
        payee: u64,
        asset: Asset,
        amount: u64,
    ) -> Result<(), SettlementError> {
        let source = self.entry(payer, asset);
        if source.free < amount {
            return Err(SettlementError::InsufficientBalance {
                owner: payer,
                needed: amount,
                available: source.free,
            });
        }
        source.free -= amount;

        let target = self.entry(payee, asset);
        target.free = target
            .free
            .checked_add(amount)
            .ok_or(SettlementError::BalanceOverflow(payee))?;
        Ok(())
    }

    fn transfer_locked_from(
        &mut self,
        payer: u64,
        payee: u64,
        asset: Asset,
        amount: u64,
    ) -> Result<(), SettlementError> {
        let source = self.entry(payer, asset);
        if source.locked < amount {
            return Err(SettlementError::InsufficientLocked {
                owner: payer,
                needed: amount,
                available: source.locked,
            });
        }
        source.locked -= amount;

        let target = self.entry(payee, asset);
        target.free = target
            .free
            .checked_add(amount)
            .ok_or(SettlementError::BalanceOverflow(payee))?;
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
