//! Heirswitch Ledger - Fungible asset ledger behind the escrow
//!
//! The ledger is:
//! - Single-asset (one configured fungible token)
//! - Account-keyed by `Address`
//! - Allowance-gated for third-party pulls (`transfer_from`)
//! - Append-only (entries are never rewritten)
//!
//! # Invariants
//!
//! 1. No negative balances
//! 2. A pull consumes allowance and balance together or not at all
//! 3. Zero-amount movements are rejected
//! 4. Every balance change has an entry

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use heirswitch_types::{Address, Amount, EntryId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient balance for {account}: have {available}, need {required}")]
    InsufficientBalance {
        account: Address,
        available: Amount,
        required: Amount,
    },

    #[error("Insufficient allowance from {owner} to {spender}: have {available}, need {required}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        available: Amount,
        required: Amount,
    },

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Invalid account: {account}")]
    InvalidAccount { account: Address },

    #[error("Transfer rejected: {reason}")]
    Rejected { reason: String },
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Fungible asset ledger contract consumed by the escrow
///
/// Every movement is fallible and must either apply fully or not at all.
pub trait FungibleLedger: Send + Sync {
    /// Symbol of the single asset this ledger tracks
    fn symbol(&self) -> &str;

    /// Move `amount` from `from` to `to`, spending `spender`'s allowance
    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()>;

    /// Move `amount` from `from` (the caller) to `to`
    fn transfer(&self, from: &Address, to: &Address, amount: Amount) -> Result<()>;

    /// Set the allowance `owner` grants `spender`, replacing any previous value
    fn approve(&self, owner: &Address, spender: &Address, amount: Amount) -> Result<()>;

    fn balance_of(&self, account: &Address) -> Amount;

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;
}

/// Type of ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryType {
    /// Credit (increase) to an account
    Credit,
    /// Debit (decrease) from an account
    Debit,
}

/// Reason for a ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryReason {
    /// New supply
    Mint,
    /// Direct transfer by the holder
    Transfer { counterparty: Address },
    /// Allowance-backed pull by a spender
    TransferFrom {
        counterparty: Address,
        spender: Address,
    },
}

/// A single ledger entry (one side of a movement)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub entry_id: EntryId,
    pub account: Address,
    pub entry_type: EntryType,
    pub amount: Amount,
    pub balance_after: Amount,
    pub reason: EntryReason,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
struct LedgerState {
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    entries: Vec<LedgerEntry>,
    total_supply: Amount,
}

impl LedgerState {
    fn balance(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    fn record(&mut self, account: Address, entry_type: EntryType, amount: Amount, reason: EntryReason) {
        let balance_after = self.balance(&account);
        self.entries.push(LedgerEntry {
            entry_id: EntryId::new(),
            account,
            entry_type,
            amount,
            balance_after,
            reason,
            created_at: Utc::now(),
        });
    }

    /// Checks both sides before touching either
    fn move_funds(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
        debit_reason: EntryReason,
        credit_reason: EntryReason,
    ) -> Result<()> {
        let from_balance = self.balance(from);
        let new_from = from_balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account: *from,
                available: from_balance,
                required: amount,
            })?;

        if from == to {
            self.record(*from, EntryType::Debit, amount, debit_reason);
            self.record(*to, EntryType::Credit, amount, credit_reason);
            return Ok(());
        }

        let new_to = self
            .balance(to)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::InvalidAmount {
                message: "Balance overflow".to_string(),
            })?;

        self.balances.insert(*from, new_from);
        self.record(*from, EntryType::Debit, amount, debit_reason);
        self.balances.insert(*to, new_to);
        self.record(*to, EntryType::Credit, amount, credit_reason);
        Ok(())
    }
}

fn require_positive(amount: Amount) -> Result<()> {
    if amount.is_zero() {
        return Err(LedgerError::InvalidAmount {
            message: "Amount must be greater than zero".to_string(),
        });
    }
    Ok(())
}

fn require_account(account: &Address) -> Result<()> {
    if account.is_zero() {
        return Err(LedgerError::InvalidAccount { account: *account });
    }
    Ok(())
}

/// In-memory token ledger
///
/// Thread-safe; one lock guards balances, allowances and entries so every
/// movement is atomic.
#[derive(Clone)]
pub struct TokenLedger {
    symbol: Arc<str>,
    state: Arc<RwLock<LedgerState>>,
}

impl TokenLedger {
    /// Create a new in-memory ledger for `symbol`
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: Arc::from(symbol.into()),
            state: Arc::new(RwLock::new(LedgerState::default())),
        }
    }

    /// Create new supply for `to`
    pub fn mint(&self, to: &Address, amount: Amount) -> Result<Amount> {
        require_positive(amount)?;
        require_account(to)?;

        let mut state = self.state.write();
        let overflow = || LedgerError::InvalidAmount {
            message: "Supply overflow".to_string(),
        };
        let new_supply = state.total_supply.checked_add(amount).ok_or_else(overflow)?;
        let new_balance = state.balance(to).checked_add(amount).ok_or_else(overflow)?;

        state.total_supply = new_supply;
        state.balances.insert(*to, new_balance);
        state.record(*to, EntryType::Credit, amount, EntryReason::Mint);

        tracing::debug!(symbol = %self.symbol, to = %to, amount = %amount, "minted");
        Ok(new_balance)
    }

    pub fn total_supply(&self) -> Amount {
        self.state.read().total_supply
    }

    /// Get all entries for an account
    pub fn account_entries(&self, account: &Address) -> Vec<LedgerEntry> {
        self.state
            .read()
            .entries
            .iter()
            .filter(|e| &e.account == account)
            .cloned()
            .collect()
    }

    /// Get the total number of entries
    pub fn entry_count(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Get recent entries (newest first)
    pub fn recent_entries(&self, limit: usize) -> Vec<LedgerEntry> {
        self.state
            .read()
            .entries
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }
}

impl Default for TokenLedger {
    fn default() -> Self {
        Self::new("PYUSD")
    }
}

impl FungibleLedger for TokenLedger {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()> {
        require_positive(amount)?;
        require_account(to)?;

        let mut state = self.state.write();
        let allowed = state.allowance(from, spender);
        let remaining = allowed
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientAllowance {
                owner: *from,
                spender: *spender,
                available: allowed,
                required: amount,
            })?;

        state.move_funds(
            from,
            to,
            amount,
            EntryReason::TransferFrom {
                counterparty: *to,
                spender: *spender,
            },
            EntryReason::TransferFrom {
                counterparty: *from,
                spender: *spender,
            },
        )?;
        state.allowances.insert((*from, *spender), remaining);

        tracing::debug!(
            symbol = %self.symbol,
            spender = %spender,
            from = %from,
            to = %to,
            amount = %amount,
            "transfer_from"
        );
        Ok(())
    }

    fn transfer(&self, from: &Address, to: &Address, amount: Amount) -> Result<()> {
        require_positive(amount)?;
        require_account(to)?;

        let mut state = self.state.write();
        state.move_funds(
            from,
            to,
            amount,
            EntryReason::Transfer { counterparty: *to },
            EntryReason::Transfer { counterparty: *from },
        )?;

        tracing::debug!(symbol = %self.symbol, from = %from, to = %to, amount = %amount, "transfer");
        Ok(())
    }

    fn approve(&self, owner: &Address, spender: &Address, amount: Amount) -> Result<()> {
        require_account(spender)?;
        self.state.write().allowances.insert((*owner, *spender), amount);
        tracing::debug!(symbol = %self.symbol, owner = %owner, spender = %spender, amount = %amount, "approve");
        Ok(())
    }

    fn balance_of(&self, account: &Address) -> Amount {
        self.state.read().balance(account)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.state.read().allowance(owner, spender)
    }
}
