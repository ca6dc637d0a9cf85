//! Escrow adapter over the fungible ledger
//!
//! Pulls into and pushes out of the registry's custody account. Any ledger
//! failure surfaces as `SwitchError::TransferFailed`.

use std::sync::Arc;

use heirswitch_ledger::{FungibleLedger, LedgerError};
use heirswitch_types::{Address, Amount, Result, SwitchError};

fn transfer_failed(err: LedgerError) -> SwitchError {
    SwitchError::TransferFailed {
        reason: err.to_string(),
    }
}

#[derive(Clone)]
pub struct EscrowAdapter {
    ledger: Arc<dyn FungibleLedger>,
    custody: Address,
}

impl EscrowAdapter {
    pub fn new(ledger: Arc<dyn FungibleLedger>, custody: Address) -> Self {
        Self { ledger, custody }
    }

    pub fn custody(&self) -> &Address {
        &self.custody
    }

    /// Move `amount` from `from` into custody; needs `from`'s prior approval
    pub fn pull(&self, from: &Address, amount: Amount) -> Result<()> {
        self.ledger
            .transfer_from(&self.custody, from, &self.custody, amount)
            .map_err(transfer_failed)
    }

    /// Move `amount` out of custody to `to`
    pub fn push(&self, to: &Address, amount: Amount) -> Result<()> {
        self.ledger
            .transfer(&self.custody, to, amount)
            .map_err(transfer_failed)
    }

    pub fn custody_balance(&self) -> Amount {
        self.ledger.balance_of(&self.custody)
    }

    /// Allowance `owner` has granted custody
    pub fn custody_allowance(&self, owner: &Address) -> Amount {
        self.ledger.allowance(owner, &self.custody)
    }
}
