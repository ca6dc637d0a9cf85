//! Switch Registry - the only writer of switch lifecycle fields
//!
//! Every public operation runs to completion against one table lock. The
//! lock is never held across a ledger call: money-moving operations commit
//! their new lifecycle state first, mark the owner key as settling, release
//! the lock, call the ledger, and then either journal the outcome or restore
//! the previous record.
//!
//! # Lifecycle
//!
//! ```text
//! NonExistent ──initialize──▶ Active ──cancel──▶ Cancelled
//!                              │  ▲
//!      check_in / update_*     └──┘  ──claim───▶ Claimed
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use heirswitch_ledger::FungibleLedger;
use heirswitch_types::{
    Address, Amount, ClaimRejection, DataPointer, Result, StatusReport, Switch, SwitchError,
    SwitchEvent, SwitchEventKind, TimeoutPeriod,
};
use parking_lot::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::config::RegistryConfig;
use crate::escrow::EscrowAdapter;
use crate::gate;
use crate::journal::EventJournal;
use crate::oracle;

#[derive(Default)]
struct SwitchTable {
    switches: HashMap<Address, Switch>,
    /// Owner keys with a ledger call in flight
    settling: HashSet<Address>,
    journal: EventJournal,
}

fn active_record<'a>(
    switches: &'a mut HashMap<Address, Switch>,
    owner: &Address,
) -> Result<&'a mut Switch> {
    switches
        .get_mut(owner)
        .filter(|r| r.is_active)
        .ok_or(SwitchError::NoActiveSwitch { owner: *owner })
}

fn require_not_settling(settling: &HashSet<Address>, owner: &Address) -> Result<()> {
    if settling.contains(owner) {
        return Err(SwitchError::SettlementInProgress { owner: *owner });
    }
    Ok(())
}

/// `last_check_in` never moves backwards even if the clock does
fn check_in_stamp(record: &Switch, now: DateTime<Utc>) -> DateTime<Utc> {
    now.max(record.last_check_in)
}

fn reject_claim(caller: &Address, owner: &Address, cause: ClaimRejection) -> SwitchError {
    tracing::debug!(caller = %caller, owner = %owner, cause = %cause, "claim rejected");
    SwitchError::NotClaimable { cause }
}

/// The inheritance switch registry
///
/// Thread-safe. Owns one switch record per owner address.
pub struct SwitchRegistry {
    config: RegistryConfig,
    escrow: EscrowAdapter,
    clock: Arc<dyn Clock>,
    table: Mutex<SwitchTable>,
}

impl SwitchRegistry {
    /// Create a registry on the wall clock
    pub fn new(ledger: Arc<dyn FungibleLedger>, config: RegistryConfig) -> Self {
        Self::with_clock(ledger, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        ledger: Arc<dyn FungibleLedger>,
        config: RegistryConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let escrow = EscrowAdapter::new(ledger, config.custody);
        Self {
            config,
            escrow,
            clock,
            table: Mutex::new(SwitchTable::default()),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn custody(&self) -> &Address {
        self.escrow.custody()
    }

    pub fn escrow(&self) -> &EscrowAdapter {
        &self.escrow
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ========================================================================
    // Owner operations
    // ========================================================================

    /// Lock `amount` into custody and start a switch naming `beneficiary`
    ///
    /// The caller must have approved the custody account for at least
    /// `amount` beforehand. Replaces a terminal record left by the caller's
    /// previous switch.
    pub fn initialize_switch(
        &self,
        caller: &Address,
        beneficiary: &Address,
        amount: Amount,
        timeout_period: TimeoutPeriod,
    ) -> Result<Switch> {
        let now = self.now();

        let (record, previous) = {
            let mut table = self.table.lock();
            let SwitchTable {
                switches, settling, ..
            } = &mut *table;

            if switches.get(caller).is_some_and(|r| r.is_active) {
                return Err(SwitchError::AlreadyActive { owner: *caller });
            }
            require_not_settling(settling, caller)?;
            gate::validate_owner(caller, self.custody())?;
            gate::validate_beneficiary(caller, beneficiary, self.custody())?;
            if amount.is_zero() {
                return Err(SwitchError::InvalidAmount);
            }
            if timeout_period.is_zero() {
                return Err(SwitchError::InvalidTimeout);
            }

            let record = Switch::new(*caller, *beneficiary, amount, timeout_period, now);
            let previous = switches.insert(*caller, record.clone());
            settling.insert(*caller);
            (record, previous)
        };

        let pulled = self.escrow.pull(caller, amount);

        let mut table = self.table.lock();
        let SwitchTable {
            switches,
            settling,
            journal,
        } = &mut *table;
        settling.remove(caller);

        if let Err(err) = pulled {
            match previous {
                Some(previous) => switches.insert(*caller, previous),
                None => switches.remove(caller),
            };
            tracing::warn!(owner = %caller, error = %err, "switch funding failed");
            return Err(err);
        }

        journal.append(
            record.id,
            *caller,
            SwitchEventKind::Initialized {
                beneficiary: *beneficiary,
                amount,
                timeout_period,
            },
            now,
        );
        tracing::info!(
            owner = %caller,
            beneficiary = %beneficiary,
            amount = %amount,
            timeout = %timeout_period,
            switch_id = %record.id,
            "switch initialized"
        );
        Ok(record)
    }

    /// [`initialize_switch`](Self::initialize_switch) with the configured default timeout
    pub fn initialize_switch_with_default_timeout(
        &self,
        caller: &Address,
        beneficiary: &Address,
        amount: Amount,
    ) -> Result<Switch> {
        self.initialize_switch(caller, beneficiary, amount, self.config.default_timeout)
    }

    /// Reset the inactivity clock; returns the new `last_check_in`
    pub fn check_in(&self, caller: &Address) -> Result<DateTime<Utc>> {
        self.mutate_active(caller, |record, now| {
            record.last_check_in = check_in_stamp(record, now);
            Ok((record.last_check_in, SwitchEventKind::CheckedIn))
        })
    }

    /// Name a new beneficiary; also restarts the claim timer
    pub fn update_beneficiary(&self, caller: &Address, new_beneficiary: &Address) -> Result<()> {
        let custody = *self.custody();
        self.mutate_active(caller, |record, now| {
            gate::validate_beneficiary(&record.owner, new_beneficiary, &custody)?;
            let previous = record.beneficiary;
            record.beneficiary = *new_beneficiary;
            record.last_check_in = check_in_stamp(record, now);
            Ok((
                (),
                SwitchEventKind::BeneficiaryUpdated {
                    previous,
                    beneficiary: *new_beneficiary,
                },
            ))
        })
    }

    /// Overwrite the content locator. Leaves the claim timer alone.
    pub fn update_data_pointer(&self, caller: &Address, pointer: DataPointer) -> Result<()> {
        self.mutate_active(caller, |record, _now| {
            record.data_pointer = pointer.clone();
            Ok((
                (),
                SwitchEventKind::DataPointerUpdated {
                    data_pointer: pointer,
                },
            ))
        })
    }

    /// Return the escrowed amount to the owner and end the switch
    pub fn cancel_switch(&self, caller: &Address) -> Result<Amount> {
        let now = self.now();

        let before = {
            let mut table = self.table.lock();
            let SwitchTable {
                switches, settling, ..
            } = &mut *table;

            let record = active_record(switches, caller)?;
            gate::require_owner(caller, record)?;
            require_not_settling(settling, caller)?;

            let before = record.clone();
            record.is_active = false;
            settling.insert(*caller);
            before
        };

        let refunded = before.amount;
        self.settle(caller, before, caller, SwitchEventKind::Cancelled { refunded }, now)?;
        tracing::info!(owner = %caller, refunded = %refunded, "switch cancelled");
        Ok(refunded)
    }

    // ========================================================================
    // Beneficiary operations
    // ========================================================================

    /// Claim the escrow of `owner`'s switch once its timeout has elapsed
    ///
    /// All precondition failures surface as the same `NotClaimable` error;
    /// the specific cause is logged at debug level and carried on the error.
    pub fn claim_assets(&self, caller: &Address, owner: &Address) -> Result<Amount> {
        let now = self.now();

        let before = {
            let mut table = self.table.lock();
            let SwitchTable {
                switches, settling, ..
            } = &mut *table;

            let record = switches
                .get_mut(owner)
                .ok_or_else(|| reject_claim(caller, owner, ClaimRejection::NoSwitch))?;
            if gate::require_beneficiary(caller, record).is_err() {
                return Err(reject_claim(caller, owner, ClaimRejection::NotBeneficiary));
            }
            oracle::claim_readiness(record, now).map_err(|cause| reject_claim(caller, owner, cause))?;
            require_not_settling(settling, owner)?;

            let before = record.clone();
            record.is_claimed = true;
            record.is_active = false;
            settling.insert(*owner);
            before
        };

        let amount = before.amount;
        self.settle(
            owner,
            before,
            caller,
            SwitchEventKind::Claimed {
                beneficiary: *caller,
                amount,
            },
            now,
        )?;
        tracing::info!(owner = %owner, beneficiary = %caller, amount = %amount, "switch claimed");
        Ok(amount)
    }

    // ========================================================================
    // Read accessors (globally readable, not a confidentiality boundary)
    // ========================================================================

    pub fn is_claimable(&self, owner: &Address) -> bool {
        let now = self.now();
        self.table
            .lock()
            .switches
            .get(owner)
            .is_some_and(|r| oracle::is_claimable(r, now))
    }

    /// The caller's own record
    pub fn my_switch_details(&self, caller: &Address) -> Option<Switch> {
        self.owner_to_switch(caller)
    }

    pub fn owner_to_switch(&self, owner: &Address) -> Option<Switch> {
        self.table.lock().switches.get(owner).cloned()
    }

    /// Zero when the owner has no record
    pub fn switch_amount(&self, owner: &Address) -> Amount {
        self.table
            .lock()
            .switches
            .get(owner)
            .map(|r| r.amount)
            .unwrap_or_default()
    }

    /// Empty when the owner has no record
    pub fn switch_data_cid(&self, owner: &Address) -> DataPointer {
        self.table
            .lock()
            .switches
            .get(owner)
            .map(|r| r.data_pointer.clone())
            .unwrap_or_default()
    }

    /// Whether `caller` is the named beneficiary of `owner`'s record
    pub fn is_beneficiary(&self, caller: &Address, owner: &Address) -> bool {
        self.table
            .lock()
            .switches
            .get(owner)
            .is_some_and(|r| &r.beneficiary == caller)
    }

    pub fn status(&self, owner: &Address) -> StatusReport {
        let now = self.now();
        let table = self.table.lock();
        let record = table.switches.get(owner);
        StatusReport {
            owner: *owner,
            status: oracle::status(record, now),
            secs_until_claimable: record.and_then(|r| oracle::secs_until_claimable(r, now)),
            as_of: now,
        }
    }

    pub fn events(&self) -> Vec<SwitchEvent> {
        self.table.lock().journal.all().to_vec()
    }

    pub fn events_for(&self, owner: &Address) -> Vec<SwitchEvent> {
        self.table.lock().journal.for_owner(owner)
    }

    pub fn active_count(&self) -> usize {
        self.table
            .lock()
            .switches
            .values()
            .filter(|r| r.is_active)
            .count()
    }

    /// Sum of amounts held for active switches
    pub fn escrowed_total(&self) -> Amount {
        self.table
            .lock()
            .switches
            .values()
            .filter(|r| r.is_active)
            .fold(Amount::zero(), |acc, r| {
                acc.checked_add(r.amount).unwrap_or(Amount::new(u128::MAX))
            })
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Apply an owner-only, active-only, ledger-free mutation
    ///
    /// `op` must validate before it writes: on error nothing is journaled and
    /// the record must be untouched.
    fn mutate_active<R>(
        &self,
        caller: &Address,
        op: impl FnOnce(&mut Switch, DateTime<Utc>) -> Result<(R, SwitchEventKind)>,
    ) -> Result<R> {
        let now = self.now();
        let mut table = self.table.lock();
        let SwitchTable {
            switches,
            settling,
            journal,
        } = &mut *table;

        let record = active_record(switches, caller)?;
        gate::require_owner(caller, record)?;
        require_not_settling(settling, caller)?;

        let (out, kind) = op(record, now)?;
        tracing::debug!(owner = %caller, event = ?kind, "switch updated");
        journal.append(record.id, *caller, kind, now);
        Ok(out)
    }

    /// Push escrow for an already-committed terminal transition
    ///
    /// On ledger failure the pre-transition record is restored.
    fn settle(
        &self,
        owner: &Address,
        before: Switch,
        to: &Address,
        kind: SwitchEventKind,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let pushed = self.escrow.push(to, before.amount);

        let mut table = self.table.lock();
        let SwitchTable {
            switches,
            settling,
            journal,
        } = &mut *table;
        settling.remove(owner);

        match pushed {
            Ok(()) => {
                journal.append(before.id, *owner, kind, now);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(owner = %owner, to = %to, error = %err, "escrow push failed, switch restored");
                switches.insert(*owner, before);
                Err(err)
            }
        }
    }
}
