//! Heirswitch Core - Check-in gated inheritance escrow
//!
//! An owner locks an amount of the configured asset, names one beneficiary,
//! and checks in periodically. Once the owner has been silent for the
//! switch's timeout period, the beneficiary may claim the escrow.
//!
//! - [`SwitchRegistry`]: the table of switches and every public operation
//! - [`oracle`]: pure claimability predicate
//! - [`gate`]: owner/beneficiary guards
//! - [`EscrowAdapter`]: pull/push against a [`FungibleLedger`](heirswitch_ledger::FungibleLedger)
//! - [`ContentStore`]: boundary to the off-chain message store
//!
//! # Architectural Invariants
//!
//! 1. At most one switch per owner; at most one active
//! 2. Exactly one of {cancel, claim} ever succeeds per switch
//! 3. Terminal state is committed before escrow leaves custody
//! 4. Failed operations change nothing

pub mod clock;
pub mod config;
pub mod content;
pub mod escrow;
pub mod gate;
pub mod journal;
pub mod oracle;
pub mod registry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RegistryConfig;
pub use content::{ContentError, ContentStore, InMemoryContentStore};
pub use escrow::EscrowAdapter;
pub use journal::EventJournal;
pub use registry::SwitchRegistry;
