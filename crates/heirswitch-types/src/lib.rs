//! Heirswitch Types - Canonical domain types for inheritance escrow
//!
//! This crate contains the foundational types for heirswitch with zero
//! dependencies on other heirswitch crates:
//!
//! - Identity types (`Address`, `SwitchId`, `EntryId`)
//! - Asset amounts and timeout periods
//! - The `Switch` record, its status and journal events
//! - The error taxonomy shared by every layer
//!
//! # Invariants carried by these types
//!
//! 1. One switch per owner address
//! 2. `beneficiary != owner`, `amount > 0`, `timeout_period > 0`
//! 3. `is_claimed` implies `!is_active`
//! 4. The data pointer is opaque

pub mod identity;
pub mod amount;
pub mod time;
pub mod switch;
pub mod error;

pub use identity::*;
pub use amount::*;
pub use time::*;
pub use switch::*;
pub use error::*;
