//! API Handlers
//!
//! Request handlers for all API endpoints.
//! Each module handles a specific domain.

pub mod content;
pub mod health;
pub mod ledger;
pub mod switch;

pub use health::*;
