//! Error types for heirswitch
//!
//! Every error aborts the triggering operation with no state change. Each
//! variant belongs to exactly one [`ErrorKind`], which is what callers and the
//! HTTP surface key their handling on.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::Address;

/// Result type for switch operations
pub type Result<T> = std::result::Result<T, SwitchError>;

/// Broad failure category surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Wrong caller role for the operation
    AuthorizationError,
    /// Operation invalid for the switch's lifecycle phase
    StateError,
    /// Invalid input (beneficiary, amount, timeout)
    PreconditionError,
    /// Claim preconditions unmet
    NotClaimableError,
    /// Ledger rejected a pull or push
    TransferFailed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AuthorizationError => "AuthorizationError",
            Self::StateError => "StateError",
            Self::PreconditionError => "PreconditionError",
            Self::NotClaimableError => "NotClaimableError",
            Self::TransferFailed => "TransferFailed",
        };
        f.write_str(name)
    }
}

/// Role a caller must hold on a switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Owner,
    Beneficiary,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => f.write_str("owner"),
            Self::Beneficiary => f.write_str("beneficiary"),
        }
    }
}

/// Internal cause of a rejected claim
///
/// Claims fail with a single public message regardless of cause; this value
/// is kept for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimRejection {
    NoSwitch,
    NotBeneficiary,
    Inactive,
    AlreadyClaimed,
    TimeoutNotElapsed { remaining_secs: u64 },
}

impl fmt::Display for ClaimRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSwitch => f.write_str("no switch for owner"),
            Self::NotBeneficiary => f.write_str("caller is not the beneficiary"),
            Self::Inactive => f.write_str("switch is not active"),
            Self::AlreadyClaimed => f.write_str("switch already claimed"),
            Self::TimeoutNotElapsed { remaining_secs } => {
                write!(f, "timeout not elapsed, {}s remaining", remaining_secs)
            }
        }
    }
}

/// Switch operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwitchError {
    #[error("Caller {caller} is not the {role} of this switch")]
    Unauthorized { caller: Address, role: Role },

    #[error("A switch is already active for {owner}")]
    AlreadyActive { owner: Address },

    #[error("No active switch for {owner}")]
    NoActiveSwitch { owner: Address },

    #[error("A transfer for the switch of {owner} is still in flight")]
    SettlementInProgress { owner: Address },

    #[error("Invalid owner: {reason}")]
    InvalidOwner { reason: String },

    #[error("Invalid beneficiary: {reason}")]
    InvalidBeneficiary { reason: String },

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Timeout period must be greater than zero")]
    InvalidTimeout,

    #[error("The switch is not claimable at the moment")]
    NotClaimable { cause: ClaimRejection },

    #[error("Asset transfer failed: {reason}")]
    TransferFailed { reason: String },
}

impl SwitchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::AuthorizationError,
            Self::AlreadyActive { .. }
            | Self::NoActiveSwitch { .. }
            | Self::SettlementInProgress { .. } => ErrorKind::StateError,
            Self::InvalidOwner { .. }
            | Self::InvalidBeneficiary { .. }
            | Self::InvalidAmount
            | Self::InvalidTimeout => ErrorKind::PreconditionError,
            Self::NotClaimable { .. } => ErrorKind::NotClaimableError,
            Self::TransferFailed { .. } => ErrorKind::TransferFailed,
        }
    }

    /// The diagnostic cause of a rejected claim, if this is one
    pub fn claim_rejection(&self) -> Option<ClaimRejection> {
        match self {
            Self::NotClaimable { cause } => Some(*cause),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_claimable_message_hides_cause() {
        let causes = [
            ClaimRejection::NoSwitch,
            ClaimRejection::NotBeneficiary,
            ClaimRejection::Inactive,
            ClaimRejection::AlreadyClaimed,
            ClaimRejection::TimeoutNotElapsed { remaining_secs: 10 },
        ];
        for cause in causes {
            let err = SwitchError::NotClaimable { cause };
            assert_eq!(err.to_string(), "The switch is not claimable at the moment");
            assert_eq!(err.kind(), ErrorKind::NotClaimableError);
            assert_eq!(err.claim_rejection(), Some(cause));
        }
    }

    #[test]
    fn test_kinds() {
        let owner = Address::repeat_byte(1);
        assert_eq!(SwitchError::AlreadyActive { owner }.kind(), ErrorKind::StateError);
        assert_eq!(SwitchError::NoActiveSwitch { owner }.kind(), ErrorKind::StateError);
        assert_eq!(SwitchError::InvalidAmount.kind(), ErrorKind::PreconditionError);
        assert_eq!(
            SwitchError::InvalidOwner { reason: "custody".into() }.kind(),
            ErrorKind::PreconditionError
        );
        assert_eq!(SwitchError::InvalidTimeout.kind(), ErrorKind::PreconditionError);
        assert_eq!(
            SwitchError::Unauthorized { caller: owner, role: Role::Owner }.kind(),
            ErrorKind::AuthorizationError
        );
        assert_eq!(
            SwitchError::TransferFailed { reason: "x".into() }.kind(),
            ErrorKind::TransferFailed
        );
    }
}
