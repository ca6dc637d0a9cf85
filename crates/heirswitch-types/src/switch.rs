//! Switch record, status and journal types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Address, Amount, SwitchId, TimeoutPeriod};

/// Opaque content locator attached to a switch
///
/// Stored and returned verbatim. Nothing in heirswitch parses it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataPointer(String);

impl DataPointer {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DataPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DataPointer {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DataPointer {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One owner's inheritance escrow record
///
/// Values of this type handed out by the registry are snapshots; editing a
/// snapshot never affects the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    pub id: SwitchId,
    pub owner: Address,
    pub beneficiary: Address,
    pub amount: Amount,
    pub timeout_period: TimeoutPeriod,
    pub last_check_in: DateTime<Utc>,
    pub data_pointer: DataPointer,
    pub is_active: bool,
    pub is_claimed: bool,
    pub created_at: DateTime<Utc>,
}

impl Switch {
    /// A freshly funded, active switch
    pub fn new(
        owner: Address,
        beneficiary: Address,
        amount: Amount,
        timeout_period: TimeoutPeriod,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SwitchId::new(),
            owner,
            beneficiary,
            amount,
            timeout_period,
            last_check_in: now,
            data_pointer: DataPointer::default(),
            is_active: true,
            is_claimed: false,
            created_at: now,
        }
    }

    /// Lifecycle phase derived from the flags
    pub fn phase(&self) -> SwitchPhase {
        match (self.is_active, self.is_claimed) {
            (true, _) => SwitchPhase::Active,
            (false, true) => SwitchPhase::Claimed,
            (false, false) => SwitchPhase::Cancelled,
        }
    }
}

/// Lifecycle phase of an existing switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchPhase {
    Active,
    Cancelled,
    Claimed,
}

/// Registry-derived status of an owner's switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchStatus {
    /// No record for the owner
    None,
    /// Active, timeout not yet elapsed
    Active,
    /// Active and timeout elapsed
    Claimable,
    Cancelled,
    Claimed,
}

impl fmt::Display for SwitchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "No switch found",
            Self::Active => "Active: will trigger on condition",
            Self::Claimable => "Claimable: timeout elapsed",
            Self::Cancelled => "Cancelled",
            Self::Claimed => "Claimed",
        };
        f.write_str(label)
    }
}

/// Status of an owner's switch at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub owner: Address,
    pub status: SwitchStatus,
    /// Seconds until claimable; only set while active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secs_until_claimable: Option<u64>,
    pub as_of: DateTime<Utc>,
}

/// What happened to a switch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwitchEventKind {
    Initialized {
        beneficiary: Address,
        amount: Amount,
        timeout_period: TimeoutPeriod,
    },
    CheckedIn,
    BeneficiaryUpdated {
        previous: Address,
        beneficiary: Address,
    },
    DataPointerUpdated {
        data_pointer: DataPointer,
    },
    Cancelled {
        refunded: Amount,
    },
    Claimed {
        beneficiary: Address,
        amount: Amount,
    },
}

/// Journal entry for a successful mutating operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchEvent {
    pub sequence: u64,
    pub switch_id: SwitchId,
    pub owner: Address,
    pub kind: SwitchEventKind,
    pub at: DateTime<Utc>,
}
