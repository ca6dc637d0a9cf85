//! Request and response bodies

use chrono::{DateTime, Utc};
use heirswitch_types::{Address, Amount, DataPointer, SwitchEvent};
use serde::{Deserialize, Serialize};

// =============================================================================
// Switch
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeSwitchRequest {
    pub beneficiary: String,
    pub amount: Amount,
    /// Falls back to the registry default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBeneficiaryRequest {
    pub beneficiary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDataPointerRequest {
    #[serde(alias = "cid")]
    pub data_pointer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInResponse {
    pub owner: Address,
    pub last_check_in: DateTime<Utc>,
}

/// Result of a cancel (refund to owner) or a claim (payout to beneficiary)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementResponse {
    pub owner: Address,
    pub recipient: Address,
    pub amount: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountResponse {
    pub owner: Address,
    pub amount: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataCidResponse {
    pub owner: Address,
    pub cid: DataPointer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimableResponse {
    pub owner: Address,
    pub claimable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsBeneficiaryResponse {
    pub owner: Address,
    pub caller: Address,
    pub is_beneficiary: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusQuery {
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub address: Address,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secs_until_claimable: Option<u64>,
    pub as_of: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsResponse {
    pub owner: Address,
    pub events: Vec<SwitchEvent>,
}

// =============================================================================
// Ledger
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub account: Address,
    pub symbol: String,
    pub balance: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveRequest {
    pub amount: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveResponse {
    pub owner: Address,
    pub spender: Address,
    pub allowance: Amount,
}

// =============================================================================
// Content
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub cid: DataPointer,
    pub size: usize,
}
