//! Switch Handlers
//!
//! Owner operations act on the caller's own switch. Claims and read
//! accessors name the owner in the path.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use heirswitch_types::{Address, Switch, TimeoutPeriod};
use std::sync::Arc;

use crate::dto::{
    AmountResponse, CheckInResponse, ClaimableResponse, DataCidResponse, EventsResponse,
    InitializeSwitchRequest, IsBeneficiaryResponse, SettlementResponse, StatusQuery,
    StatusResponse, UpdateBeneficiaryRequest, UpdateDataPointerRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{parse_address, Caller};
use crate::state::AppState;

// =============================================================================
// Owner operations
// =============================================================================

/// Lock funds and start a switch for the caller
pub async fn initialize_switch(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<InitializeSwitchRequest>,
) -> ApiResult<(StatusCode, Json<Switch>)> {
    let beneficiary = parse_address(&request.beneficiary)?;
    let registry = &state.registry;

    let switch = match request.timeout_secs {
        Some(secs) => registry.initialize_switch(
            &caller,
            &beneficiary,
            request.amount,
            TimeoutPeriod::from_secs(secs),
        )?,
        None => registry.initialize_switch_with_default_timeout(&caller, &beneficiary, request.amount)?,
    };

    Ok((StatusCode::CREATED, Json(switch)))
}

pub async fn check_in(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> ApiResult<Json<CheckInResponse>> {
    let last_check_in = state.registry.check_in(&caller)?;
    Ok(Json(CheckInResponse {
        owner: caller,
        last_check_in,
    }))
}

pub async fn update_beneficiary(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<UpdateBeneficiaryRequest>,
) -> ApiResult<Json<Switch>> {
    let beneficiary = parse_address(&request.beneficiary)?;
    state.registry.update_beneficiary(&caller, &beneficiary)?;
    own_record(&state, &caller)
}

pub async fn update_data_pointer(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<UpdateDataPointerRequest>,
) -> ApiResult<Json<Switch>> {
    state
        .registry
        .update_data_pointer(&caller, request.data_pointer.into())?;
    own_record(&state, &caller)
}

/// Cancel the caller's switch and refund the escrow
pub async fn cancel_switch(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> ApiResult<Json<SettlementResponse>> {
    let amount = state.registry.cancel_switch(&caller)?;
    Ok(Json(SettlementResponse {
        owner: caller,
        recipient: caller,
        amount,
    }))
}

// =============================================================================
// Beneficiary operations
// =============================================================================

pub async fn claim_assets(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(owner): Path<String>,
) -> ApiResult<Json<SettlementResponse>> {
    let owner = parse_address(&owner)?;
    let amount = state.registry.claim_assets(&caller, &owner)?;
    Ok(Json(SettlementResponse {
        owner,
        recipient: caller,
        amount,
    }))
}

// =============================================================================
// Read accessors
// =============================================================================

pub async fn my_switch_details(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> ApiResult<Json<Switch>> {
    own_record(&state, &caller)
}

pub async fn owner_to_switch(
    State(state): State<Arc<AppState>>,
    Path(owner): Path<String>,
) -> ApiResult<Json<Switch>> {
    let owner = parse_address(&owner)?;
    state
        .registry
        .owner_to_switch(&owner)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("switch for {owner}")))
}

pub async fn switch_amount(
    State(state): State<Arc<AppState>>,
    Path(owner): Path<String>,
) -> ApiResult<Json<AmountResponse>> {
    let owner = parse_address(&owner)?;
    Ok(Json(AmountResponse {
        owner,
        amount: state.registry.switch_amount(&owner),
    }))
}

pub async fn switch_data_cid(
    State(state): State<Arc<AppState>>,
    Path(owner): Path<String>,
) -> ApiResult<Json<DataCidResponse>> {
    let owner = parse_address(&owner)?;
    Ok(Json(DataCidResponse {
        owner,
        cid: state.registry.switch_data_cid(&owner),
    }))
}

pub async fn is_claimable(
    State(state): State<Arc<AppState>>,
    Path(owner): Path<String>,
) -> ApiResult<Json<ClaimableResponse>> {
    let owner = parse_address(&owner)?;
    Ok(Json(ClaimableResponse {
        owner,
        claimable: state.registry.is_claimable(&owner),
    }))
}

pub async fn is_beneficiary(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(owner): Path<String>,
) -> ApiResult<Json<IsBeneficiaryResponse>> {
    let owner = parse_address(&owner)?;
    Ok(Json(IsBeneficiaryResponse {
        owner,
        caller,
        is_beneficiary: state.registry.is_beneficiary(&caller, &owner),
    }))
}

pub async fn switch_events(
    State(state): State<Arc<AppState>>,
    Path(owner): Path<String>,
) -> ApiResult<Json<EventsResponse>> {
    let owner = parse_address(&owner)?;
    Ok(Json(EventsResponse {
        owner,
        events: state.registry.events_for(&owner),
    }))
}

/// Registry-derived status of an address's switch
pub async fn switch_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<StatusResponse>> {
    let address = parse_address(&query.address)?;
    let report = state.registry.status(&address);
    tracing::debug!(address = %address, status = ?report.status, "status query");
    Ok(Json(StatusResponse {
        address,
        status: report.status.to_string(),
        secs_until_claimable: report.secs_until_claimable,
        as_of: report.as_of,
    }))
}

fn own_record(state: &AppState, caller: &Address) -> ApiResult<Json<Switch>> {
    state
        .registry
        .my_switch_details(caller)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("switch for {caller}")))
}
