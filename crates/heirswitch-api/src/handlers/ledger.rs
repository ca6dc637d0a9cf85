//! Ledger Handlers
//!
//! Balance lookups and the approval an owner grants the custody account
//! before initializing a switch.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::dto::{ApproveRequest, ApproveResponse, BalanceResponse};
use crate::error::ApiResult;
use crate::extractors::{parse_address, Caller};
use crate::state::AppState;

pub async fn balance_of(
    State(state): State<Arc<AppState>>,
    Path(account): Path<String>,
) -> ApiResult<Json<BalanceResponse>> {
    let account = parse_address(&account)?;
    Ok(Json(BalanceResponse {
        account,
        symbol: state.ledger.symbol().to_string(),
        balance: state.ledger.balance_of(&account),
    }))
}

/// Set the caller's allowance for the custody account
pub async fn approve_custody(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<ApproveRequest>,
) -> ApiResult<Json<ApproveResponse>> {
    let custody = *state.registry.custody();
    state.ledger.approve(&caller, &custody, request.amount)?;
    tracing::info!(owner = %caller, amount = %request.amount, "custody allowance set");

    Ok(Json(ApproveResponse {
        owner: caller,
        spender: custody,
        allowance: state.ledger.allowance(&caller, &custody),
    }))
}
