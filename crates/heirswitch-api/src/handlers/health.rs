//! Health Check Handlers

use axum::{extract::State, Json};
use heirswitch_types::Amount;
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Timestamp (ms)
    pub timestamp: i64,
    /// Switches currently holding escrow
    pub active_switches: usize,
    /// Total held for active switches
    pub escrowed: Amount,
}

/// Liveness probe; never touches the ledger
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp_millis(),
        active_switches: state.registry.active_count(),
        escrowed: state.registry.escrowed_total(),
    })
}
