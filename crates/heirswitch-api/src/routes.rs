//! API Routes

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::state::AppState;

/// Create API v1 routes
pub fn api_v1_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/switch", switch_routes())
        .nest("/ledger", ledger_routes())
        .nest("/content", content_routes())
}

fn switch_routes() -> Router<Arc<AppState>> {
    use handlers::switch;

    Router::new()
        // Owner operations on the caller's switch
        .route(
            "/",
            post(switch::initialize_switch).delete(switch::cancel_switch),
        )
        .route("/check-in", post(switch::check_in))
        .route("/beneficiary", put(switch::update_beneficiary))
        .route("/data-pointer", put(switch::update_data_pointer))
        .route("/me", get(switch::my_switch_details))
        .route("/status", get(switch::switch_status))
        // Per-owner accessors
        .route("/:owner", get(switch::owner_to_switch))
        .route("/:owner/claim", post(switch::claim_assets))
        .route("/:owner/amount", get(switch::switch_amount))
        .route("/:owner/data-cid", get(switch::switch_data_cid))
        .route("/:owner/claimable", get(switch::is_claimable))
        .route("/:owner/is-beneficiary", get(switch::is_beneficiary))
        .route("/:owner/events", get(switch::switch_events))
}

fn ledger_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/approve", post(handlers::ledger::approve_custody))
        .route("/:account/balance", get(handlers::ledger::balance_of))
}

fn content_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::content::upload))
        .route("/:cid", get(handlers::content::fetch))
}
