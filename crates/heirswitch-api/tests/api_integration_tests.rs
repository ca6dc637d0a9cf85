//! API Integration Tests
//!
//! Drives the router end to end against the in-memory ledger, a manual clock
//! and the in-memory content store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use heirswitch_api::{create_test_router, AppState, CALLER_HEADER};
use heirswitch_core::{InMemoryContentStore, ManualClock, RegistryConfig, SwitchRegistry};
use heirswitch_ledger::TokenLedger;
use heirswitch_types::{Address, Amount};
use serde_json::{json, Value};
use tower::ServiceExt;

const OWNER: &str = "0x1111111111111111111111111111111111111111";
const HEIR: &str = "0x2222222222222222222222222222222222222222";
const STRANGER: &str = "0x3333333333333333333333333333333333333333";

struct TestApp {
    router: Router,
    clock: ManualClock,
    ledger: TokenLedger,
}

fn test_app() -> TestApp {
    let ledger = TokenLedger::new("PYUSD");
    ledger
        .mint(&OWNER.parse().unwrap(), Amount::from_units(100))
        .unwrap();

    let clock = ManualClock::starting_now();
    let registry = Arc::new(SwitchRegistry::with_clock(
        Arc::new(ledger.clone()),
        RegistryConfig::default(),
        Arc::new(clock.clone()),
    ));
    let state = AppState::from_parts(
        registry,
        Arc::new(ledger.clone()),
        Arc::new(InMemoryContentStore::new()),
    );

    TestApp {
        router: create_test_router(Arc::new(state)),
        clock,
        ledger,
    }
}

/// Test helper to make a request and get JSON response
async fn json_request(
    router: &Router,
    method: &str,
    uri: &str,
    caller: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(caller) = caller {
        request = request.header(CALLER_HEADER, caller);
    }

    let body = if let Some(json_body) = body {
        Body::from(serde_json::to_vec(&json_body).unwrap())
    } else {
        Body::empty()
    };

    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!(null));

    (status, json)
}

/// Approve custody and open a switch for OWNER naming HEIR
async fn open_switch(app: &TestApp, units: u64, timeout_secs: u64) -> Value {
    let amount = Amount::from_units(units).to_string();
    let (status, _) = json_request(
        &app.router,
        "POST",
        "/api/v1/ledger/approve",
        Some(OWNER),
        Some(json!({ "amount": amount })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = json_request(
        &app.router,
        "POST",
        "/api/v1/switch",
        Some(OWNER),
        Some(json!({ "beneficiary": HEIR, "amount": amount, "timeout_secs": timeout_secs })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json
}

fn addr(s: &str) -> Address {
    s.parse().unwrap()
}

// =============================================================================
// Public Endpoint Tests
// =============================================================================

#[cfg(test)]
mod public_endpoints {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let (status, json) = json_request(&app.router, "GET", "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["active_switches"], 0);
    }

    #[tokio::test]
    async fn test_balance() {
        let app = test_app();
        let uri = format!("/api/v1/ledger/{OWNER}/balance");
        let (status, json) = json_request(&app.router, "GET", &uri, None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["symbol"], "PYUSD");
        assert_eq!(json["balance"], Amount::from_units(100).to_string());
    }

    #[tokio::test]
    async fn test_status_without_switch() {
        let app = test_app();
        let uri = format!("/api/v1/switch/status?address={OWNER}");
        let (status, json) = json_request(&app.router, "GET", &uri, None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "No switch found");
    }

    #[tokio::test]
    async fn test_accessor_defaults() {
        let app = test_app();

        let uri = format!("/api/v1/switch/{OWNER}/amount");
        let (status, json) = json_request(&app.router, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["amount"], "0");

        let uri = format!("/api/v1/switch/{OWNER}/data-cid");
        let (_, json) = json_request(&app.router, "GET", &uri, None, None).await;
        assert_eq!(json["cid"], "");

        let uri = format!("/api/v1/switch/{OWNER}");
        let (status, _) = json_request(&app.router, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bad_address_rejected() {
        let app = test_app();
        let (status, json) =
            json_request(&app.router, "GET", "/api/v1/switch/0x1234/claimable", None, None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["kind"], "RequestError");
    }
}

// =============================================================================
// Switch Lifecycle Tests
// =============================================================================

#[cfg(test)]
mod switch_endpoints {
    use super::*;

    #[tokio::test]
    async fn test_owner_operations_require_caller() {
        let app = test_app();
        let (status, json) =
            json_request(&app.router, "POST", "/api/v1/switch/check-in", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], -1001);
    }

    #[tokio::test]
    async fn test_initialize_and_read_back() {
        let app = test_app();
        let created = open_switch(&app, 10, 3_600).await;

        assert_eq!(created["is_active"], true);
        assert_eq!(created["beneficiary"], HEIR);
        assert_eq!(app.ledger.balance_of_units(OWNER), 90);

        let (status, me) = json_request(&app.router, "GET", "/api/v1/switch/me", Some(OWNER), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["id"], created["id"]);

        let uri = format!("/api/v1/switch/{OWNER}/is-beneficiary");
        let (_, json) = json_request(&app.router, "GET", &uri, Some(HEIR), None).await;
        assert_eq!(json["is_beneficiary"], true);
        let (_, json) = json_request(&app.router, "GET", &uri, Some(STRANGER), None).await;
        assert_eq!(json["is_beneficiary"], false);
    }

    #[tokio::test]
    async fn test_second_initialize_conflicts() {
        let app = test_app();
        open_switch(&app, 10, 3_600).await;

        let (status, json) = json_request(
            &app.router,
            "POST",
            "/api/v1/switch",
            Some(OWNER),
            Some(json!({ "beneficiary": HEIR, "amount": "1" })),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["kind"], "StateError");
    }

    #[tokio::test]
    async fn test_initialize_without_allowance_fails_cleanly() {
        let app = test_app();
        let (status, json) = json_request(
            &app.router,
            "POST",
            "/api/v1/switch",
            Some(OWNER),
            Some(json!({ "beneficiary": HEIR, "amount": "5" })),
        )
        .await;

        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(json["kind"], "TransferFailed");

        let uri = format!("/api/v1/switch/status?address={OWNER}");
        let (_, json) = json_request(&app.router, "GET", &uri, None, None).await;
        assert_eq!(json["status"], "No switch found");
    }

    #[tokio::test]
    async fn test_custody_cannot_open_switch() {
        let app = test_app();
        let custody = RegistryConfig::default().custody.to_string();
        let (status, json) = json_request(
            &app.router,
            "POST",
            "/api/v1/switch",
            Some(&custody),
            Some(json!({ "beneficiary": STRANGER, "amount": "1" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], -2023);
        assert_eq!(json["kind"], "PreconditionError");
    }

    #[tokio::test]
    async fn test_self_beneficiary_rejected() {
        let app = test_app();
        let (status, json) = json_request(
            &app.router,
            "POST",
            "/api/v1/switch",
            Some(OWNER),
            Some(json!({ "beneficiary": OWNER, "amount": "5" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["kind"], "PreconditionError");
    }

    #[tokio::test]
    async fn test_early_claim_is_not_claimable() {
        let app = test_app();
        open_switch(&app, 10, 3_600).await;

        let uri = format!("/api/v1/switch/{OWNER}/claim");
        let (status, json) = json_request(&app.router, "POST", &uri, Some(HEIR), None).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["kind"], "NotClaimableError");
        assert_eq!(json["msg"], "The switch is not claimable at the moment");
    }

    #[tokio::test]
    async fn test_claim_after_timeout() {
        let app = test_app();
        open_switch(&app, 10, 3_600).await;
        app.clock.advance_secs(3_600);

        let uri = format!("/api/v1/switch/{OWNER}/claimable");
        let (_, json) = json_request(&app.router, "GET", &uri, None, None).await;
        assert_eq!(json["claimable"], true);

        // a stranger gets the same answer as an early claim
        let uri = format!("/api/v1/switch/{OWNER}/claim");
        let (status, json) = json_request(&app.router, "POST", &uri, Some(STRANGER), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["kind"], "NotClaimableError");

        let (status, json) = json_request(&app.router, "POST", &uri, Some(HEIR), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["amount"], Amount::from_units(10).to_string());
        assert_eq!(app.ledger.balance_of_units(HEIR), 10);

        let (status, _) = json_request(&app.router, "POST", &uri, Some(HEIR), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, json) = json_request(&app.router, "DELETE", "/api/v1/switch", Some(OWNER), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["kind"], "StateError");

        let uri = format!("/api/v1/switch/status?address={OWNER}");
        let (_, json) = json_request(&app.router, "GET", &uri, None, None).await;
        assert_eq!(json["status"], "Claimed");
    }

    #[tokio::test]
    async fn test_check_in_and_cancel() {
        let app = test_app();
        open_switch(&app, 10, 3_600).await;

        app.clock.advance_secs(3_000);
        let (status, _) =
            json_request(&app.router, "POST", "/api/v1/switch/check-in", Some(OWNER), None).await;
        assert_eq!(status, StatusCode::OK);
        app.clock.advance_secs(3_000);

        let uri = format!("/api/v1/switch/status?address={OWNER}");
        let (_, json) = json_request(&app.router, "GET", &uri, None, None).await;
        assert_eq!(json["status"], "Active: will trigger on condition");
        assert_eq!(json["secs_until_claimable"], 600);

        let (status, json) = json_request(&app.router, "DELETE", "/api/v1/switch", Some(OWNER), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["recipient"], OWNER);
        assert_eq!(app.ledger.balance_of_units(OWNER), 100);

        let uri = format!("/api/v1/switch/{OWNER}/events");
        let (_, json) = json_request(&app.router, "GET", &uri, None, None).await;
        let events = json["events"].as_array().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2]["kind"]["type"], "cancelled");
    }

    #[tokio::test]
    async fn test_update_beneficiary_and_data_pointer() {
        let app = test_app();
        open_switch(&app, 10, 3_600).await;

        let (status, json) = json_request(
            &app.router,
            "PUT",
            "/api/v1/switch/beneficiary",
            Some(OWNER),
            Some(json!({ "beneficiary": STRANGER })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["beneficiary"], STRANGER);

        let (status, json) = json_request(
            &app.router,
            "PUT",
            "/api/v1/switch/data-pointer",
            Some(OWNER),
            Some(json!({ "cid": "bafy-letter" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data_pointer"], "bafy-letter");

        let uri = format!("/api/v1/switch/{OWNER}/data-cid");
        let (_, json) = json_request(&app.router, "GET", &uri, None, None).await;
        assert_eq!(json["cid"], "bafy-letter");
    }
}

// =============================================================================
// Content Tests
// =============================================================================

#[cfg(test)]
mod content_endpoints {
    use super::*;

    #[tokio::test]
    async fn test_upload_and_fetch() {
        let app = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/content")
            .header("Content-Type", "application/octet-stream")
            .body(Body::from("sealed letter"))
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        let cid = json["cid"].as_str().unwrap().to_string();

        let request = Request::builder()
            .uri(format!("/api/v1/content/{cid}"))
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"sealed letter");
    }

    #[tokio::test]
    async fn test_empty_upload_and_unknown_cid() {
        let app = test_app();
        let (status, json) = json_request(&app.router, "POST", "/api/v1/content", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["kind"], "ContentError");

        let (status, _) =
            json_request(&app.router, "GET", "/api/v1/content/bafy-missing", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

trait UnitBalance {
    fn balance_of_units(&self, account: &str) -> u128;
}

impl UnitBalance for TokenLedger {
    fn balance_of_units(&self, account: &str) -> u128 {
        use heirswitch_ledger::FungibleLedger;
        self.balance_of(&addr(account)).0 / Amount::from_units(1).0
    }
}
