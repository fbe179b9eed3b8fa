use axum::body::Body;
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;

use checkout_rs::metrics::Metrics;
use checkout_rs::routes::{checkout_router, AppState};
use checkout_rs::xpay::{gateway_from_config, Protocol, XpayConfig};

pub const TEST_MERCHANT_ID: &str = "alias_test_001";
pub const TEST_SECRET_KEY: &str = "test_mac_secret";
pub const TEST_ENDPOINT: &str = "https://pay.example/checkout";
pub const MEMBERSHIP_FEE_CENTS: i64 = 2500;

pub fn test_xpay_config(protocol: Protocol) -> XpayConfig {
    let mut config = XpayConfig::new(
        TEST_MERCHANT_ID,
        TEST_SECRET_KEY,
        TEST_ENDPOINT,
        "https://assoc.example/checkout/success",
        "https://assoc.example/checkout/failure",
    )
    .expect("test credentials are non-empty");
    config.protocol = protocol;
    config
}

/// Build the checkout router with a configured gateway.
pub fn app(protocol: Protocol) -> Router {
    let state = Arc::new(AppState {
        gateway: Some(gateway_from_config(test_xpay_config(protocol))),
        membership_fee_cents: MEMBERSHIP_FEE_CENTS,
        metrics: Metrics::new(),
    });
    checkout_router(state)
}

/// Build the checkout router without a gateway (credentials absent).
pub fn app_without_gateway() -> Router {
    let state = Arc::new(AppState {
        gateway: None,
        membership_fee_cents: MEMBERSHIP_FEE_CENTS,
        metrics: Metrics::new(),
    });
    checkout_router(state)
}

/// Read response body as JSON.
pub async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Build a JSON POST request.
pub fn post_json(uri: &str, body: &serde_json::Value) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}
