mod common;

use axum::http::StatusCode;
use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};
use sha2::Sha256;
use tower::ServiceExt;

use checkout_rs::xpay::Protocol;

/// Recompute the simple-form MAC the way the gateway verifies it:
/// `codTrans=..divisa=..importo=..` with the raw secret appended.
fn recompute_mac(cod_trans: &str, currency: &str, importo: &str, secret: &str) -> String {
    let canonical = format!("codTrans={cod_trans}divisa={currency}importo={importo}{secret}");
    hex::encode(Sha1::digest(canonical.as_bytes()))
}

/// Recompute the signed-redirect signature: non-signature fields sorted by
/// name, joined as `key=value` with `|`, HMAC-SHA256 under the secret.
fn recompute_signature(payload: &serde_json::Value, secret: &str) -> String {
    let mut fields: Vec<(&String, &serde_json::Value)> = payload
        .as_object()
        .unwrap()
        .iter()
        .filter(|(key, _)| key.as_str() != "signature")
        .collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    let signing_input = fields
        .iter()
        .map(|(key, value)| format!("{}={}", key, value.as_str().unwrap()))
        .collect::<Vec<_>>()
        .join("|");

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(signing_input.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// TEST 1: The served simple-form MAC is bit-exact against recomputation
#[tokio::test]
async fn test_simple_form_mac_recomputable() {
    let app = common::app(Protocol::SimpleForm);

    let body = serde_json::json!({
        "amount_cents": 5000,
        "order_ref": "order-1",
        "description": "desc"
    });

    let response = app
        .oneshot(common::post_json("/api/checkout", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = common::body_json(response).await;
    let payload = &json["payload"];

    let expected = recompute_mac(
        payload["codTrans"].as_str().unwrap(),
        payload["divisa"].as_str().unwrap(),
        payload["importo"].as_str().unwrap(),
        common::TEST_SECRET_KEY,
    );
    assert_eq!(payload["mac"].as_str().unwrap(), expected);
}

/// TEST 2: Any input difference yields a different MAC
#[tokio::test]
async fn test_simple_form_mac_depends_on_inputs() {
    let app = common::app(Protocol::SimpleForm);

    let body = serde_json::json!({
        "amount_cents": 5000,
        "order_ref": "order-1",
        "description": "desc"
    });

    let response = app
        .oneshot(common::post_json("/api/checkout", &body))
        .await
        .unwrap();
    let json = common::body_json(response).await;
    let payload = &json["payload"];

    let cod_trans = payload["codTrans"].as_str().unwrap();
    let mac = payload["mac"].as_str().unwrap();

    // One more cent, one different key byte, one different code digit: all
    // must move the digest.
    assert_ne!(mac, recompute_mac(cod_trans, "EUR", "5001", common::TEST_SECRET_KEY));
    assert_ne!(mac, recompute_mac(cod_trans, "EUR", "5000", "test_mac_secreT"));
    assert_ne!(
        mac,
        recompute_mac(&format!("{}X", &cod_trans[..15]), "EUR", "5000", common::TEST_SECRET_KEY)
    );
}

/// TEST 3: The served signed-redirect signature is bit-exact against
/// recomputation from the sorted fields
#[tokio::test]
async fn test_signed_redirect_signature_recomputable() {
    let app = common::app(Protocol::SignedRedirect);

    let body = serde_json::json!({
        "amount_cents": 5000,
        "order_ref": "order-1",
        "description": "desc",
        "email": "member@example.com"
    });

    let response = app
        .oneshot(common::post_json("/api/checkout", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = common::body_json(response).await;
    let payload = &json["payload"];

    assert_eq!(payload["amount"], "50.00");
    assert_eq!(
        payload["signature"].as_str().unwrap(),
        recompute_signature(payload, common::TEST_SECRET_KEY)
    );
}

/// TEST 4: A wrong secret no longer reproduces the signature
#[tokio::test]
async fn test_signed_redirect_signature_needs_secret() {
    let app = common::app(Protocol::SignedRedirect);

    let body = serde_json::json!({
        "amount_cents": 5000,
        "order_ref": "order-1",
        "description": "desc"
    });

    let response = app
        .oneshot(common::post_json("/api/checkout", &body))
        .await
        .unwrap();
    let json = common::body_json(response).await;
    let payload = &json["payload"];

    assert_ne!(
        payload["signature"].as_str().unwrap(),
        recompute_signature(payload, "wrong_secret")
    );
}
