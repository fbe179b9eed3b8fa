use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::error::XpayError;
use super::types::{PaymentContext, PaymentRequest, RedirectMethod};
use super::{PaymentGateway, Protocol, XpayConfig};

type HmacSha256 = Hmac<Sha256>;

/// "Signed redirect" flow: the user is sent to the hosted payment page with
/// a plain HTTP redirect; the payload is authenticated by an HMAC-SHA256
/// signature over the payload fields sorted by name.
pub struct SignedRedirectGateway {
    config: XpayConfig,
}

impl SignedRedirectGateway {
    pub fn new(config: XpayConfig) -> Self {
        SignedRedirectGateway { config }
    }
}

/// Sign the payload: fields sorted by name, joined as `key=value` with `|`,
/// HMAC-SHA256 under the shared secret, lowercase hex. The signature field
/// itself never enters its own input.
pub(crate) fn sign_payload(payload: &BTreeMap<String, String>, secret_key: &str) -> String {
    let signing_input = payload
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("|");

    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .expect("HMAC accepts keys of any size");
    mac.update(signing_input.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Minor units to a decimal string with exactly two fraction digits.
pub(crate) fn format_amount(amount_cents: i64) -> String {
    format!("{}.{:02}", amount_cents / 100, amount_cents % 100)
}

impl PaymentGateway for SignedRedirectGateway {
    fn protocol(&self) -> Protocol {
        Protocol::SignedRedirect
    }

    fn prepare_payment(&self, request: &PaymentRequest) -> Result<PaymentContext, XpayError> {
        if request.amount_cents <= 0 {
            return Err(XpayError::InvalidAmount(request.amount_cents));
        }

        let timestamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
        // 128-bit random session id, lowercase hex.
        let session_id = Uuid::new_v4().simple().to_string();

        // BTreeMap iteration is already sorted by field name, which is the
        // order the gateway verifies against.
        let mut payload = BTreeMap::new();
        payload.insert("merchantId".to_string(), self.config.merchant_id.clone());
        payload.insert("amount".to_string(), format_amount(request.amount_cents));
        payload.insert("currency".to_string(), self.config.currency.clone());
        payload.insert("orderId".to_string(), request.order_id.clone());
        payload.insert("description".to_string(), request.description.clone());
        payload.insert("timestamp".to_string(), timestamp);
        payload.insert("sessionId".to_string(), session_id);
        payload.insert("returnUrl".to_string(), self.config.success_url.clone());
        payload.insert("failureUrl".to_string(), self.config.failure_url.clone());
        if let Some(email) = request.payer_email() {
            payload.insert("email".to_string(), email.to_string());
        }

        let signature = sign_payload(&payload, &self.config.secret_key);
        let redirect_url = format!(
            "{}?orderId={}&signature={}",
            self.config.endpoint, request.order_id, signature
        );
        payload.insert("signature".to_string(), signature);

        Ok(PaymentContext {
            payload,
            redirect_url,
            redirect_method: RedirectMethod::HttpRedirect,
        })
    }
}
