use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the caller must send the end user to the hosted payment page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectMethod {
    /// Render an auto-submitting form with one hidden input per payload
    /// field, POSTed to the redirect URL on page load.
    FormPost,
    /// Plain HTTP redirect to the redirect URL.
    HttpRedirect,
}

/// A single payment attempt, as supplied by the caller.
///
/// `order_id` is a correlation key chosen by the caller; this component does
/// not make it unique.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub amount_cents: i64,
    pub order_id: String,
    pub description: String,
    pub email: Option<String>,
}

impl PaymentRequest {
    /// Payer email to forward to the gateway; empty strings count as absent.
    pub fn payer_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}

/// Gateway-ready payload plus the target the user must be sent to.
///
/// Built fresh per payment attempt and consumed immediately by whatever
/// renders the redirect; never persisted, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentContext {
    pub payload: BTreeMap<String, String>,
    pub redirect_url: String,
    pub redirect_method: RedirectMethod,
}
