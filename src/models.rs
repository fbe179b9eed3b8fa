use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::xpay::types::{PaymentContext, RedirectMethod};

/// Standard error body for API responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// CHECKOUT REQUESTS
// ============================================================================

/// POST /api/checkout - initiate a payment for an arbitrary order
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub amount_cents: i64,
    pub order_ref: String,
    pub description: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// POST /api/checkout/merch - merchandise order checkout
#[derive(Debug, Deserialize)]
pub struct MerchCheckoutRequest {
    pub item_slug: String,
    pub item_name: String,
    pub unit_price_cents: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub email: Option<String>,
}

fn default_quantity() -> i64 {
    1
}

/// POST /api/checkout/membership - membership-fee checkout
#[derive(Debug, Deserialize)]
pub struct MembershipCheckoutRequest {
    pub member_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

// ============================================================================
// CHECKOUT RESPONSES
// ============================================================================

/// Successful payment initiation. `payload` and `redirect_url` come straight
/// from the gateway; `redirect_method` tells the storefront whether to render
/// an auto-submitting form or issue a plain redirect.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_ref: String,
    pub amount_cents: i64,
    pub payload: BTreeMap<String, String>,
    pub redirect_url: String,
    pub redirect_method: RedirectMethod,
}

impl CheckoutResponse {
    pub fn from_context(order_ref: String, amount_cents: i64, context: PaymentContext) -> Self {
        Self {
            order_ref,
            amount_cents,
            payload: context.payload,
            redirect_url: context.redirect_url,
            redirect_method: context.redirect_method,
        }
    }
}
