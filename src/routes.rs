pub mod health;
pub mod metrics;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use std::sync::Arc;
use uuid::Uuid;

use crate::metrics::Metrics;
use crate::models::{
    CheckoutRequest, CheckoutResponse, ErrorResponse, MembershipCheckoutRequest,
    MerchCheckoutRequest,
};
use crate::xpay::types::PaymentRequest;
use crate::xpay::{PaymentGateway, XpayError};

/// Shared state for the checkout API.
///
/// `gateway` is `None` when the payment credentials are not configured; the
/// checkout handlers answer 503 and the rest of the service keeps working.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Option<Arc<dyn PaymentGateway>>,
    pub membership_fee_cents: i64,
    pub metrics: Metrics,
}

pub fn checkout_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/checkout", post(create_checkout))
        .route("/api/checkout/merch", post(merch_checkout))
        .route("/api/checkout/membership", post(membership_checkout))
        .with_state(state)
}

/// Short random disambiguator for order references. Transaction codes on the
/// simple-form protocol have second resolution, so uniqueness has to come
/// from the reference itself.
fn reqid() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

fn validation_error(
    state: &AppState,
    message: &str,
) -> (StatusCode, Json<ErrorResponse>) {
    state
        .metrics
        .payments_rejected_total
        .with_label_values(&["validation"])
        .inc();
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("validation_error", message)),
    )
}

/// Run one payment request through the configured gateway, mapping the
/// gateway's error model onto API status codes.
fn prepare(
    state: &AppState,
    request: PaymentRequest,
) -> Result<CheckoutResponse, (StatusCode, Json<ErrorResponse>)> {
    let gateway = match state.gateway.as_deref() {
        Some(gateway) => gateway,
        None => {
            state
                .metrics
                .payments_rejected_total
                .with_label_values(&["unconfigured"])
                .inc();
            return Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new(
                    "payment_unavailable",
                    "Payment gateway is not configured",
                )),
            ));
        }
    };

    let order_ref = request.order_id.clone();
    let amount_cents = request.amount_cents;

    match gateway.prepare_payment(&request) {
        Ok(context) => {
            state
                .metrics
                .payments_prepared_total
                .with_label_values(&[gateway.protocol().as_str()])
                .inc();
            tracing::info!(
                order_ref = %order_ref,
                amount_cents,
                protocol = gateway.protocol().as_str(),
                "payment context prepared"
            );
            Ok(CheckoutResponse::from_context(order_ref, amount_cents, context))
        }
        Err(XpayError::InvalidAmount(amount)) => {
            state
                .metrics
                .payments_rejected_total
                .with_label_values(&["invalid_amount"])
                .inc();
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    "invalid_amount",
                    format!("Amount must be positive, got {} cents", amount),
                )),
            ))
        }
        // ConfigError is a construction-time failure; a constructed gateway
        // cannot return it.
        Err(err) => {
            tracing::error!(order_ref = %order_ref, error = %err, "unexpected gateway error");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "gateway_error",
                    "Payment preparation failed",
                )),
            ))
        }
    }
}

// ============================================================================
// CHECKOUT HANDLERS
// ============================================================================

/// POST /api/checkout - Initiate a payment for an arbitrary order
async fn create_checkout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), (StatusCode, Json<ErrorResponse>)> {
    let order_ref = req.order_ref.trim();
    if order_ref.is_empty() {
        return Err(validation_error(&state, "order_ref is required"));
    }

    let response = prepare(
        &state,
        PaymentRequest {
            amount_cents: req.amount_cents,
            order_id: order_ref.to_string(),
            description: req.description,
            email: req.email,
        },
    )?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/checkout/merch - Initiate a payment for a merchandise order
async fn merch_checkout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MerchCheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), (StatusCode, Json<ErrorResponse>)> {
    let slug = req.item_slug.trim();
    if slug.is_empty() {
        return Err(validation_error(&state, "item_slug is required"));
    }

    let quantity = req.quantity.max(1);
    let total_cents = req.unit_price_cents * quantity;

    let response = prepare(
        &state,
        PaymentRequest {
            amount_cents: total_cents,
            order_id: format!("merch-{}-{}", slug, reqid()),
            description: format!("{} x {}", req.item_name, quantity),
            email: req.email,
        },
    )?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/checkout/membership - Initiate the membership-fee payment
async fn membership_checkout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MembershipCheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), (StatusCode, Json<ErrorResponse>)> {
    let first_name = req.first_name.trim();
    let last_name = req.last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(validation_error(
            &state,
            "first_name and last_name are required",
        ));
    }

    let response = prepare(
        &state,
        PaymentRequest {
            amount_cents: state.membership_fee_cents,
            order_id: format!("member-{}-{}", req.member_id, reqid()),
            description: format!("Membership {} {}", first_name, last_name),
            email: Some(req.email),
        },
    )?;

    Ok((StatusCode::CREATED, Json(response)))
}
