pub mod error;
pub mod signed_redirect;
pub mod simple_form;
pub mod types;

use std::env;
use std::sync::Arc;

pub use error::XpayError;
use signed_redirect::SignedRedirectGateway;
use simple_form::SimpleFormGateway;
use types::{PaymentContext, PaymentRequest};

const DEFAULT_ENDPOINT: &str = "https://int-ecommerce.nexi.it/ecomm/ecomm/DispatcherServlet";

/// Protocol variant spoken to the hosted payment page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Auto-submitting form POST with a SHA-1 MAC over fixed-order fields.
    SimpleForm,
    /// Query-string redirect authenticated by an HMAC-SHA256 signature over
    /// the sorted payload.
    SignedRedirect,
}

impl Protocol {
    pub fn from_str(value: &str) -> Result<Self, XpayError> {
        match value {
            "simple_form" => Ok(Protocol::SimpleForm),
            "signed_redirect" => Ok(Protocol::SignedRedirect),
            other => Err(XpayError::ConfigError(format!(
                "Unknown XPAY_PROTOCOL: {other}"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::SimpleForm => "simple_form",
            Protocol::SignedRedirect => "signed_redirect",
        }
    }
}

/// Merchant credentials and endpoints for the hosted payment page.
///
/// Built once at startup and shared read-only by every checkout request.
#[derive(Debug, Clone)]
pub struct XpayConfig {
    pub merchant_id: String,
    pub secret_key: String,
    pub endpoint: String,
    pub success_url: String,
    pub failure_url: String,
    pub currency: String,
    pub protocol: Protocol,
}

impl XpayConfig {
    /// Validate credentials and normalize the endpoint. Currency defaults to
    /// EUR and the protocol to the simple-form flow; both are plain fields
    /// and can be overridden after construction.
    pub fn new(
        merchant_id: impl Into<String>,
        secret_key: impl Into<String>,
        endpoint: impl Into<String>,
        success_url: impl Into<String>,
        failure_url: impl Into<String>,
    ) -> Result<Self, XpayError> {
        let merchant_id = merchant_id.into();
        let secret_key = secret_key.into();
        if merchant_id.is_empty() || secret_key.is_empty() {
            return Err(XpayError::ConfigError(
                "merchant id and secret key must be set".to_string(),
            ));
        }

        Ok(XpayConfig {
            merchant_id,
            secret_key,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            success_url: success_url.into(),
            failure_url: failure_url.into(),
            currency: "EUR".to_string(),
            protocol: Protocol::SimpleForm,
        })
    }

    /// Load gateway configuration from environment variables.
    ///
    /// A missing merchant id or secret key is a `ConfigError`; the caller
    /// decides whether that disables the payment feature or aborts startup.
    pub fn from_env() -> Result<Self, XpayError> {
        let merchant_id = env::var("XPAY_MERCHANT_ID")
            .map_err(|_| XpayError::ConfigError("Missing XPAY_MERCHANT_ID".to_string()))?;
        let secret_key = env::var("XPAY_SECRET_KEY")
            .map_err(|_| XpayError::ConfigError("Missing XPAY_SECRET_KEY".to_string()))?;
        let endpoint =
            env::var("XPAY_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let success_url = env::var("XPAY_SUCCESS_URL")
            .unwrap_or_else(|_| "http://localhost:8080/checkout/success".to_string());
        let failure_url = env::var("XPAY_FAILURE_URL")
            .unwrap_or_else(|_| "http://localhost:8080/checkout/failure".to_string());

        let mut config = Self::new(merchant_id, secret_key, endpoint, success_url, failure_url)?;
        if let Ok(currency) = env::var("XPAY_CURRENCY") {
            config.currency = currency;
        }
        if let Ok(protocol) = env::var("XPAY_PROTOCOL") {
            config.protocol = Protocol::from_str(&protocol)?;
        }
        Ok(config)
    }
}

/// A payment-initiation protocol against the hosted payment page.
///
/// Stateless apart from clock and randomness reads; implementations are safe
/// to share across request handlers without coordination.
pub trait PaymentGateway: Send + Sync {
    /// Variant in use, for logging and metrics labels.
    fn protocol(&self) -> Protocol;

    /// Build the authenticated payload and redirect target for one payment
    /// attempt. Fails only on a non-positive amount; performs no I/O.
    fn prepare_payment(&self, request: &PaymentRequest) -> Result<PaymentContext, XpayError>;
}

/// Build the gateway variant selected by the configuration. Call sites hold
/// a `dyn PaymentGateway` and never name a variant.
pub fn gateway_from_config(config: XpayConfig) -> Arc<dyn PaymentGateway> {
    match config.protocol {
        Protocol::SimpleForm => Arc::new(SimpleFormGateway::new(config)),
        Protocol::SignedRedirect => Arc::new(SignedRedirectGateway::new(config)),
    }
}
