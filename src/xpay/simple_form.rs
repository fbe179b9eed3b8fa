use chrono::Utc;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;

use super::error::XpayError;
use super::types::{PaymentContext, PaymentRequest, RedirectMethod};
use super::{PaymentGateway, Protocol, XpayConfig};

/// "Simple payment" flow: the browser POSTs an auto-submitting form to the
/// hosted payment page, authenticated by a SHA-1 MAC over a fixed-order
/// concatenation of the transaction fields.
pub struct SimpleFormGateway {
    config: XpayConfig,
}

impl SimpleFormGateway {
    pub fn new(config: XpayConfig) -> Self {
        SimpleFormGateway { config }
    }

    /// Transaction code in the gateway's reference format: fixed prefix plus
    /// the current UTC time at second resolution. Two checkouts in the same
    /// second share a code; callers needing uniqueness carry their own
    /// disambiguator in the order reference.
    fn transaction_code(&self) -> String {
        format!("PS{}", Utc::now().format("%Y%m%d%H%M%S"))
    }
}

/// MAC over `codTrans=..divisa=..importo=..<secret>`. Field order and the
/// raw trailing secret (no separator before it) are fixed by the gateway;
/// any deviation fails verification on their side.
pub(crate) fn compute_mac(
    cod_trans: &str,
    currency: &str,
    amount_cents: i64,
    secret_key: &str,
) -> String {
    let canonical = format!("codTrans={cod_trans}divisa={currency}importo={amount_cents}{secret_key}");
    hex::encode(Sha1::digest(canonical.as_bytes()))
}

impl PaymentGateway for SimpleFormGateway {
    fn protocol(&self) -> Protocol {
        Protocol::SimpleForm
    }

    fn prepare_payment(&self, request: &PaymentRequest) -> Result<PaymentContext, XpayError> {
        if request.amount_cents <= 0 {
            return Err(XpayError::InvalidAmount(request.amount_cents));
        }

        let cod_trans = self.transaction_code();
        let mac = compute_mac(
            &cod_trans,
            &self.config.currency,
            request.amount_cents,
            &self.config.secret_key,
        );

        // order_id and description stay local on this protocol; the gateway
        // correlates on codTrans.
        let mut payload = BTreeMap::new();
        payload.insert("alias".to_string(), self.config.merchant_id.clone());
        payload.insert("importo".to_string(), request.amount_cents.to_string());
        payload.insert("divisa".to_string(), self.config.currency.clone());
        payload.insert("codTrans".to_string(), cod_trans);
        payload.insert("url".to_string(), self.config.success_url.clone());
        payload.insert("url_back".to_string(), self.config.failure_url.clone());
        payload.insert("mac".to_string(), mac);
        if let Some(email) = request.payer_email() {
            payload.insert("mail".to_string(), email.to_string());
        }

        Ok(PaymentContext {
            payload,
            redirect_url: self.config.endpoint.clone(),
            redirect_method: RedirectMethod::FormPost,
        })
    }
}
