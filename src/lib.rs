pub mod config;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod xpay;

pub use xpay::{gateway_from_config, PaymentGateway, Protocol, XpayConfig};
pub use xpay::error::XpayError;
