use thiserror::Error;

#[derive(Error, Debug)]
pub enum XpayError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid payment amount: {0} cents")]
    InvalidAmount(i64),
}
