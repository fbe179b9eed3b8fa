use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    /// Annual membership fee, in whole euros.
    pub membership_fee_eur: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,

            membership_fee_eur: env::var("MEMBERSHIP_FEE_EUR")
                .unwrap_or_else(|_| "25".to_string())
                .parse()?,
        })
    }
}
