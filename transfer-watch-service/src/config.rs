use std::env;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

#[derive(Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub wallet_address: String,
    pub poll_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("BASESCAN_API_URL").expect("BASESCAN_API_URL must be set"),
            api_key: env::var("BASESCAN_API_KEY").expect("BASESCAN_API_KEY must be set"),
            wallet_address: env::var("WALLET_ADDRESS").expect("WALLET_ADDRESS must be set"),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}
