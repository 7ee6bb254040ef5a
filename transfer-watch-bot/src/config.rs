use std::env;
use transfer_watch_service::config::DEFAULT_POLL_INTERVAL_SECS;

#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub guild_id: u64,
    pub trading_category_id: u64,
    pub start_channel_id: u64,
    pub api_url: String,
    pub api_key: String,
    pub poll_interval_secs: u64,
}

impl BotConfig {
    pub fn from_env() -> Self {
        Self {
            bot_token: env::var("DISCORD_BOT_TOKEN").expect("DISCORD_BOT_TOKEN must be set"),
            guild_id: env::var("DISCORD_GUILD_ID")
                .expect("DISCORD_GUILD_ID must be set")
                .parse()
                .expect("DISCORD_GUILD_ID must be a valid snowflake"),
            trading_category_id: env::var("TRADING_CATEGORY_ID")
                .expect("TRADING_CATEGORY_ID must be set")
                .parse()
                .expect("TRADING_CATEGORY_ID must be a valid snowflake"),
            start_channel_id: env::var("START_CHANNEL_ID")
                .expect("START_CHANNEL_ID must be set")
                .parse()
                .expect("START_CHANNEL_ID must be a valid snowflake"),
            api_url: env::var("BASESCAN_API_URL").expect("BASESCAN_API_URL must be set"),
            api_key: env::var("BASESCAN_API_KEY").expect("BASESCAN_API_KEY must be set"),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}
