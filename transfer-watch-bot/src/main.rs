//! Transfer watch bot — Discord variant.
//!
//! Provisions a private channel per requesting user, accepts a wallet
//! address from each user, and posts newly observed incoming ERC-20
//! transfers for that wallet into the user's channel.

mod config;
mod discord;
mod watcher;

use serenity::all::{Client, GatewayIntents};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = config::BotConfig::from_env();

    let (commands_tx, commands_rx) = mpsc::unbounded_channel();

    // We need message content to read `!setwallet` registrations.
    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    let handler = discord::Handler {
        config: config.clone(),
        commands: commands_tx.clone(),
    };

    let mut client = Client::builder(&config.bot_token, intents)
        .event_handler(handler)
        .await
        .expect("Failed to create Discord client");

    let http = client.http.clone();
    tokio::spawn(watcher::run_supervisor(http, config, commands_tx, commands_rx));

    if let Err(e) = client.start().await {
        log::error!("Discord client error: {}", e);
    }
}
