//! Per-user wallet watcher supervisor.
//!
//! Chat handlers and ticker tasks talk to the supervisor through one
//! command channel; the supervisor alone owns every registration and
//! watch state. Two ticks for the same wallet can therefore never
//! interleave — the cost is that a slow fetch for one wallet delays the
//! other wallets' ticks behind it.

use crate::config::BotConfig;
use serenity::all::ChannelId;
use serenity::http::Http;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use transfer_watch_service::{basescan, notify, watch};
use transfer_watch_types::WatchState;

/// Commands accepted by the supervisor.
pub enum WatcherCommand {
    RegisterWallet {
        user_id: u64,
        channel_id: u64,
        wallet_address: String,
    },
    TickWallet {
        user_id: u64,
    },
    DeliverNotification {
        channel_id: u64,
        text: String,
    },
}

/// What a user asked the bot to watch, and where to report it.
struct UserRegistration {
    wallet_address: String,
    channel_id: u64,
}

pub async fn run_supervisor(
    http: Arc<Http>,
    config: BotConfig,
    commands: mpsc::UnboundedSender<WatcherCommand>,
    mut inbox: mpsc::UnboundedReceiver<WatcherCommand>,
) {
    log::info!(
        "[WATCHER] Supervisor started (poll interval: {}s)",
        config.poll_interval_secs
    );

    let client = reqwest::Client::new();
    let mut registrations: HashMap<u64, UserRegistration> = HashMap::new();
    let mut states: HashMap<u64, WatchState> = HashMap::new();

    while let Some(command) = inbox.recv().await {
        match command {
            WatcherCommand::RegisterWallet {
                user_id,
                channel_id,
                wallet_address,
            } => {
                // Re-registering swaps the wallet and resets the
                // watermark; the ticker from the first registration
                // keeps firing for this user.
                let already_ticking = registrations.contains_key(&user_id);
                log::info!(
                    "[WATCHER] User {} now watching {} in channel {}",
                    user_id,
                    wallet_address,
                    channel_id
                );
                states.insert(user_id, WatchState::new(wallet_address.clone()));
                registrations.insert(
                    user_id,
                    UserRegistration {
                        wallet_address,
                        channel_id,
                    },
                );

                if !already_ticking {
                    let ticker = commands.clone();
                    let interval = config.poll_interval_secs;
                    tokio::spawn(async move {
                        // First tick fires immediately. There is no
                        // shutdown path; the ticker lives as long as
                        // the process.
                        loop {
                            if ticker.send(WatcherCommand::TickWallet { user_id }).is_err() {
                                break;
                            }
                            tokio::time::sleep(Duration::from_secs(interval)).await;
                        }
                    });
                }
            }

            WatcherCommand::TickWallet { user_id } => {
                let Some(registration) = registrations.get(&user_id) else {
                    continue;
                };
                let Some(state) = states.remove(&user_id) else {
                    continue;
                };
                let channel_id = registration.channel_id;

                match basescan::get_token_transfers(
                    &client,
                    &config.api_url,
                    &config.api_key,
                    &state.wallet_address,
                )
                .await
                {
                    Ok(records) => {
                        let (fresh, next_state) = watch::select_new_transfers(&records, state);
                        states.insert(user_id, next_state);
                        for transfer in &fresh {
                            let delivery = WatcherCommand::DeliverNotification {
                                channel_id,
                                text: notify::format_transfer(transfer),
                            };
                            if commands.send(delivery).is_err() {
                                return;
                            }
                        }
                        if !fresh.is_empty() {
                            log::info!(
                                "[WATCHER] {} new incoming transfers for {}",
                                fresh.len(),
                                registration.wallet_address
                            );
                        }
                    }
                    Err(e) => {
                        // Failed ticks keep the previous watermark.
                        log::error!("[WATCHER] Tick error for user {}: {}", user_id, e);
                        states.insert(user_id, state);
                    }
                }
            }

            WatcherCommand::DeliverNotification { channel_id, text } => {
                if let Err(e) = ChannelId::new(channel_id).say(&http, &text).await {
                    log::error!(
                        "[WATCHER] Failed to deliver notification to channel {}: {}",
                        channel_id,
                        e
                    );
                }
            }
        }
    }

    log::info!("[WATCHER] Command channel closed, supervisor stopping");
}
