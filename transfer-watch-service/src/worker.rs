//! Background poller for one watched wallet.
//!
//! Fetches the explorer page on a fixed cadence, selects what is new
//! since the previous tick, and prints each incoming transfer to
//! stdout. Ticks run strictly in sequence on this task: a tick finishes
//! (or fails) before the next sleep starts, so two ticks can never race
//! on the same watch state.

use crate::basescan;
use crate::config::Config;
use crate::notify;
use crate::watch;
use std::time::Duration;
use transfer_watch_types::WatchState;

pub async fn run_poller(config: Config) {
    log::info!(
        "[TRANSFER_WATCH] Poller started for {} (poll interval: {}s)",
        config.wallet_address,
        config.poll_interval_secs
    );

    let client = reqwest::Client::new();
    let mut state = WatchState::new(config.wallet_address.clone());

    loop {
        match poll_tick(&client, &config, state.clone()).await {
            Ok((next_state, reported)) => {
                state = next_state;
                if reported > 0 {
                    log::info!(
                        "[TRANSFER_WATCH] Tick complete: {} new incoming transfers",
                        reported
                    );
                }
            }
            // A failed tick keeps the previous watermark; the next tick
            // re-fetches the same page.
            Err(e) => log::error!("[TRANSFER_WATCH] Tick error: {}", e),
        }

        tokio::time::sleep(Duration::from_secs(config.poll_interval_secs)).await;
    }
}

/// One tick: fetch, select, print. Returns the advanced state and the
/// number of transfers reported.
async fn poll_tick(
    client: &reqwest::Client,
    config: &Config,
    state: WatchState,
) -> Result<(WatchState, usize), String> {
    let records =
        basescan::get_token_transfers(client, &config.api_url, &config.api_key, &state.wallet_address)
            .await?;

    if records.is_empty() {
        log::debug!("[TRANSFER_WATCH] No transactions found");
        return Ok((state, 0));
    }

    let (fresh, next_state) = watch::select_new_transfers(&records, state);
    for transfer in &fresh {
        println!("\n{}", notify::format_transfer(transfer));
    }

    Ok((next_state, fresh.len()))
}
