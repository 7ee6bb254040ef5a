//! Transfer watch poller — standalone binary.
//!
//! Watches one wallet address configured via the environment and prints
//! every newly observed incoming ERC-20 transfer to stdout.

use transfer_watch_service::config::Config;
use transfer_watch_service::worker;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    worker::run_poller(config).await;
}
