//! Transfer watch service library.
//!
//! Shared between the standalone poller binary and the Discord bot:
//! explorer API client, incremental transfer selection, notification
//! rendering, and the polling worker.

pub mod basescan;
pub mod config;
pub mod notify;
pub mod watch;
pub mod worker;
