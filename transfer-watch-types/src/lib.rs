//! Shared types for the transfer watch poller and bot.

use serde::{Deserialize, Deserializer, Serialize};

// =====================================================
// Domain Types
// =====================================================

/// One ERC-20 transfer event as reported by the explorer API.
///
/// The explorer encodes every field as a JSON string, so the numeric
/// fields accept both strings and numbers. `value` stays a raw decimal
/// string; it is scaled with 256-bit arithmetic at render time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    pub hash: String,
    pub from: String,
    pub to: String,
    pub token_name: String,
    pub token_symbol: String,
    pub value: String,
    #[serde(deserialize_with = "numeric_field")]
    pub token_decimal: u32,
    #[serde(deserialize_with = "numeric_field")]
    pub time_stamp: i64,
}

impl TransferRecord {
    /// Whether this transfer was received by `wallet`.
    ///
    /// The explorer is inconsistent about address casing, so the
    /// comparison ignores ASCII case.
    pub fn is_incoming(&self, wallet: &str) -> bool {
        self.to.eq_ignore_ascii_case(wallet)
    }
}

/// Per-wallet polling cursor.
///
/// `last_seen_hash` marks the newest transaction already processed.
/// The filter takes the state by value and hands back the updated one,
/// so there is exactly one owner per tracked wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchState {
    pub wallet_address: String,
    pub last_seen_hash: Option<String>,
}

impl WatchState {
    pub fn new(wallet_address: impl Into<String>) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            last_seen_hash: None,
        }
    }
}

// =====================================================
// Wire Helpers
// =====================================================

/// Accepts either a JSON number or a numeric string.
fn numeric_field<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr + Deserialize<'de>,
    T::Err: std::fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString<T> {
        Number(T),
        Text(String),
    }

    match NumberOrString::<T>::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
