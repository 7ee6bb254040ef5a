//! Basescan-style explorer API client.
//!
//! One GET per tick against the `account/tokentx` endpoint, newest
//! transfer first. Fetch, HTTP, and parse failures all surface as one
//! error string carrying the cause; the caller never retries and simply
//! waits for the next scheduled tick.

use transfer_watch_types::TransferRecord;

/// Fetch the first page of token transfers for `address`, newest first.
///
/// An empty page and "no transactions found" are the same outcome: an
/// empty vec. The explorer reports throttling and bad API keys as a
/// string in the `result` field, which is treated as a failed fetch.
pub async fn get_token_transfers(
    client: &reqwest::Client,
    api_url: &str,
    api_key: &str,
    address: &str,
) -> Result<Vec<TransferRecord>, String> {
    let response = client
        .get(api_url)
        .query(&[
            ("module", "account"),
            ("action", "tokentx"),
            ("address", address),
            ("sort", "desc"),
            ("apikey", api_key),
        ])
        .send()
        .await
        .map_err(|e| format!("Explorer API request failed: {}", e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))?;

    if !status.is_success() {
        return Err(format!(
            "Explorer API error ({}): {}",
            status,
            truncate_error(&body)
        ));
    }

    parse_transfer_page(&body)
}

/// Parse one explorer response body into validated transfer records.
///
/// Entries that fail validation are skipped with a warning so a single
/// malformed object cannot poison the rest of the page.
pub fn parse_transfer_page(body: &str) -> Result<Vec<TransferRecord>, String> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| format!("Invalid JSON: {}", e))?;

    match json.get("result") {
        Some(serde_json::Value::Array(entries)) => {
            let mut records = Vec::with_capacity(entries.len());
            for entry in entries {
                match serde_json::from_value::<TransferRecord>(entry.clone()) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        log::warn!("[TRANSFER_WATCH] Skipping malformed transfer entry: {}", e)
                    }
                }
            }
            Ok(records)
        }
        Some(serde_json::Value::String(message)) => {
            Err(format!("Explorer API error: {}", message))
        }
        _ => Err("Explorer response missing `result` array".to_string()),
    }
}

fn truncate_error(body: &str) -> &str {
    if body.len() > 200 { &body[..200] } else { body }
}
