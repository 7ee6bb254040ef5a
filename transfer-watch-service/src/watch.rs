//! Incremental transfer selection.
//!
//! One explorer page (newest first) plus the remembered watermark hash
//! in, the transfers that arrived since the previous tick out, oldest
//! first.

use transfer_watch_types::{TransferRecord, WatchState};

/// Select the incoming transfers that are new since the last tick.
///
/// `records` must be the explorer page ordered newest first. The state
/// is taken by value and returned updated; on an empty page it comes
/// back untouched.
///
/// If the watermark hash is set but no longer present on the page (it
/// scrolled off, or the state was reset), the entire page is treated as
/// new. Re-notifying after a long gap beats silently dropping a
/// transfer, so the fallback is deliberately open.
///
/// The watermark always advances to the newest record on the page,
/// whether or not that record is an incoming transfer. Otherwise an
/// outgoing transfer at the top of the page would be re-scanned on
/// every subsequent tick.
pub fn select_new_transfers(
    records: &[TransferRecord],
    mut state: WatchState,
) -> (Vec<TransferRecord>, WatchState) {
    if records.is_empty() {
        return (Vec::new(), state);
    }

    // Everything strictly newer than the first watermark match is new.
    // No watermark, or no match, selects the whole page.
    let boundary = state
        .last_seen_hash
        .as_deref()
        .and_then(|last| records.iter().position(|r| r.hash == last))
        .unwrap_or(records.len());

    let mut fresh: Vec<TransferRecord> = records[..boundary]
        .iter()
        .filter(|r| r.is_incoming(&state.wallet_address))
        .cloned()
        .collect();
    // Notifications go out in the order the transfers happened.
    fresh.reverse();

    state.last_seen_hash = Some(records[0].hash.clone());
    (fresh, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLET: &str = "0x2222222222222222222222222222222222222222";
    const OTHER: &str = "0x9999999999999999999999999999999999999999";

    fn record(hash: &str, to: &str, time_stamp: i64) -> TransferRecord {
        TransferRecord {
            hash: hash.to_string(),
            from: "0x1111111111111111111111111111111111111111".to_string(),
            to: to.to_string(),
            token_name: "Test Token".to_string(),
            token_symbol: "TST".to_string(),
            value: "1000".to_string(),
            token_decimal: 18,
            time_stamp,
        }
    }

    /// Newest-first page, as the explorer returns it.
    fn page() -> Vec<TransferRecord> {
        vec![
            record("0xc", WALLET, 300),
            record("0xb", WALLET, 200),
            record("0xa", WALLET, 100),
        ]
    }

    #[test]
    fn test_first_fetch_reports_whole_page_oldest_first() {
        let (fresh, state) = select_new_transfers(&page(), WatchState::new(WALLET));
        let hashes: Vec<&str> = fresh.iter().map(|r| r.hash.as_str()).collect();
        assert_eq!(hashes, vec!["0xa", "0xb", "0xc"]);
        assert_eq!(state.last_seen_hash.as_deref(), Some("0xc"));
    }

    #[test]
    fn test_same_page_twice_reports_nothing_new() {
        let records = page();
        let (_, state) = select_new_transfers(&records, WatchState::new(WALLET));
        let (fresh, state) = select_new_transfers(&records, state);
        assert!(fresh.is_empty());
        assert_eq!(state.last_seen_hash.as_deref(), Some("0xc"));
    }

    #[test]
    fn test_watermark_record_is_never_reemitted() {
        let mut state = WatchState::new(WALLET);
        state.last_seen_hash = Some("0xb".to_string());
        let (fresh, _) = select_new_transfers(&page(), state);
        let hashes: Vec<&str> = fresh.iter().map(|r| r.hash.as_str()).collect();
        assert_eq!(hashes, vec!["0xc"]);
    }

    #[test]
    fn test_missing_watermark_fails_open() {
        let mut state = WatchState::new(WALLET);
        state.last_seen_hash = Some("0xgone".to_string());
        let (fresh, state) = select_new_transfers(&page(), state);
        assert_eq!(fresh.len(), 3);
        assert_eq!(state.last_seen_hash.as_deref(), Some("0xc"));
    }

    #[test]
    fn test_outgoing_transfers_are_not_reported() {
        let records = vec![
            record("0xc", OTHER, 300),
            record("0xb", WALLET, 200),
            record("0xa", WALLET, 100),
        ];
        let (fresh, state) = select_new_transfers(&records, WatchState::new(WALLET));
        let hashes: Vec<&str> = fresh.iter().map(|r| r.hash.as_str()).collect();
        assert_eq!(hashes, vec!["0xa", "0xb"]);
        // The outgoing record still advances the watermark.
        assert_eq!(state.last_seen_hash.as_deref(), Some("0xc"));
    }

    #[test]
    fn test_recipient_match_ignores_case() {
        let records = vec![record("0xa", &WALLET.to_uppercase(), 100)];
        let (fresh, _) = select_new_transfers(&records, WatchState::new(WALLET));
        assert_eq!(fresh.len(), 1);
    }

    #[test]
    fn test_empty_page_leaves_state_untouched() {
        let mut state = WatchState::new(WALLET);
        state.last_seen_hash = Some("0xb".to_string());
        let (fresh, state) = select_new_transfers(&[], state);
        assert!(fresh.is_empty());
        assert_eq!(state.last_seen_hash.as_deref(), Some("0xb"));
    }

    #[test]
    fn test_duplicate_hashes_each_evaluated() {
        // One transaction carrying two transfer log entries: same hash,
        // different recipients.
        let records = vec![
            record("0xtx", WALLET, 300),
            record("0xtx", OTHER, 300),
            record("0xa", WALLET, 100),
        ];
        let mut state = WatchState::new(WALLET);
        state.last_seen_hash = Some("0xa".to_string());
        let (fresh, state) = select_new_transfers(&records, state);
        let hashes: Vec<&str> = fresh.iter().map(|r| r.hash.as_str()).collect();
        assert_eq!(hashes, vec!["0xtx"]);
        assert_eq!(state.last_seen_hash.as_deref(), Some("0xtx"));
    }

    #[test]
    fn test_watermark_on_duplicate_hash_excludes_all_entries() {
        // The watermark matches the newer of two entries with the same
        // hash; the older sibling is behind the boundary and stays out.
        let records = vec![
            record("0xnew", WALLET, 400),
            record("0xtx", WALLET, 300),
            record("0xtx", WALLET, 300),
        ];
        let mut state = WatchState::new(WALLET);
        state.last_seen_hash = Some("0xtx".to_string());
        let (fresh, _) = select_new_transfers(&records, state);
        let hashes: Vec<&str> = fresh.iter().map(|r| r.hash.as_str()).collect();
        assert_eq!(hashes, vec!["0xnew"]);
    }
}
