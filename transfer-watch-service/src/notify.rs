//! Notification rendering for detected transfers.
//!
//! Pure formatting: one multi-line block per transfer. Token amounts
//! are scaled with 256-bit integer arithmetic so an 18-decimal token
//! with a large raw value renders exactly, never through a float.

use chrono::TimeZone;
use ethers::types::U256;
use transfer_watch_types::TransferRecord;

/// Render one transfer as the block that goes to stdout or a channel.
pub fn format_transfer(record: &TransferRecord) -> String {
    format!(
        "Incoming token transfer detected:\n\
         Transaction Hash: {}\n\
         Token: {} ({})\n\
         Amount: {}\n\
         From: {}\n\
         To: {}\n\
         Timestamp: {}",
        record.hash,
        record.token_name,
        record.token_symbol,
        format_token_amount(&record.value, record.token_decimal),
        record.from,
        record.to,
        format_timestamp(record.time_stamp),
    )
}

/// Scale a raw on-chain amount by `10^decimals`, exactly.
///
/// Trailing zeros of the fractional part are trimmed, whole amounts
/// render without a decimal point. Input that does not parse as a
/// decimal integer falls back to the raw string.
pub fn format_token_amount(raw_value: &str, decimals: u32) -> String {
    let value = match U256::from_dec_str(raw_value.trim()) {
        Ok(v) => v,
        Err(_) => return raw_value.to_string(),
    };
    if decimals == 0 {
        return value.to_string();
    }
    let scale = match U256::from(10u64).checked_pow(U256::from(decimals)) {
        Some(s) => s,
        None => return value.to_string(),
    };

    let whole = value / scale;
    let frac = value % scale;
    if frac.is_zero() {
        return whole.to_string();
    }

    let frac_digits = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    format!("{}.{}", whole, frac_digits.trim_end_matches('0'))
}

fn format_timestamp(unix_secs: i64) -> String {
    chrono::Local
        .timestamp_opt(unix_secs, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| unix_secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_one_whole_token() {
        assert_eq!(format_token_amount("1000000000000000000", 18), "1");
    }

    #[test]
    fn test_amount_two_decimals() {
        assert_eq!(format_token_amount("123", 2), "1.23");
    }

    #[test]
    fn test_amount_trims_trailing_zeros() {
        assert_eq!(format_token_amount("1500000000000000000", 18), "1.5");
    }

    #[test]
    fn test_amount_below_one() {
        assert_eq!(format_token_amount("1", 18), "0.000000000000000001");
    }

    #[test]
    fn test_amount_zero_decimals() {
        assert_eq!(format_token_amount("42", 0), "42");
    }

    #[test]
    fn test_amount_large_value_has_no_drift() {
        // 123456789.123456789123456789 with 18 decimals; a f64 cannot
        // hold this exactly.
        assert_eq!(
            format_token_amount("123456789123456789123456789", 18),
            "123456789.123456789123456789"
        );
    }

    #[test]
    fn test_amount_unparseable_falls_back_to_raw() {
        assert_eq!(format_token_amount("0xdeadbeef", 18), "0xdeadbeef");
    }

    #[test]
    fn test_block_contains_every_field() {
        let record = TransferRecord {
            hash: "0xabc".to_string(),
            from: "0xfrom".to_string(),
            to: "0xto".to_string(),
            token_name: "USD Coin".to_string(),
            token_symbol: "USDC".to_string(),
            value: "2500000".to_string(),
            token_decimal: 6,
            time_stamp: 1_700_000_000,
        };
        let block = format_transfer(&record);
        assert!(block.contains("Transaction Hash: 0xabc"));
        assert!(block.contains("Token: USD Coin (USDC)"));
        assert!(block.contains("Amount: 2.5"));
        assert!(block.contains("From: 0xfrom"));
        assert!(block.contains("To: 0xto"));
        assert!(block.contains("Timestamp: "));
    }
}
