//! Formatting of header metadata: counters and timestamps.

use chrono::DateTime;

/// Shown when a post carries no creation time.
pub const UNKNOWN_DATE: &str = "未知日期";

/// Timestamp layout used by the post API (`Wed Oct 10 20:19:24 +0000 2018`).
const API_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Compacts a counter: `999`, `1.2K`, `3.4M`.
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Normalizes a source timestamp to `%Y-%m-%d %H:%M:%S` in its own offset.
///
/// Accepts the API layout and RFC 3339. Anything else is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return UNKNOWN_DATE.to_string();
    }
    DateTime::parse_from_str(raw, API_DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.format(OUTPUT_DATE_FORMAT).to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_compacted() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_200), "1.2K");
        assert_eq!(format_number(3_400_000), "3.4M");
    }

    #[test]
    fn api_timestamp_is_normalized() {
        assert_eq!(
            format_timestamp("Wed Oct 10 20:19:24 +0000 2018"),
            "2018-10-10 20:19:24"
        );
    }

    #[test]
    fn iso_timestamp_is_normalized() {
        assert_eq!(format_timestamp("2024-01-02T03:04:05Z"), "2024-01-02 03:04:05");
    }

    #[test]
    fn unparseable_timestamp_is_kept() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_timestamp(""), UNKNOWN_DATE);
    }
}
