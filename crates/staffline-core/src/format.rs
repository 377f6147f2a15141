//! Display formatting for table and detail views.

use chrono::{DateTime, NaiveDate, Utc};

const NOT_AVAILABLE: &str = "N/A";

/// `(555) 123-4567` for 10 digits, `+1 (555) 123-4567` for 11 starting with 1,
/// otherwise the input unchanged.
pub fn format_phone_number(phone: Option<&str>) -> String {
    let Some(phone) = phone.filter(|p| !p.is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 => format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..]),
        11 if digits.starts_with('1') => {
            format!("+1 ({}) {}-{}", &digits[1..4], &digits[4..7], &digits[7..])
        }
        _ => phone.to_string(),
    }
}

/// US dollars with thousands separators and up to two decimals: `$1,234.5`.
pub fn format_currency(amount: Option<f64>) -> String {
    let Some(amount) = amount.filter(|a| a.is_finite()) else {
        return NOT_AVAILABLE.to_string();
    };
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let frac = cents % 100;
    match frac {
        0 => format!("{sign}${whole}"),
        f if f % 10 == 0 => format!("{sign}${whole}.{}", f / 10),
        f => format!("{sign}${whole}.{f:02}"),
    }
}

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(",")
}

/// Cuts `text` to `max_len` characters and appends `...` when it was longer.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_len).collect();
    format!("{cut}...")
}

/// First letter upper-case, the rest lower-case.
pub fn capitalize_first_letter(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `1536` → `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[exp])
}

/// Parses the date part of an API date or timestamp string.
pub fn parse_api_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.date_naive());
    }
    let date_part = value.get(0..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// `Mar 4, 2025`, or `N/A` for missing input, or the input if unparseable.
pub fn format_date(value: Option<&str>) -> String {
    match value.filter(|v| !v.is_empty()) {
        None => NOT_AVAILABLE.to_string(),
        Some(v) => parse_api_date(v)
            .map(|d| d.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| v.to_string()),
    }
}

/// Whole days from `today` until the date; negative when in the past.
pub fn days_until(value: &str, today: NaiveDate) -> Option<i64> {
    parse_api_date(value).map(|d| (d - today).num_days())
}

/// True when the date falls within `[today, today + threshold_days]`.
pub fn is_expiring_soon(value: &str, today: NaiveDate, threshold_days: i64) -> bool {
    matches!(days_until(value, today), Some(d) if (0..=threshold_days).contains(&d))
}

pub fn is_expired(value: &str, today: NaiveDate) -> bool {
    matches!(days_until(value, today), Some(d) if d < 0)
}

/// `3 hours ago`, `Just now`; older than a week falls back to [`format_date`].
pub fn format_relative_time(value: &str, now: DateTime<Utc>) -> String {
    let parsed = DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|t| t.and_utc())
        });
    let Some(then) = parsed else {
        return format_date(Some(value));
    };

    let elapsed = now - then;
    let days = elapsed.num_days();
    let hours = elapsed.num_hours();
    let minutes = elapsed.num_minutes();

    if days > 7 {
        format_date(Some(value))
    } else if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        "Just now".to_string()
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_phone_number() {
        assert_eq!(format_phone_number(Some("5551234567")), "(555) 123-4567");
        assert_eq!(format_phone_number(Some("1-555-123-4567")), "+1 (555) 123-4567");
        assert_eq!(format_phone_number(Some("12345")), "12345");
        assert_eq!(format_phone_number(None), "N/A");
    }

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(Some(2450.0)), "$2,450");
        assert_eq!(format_currency(Some(1234567.5)), "$1,234,567.5");
        assert_eq!(format_currency(Some(12.25)), "$12.25");
        assert_eq!(format_currency(Some(-80.0)), "-$80");
        assert_eq!(format_currency(None), "N/A");
    }

    #[test]
    fn test_truncate_and_capitalize() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghij", 4), "abcd...");
        assert_eq!(capitalize_first_letter("iCU"), "Icu");
        assert_eq!(capitalize_first_letter(""), "");
    }

    #[test]
    fn test_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
    }

    #[test]
    fn test_dates() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(format_date(Some("2025-03-04")), "Mar 4, 2025");
        assert_eq!(format_date(Some("2025-03-04 10:00:00")), "Mar 4, 2025");
        assert_eq!(format_date(Some("someday")), "someday");
        assert_eq!(days_until("2025-03-11", today), Some(10));
        assert!(is_expiring_soon("2025-03-31", today, 30));
        assert!(!is_expiring_soon("2025-04-01", today, 30));
        assert!(is_expired("2025-02-28", today));
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(format_relative_time("2025-03-10T11:59:30Z", now), "Just now");
        assert_eq!(format_relative_time("2025-03-10T09:00:00Z", now), "3 hours ago");
        assert_eq!(format_relative_time("2025-03-09 12:00:00", now), "1 day ago");
        assert_eq!(format_relative_time("2025-02-01T00:00:00Z", now), "Feb 1, 2025");
    }
}
