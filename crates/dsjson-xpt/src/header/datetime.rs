//! Header datetime fields (`ddMMMyy:hh:mm:ss`).

use chrono::NaiveDateTime;

const XPT_DATETIME_FORMAT: &str = "%d%b%y:%H:%M:%S";

/// Format a datetime for a header record, e.g. `15MAR24:14:30:45`.
#[must_use]
pub fn format_xpt_datetime(dt: NaiveDateTime) -> String {
    dt.format(XPT_DATETIME_FORMAT).to_string().to_uppercase()
}

/// Parse a header datetime; `None` when blank or malformed.
#[must_use]
pub fn parse_xpt_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    // chrono expects month abbreviations in title case.
    let normalized = match value.get(2..5) {
        Some(month) => {
            let mut month = month.to_ascii_lowercase();
            month[..1].make_ascii_uppercase();
            format!("{}{}{}", &value[..2], month, &value[5..])
        }
        None => return None,
    };
    NaiveDateTime::parse_from_str(&normalized, XPT_DATETIME_FORMAT).ok()
}
