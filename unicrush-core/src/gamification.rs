use chrono::{Datelike, NaiveDate, Utc};

/// Flat reward for a moderator-confirmed meetup, before the seasonal
/// multiplier.
pub const MEETUP_POINTS_BASE: f64 = 10.0;

/// Ledger key for a calendar month, "YYYY-MM".
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn current_month_key() -> String {
    month_key(Utc::now().date_naive())
}

pub fn meetup_points(multiplier: f64) -> i64 {
    (MEETUP_POINTS_BASE * multiplier).round() as i64
}
