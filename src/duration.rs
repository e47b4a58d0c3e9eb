//! Fixed-grammar rendering of millisecond durations:
//! `[<Y>y ]<D>d <HH>h <MM>m <SS>s`.

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
/// Years are a flat 365 days; leap days are not accounted for.
const DAYS_PER_YEAR: i64 = 365;

/// Shown instead of the grammar once a duration has run out
pub const EXPIRED: &str = "00:00:00";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationStyle {
    /// Fold whole 365-day years into a leading `<Y>y` segment. When off, the
    /// day count is unbounded.
    pub show_years: bool,
}

impl Default for DurationStyle {
    fn default() -> Self {
        Self { show_years: true }
    }
}

pub fn format_duration(ms: i64) -> String {
    format_duration_with(ms, DurationStyle::default())
}

pub fn format_duration_with(ms: i64, style: DurationStyle) -> String {
    if ms <= 0 {
        return EXPIRED.to_string();
    }

    let seconds = (ms / MS_PER_SECOND) % 60;
    let minutes = (ms / MS_PER_MINUTE) % 60;
    let hours = (ms / MS_PER_HOUR) % 24;
    let total_days = ms / MS_PER_DAY;

    let (years, days) = if style.show_years {
        (total_days / DAYS_PER_YEAR, total_days % DAYS_PER_YEAR)
    } else {
        (0, total_days)
    };

    if years > 0 {
        format!("{years}y {days}d {hours:02}h {minutes:02}m {seconds:02}s")
    } else {
        format!("{days}d {hours:02}h {minutes:02}m {seconds:02}s")
    }
}
