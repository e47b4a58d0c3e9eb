use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use clap::ValueEnum;

use crate::config::Config;

/// Quick windows that begin at the current minute
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum Preset {
    #[strum(to_string = "1 MIN")]
    Minute,
    #[strum(to_string = "1 HR")]
    Hour,
    #[strum(to_string = "1 DAY")]
    Day,
    #[strum(to_string = "1 YR")]
    Year,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Minute, Preset::Hour, Preset::Day, Preset::Year];

    /// Start and end for a window opened at local time `now`
    pub fn window_from(self, now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let end = match self {
            Preset::Minute => now + Duration::minutes(1),
            Preset::Hour => now + Duration::hours(1),
            Preset::Day => now + Duration::days(1),
            Preset::Year => one_year_later(now),
        };
        (truncate_to_minute(now), truncate_to_minute(end))
    }

    pub fn apply(self, cfg: &mut Config, now: NaiveDateTime) {
        let (start, end) = self.window_from(now);
        cfg.start = start;
        cfg.end = end;
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Same wall-clock time next year; Feb 29 rolls over to Mar 1
fn one_year_later(now: NaiveDateTime) -> NaiveDateTime {
    let year = now.year() + 1;
    now.with_year(year)
        .or_else(|| (now + Duration::days(1)).with_year(year))
        .unwrap_or(now + Duration::days(365))
}

fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|v| v.with_nanosecond(0))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{format_datetime, parse_datetime};

    fn now() -> NaiveDateTime {
        parse_datetime("start", "2025-04-10T09:15:42").unwrap()
    }

    fn window(p: Preset, at: NaiveDateTime) -> (String, String) {
        let (s, e) = p.window_from(at);
        (format_datetime(&s), format_datetime(&e))
    }

    #[test]
    fn presets_start_at_current_minute() {
        for p in Preset::ALL {
            let (start, _) = p.window_from(now());
            assert_eq!(start.second(), 0);
            assert_eq!(format_datetime(&start), "2025-04-10T09:15");
        }
    }

    #[test]
    fn preset_lengths() {
        assert_eq!(window(Preset::Minute, now()).1, "2025-04-10T09:16");
        assert_eq!(window(Preset::Hour, now()).1, "2025-04-10T10:15");
        assert_eq!(window(Preset::Day, now()).1, "2025-04-11T09:15");
        assert_eq!(window(Preset::Year, now()).1, "2026-04-10T09:15");
    }

    #[test]
    fn leap_day_year_preset_rolls_to_march() {
        let leap = parse_datetime("start", "2024-02-29T12:00").unwrap();
        assert_eq!(window(Preset::Year, leap).1, "2025-03-01T12:00");
    }

    #[test]
    fn apply_replaces_window_only() {
        let mut cfg = Config::for_year(2020);
        Preset::Hour.apply(&mut cfg, now());
        assert_eq!(format_datetime(&cfg.start), "2025-04-10T09:15");
        assert_eq!(format_datetime(&cfg.end), "2025-04-10T10:15");
        assert_eq!(cfg.precision, 7);
    }

    #[test]
    fn labels_and_cycling() {
        assert_eq!(Preset::Minute.to_string(), "1 MIN");
        assert_eq!(Preset::Year.to_string(), "1 YR");
        assert_eq!(Preset::Year.next(), Preset::Minute);
        assert_eq!(Preset::Minute.prev(), Preset::Year);
    }
}
