use serde::Serialize;

/// Absolute instant as milliseconds since the Unix epoch
pub type Millis = i64;

/// Lifecycle of a window relative to "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pending,
    Active,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressResult {
    pub percent: f64,
    pub status: Status,
}

impl ProgressResult {
    const PENDING: Self = Self {
        percent: 0.0,
        status: Status::Pending,
    };

    const COMPLETE: Self = Self {
        percent: 100.0,
        status: Status::Complete,
    };
}

/// Derive percent complete and status for `now` within `[start, end]`.
///
/// A zero-length window is complete as soon as it is reached. Windows whose
/// end precedes their start are never active: they go straight from
/// pending to complete.
pub fn compute(start: Millis, end: Millis, now: Millis) -> ProgressResult {
    if now < start {
        return ProgressResult::PENDING;
    }
    if now > end {
        return ProgressResult::COMPLETE;
    }

    let total = end - start;
    if total == 0 {
        return ProgressResult::COMPLETE;
    }

    let elapsed = now - start;
    ProgressResult {
        percent: (elapsed as f64 / total as f64) * 100.0,
        status: Status::Active,
    }
}

/// The tracked interval. No ordering between `start` and `end` is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: Millis,
    pub end: Millis,
}

impl TimeWindow {
    pub fn new(start: Millis, end: Millis) -> Self {
        Self { start, end }
    }

    pub fn total_ms(&self) -> Millis {
        self.end - self.start
    }

    pub fn elapsed_ms(&self, now: Millis) -> Millis {
        now - self.start
    }

    pub fn remaining_ms(&self, now: Millis) -> Millis {
        self.end - now
    }

    pub fn progress(&self, now: Millis) -> ProgressResult {
        compute(self.start, self.end, now)
    }
}

/// Fraction of the gauge to fill, clamped to `[0, 1]`
pub fn bar_ratio(percent: f64) -> f64 {
    percent.clamp(0.0, 100.0) / 100.0
}

/// Label shown under the progress bar, derived from the percent alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BarPhase {
    Awaiting,
    InProgress,
    Complete,
}

impl BarPhase {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 100.0 {
            BarPhase::Complete
        } else if percent > 0.0 {
            BarPhase::InProgress
        } else {
            BarPhase::Awaiting
        }
    }
}
