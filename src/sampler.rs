use serde::Serialize;

use crate::duration::{format_duration_with, DurationStyle};
use crate::progress::{Millis, ProgressResult, Status, TimeWindow};

/// One evaluation of the window, ready to display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub now: Millis,
    pub progress: ProgressResult,
    pub elapsed_ms: Millis,
    pub remaining_ms: Millis,
    pub percent_text: String,
    pub elapsed_text: String,
    pub remaining_text: String,
}

impl Sample {
    /// Before the window opens the elapsed figure counts down to the start
    pub fn elapsed_label(&self) -> &'static str {
        match self.progress.status {
            Status::Pending => "Starts In",
            Status::Active | Status::Complete => "Elapsed Time",
        }
    }
}

pub fn format_percent(percent: f64, precision: u8) -> String {
    format!("{:.*}", precision as usize, percent)
}

/// Owns the currently displayed result for one configuration. Replaced, and
/// cancelled, whenever the configuration changes.
#[derive(Debug)]
pub struct Sampler {
    window: TimeWindow,
    precision: u8,
    style: DurationStyle,
    latest: Option<Sample>,
    cancelled: bool,
}

impl Sampler {
    pub fn new(window: TimeWindow, precision: u8, style: DurationStyle) -> Self {
        Self {
            window,
            precision,
            style,
            latest: None,
            cancelled: false,
        }
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Takes effect on the next sample
    pub fn set_precision(&mut self, precision: u8) {
        self.precision = precision;
    }

    pub fn style(&self) -> DurationStyle {
        self.style
    }

    pub fn set_style(&mut self, style: DurationStyle) {
        self.style = style;
    }

    /// Run one sampling step. `now` never moves backwards: an earlier
    /// instant than the previous sample is treated as the previous one.
    pub fn sample(&mut self, now: Millis) -> Option<&Sample> {
        if self.cancelled {
            return None;
        }

        let now = match &self.latest {
            Some(prev) => now.max(prev.now),
            None => now,
        };

        let progress = self.window.progress(now);
        let elapsed_ms = self.window.elapsed_ms(now);
        let remaining_ms = self.window.remaining_ms(now);

        if let Some(prev) = &self.latest {
            if prev.progress.status != progress.status {
                tracing::info!(from = %prev.progress.status, to = %progress.status, "status changed");
            }
        }

        self.latest = Some(Sample {
            now,
            progress,
            elapsed_ms,
            remaining_ms,
            percent_text: format_percent(progress.percent, self.precision),
            elapsed_text: format_duration_with(elapsed_ms.saturating_abs(), self.style),
            remaining_text: format_duration_with(remaining_ms, self.style),
        });
        self.latest.as_ref()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.latest.as_ref()
    }

    /// Stop sampling. Later calls to [`Sampler::sample`] are ignored and the
    /// last displayed result stays as it was.
    pub fn cancel(&mut self) {
        if !self.cancelled {
            tracing::debug!(start = self.window.start, end = self.window.end, "sampler cancelled");
        }
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: Millis = 86_400_000;

    fn sampler() -> Sampler {
        Sampler::new(TimeWindow::new(0, 2 * DAY), 2, DurationStyle::default())
    }

    #[test]
    fn sample_midway() {
        let mut s = sampler();
        let sample = s.sample(DAY).unwrap().clone();
        assert_eq!(sample.progress.status, Status::Active);
        assert_eq!(sample.percent_text, "50.00");
        assert_eq!(sample.elapsed_text, "1d 00h 00m 00s");
        assert_eq!(sample.remaining_text, "1d 00h 00m 00s");
        assert_eq!(sample.elapsed_label(), "Elapsed Time");
        assert_eq!(s.latest(), Some(&sample));
    }

    #[test]
    fn pending_counts_down_to_start() {
        let mut s = Sampler::new(TimeWindow::new(DAY, 2 * DAY), 0, DurationStyle::default());
        let sample = s.sample(DAY - 5_000).unwrap();
        assert_eq!(sample.progress.status, Status::Pending);
        assert_eq!(sample.percent_text, "0");
        assert_eq!(sample.elapsed_text, "0d 00h 00m 05s");
        assert_eq!(sample.elapsed_label(), "Starts In");
    }

    #[test]
    fn complete_shows_expired_remaining() {
        let mut s = sampler();
        let sample = s.sample(3 * DAY).unwrap();
        assert_eq!(sample.progress.status, Status::Complete);
        assert_eq!(sample.percent_text, "100.00");
        assert_eq!(sample.remaining_text, "00:00:00");
        assert_eq!(sample.elapsed_text, "3d 00h 00m 00s");
    }

    #[test]
    fn now_never_goes_backwards() {
        let mut s = sampler();
        s.sample(DAY);
        let sample = s.sample(DAY / 2).unwrap();
        assert_eq!(sample.now, DAY);
        assert_eq!(sample.percent_text, "50.00");
    }

    #[test]
    fn cancelled_sampler_keeps_last_result() {
        let mut s = sampler();
        s.sample(DAY / 4);
        let before = s.latest().cloned();
        s.cancel();
        assert!(s.is_cancelled());
        assert!(s.sample(DAY).is_none());
        assert_eq!(s.latest().cloned(), before);
    }

    #[test]
    fn precision_and_style_apply_on_next_sample() {
        let mut s = Sampler::new(TimeWindow::new(0, 800 * DAY), 1, DurationStyle::default());
        assert_eq!(s.sample(400 * DAY).unwrap().elapsed_text, "1y 35d 00h 00m 00s");
        s.set_precision(4);
        s.set_style(DurationStyle { show_years: false });
        let sample = s.sample(400 * DAY).unwrap();
        assert_eq!(sample.percent_text, "50.0000");
        assert_eq!(sample.elapsed_text, "400d 00h 00m 00s");
    }

    #[test]
    fn format_percent_precision() {
        assert_eq!(format_percent(12.3456789, 0), "12");
        assert_eq!(format_percent(12.3456789, 3), "12.346");
        assert_eq!(format_percent(100.0, 14), "100.00000000000000");
    }
}
