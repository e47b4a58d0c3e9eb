// Library surface for the binary and the headless integration tests.
// `progress` and `duration` are the pure core; everything else is the
// terminal front end around them.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod duration;
pub mod form;
pub mod logging;
pub mod presets;
pub mod progress;
pub mod runtime;
pub mod sampler;
pub mod share;
pub mod ui;

pub use duration::{format_duration, format_duration_with, DurationStyle};
pub use progress::{compute, ProgressResult, Status, TimeWindow};
