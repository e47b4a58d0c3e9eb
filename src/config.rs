use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::app_dirs::AppDirs;
use crate::progress::TimeWindow;

pub const MAX_PRECISION: u8 = 14;
pub const DEFAULT_PRECISION: u8 = 7;
pub const DEFAULT_TITLE: &str = "TEMPORAL\nCRUNCH";

/// Shape written by a `datetime-local` field, minute resolution
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATETIME_SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const ACCEPTED_FORMATS: [&str; 4] = [
    DATETIME_LOCAL_FORMAT,
    DATETIME_SECONDS_FORMAT,
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field}: `{value}` is not a date and time (expected YYYY-MM-DDTHH:MM)")]
    InvalidTimestamp { field: &'static str, value: String },
    #[error("precision: `{0}` is not a whole number")]
    InvalidPrecision(String),
    #[error("missing {0}")]
    MissingField(&'static str),
    #[error("{field}: {value} does not exist in the local timezone")]
    NonexistentLocalTime {
        field: &'static str,
        value: NaiveDateTime,
    },
}

/// What is being tracked. Start and end are local wall-clock times.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub precision: u8,
}

impl Default for Config {
    /// Progress through the current calendar year
    fn default() -> Self {
        Self::for_year(Local::now().year())
    }
}

impl Config {
    pub fn for_year(year: i32) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            start: year_start(year),
            end: year_start(year + 1),
            precision: DEFAULT_PRECISION,
        }
    }

    /// Resolve the wall-clock bounds to absolute instants
    pub fn window(&self) -> Result<TimeWindow, ConfigError> {
        Ok(TimeWindow::new(
            local_millis("start", self.start)?,
            local_millis("end", self.end)?,
        ))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window().map(|_| ())
    }

    pub fn set_precision(&mut self, precision: i64) {
        self.precision = clamp_precision(precision);
    }

    pub fn title_lines(&self) -> impl Iterator<Item = &str> {
        self.title.split('\n')
    }
}

fn year_start(year: i32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn local_millis(field: &'static str, value: NaiveDateTime) -> Result<i64, ConfigError> {
    Local
        .from_local_datetime(&value)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or(ConfigError::NonexistentLocalTime { field, value })
}

pub fn clamp_precision(precision: i64) -> u8 {
    precision.clamp(0, MAX_PRECISION as i64) as u8
}

pub fn parse_precision(raw: &str) -> Result<u8, ConfigError> {
    raw.trim()
        .parse::<i64>()
        .map(clamp_precision)
        .map_err(|_| ConfigError::InvalidPrecision(raw.to_string()))
}

/// Parse a local wall-clock time. A bare date means midnight.
pub fn parse_datetime(field: &'static str, raw: &str) -> Result<NaiveDateTime, ConfigError> {
    let trimmed = raw.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| ConfigError::InvalidTimestamp {
            field,
            value: raw.to_string(),
        })
}

/// Minute form unless the value carries seconds, so parsing it back gives
/// the same instant
pub fn format_datetime(value: &NaiveDateTime) -> String {
    let fmt = if value.second() == 0 {
        DATETIME_LOCAL_FORMAT
    } else {
        DATETIME_SECONDS_FORMAT
    };
    value.format(fmt).to_string()
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(mut cfg) => {
                cfg.precision = cfg.precision.min(MAX_PRECISION);
                cfg
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
