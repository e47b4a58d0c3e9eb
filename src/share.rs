//! Configuration as a shareable query string:
//! `title=…&start=YYYY-MM-DDTHH:MM&end=…&precision=N`.

use url::form_urlencoded;

use crate::config::{format_datetime, parse_datetime, parse_precision, Config, ConfigError};

/// Configuration to start with, and whether the panel should be opened so
/// the user can fix it
#[derive(Debug, Clone, PartialEq)]
pub struct InitialConfig {
    pub config: Config,
    pub open_panel: bool,
}

pub fn to_query(cfg: &Config) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("title", &cfg.title)
        .append_pair("start", &format_datetime(&cfg.start))
        .append_pair("end", &format_datetime(&cfg.end))
        .append_pair("precision", &cfg.precision.to_string())
        .finish()
}

/// Parse a complete query. Every field must be present and non-empty; the
/// first occurrence of a repeated key wins.
pub fn parse_query(query: &str) -> Result<Config, ConfigError> {
    let query = query.trim().trim_start_matches('?');

    let mut title = None;
    let mut start = None;
    let mut end = None;
    let mut precision = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let slot = match &*key {
            "title" => &mut title,
            "start" => &mut start,
            "end" => &mut end,
            "precision" => &mut precision,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    let require = |value: Option<String>, name: &'static str| {
        value
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingField(name))
    };

    let config = Config {
        title: require(title, "title")?,
        start: parse_datetime("start", &require(start, "start")?)?,
        end: parse_datetime("end", &require(end, "end")?)?,
        precision: parse_precision(&require(precision, "precision")?)?,
    };
    config.validate()?;
    Ok(config)
}

/// Decide the starting configuration from an optional query. No query keeps
/// `fallback`; a broken one also keeps `fallback` but asks for the panel.
pub fn initial_config(query: Option<&str>, fallback: Config) -> InitialConfig {
    let query = match query.map(str::trim) {
        None | Some("") | Some("?") => {
            return InitialConfig {
                config: fallback,
                open_panel: false,
            }
        }
        Some(q) => q,
    };

    match parse_query(query) {
        Ok(config) => InitialConfig {
            config,
            open_panel: false,
        },
        Err(e) => {
            tracing::warn!(error = %e, "share query rejected");
            InitialConfig {
                config: fallback,
                open_panel: true,
            }
        }
    }
}
