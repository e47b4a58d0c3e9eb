use chrono::NaiveDateTime;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::{format_datetime, parse_datetime, Config, ConfigError, MAX_PRECISION};
use crate::presets::Preset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Field {
    #[strum(to_string = "Operation Title")]
    Title,
    #[strum(to_string = "Initiation Sequence [Start]")]
    Start,
    #[strum(to_string = "Terminus Sequence [End]")]
    End,
    #[strum(to_string = "Precision Index")]
    Precision,
    #[strum(to_string = "Quick Override Protocols")]
    Presets,
    #[strum(to_string = "Engage Tracking")]
    Engage,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Title,
        Field::Start,
        Field::End,
        Field::Precision,
        Field::Presets,
        Field::Engage,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    None,
    Submit(Config),
    Close,
}

/// Editable draft of a [`Config`]. Start and end stay as text until the
/// draft is submitted, so half-typed values never reach the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigForm {
    pub title: String,
    pub start: String,
    pub end: String,
    pub precision: u8,
    pub preset: Preset,
    pub focus: Field,
    pub error: Option<String>,
}

impl ConfigForm {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            title: cfg.title.clone(),
            start: format_datetime(&cfg.start),
            end: format_datetime(&cfg.end),
            precision: cfg.precision,
            preset: Preset::Minute,
            focus: Field::Title,
            error: None,
        }
    }

    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let cfg = Config {
            title: self.title.clone(),
            start: parse_datetime("start", &self.start)?,
            end: parse_datetime("end", &self.end)?,
            precision: self.precision.min(MAX_PRECISION),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// `now` is the local wall-clock time, used by presets
    pub fn handle_key(&mut self, key: KeyEvent, now: NaiveDateTime) -> FormAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Esc => return FormAction::Close,
            KeyCode::Char('s') if ctrl => return self.submit(),
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Enter if alt && self.focus == Field::Title => self.title.push('\n'),
            KeyCode::Enter => match self.focus {
                Field::Presets => self.apply_preset(now),
                Field::Engage => return self.submit(),
                _ => self.focus = self.focus.next(),
            },
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::Backspace => match self.focus {
                Field::Precision => self.precision /= 10,
                _ => {
                    if let Some(text) = self.text_mut() {
                        text.pop();
                    }
                }
            },
            KeyCode::Char(c) if !ctrl => match self.focus {
                Field::Precision => {
                    if let Some(d) = c.to_digit(10) {
                        self.type_precision_digit(d as u8);
                    }
                }
                _ => {
                    if let Some(text) = self.text_mut() {
                        text.push(c);
                    }
                }
            },
            _ => {}
        }
        FormAction::None
    }

    fn submit(&mut self) -> FormAction {
        match self.to_config() {
            Ok(cfg) => {
                self.error = None;
                FormAction::Submit(cfg)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                FormAction::None
            }
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Title => Some(&mut self.title),
            Field::Start => Some(&mut self.start),
            Field::End => Some(&mut self.end),
            _ => None,
        }
    }

    fn adjust(&mut self, delta: i8) {
        match self.focus {
            Field::Precision => {
                self.precision = self
                    .precision
                    .saturating_add_signed(delta)
                    .min(MAX_PRECISION);
            }
            Field::Presets if delta > 0 => self.preset = self.preset.next(),
            Field::Presets => self.preset = self.preset.prev(),
            _ => {}
        }
    }

    /// Digits append like a numeric input; overflow starts over
    fn type_precision_digit(&mut self, digit: u8) {
        let candidate = self.precision as u16 * 10 + digit as u16;
        self.precision = if candidate <= MAX_PRECISION as u16 {
            candidate as u8
        } else {
            digit.min(MAX_PRECISION)
        };
    }

    fn apply_preset(&mut self, now: NaiveDateTime) {
        let (start, end) = self.preset.window_from(now);
        self.start = format_datetime(&start);
        self.end = format_datetime(&end);
        self.error = None;
    }
}
