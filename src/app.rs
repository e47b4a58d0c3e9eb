use chrono::{Local, NaiveDateTime, TimeZone};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::clock::Clock;
use crate::config::{Config, ConfigError, MAX_PRECISION};
use crate::duration::DurationStyle;
use crate::form::{ConfigForm, FormAction};
use crate::sampler::{Sample, Sampler};

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Tracking,
    Configuring(ConfigForm),
}

/// What the event loop should do after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// The configuration changed; restart the tick schedule
    Reschedule,
    Quit,
}

pub struct App {
    pub config: Config,
    pub mode: Mode,
    pub show_share: bool,
    sampler: Sampler,
    clock: Box<dyn Clock>,
}

impl App {
    pub fn new(
        config: Config,
        open_panel: bool,
        style: DurationStyle,
        clock: Box<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let sampler = Sampler::new(config.window()?, config.precision, style);
        let mode = if open_panel {
            Mode::Configuring(ConfigForm::from_config(&config))
        } else {
            Mode::Tracking
        };

        let mut app = Self {
            config,
            mode,
            show_share: false,
            sampler,
            clock,
        };
        app.on_tick();
        Ok(app)
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Currently displayed result
    pub fn sample(&self) -> Option<&Sample> {
        self.sampler.latest()
    }

    pub fn style(&self) -> DurationStyle {
        self.sampler.style()
    }

    pub fn on_tick(&mut self) {
        let now = self.clock.now_ms();
        self.sampler.sample(now);
    }

    /// Swap in a new configuration. The running sampler is cancelled before
    /// its replacement takes over the display.
    pub fn apply_config(&mut self, config: Config) -> Result<(), ConfigError> {
        let window = config.window()?;
        let style = self.sampler.style();

        self.sampler.cancel();
        self.sampler = Sampler::new(window, config.precision, style);
        tracing::info!(
            start = window.start,
            end = window.end,
            precision = config.precision,
            "configuration applied"
        );
        self.config = config;
        self.on_tick();
        Ok(())
    }

    pub fn open_config(&mut self) {
        self.mode = Mode::Configuring(ConfigForm::from_config(&self.config));
    }

    pub fn is_configuring(&self) -> bool {
        matches!(self.mode, Mode::Configuring(_))
    }

    fn local_now(&self) -> NaiveDateTime {
        Local
            .timestamp_millis_opt(self.clock.now_ms())
            .single()
            .map(|dt| dt.naive_local())
            .unwrap_or_else(|| Local::now().naive_local())
    }

    fn set_precision(&mut self, precision: u8) {
        self.config.precision = precision.min(MAX_PRECISION);
        self.sampler.set_precision(self.config.precision);
        self.on_tick();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        if self.mode == Mode::Tracking {
            return self.handle_tracking_key(key);
        }

        let now = self.local_now();
        let action = match &mut self.mode {
            Mode::Configuring(form) => form.handle_key(key, now),
            Mode::Tracking => FormAction::None,
        };

        match action {
            FormAction::None => Control::Continue,
            FormAction::Close => {
                self.mode = Mode::Tracking;
                Control::Continue
            }
            FormAction::Submit(config) => match self.apply_config(config) {
                Ok(()) => {
                    self.mode = Mode::Tracking;
                    Control::Reschedule
                }
                Err(e) => {
                    if let Mode::Configuring(form) = &mut self.mode {
                        form.error = Some(e.to_string());
                    }
                    Control::Continue
                }
            },
        }
    }

    fn handle_tracking_key(&mut self, key: KeyEvent) -> Control {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Control::Quit,
            KeyCode::Char('c') => self.open_config(),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.set_precision(self.config.precision.saturating_add(1))
            }
            KeyCode::Char('-') => self.set_precision(self.config.precision.saturating_sub(1)),
            KeyCode::Char('y') => {
                let style = DurationStyle {
                    show_years: !self.sampler.style().show_years,
                };
                self.sampler.set_style(style);
                self.on_tick();
            }
            KeyCode::Char('s') => self.show_share = !self.show_share,
            _ => {}
        }
        Control::Continue
    }
}
