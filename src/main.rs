use chrono::{Local, TimeZone};
use chronocrunch::{
    app::{App, Control},
    app_dirs::AppDirs,
    clock::{Clock, SystemClock},
    config::{parse_datetime, Config, ConfigError, ConfigStore, FileConfigStore},
    duration::DurationStyle,
    logging,
    presets::Preset,
    runtime::{AppEvent, CrosstermEventSource, EventSource, Runner},
    sampler::{Sample, Sampler},
    share::{initial_config, to_query},
    Status, TimeWindow,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use serde::Serialize;
use std::{
    error::Error,
    io::{self, stdin, Stdout},
    path::PathBuf,
    time::Duration,
};

const TICK_RATE_MS: u64 = 50;

/// terminal countdown tracker between two instants
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Tracks progress between a start and an end time: percent complete, elapsed and remaining time, refreshed continuously. Without arguments it tracks the current year."
)]
pub struct Cli {
    /// title to display; `\n` starts a new line
    #[clap(short = 't', long)]
    title: Option<String>,

    /// start of the window, local time (YYYY-MM-DDTHH:MM)
    #[clap(short = 's', long)]
    start: Option<String>,

    /// end of the window, local time (YYYY-MM-DDTHH:MM)
    #[clap(short = 'e', long)]
    end: Option<String>,

    /// decimal places shown for the percentage
    #[clap(short = 'p', long, value_parser = clap::value_parser!(u8).range(0..=14))]
    precision: Option<u8>,

    /// load a shared configuration (title=…&start=…&end=…&precision=…)
    #[clap(short = 'q', long)]
    query: Option<String>,

    /// start a window of this length now
    #[clap(long, value_enum)]
    preset: Option<Preset>,

    /// configuration file to load and save
    #[clap(long)]
    config: Option<PathBuf>,

    /// do not save the configuration on exit
    #[clap(long)]
    no_save: bool,

    /// show durations as days without folding them into years
    #[clap(long)]
    hide_years: bool,

    /// milliseconds between samples
    #[clap(long, default_value_t = TICK_RATE_MS, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// print a single sample and exit
    #[clap(long)]
    once: bool,

    /// print a single sample as JSON and exit
    #[clap(long)]
    json: bool,

    /// evaluate at this local time instead of now (implies --once)
    #[clap(long)]
    at: Option<String>,

    /// print the share query for the configuration and exit
    #[clap(long)]
    share: bool,
}

impl Cli {
    fn store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    fn style(&self) -> DurationStyle {
        DurationStyle {
            show_years: !self.hide_years,
        }
    }

    fn is_one_shot(&self) -> bool {
        self.once || self.json || self.at.is_some()
    }

    /// Stored config, then share query, then preset, then individual flags.
    /// Returns the config and whether the config panel should open first.
    fn resolve_config(&self, stored: Config) -> Result<(Config, bool), ConfigError> {
        let initial = initial_config(self.query.as_deref(), stored);
        let mut config = initial.config;

        if let Some(preset) = self.preset {
            preset.apply(&mut config, Local::now().naive_local());
        }
        if let Some(title) = &self.title {
            config.title = title.replace("\\n", "\n");
        }
        if let Some(start) = &self.start {
            config.start = parse_datetime("start", start)?;
        }
        if let Some(end) = &self.end {
            config.end = parse_datetime("end", end)?;
        }
        if let Some(precision) = self.precision {
            config.set_precision(precision.into());
        }

        config.validate()?;
        Ok((config, initial.open_panel))
    }
}

/// One-shot output, text or JSON
#[derive(Debug, Serialize)]
struct Report<'a> {
    title: &'a str,
    window: TimeWindow,
    #[serde(flatten)]
    sample: &'a Sample,
}

fn render_report(
    config: &Config,
    window: TimeWindow,
    sample: &Sample,
    json: bool,
) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string_pretty(&Report {
            title: &config.title,
            window,
            sample,
        });
    }

    let elapsed_label = match sample.progress.status {
        Status::Pending => "starts in:",
        Status::Active | Status::Complete => "elapsed:",
    };
    let rows = [
        ("status:", sample.progress.status.to_string()),
        ("percent:", format!("{}%", sample.percent_text)),
        (elapsed_label, sample.elapsed_text.clone()),
        ("remaining:", sample.remaining_text.clone()),
    ];

    let mut out = config.title_lines().collect::<Vec<_>>().join(" ");
    for (label, value) in rows {
        out.push_str(&format!("\n{label:<11}{value}"));
    }
    Ok(out)
}

fn print_once(cli: &Cli, config: &Config) -> Result<(), Box<dyn Error>> {
    let now = match &cli.at {
        Some(at) => {
            let at = parse_datetime("at", at)?;
            Local
                .from_local_datetime(&at)
                .earliest()
                .ok_or(ConfigError::NonexistentLocalTime {
                    field: "at",
                    value: at,
                })?
                .timestamp_millis()
        }
        None => SystemClock.now_ms(),
    };

    let window = config.window()?;
    let mut sampler = Sampler::new(window, config.precision, cli.style());
    if let Some(sample) = sampler.sample(now) {
        println!("{}", render_report(config, window, sample, cli.json)?);
    }
    Ok(())
}

/// Raw mode and the alternate screen, restored on drop so every exit path
/// leaves the terminal usable
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = logging::init(&path) {
            eprintln!("logging disabled: {e}");
        }
    }

    let store = cli.store();
    let (config, open_panel) = match cli.resolve_config(store.load()) {
        Ok(resolved) => resolved,
        Err(e) => Cli::command().error(ErrorKind::ValueValidation, e).exit(),
    };

    if cli.share {
        println!("?{}", to_query(&config));
        return Ok(());
    }

    if cli.is_one_shot() {
        return print_once(&cli, &config);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(config, open_panel, cli.style(), Box::new(SystemClock))?;
    {
        let mut session = TerminalSession::new()?;
        let mut runner = Runner::new(
            CrosstermEventSource::new(),
            Duration::from_millis(cli.tick_ms),
        );
        start_tui(&mut session.terminal, &mut app, &mut runner)?;
    }

    if !cli.no_save {
        if let Err(e) = store.save(&app.config) {
            tracing::error!(path = %store.path().display(), error = %e, "failed to save config");
            eprintln!("Failed to save config: {e}");
        }
    }

    Ok(())
}

fn start_tui<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<E>,
) -> Result<(), Box<dyn Error>> {
    loop {
        match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => match app.handle_key(key) {
                Control::Quit => break,
                Control::Reschedule => runner.reschedule(),
                Control::Continue => {}
            },
        }

        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
