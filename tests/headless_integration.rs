use std::sync::mpsc;
use std::time::Duration;

use chrono::{Local, TimeZone};
use chronocrunch::app::{App, Control, Mode};
use chronocrunch::clock::ManualClock;
use chronocrunch::config::{format_datetime, parse_datetime, Config};
use chronocrunch::duration::DurationStyle;
use chronocrunch::runtime::{AppEvent, Runner};
use chronocrunch::Status;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn local_ms(raw: &str) -> i64 {
    let naive = parse_datetime("start", raw).unwrap();
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap()
        .timestamp_millis()
}

fn config(start: &str, end: &str) -> Config {
    Config {
        title: "HEADLESS".into(),
        start: parse_datetime("start", start).unwrap(),
        end: parse_datetime("end", end).unwrap(),
        precision: 2,
    }
}

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn send_text(tx: &mpsc::Sender<AppEvent>, text: &str) {
    for c in text.chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }
}

fn clear_field(tx: &mpsc::Sender<AppEvent>) {
    for _ in 0.."YYYY-MM-DDTHH:MM".len() {
        tx.send(key(KeyCode::Backspace)).unwrap();
    }
}

/// Drive the app until a key handler returns something other than Continue
fn drive(app: &mut App, runner: &mut Runner<mpsc::Receiver<AppEvent>>) -> Control {
    for _ in 0..500u32 {
        match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Key(k) => match app.handle_key(k) {
                Control::Continue => {}
                Control::Reschedule => {
                    runner.reschedule();
                    return Control::Reschedule;
                }
                Control::Quit => return Control::Quit,
            },
        }
    }
    Control::Continue
}

// Ticks pick up the clock as it moves through the window
#[test]
fn headless_status_follows_the_clock() {
    let cfg = config("2024-01-10T00:00", "2024-01-10T01:00");
    let start = local_ms("2024-01-10T00:00");
    let clock = ManualClock::new(start - 60_000);
    let mut app =
        App::new(cfg, false, DurationStyle::default(), Box::new(clock.clone())).unwrap();

    let (_tx, rx) = mpsc::channel::<AppEvent>();
    let mut runner = Runner::new(rx, Duration::from_millis(2));

    assert_eq!(runner.step(), AppEvent::Tick);
    app.on_tick();
    let sample = app.sample().unwrap();
    assert_eq!(sample.progress.status, Status::Pending);
    assert_eq!(sample.elapsed_label(), "Starts In");
    assert_eq!(sample.elapsed_text, "0d 00h 01m 00s");

    clock.set(start + 30 * 60_000);
    assert_eq!(runner.step(), AppEvent::Tick);
    app.on_tick();
    let sample = app.sample().unwrap();
    assert_eq!(sample.progress.status, Status::Active);
    assert_eq!(sample.percent_text, "50.00");
    assert_eq!(sample.remaining_text, "0d 00h 30m 00s");

    clock.set(start + 2 * 3_600_000);
    assert_eq!(runner.step(), AppEvent::Tick);
    app.on_tick();
    let sample = app.sample().unwrap();
    assert_eq!(sample.progress.status, Status::Complete);
    assert_eq!(sample.percent_text, "100.00");
    assert_eq!(sample.remaining_text, "00:00:00");
}

// Editing the window through the panel replaces the tracker
#[test]
fn headless_reconfigure_through_panel() {
    let cfg = config("2024-01-10T00:00", "2024-01-11T00:00");
    let clock = ManualClock::new(local_ms("2024-01-10T12:00"));
    let mut app =
        App::new(cfg, false, DurationStyle::default(), Box::new(clock.clone())).unwrap();
    assert_eq!(app.sample().unwrap().progress.status, Status::Active);

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(rx, Duration::from_secs(60));

    tx.send(key(KeyCode::Char('c'))).unwrap();
    tx.send(key(KeyCode::Tab)).unwrap();
    clear_field(&tx);
    send_text(&tx, "2030-01-01T00:00");
    tx.send(key(KeyCode::Tab)).unwrap();
    clear_field(&tx);
    send_text(&tx, "2030-01-02T00:00");
    tx.send(AppEvent::Key(KeyEvent::new(
        KeyCode::Char('s'),
        KeyModifiers::CONTROL,
    )))
    .unwrap();

    assert_eq!(drive(&mut app, &mut runner), Control::Reschedule);
    assert_eq!(app.mode, Mode::Tracking);
    assert_eq!(format_datetime(&app.config.start), "2030-01-01T00:00");
    assert_eq!(format_datetime(&app.config.end), "2030-01-02T00:00");
    assert!(!app.sampler().is_cancelled());
    assert_eq!(app.sampler().window().start, local_ms("2030-01-01T00:00"));
    assert_eq!(app.sample().unwrap().progress.status, Status::Pending);

    // The rescheduled runner ticks straight away
    assert_eq!(runner.step(), AppEvent::Tick);
}

#[test]
fn headless_invalid_submission_keeps_panel_open() {
    let cfg = config("2024-01-10T00:00", "2024-01-11T00:00");
    let clock = ManualClock::new(local_ms("2024-01-10T12:00"));
    let mut app = App::new(cfg.clone(), false, DurationStyle::default(), Box::new(clock)).unwrap();

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(rx, Duration::from_secs(60));

    tx.send(key(KeyCode::Char('c'))).unwrap();
    tx.send(key(KeyCode::Tab)).unwrap();
    clear_field(&tx);
    send_text(&tx, "soon");
    tx.send(AppEvent::Key(KeyEvent::new(
        KeyCode::Char('s'),
        KeyModifiers::CONTROL,
    )))
    .unwrap();
    tx.send(key(KeyCode::Esc)).unwrap();
    tx.send(key(KeyCode::Char('q'))).unwrap();

    // Step until the submission has been handled, then inspect the panel
    for _ in 0..100u32 {
        if let AppEvent::Key(k) = runner.step() {
            let ctrl_s = k.code == KeyCode::Char('s') && k.modifiers == KeyModifiers::CONTROL;
            assert_eq!(app.handle_key(k), Control::Continue);
            if ctrl_s {
                break;
            }
        }
    }
    match &app.mode {
        Mode::Configuring(form) => {
            assert!(form.error.as_deref().unwrap_or("").contains("soon"));
        }
        Mode::Tracking => panic!("panel should stay open"),
    }
    assert_eq!(app.config, cfg);

    assert_eq!(drive(&mut app, &mut runner), Control::Quit);
    assert_eq!(app.mode, Mode::Tracking);
}

#[test]
fn headless_precision_keys_rerender_sample() {
    let cfg = config("2024-01-10T00:00", "2024-01-10T03:00");
    let clock = ManualClock::new(local_ms("2024-01-10T01:00"));
    let mut app = App::new(cfg, false, DurationStyle::default(), Box::new(clock)).unwrap();
    assert_eq!(app.sample().unwrap().percent_text, "33.33");

    app.handle_key(KeyEvent::new(KeyCode::Char('+'), KeyModifiers::NONE));
    assert_eq!(app.sample().unwrap().percent_text, "33.333");

    for _ in 0..10 {
        app.handle_key(KeyEvent::new(KeyCode::Char('-'), KeyModifiers::NONE));
    }
    assert_eq!(app.config.precision, 0);
    assert_eq!(app.sample().unwrap().percent_text, "33");
}
