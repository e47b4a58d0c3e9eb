use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source. Reads crossterm events on a helper thread. The
/// thread stays blocked in `event::read` after the receiver is dropped and
/// only exits once the next terminal event fails to send.
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // Release/repeat events would double every keystroke on some platforms
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    Some(AppEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => Some(AppEvent::Resize),
                Ok(_) => None,
                Err(e) => {
                    tracing::error!(error = %e, "terminal event stream failed");
                    break;
                }
            };

            if let Some(ev) = forwarded {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Any channel of app events is a source; tests feed one directly
impl EventSource for Receiver<AppEvent> {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        Receiver::recv_timeout(self, timeout)
    }
}

/// Drives the sampling cadence: hands out input events as they arrive and a
/// `Tick` whenever the tick deadline passes. Ticks are scheduled against a
/// deadline, so a burst of input delays them by at most one event.
pub struct Runner<E: EventSource> {
    event_source: E,
    interval: Duration,
    next_tick: Instant,
}

impl<E: EventSource> Runner<E> {
    /// The first step ticks immediately, then every `interval`
    pub fn new(event_source: E, interval: Duration) -> Self {
        Self {
            event_source,
            interval,
            next_tick: Instant::now(),
        }
    }

    /// Drop the pending schedule and tick on the next step
    pub fn reschedule(&mut self) {
        self.next_tick = Instant::now();
    }

    /// Blocks until the next event or the tick deadline, whichever is first
    pub fn step(&mut self) -> AppEvent {
        let now = Instant::now();
        if now >= self.next_tick {
            return self.tick(now);
        }

        match self.event_source.recv_timeout(self.next_tick - now) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => self.tick(Instant::now()),
            Err(RecvTimeoutError::Disconnected) => {
                // No more input; keep the cadence without spinning
                std::thread::sleep(self.next_tick.saturating_duration_since(Instant::now()));
                self.tick(Instant::now())
            }
        }
    }

    fn tick(&mut self, now: Instant) -> AppEvent {
        self.next_tick = now + self.interval;
        AppEvent::Tick
    }
}
