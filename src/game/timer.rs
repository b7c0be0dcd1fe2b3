use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            origin: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

/// Elapsed time from `start` to `stop`; the reading is frozen once stopped.
pub struct Timer {
    clock: Rc<dyn Clock>,
    started_at: Option<Instant>,
    latched: Duration,
}

impl Timer {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Timer {
            clock,
            started_at: None,
            latched: Duration::ZERO,
        }
    }

    /// Restarts from zero when already running.
    pub fn start(&mut self) {
        self.started_at = Some(self.clock.now());
        self.latched = Duration::ZERO;
    }

    pub fn stop(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            self.latched = self.clock.now().saturating_duration_since(started_at);
        }
    }

    pub fn reset(&mut self) {
        self.started_at = None;
        self.latched = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started_at) => self.clock.now().saturating_duration_since(started_at),
            None => self.latched,
        }
    }
}

pub fn format_clock(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
