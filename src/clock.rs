use chrono::NaiveDateTime;
use std::time::Instant;

/// Source of the simulation's current time.
///
/// Injected everywhere time is read so schedule maths can be replayed at any
/// chosen moment in tests and demos.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    #[must_use]
    pub const fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}

/// Clock anchored at an arbitrary origin that advances with real time.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    origin: NaiveDateTime,
    started: Instant,
}

impl SimulationClock {
    #[must_use]
    pub fn starting_at(origin: NaiveDateTime) -> Self {
        Self {
            origin,
            started: Instant::now(),
        }
    }
}

impl Clock for SimulationClock {
    fn now(&self) -> NaiveDateTime {
        let elapsed =
            chrono::Duration::from_std(self.started.elapsed()).unwrap_or(chrono::Duration::MAX);
        self.origin + elapsed
    }
}
