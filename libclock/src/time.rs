//! Time sources: a monotonic counter for animation and the local wall clock for the hands.

use std::{cell::Cell, time::Instant};

use chrono::{Local, Timelike};

/// Monotonic time in seconds since an arbitrary, fixed origin.
pub trait TimeSource {
    fn now(&self) -> f64;
}

/// High resolution monotonic counter.
///
/// The origin is sampled once on construction and never again, every reading is
/// the counter's distance from it normalized to seconds.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicSource {
    origin: Instant,
}

impl MonotonicSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicSource {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Time source that only moves when told to. Used to replay animations.
#[derive(Debug, Default)]
pub struct ManualSource {
    now: Cell<f64>,
}

impl ManualSource {
    pub fn new(start: f64) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl TimeSource for ManualSource {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::rc::Rc<T> {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

/// Wall clock reading with millisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32, second: u32, millisecond: u32) -> Self {
        Self {
            hour,
            minute,
            second,
            millisecond,
        }
    }

    pub fn from_timelike<T: Timelike>(time: &T) -> Self {
        // Leap seconds show up as nanosecond values past one second.
        let millisecond = (time.nanosecond() / 1_000_000).min(999);

        Self::new(time.hour(), time.minute(), time.second(), millisecond)
    }
}

/// Source of the wall clock time shown by the hands, sampled fresh every frame.
pub trait WallClock {
    fn now(&self) -> ClockTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalWallClock;

impl WallClock for LocalWallClock {
    fn now(&self) -> ClockTime {
        ClockTime::from_timelike(&Local::now())
    }
}

/// Wall clock frozen at a single reading.
#[derive(Debug, Clone, Copy)]
pub struct FixedWallClock(pub ClockTime);

impl WallClock for FixedWallClock {
    fn now(&self) -> ClockTime {
        self.0
    }
}
