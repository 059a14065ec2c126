//! Time-driven interpolation used for the startup wind-up of the hands.
//!
//! The engine owns exactly one [`AnimationVariable`]. Its value is a pure
//! function of the time elapsed since the scheduled start, so replaying the same
//! timestamps always yields the same values regardless of frame rate.

use tracing::debug;

use crate::time::TimeSource;

/// Seconds taken by the wind-up transition.
pub const WIND_UP_DURATION: f64 = 5.0;
/// Fraction of the transition spent accelerating.
pub const WIND_UP_ACCELERATION_RATIO: f64 = 0.2;
/// Fraction of the transition spent decelerating.
pub const WIND_UP_DECELERATION_RATIO: f64 = 0.2;

/// Transition with a trapezoidal velocity profile: constant acceleration from
/// rest, a cruise at peak velocity, then constant deceleration back to rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelerateDecelerate {
    pub duration: f64,
    pub final_value: f64,
    pub acceleration_ratio: f64,
    pub deceleration_ratio: f64,
}

impl AccelerateDecelerate {
    pub fn new(
        duration: f64,
        final_value: f64,
        acceleration_ratio: f64,
        deceleration_ratio: f64,
    ) -> Self {
        debug_assert!(duration > 0.0, "transition duration must be positive");
        debug_assert!(
            acceleration_ratio >= 0.0
                && deceleration_ratio >= 0.0
                && acceleration_ratio + deceleration_ratio <= 1.0,
            "acceleration and deceleration ratios must fit in the duration"
        );

        Self {
            duration,
            final_value,
            acceleration_ratio,
            deceleration_ratio,
        }
    }

    /// Value of a variable starting at `initial` after `elapsed` seconds.
    ///
    /// Negative elapsed time clamps to `initial`, anything past the duration
    /// clamps to the final value.
    pub fn value_at(&self, initial: f64, elapsed: f64) -> f64 {
        if elapsed <= 0.0 {
            return initial;
        }
        if elapsed >= self.duration {
            return self.final_value;
        }

        initial + (self.final_value - initial) * self.progress(elapsed / self.duration)
    }

    /// Normalized distance covered at normalized time `t` in `0..=1`.
    fn progress(&self, t: f64) -> f64 {
        let a = self.acceleration_ratio;
        let d = self.deceleration_ratio;
        let peak_velocity = 1.0 / (1.0 - a / 2.0 - d / 2.0);

        if t < a {
            0.5 * peak_velocity * t * t / a
        } else if t <= 1.0 - d {
            peak_velocity * (t - a / 2.0)
        } else {
            let remaining = 1.0 - t;
            1.0 - 0.5 * peak_velocity * remaining * remaining / d
        }
    }
}

impl Default for AccelerateDecelerate {
    fn default() -> Self {
        Self::new(
            WIND_UP_DURATION,
            1.0,
            WIND_UP_ACCELERATION_RATIO,
            WIND_UP_DECELERATION_RATIO,
        )
    }
}

/// A scalar moved by one scheduled transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationVariable {
    initial: f64,
    value: f64,
    start: f64,
    transition: AccelerateDecelerate,
}

impl AnimationVariable {
    pub fn new(initial: f64, start: f64, transition: AccelerateDecelerate) -> Self {
        Self {
            initial,
            value: initial,
            start,
            transition,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_complete(&self) -> bool {
        self.value >= self.transition.final_value
    }

    fn update(&mut self, now: f64) -> f64 {
        self.value = self.transition.value_at(self.initial, now - self.start);
        self.value
    }
}

pub struct AnimationEngine<T: TimeSource> {
    source: T,
    variable: Option<AnimationVariable>,
}

impl<T: TimeSource> AnimationEngine<T> {
    pub fn new(source: T) -> Self {
        Self {
            source,
            variable: None,
        }
    }

    /// Current reading of the engine's monotonic time source, in seconds.
    pub fn now(&self) -> f64 {
        self.source.now()
    }

    /// Creates the wind-up variable at 0.0 and schedules its transition to 1.0
    /// starting at `start_time`. Call once, before the first frame.
    pub fn schedule(&mut self, start_time: f64) {
        debug_assert!(self.variable.is_none(), "wind-up animation scheduled twice");

        debug!(start_time, duration = WIND_UP_DURATION, "scheduling wind-up animation");
        self.variable = Some(AnimationVariable::new(
            0.0,
            start_time,
            AccelerateDecelerate::default(),
        ));
    }

    /// Recomputes the variable for `now` and returns its value.
    pub fn advance(&mut self, now: f64) -> f64 {
        match &mut self.variable {
            Some(variable) => variable.update(now),
            None => 0.0,
        }
    }

    /// Value computed by the last [`advance`](Self::advance).
    pub fn current_value(&self) -> f64 {
        self.variable.map_or(0.0, |variable| variable.value())
    }

    pub fn variable(&self) -> Option<&AnimationVariable> {
        self.variable.as_ref()
    }
}
