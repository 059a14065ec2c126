//! Hand angles in degrees, clockwise from 12 o'clock.

use crate::time::ClockTime;

const DEGREES_PER_SECOND: f32 = 6.0;
const DEGREES_PER_MINUTE: f32 = 6.0;
const DEGREES_PER_HOUR: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandAngles {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

impl HandAngles {
    pub fn from_time(time: ClockTime) -> Self {
        let second = (time.second as f32 + time.millisecond as f32 / 1000.0) * DEGREES_PER_SECOND;
        let minute = time.minute as f32 * DEGREES_PER_MINUTE + second / 60.0;
        let hour = (time.hour % 12) as f32 * DEGREES_PER_HOUR + minute / 12.0;

        Self {
            hour,
            minute,
            second,
        }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self {
            hour: self.hour * factor,
            minute: self.minute * factor,
            second: self.second * factor,
        }
    }
}

/// Tracks one hand across frames so that crossing 12 o'clock keeps moving forward.
///
/// Every time the raw angle comes in below the previous frame's raw angle the hand
/// has wrapped, and all later angles are lifted by another full turn.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandContinuity {
    previous: Option<f32>,
    turns: u32,
}

impl HandContinuity {
    pub fn adjust(&mut self, raw: f32) -> f32 {
        if let Some(previous) = self.previous {
            if raw < previous {
                self.turns += 1;
            }
        }
        self.previous = Some(raw);

        raw + 360.0 * self.turns as f32
    }

    pub fn previous(&self) -> Option<f32> {
        self.previous
    }
}

/// Continuity state for all three hands, kept for the lifetime of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindUp {
    hour: HandContinuity,
    minute: HandContinuity,
    second: HandContinuity,
}

impl WindUp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Angles to draw for `raw` at the given animation progress.
    ///
    /// While the animation runs the wrap-adjusted angles are scaled by its value,
    /// sweeping the hands out from 12 o'clock. Once it completes the raw angles
    /// are returned untouched and the continuity state is left alone.
    pub fn blend(&mut self, raw: HandAngles, animation_value: f64) -> HandAngles {
        if animation_value >= 1.0 {
            return raw;
        }

        let adjusted = HandAngles {
            hour: self.hour.adjust(raw.hour),
            minute: self.minute.adjust(raw.minute),
            second: self.second.adjust(raw.second),
        };

        adjusted.scaled(animation_value as f32)
    }

    pub fn previous(&self) -> Option<HandAngles> {
        Some(HandAngles {
            hour: self.hour.previous()?,
            minute: self.minute.previous()?,
            second: self.second.previous()?,
        })
    }
}
