//! # Time of Day
//!
//! A wrapping 24 hour clock advanced by every world tick, and the day-phase
//! bands that drive the lighting pass.

use crate::config::MAX_DARKNESS;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Coarse band of the day, classified by hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPhase {
    /// 21:00 to 04:59
    Night,
    /// 05:00 to 06:59
    Dawn,
    /// 07:00 to 18:59
    Day,
    /// 19:00 to 20:59
    Dusk,
}

/// Wall-clock time inside the game world.
///
/// # Examples
///
/// ```
/// use wildwood::{DayPhase, Time};
///
/// let mut time = Time::new(23, 50);
/// time += 20;
/// assert_eq!(time, Time::new(0, 10));
/// assert_eq!(time.phase(), DayPhase::Night);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    hour: u32,
    minute: u32,
}

impl Time {
    /// Creates a time, normalising out-of-range components.
    pub fn new(hour: u32, minute: u32) -> Self {
        let total = ((hour % 24) * 60 + minute % MINUTES_PER_DAY) % MINUTES_PER_DAY;
        Self {
            hour: total / 60,
            minute: total % 60,
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Advances the clock, carrying minutes into hours modulo 24.
    pub fn advance(&mut self, minutes: u32) {
        let total = (self.minutes_since_midnight() + minutes % MINUTES_PER_DAY) % MINUTES_PER_DAY;
        self.hour = total / 60;
        self.minute = total % 60;
    }

    /// Minutes since midnight.
    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    /// Fraction of the day that has passed, in `[0, 1)`.
    pub fn fraction_of_day(&self) -> f32 {
        self.minutes_since_midnight() as f32 / MINUTES_PER_DAY as f32
    }

    pub fn phase(&self) -> DayPhase {
        match self.hour {
            5..=6 => DayPhase::Dawn,
            7..=18 => DayPhase::Day,
            19..=20 => DayPhase::Dusk,
            _ => DayPhase::Night,
        }
    }

    /// Background alpha of the lightmap.
    ///
    /// Zero during the day, [`MAX_DARKNESS`] at night, and a linear ramp
    /// across dawn (getting lighter) and dusk (getting darker).
    pub fn darkness(&self) -> f32 {
        let minutes = self.minutes_since_midnight() as f32;
        match self.phase() {
            DayPhase::Day => 0.0,
            DayPhase::Night => MAX_DARKNESS,
            DayPhase::Dawn => {
                let progress = (minutes - 5.0 * 60.0) / 120.0;
                MAX_DARKNESS * (1.0 - progress)
            }
            DayPhase::Dusk => {
                let progress = (minutes - 19.0 * 60.0) / 120.0;
                MAX_DARKNESS * progress
            }
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new(8, 0)
    }
}

impl AddAssign<u32> for Time {
    fn add_assign(&mut self, minutes: u32) {
        self.advance(minutes);
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
