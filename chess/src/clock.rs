//! Chess clock
//!
//! The clock is advisory: it never affects move legality, it only ends the game when one of the
//! sides runs out of time. Time is counted in whole seconds and advanced by explicit
//! [`Clock::tick()`] calls, see [`Session`](crate::session::Session) for a clock driven by a
//! background thread.

use crate::types::Color;

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Time control settings
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeControl {
    /// Initial time for each side, in minutes
    pub minutes: u32,
    /// Seconds added to the mover's clock after each move
    pub increment: u32,
}

impl TimeControl {
    pub const fn new(minutes: u32, increment: u32) -> Self {
        TimeControl { minutes, increment }
    }

    /// Initial time for each side, in seconds
    pub const fn initial_secs(&self) -> u32 {
        self.minutes.saturating_mul(60)
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        TimeControl::new(10, 0)
    }
}

/// Remaining time on a clock, formatted as `m:ss`
///
/// # Example
///
/// ```
/// # use chessrules::clock::ClockTime;
/// #
/// assert_eq!(ClockTime::from_secs(600).to_string(), "10:00");
/// assert_eq!(ClockTime::from_secs(65).to_string(), "1:05");
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u32);

impl ClockTime {
    pub const fn from_secs(secs: u32) -> Self {
        ClockTime(secs)
    }

    pub const fn as_secs(&self) -> u32 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Per-side countdown clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    remaining: [u32; 2],
    increment: u32,
    running: bool,
}

impl Clock {
    /// Creates a stopped clock with the initial time of `tc` on both sides
    pub fn new(tc: TimeControl) -> Self {
        let secs = tc.initial_secs();
        Clock {
            remaining: [secs, secs],
            increment: tc.increment,
            running: false,
        }
    }

    pub fn remaining(&self, c: Color) -> ClockTime {
        ClockTime(self.remaining[c.index()])
    }

    pub fn increment(&self) -> u32 {
        self.increment
    }

    pub fn set_increment(&mut self, secs: u32) {
        self.increment = secs;
    }

    /// Sets the remaining time of both sides to `minutes`
    ///
    /// The increment and the running state are kept.
    pub fn set_minutes(&mut self, minutes: u32) {
        let secs = TimeControl::new(minutes, self.increment).initial_secs();
        self.remaining = [secs, secs];
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Removes one second from the clock of `c`
    ///
    /// Returns `true` if the time of `c` has expired. The time never goes below zero.
    pub fn tick(&mut self, c: Color) -> bool {
        let rem = &mut self.remaining[c.index()];
        *rem = rem.saturating_sub(1);
        *rem == 0
    }

    /// Adds the increment to the clock of `c`
    pub fn add_increment(&mut self, c: Color) {
        let rem = &mut self.remaining[c.index()];
        *rem = rem.saturating_add(self.increment);
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock::new(TimeControl::default())
    }
}
