use crate::outcome::Halt;

use core::fmt;
use std::error::Error;

/// The reason a race ended without a winner.
///
/// Errors returned by individual racers are never part of this type: a racer
/// that fails is disqualified and the race goes on without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RaceError {
    /// The race was started without any racers.
    NoRacers,
    /// The configured timeout elapsed before any racer succeeded.
    Timeout,
    /// The kill signal was asserted before any racer succeeded.
    Killed,
    /// Every racer was disqualified.
    Exhausted,
}

impl RaceError {
    /// Returns `true` if the race was stopped by a timeout or kill signal.
    pub fn is_halt(&self) -> bool {
        matches!(self, RaceError::Timeout | RaceError::Killed)
    }
}

impl From<Halt> for RaceError {
    fn from(halt: Halt) -> Self {
        match halt {
            Halt::Timeout => RaceError::Timeout,
            Halt::Killed => RaceError::Killed,
        }
    }
}

impl fmt::Display for RaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceError::NoRacers => f.write_str("no racers"),
            RaceError::Timeout => f.write_str("all racers timed out"),
            RaceError::Killed => f.write_str("all racers were killed"),
            RaceError::Exhausted => f.write_str("all racers were disqualified"),
        }
    }
}

impl Error for RaceError {}
