//! Timestamps and time bases.

use crate::rational::Rational;
use std::fmt;

/// Unit of a timestamp, in seconds per tick.
///
/// 1001/30000 counts NTSC frames, 1/90000 is the MPEG clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeBase(pub Rational);

impl TimeBase {
    /// Create a new time base from numerator and denominator.
    pub fn new(num: i64, den: i64) -> Self {
        Self(Rational::new(num, den))
    }

    /// Standard MPEG time base (1/90000).
    pub const MPEG: Self = Self(Rational { num: 1, den: 90000 });
}

impl Default for TimeBase {
    fn default() -> Self {
        Self::MPEG
    }
}

impl From<Rational> for TimeBase {
    fn from(r: Rational) -> Self {
        Self(r)
    }
}

impl fmt::Display for TimeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tick count in a time base, or undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    /// Tick count, [`Timestamp::NONE`] when undefined.
    pub value: i64,
    /// Unit of `value`.
    pub time_base: TimeBase,
}

impl Timestamp {
    /// Sentinel for an undefined timestamp.
    pub const NONE: i64 = i64::MIN;

    /// Create a new timestamp.
    pub fn new(value: i64, time_base: TimeBase) -> Self {
        Self { value, time_base }
    }

    /// Create an undefined timestamp.
    pub fn none() -> Self {
        Self::new(Self::NONE, TimeBase::default())
    }

    /// Check if this timestamp is defined.
    pub fn is_valid(&self) -> bool {
        self.value != Self::NONE
    }

    /// The tick count, or `None` when undefined.
    pub fn get(&self) -> Option<i64> {
        self.is_valid().then_some(self.value)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(v) => write!(f, "{}@{}", v, self.time_base),
            None => write!(f, "NONE"),
        }
    }
}

/// Frame duration in ticks of a time base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration {
    /// Tick count.
    pub value: i64,
    /// Unit of `value`.
    pub time_base: TimeBase,
}

impl Duration {
    /// Create a new duration.
    pub fn new(value: i64, time_base: TimeBase) -> Self {
        Self { value, time_base }
    }

    /// Create a zero duration.
    pub fn zero() -> Self {
        Self::new(0, TimeBase::default())
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::zero()
    }
}
