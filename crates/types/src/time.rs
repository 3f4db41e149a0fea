//! Deterministic time scalars.
//!
//! Two clocks exist on the chain: wall-clock time in microseconds since the
//! Unix epoch ([`TimePoint`]), and the block-slot counter in half-second
//! slots since the same epoch ([`BlockTimestamp`]). All interval math is
//! plain integer arithmetic so every node computes identical results.

use core::fmt;
use core::ops::Sub;
use serde::{Deserialize, Serialize};

/// Microsecond count, the unit of all elapsed-time comparisons.
pub type Micros = i64;

/// Seconds in a 365-day year. Does not account for leap years.
pub const SECONDS_PER_YEAR: u32 = 365 * 24 * 3600;

/// Half-second block slots per year.
pub const BLOCKS_PER_YEAR: u32 = SECONDS_PER_YEAR * 2;

/// Half-second block slots per hour.
pub const BLOCKS_PER_HOUR: u32 = 2 * 3600;

/// Half-second block slots per day.
pub const BLOCKS_PER_DAY: u32 = BLOCKS_PER_HOUR * 24;

/// Microseconds per day.
pub const USECONDS_PER_DAY: Micros = 24 * 3600 * 1_000_000;

/// Microseconds per 365-day year.
pub const USECONDS_PER_YEAR: Micros = SECONDS_PER_YEAR as Micros * 1_000_000;

/// Microseconds per half-second block slot.
pub const USECONDS_PER_SLOT: Micros = 500_000;

/// Wall-clock instant in microseconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimePoint(i64);

impl TimePoint {
    /// Construct from a microsecond count since the Unix epoch.
    pub const fn from_micros(us: i64) -> Self {
        Self(us)
    }

    /// Microseconds since the Unix epoch.
    pub const fn as_micros(self) -> i64 {
        self.0
    }

    /// Instant advanced by `us` microseconds (saturating).
    pub const fn plus_micros(self, us: Micros) -> Self {
        Self(self.0.saturating_add(us))
    }

    /// Instant advanced by `days` whole days (saturating).
    pub const fn plus_days(self, days: i64) -> Self {
        Self(self.0.saturating_add(days * USECONDS_PER_DAY))
    }
}

impl Sub for TimePoint {
    type Output = Micros;

    fn sub(self, rhs: TimePoint) -> Micros {
        self.0 - rhs.0
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}us", self.0)
    }
}

/// Block timestamp: half-second slot counter since the Unix epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BlockTimestamp(u32);

impl BlockTimestamp {
    /// Construct from a raw slot counter.
    pub const fn from_slot(slot: u32) -> Self {
        Self(slot)
    }

    /// Raw slot counter.
    pub const fn slot(self) -> u32 {
        self.0
    }

    /// Wall-clock instant at the start of this slot.
    pub const fn to_time_point(self) -> TimePoint {
        TimePoint::from_micros(self.0 as i64 * USECONDS_PER_SLOT)
    }

    /// Slot containing the given wall-clock instant.
    pub const fn from_time_point(tp: TimePoint) -> Self {
        Self((tp.as_micros() / USECONDS_PER_SLOT) as u32)
    }
}

impl fmt::Display for BlockTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0)
    }
}
