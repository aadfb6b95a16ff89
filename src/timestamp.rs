//! Gregorian-epoch timestamps and the system clock source.

use std::{fmt, ops, time};

/// A count of 100-nanosecond intervals since 00:00:00.00, 15 October 1582 (UTC).
///
/// Only the lower 60 bits are encoded into a UUID.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp(u64);

impl Timestamp {
    /// The zero timestamp, i.e. the Gregorian reform itself.
    pub const ZERO: Self = Self(0);

    /// The number of 100-nanosecond intervals between the Gregorian reform and the Unix epoch.
    pub const GREGORIAN_TO_UNIX: u64 = 0x01B2_1DD2_1381_4000;

    /// Returns the raw tick count.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the timestamp of the current system time.
    pub fn now() -> Self {
        Self::from_system_time(time::SystemTime::now())
    }

    /// Converts a [`SystemTime`](time::SystemTime), saturating at the Unix epoch if the time
    /// precedes it.
    pub fn from_system_time(t: time::SystemTime) -> Self {
        let since_unix = t
            .duration_since(time::UNIX_EPOCH)
            .unwrap_or(time::Duration::ZERO);
        Self(Self::GREGORIAN_TO_UNIX.wrapping_add(ticks(since_unix)))
    }

    /// Returns the Unix time in nanoseconds, wrapping for ticks before the Unix epoch.
    fn unix_nanos(&self) -> i64 {
        self.0
            .wrapping_sub(Self::GREGORIAN_TO_UNIX)
            .wrapping_mul(100) as i64
    }
}

fn ticks(d: time::Duration) -> u64 {
    (d.as_nanos() / 100) as u64
}

impl From<u64> for Timestamp {
    fn from(src: u64) -> Self {
        Self(src)
    }
}

impl From<Timestamp> for u64 {
    fn from(src: Timestamp) -> Self {
        src.0
    }
}

impl ops::Add<time::Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: time::Duration) -> Self::Output {
        Self(self.0.wrapping_add(ticks(rhs)))
    }
}

impl ops::Sub<time::Duration> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: time::Duration) -> Self::Output {
        Self(self.0.wrapping_sub(ticks(rhs)))
    }
}

impl fmt::Display for Timestamp {
    /// Renders the UTC time as `YYYY-MM-DD HH:MM:SS[.fraction] +0000 UTC`, with trailing zeros
    /// of the fraction omitted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.unix_nanos();
        let secs = nanos.div_euclid(1_000_000_000);
        let subsec = nanos.rem_euclid(1_000_000_000) as u32;
        let Some(dt) = chrono::DateTime::from_timestamp(secs, subsec) else {
            return write!(f, "{} ticks", self.0);
        };

        write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))?;
        if subsec > 0 {
            let frac = format!("{:09}", subsec);
            write!(f, ".{}", frac.trim_end_matches('0'))?;
        }
        f.write_str(" +0000 UTC")
    }
}

/// A trait that defines the clock interface for [`Generator`](crate::Generator).
pub trait ClockSource {
    /// Returns the current timestamp.
    fn now(&mut self) -> Timestamp;
}

/// The default clock source backed by [`std::time::SystemTime`].
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now(&mut self) -> Timestamp {
        Timestamp::now()
    }
}

impl<F: FnMut() -> Timestamp> ClockSource for F {
    fn now(&mut self) -> Timestamp {
        self()
    }
}
