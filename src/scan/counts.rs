//! Byte statistics accumulator

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Occurrences of newline, null and tab bytes
///
/// Counts combine by pointwise addition with `Counts::default()` as the
/// identity. Partial counts from workers arrive in completion order, so the
/// result must not depend on the order in which they are added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counts {
    pub newlines: u64,
    pub nulls: u64,
    pub tabs: u64,
}

impl Counts {
    pub fn new(newlines: u64, nulls: u64, tabs: u64) -> Self {
        Self {
            newlines,
            nulls,
            tabs,
        }
    }

    /// Tally a buffer into these counts
    ///
    /// Bytes other than `\n`, `\0` and `\t` are ignored.
    pub fn record(&mut self, buf: &[u8]) {
        self.newlines += memchr::memchr_iter(b'\n', buf).count() as u64;
        self.nulls += memchr::memchr_iter(0, buf).count() as u64;
        self.tabs += memchr::memchr_iter(b'\t', buf).count() as u64;
    }

    /// Counts for a single buffer
    pub fn of(buf: &[u8]) -> Self {
        let mut counts = Self::default();
        counts.record(buf);
        counts
    }
}

impl Add for Counts {
    type Output = Counts;

    fn add(self, rhs: Counts) -> Counts {
        Counts {
            newlines: self.newlines + rhs.newlines,
            nulls: self.nulls + rhs.nulls,
            tabs: self.tabs + rhs.tabs,
        }
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, rhs: Counts) {
        *self = *self + rhs;
    }
}

impl Sum for Counts {
    fn sum<I: Iterator<Item = Counts>>(iter: I) -> Counts {
        iter.fold(Counts::default(), Add::add)
    }
}
