//! Integer-tick price representation.
//!
//! Prices crossing the book are whole ticks stored in an i64. The
//! real-valued fundamental is rounded to ticks at the quoting boundary, so
//! the engine itself only ever sees `Price` values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A price in integer ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Create from a tick count
    #[inline(always)]
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Get the tick count
    #[inline(always)]
    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Round a real-valued price to the nearest tick
    #[inline]
    pub fn from_f64(value: f64) -> Self {
        Self(value.round() as i64)
    }

    /// Convert to f64 (for statistics and mid computations)
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Price {
    type Output = Price;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Price(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Price;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        Price(self.0 - rhs.0)
    }
}
