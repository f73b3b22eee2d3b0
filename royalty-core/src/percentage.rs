//! Fixed-point percentage arithmetic
//!
//! Percentages are basis points: 10,000 bps = 100%. Allocation uses integer
//! floor division, so the sum of allocations over a split set whose
//! percentages total at most 10,000 bps never exceeds the original amount.
//! The shortfall is dust and is never redistributed.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of basis points in 100%
pub const BASIS_POINTS: u32 = 10_000;

/// A validated percentage in basis points, always in (0, 10000]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Bps(u32);

impl Bps {
    /// Validate a raw basis-point value
    ///
    /// Zero is rejected: an empty share is expressed by removing the
    /// recipient, never by a 0% record.
    pub fn new(bps: u32) -> Result<Self> {
        if bps == 0 || bps > BASIS_POINTS {
            return Err(Error::InvalidPercentage(bps));
        }
        Ok(Self(bps))
    }

    /// Get raw basis points
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Bps {
    type Error = Error;

    fn try_from(bps: u32) -> Result<Self> {
        Bps::new(bps)
    }
}

impl From<Bps> for u32 {
    fn from(bps: Bps) -> u32 {
        bps.0
    }
}

impl fmt::Display for Bps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}

/// Compute `floor(amount * bps / 10_000)` without intermediate overflow
///
/// Splitting the amount into quotient and remainder by 10,000 keeps every
/// intermediate product within `u128` for any input, and the identity
/// `floor(a*b/c) == (a/c)*b + floor((a%c)*b/c)` makes the result exact.
/// Requires `bps <= 10_000`; larger values are clamped by `Bps` validation
/// upstream.
pub fn allocate(amount: u128, bps: u32) -> u128 {
    let bps = u128::from(bps.min(BASIS_POINTS));
    let base = u128::from(BASIS_POINTS);
    (amount / base) * bps + (amount % base) * bps / base
}
