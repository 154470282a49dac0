use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Non-negative money amount held as integer minor units (cents).
///
/// Amounts never pass through floating point, so the serialized form of a
/// record is byte-stable and safe to hash.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// Number of minor units per major unit.
    pub const SCALE: u64 = 100;

    pub const ZERO: Self = Self(0);

    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Whole major units, e.g. `Amount::from_major(10)` is `10.00`.
    pub fn from_major(major: u64) -> Option<Self> {
        major.checked_mul(Self::SCALE).map(Self)
    }

    pub fn minor_units(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl FromStr for Amount {
    type Err = TypeError;

    /// Parses `"10"`, `"10.5"` or `"10.50"`. Signs and more than two
    /// fractional digits are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| TypeError::InvalidAmount {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected unsigned decimal digits"));
        }
        if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("at most two fractional digits"));
        }

        let major: u64 = whole.parse().map_err(|_| invalid("out of range"))?;
        let minor = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| invalid("bad fraction"))? * 10,
            _ => frac.parse::<u64>().map_err(|_| invalid("bad fraction"))?,
        };

        major
            .checked_mul(Self::SCALE)
            .and_then(|m| m.checked_add(minor))
            .map(Self)
            .ok_or_else(|| invalid("out of range"))
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({self})")
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / Self::SCALE, self.0 % Self::SCALE)
    }
}
