// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Fixed-point decimal arithmetic for ratio evaluation
//!
//! Ratios are held as a scaled integer (`units / 10^scale`) so that alarm
//! boundaries behave the same on every platform. Division rounds half to even.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Largest supported number of fractional digits
pub const MAX_SCALE: u32 = 18;

/// Decimal parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecimalError {
    #[error("empty decimal")]
    Empty,

    #[error("invalid character {0:?} in decimal")]
    InvalidCharacter(char),

    #[error("too many fractional digits: {0} (max 18)")]
    TooPrecise(usize),

    #[error("decimal out of range")]
    Overflow,
}

/// Non-negative fixed-point decimal
#[derive(Debug, Clone, Copy)]
pub struct FixedDecimal {
    units: u64,
    scale: u32,
}

impl FixedDecimal {
    pub const ZERO: Self = Self { units: 0, scale: 0 };
    pub const ONE: Self = Self { units: 1, scale: 0 };

    /// Const constructor; panics if `scale` exceeds [`MAX_SCALE`]
    pub const fn from_parts(units: u64, scale: u32) -> Self {
        assert!(scale <= MAX_SCALE, "scale exceeds MAX_SCALE");
        Self { units, scale }
    }

    /// Build from raw units and scale, e.g. `(4, 4)` is `0.0004`
    pub fn new(units: u64, scale: u32) -> Result<Self, DecimalError> {
        if scale > MAX_SCALE {
            return Err(DecimalError::TooPrecise(scale as usize));
        }
        Ok(Self { units, scale })
    }

    pub fn units(&self) -> u64 {
        self.units
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.units == 0
    }

    /// Quotient `numerator / denominator` rounded half to even at `scale`
    /// fractional digits.
    ///
    /// Returns `None` for a zero denominator, a scale above [`MAX_SCALE`],
    /// or a quotient too large to represent.
    pub fn ratio(numerator: u64, denominator: u64, scale: u32) -> Option<Self> {
        if denominator == 0 || scale > MAX_SCALE {
            return None;
        }

        let divisor = denominator as u128;
        let scaled = numerator as u128 * pow10(scale);
        let mut quotient = scaled / divisor;
        let remainder = scaled % divisor;

        // remainder < divisor <= u64::MAX, doubling cannot overflow u128
        match (remainder * 2).cmp(&divisor) {
            Ordering::Greater => quotient += 1,
            Ordering::Equal if quotient % 2 == 1 => quotient += 1,
            _ => {}
        }

        let units = u64::try_from(quotient).ok()?;
        Some(Self { units, scale })
    }

    fn widened(&self, scale: u32) -> u128 {
        self.units as u128 * pow10(scale - self.scale)
    }
}

fn pow10(exp: u32) -> u128 {
    10u128.pow(exp)
}

impl PartialEq for FixedDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FixedDecimal {}

impl PartialOrd for FixedDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FixedDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        self.widened(scale).cmp(&other.widened(scale))
    }
}

impl fmt::Display for FixedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.units);
        }

        let factor = pow10(self.scale);
        let whole = self.units as u128 / factor;
        let fraction = self.units as u128 % factor;
        write!(f, "{}.{:0width$}", whole, fraction, width = self.scale as usize)
    }
}

impl FromStr for FixedDecimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (whole, fraction) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(DecimalError::Empty);
        }
        if fraction.len() > MAX_SCALE as usize {
            return Err(DecimalError::TooPrecise(fraction.len()));
        }

        let mut units: u64 = 0;
        for c in whole.chars().chain(fraction.chars()) {
            let digit = c.to_digit(10).ok_or(DecimalError::InvalidCharacter(c))?;
            units = units
                .checked_mul(10)
                .and_then(|u| u.checked_add(digit as u64))
                .ok_or(DecimalError::Overflow)?;
        }

        Ok(Self {
            units,
            scale: fraction.len() as u32,
        })
    }
}

impl Serialize for FixedDecimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FixedDecimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
