// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 the stv authors.
// This file is part of stv.

//! A fixed precision decimal type for STV tallies.
//!
//! Ballot weights and candidate totals are exact rationals with exactly 5
//! significant decimal digits, never binary floating point. Stored as a
//! non-negative integer scaled by `10^5`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// A non-negative rational with exactly 5 digits of decimal precision,
/// represented internally as `scaled_value / SCALE`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FixedDecimal {
    scaled_value: u64,
}

impl FixedDecimal {
    pub const DIGITS: u32 = 5;
    pub const SCALE: u64 = 100_000;

    pub const ZERO: FixedDecimal = FixedDecimal { scaled_value: 0 };
    pub const ONE: FixedDecimal = FixedDecimal {
        scaled_value: Self::SCALE,
    };

    /// Build directly from an already-scaled integer (`value * SCALE`).
    pub const fn from_scaled(scaled_value: u64) -> Self {
        FixedDecimal { scaled_value }
    }

    pub const fn scaled_value(&self) -> u64 {
        self.scaled_value
    }

    pub const fn from_u64(value: u64) -> Self {
        FixedDecimal {
            scaled_value: value * Self::SCALE,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.scaled_value == 0
    }

    /// `self * rhs`, quantized back to 5 digits (round half to even).
    pub fn mul_quantized(&self, rhs: FixedDecimal) -> FixedDecimal {
        let product = self.scaled_value as u128 * rhs.scaled_value as u128;
        FixedDecimal {
            scaled_value: round_div_u128(product, Self::SCALE as u128) as u64,
        }
    }

    /// `self / rhs`, quantized back to 5 digits (round half to even).
    ///
    /// Panics if `rhs` is zero.
    pub fn div_quantized(&self, rhs: FixedDecimal) -> FixedDecimal {
        assert!(!rhs.is_zero(), "division by zero FixedDecimal");
        let numerator = self.scaled_value as u128 * Self::SCALE as u128;
        FixedDecimal {
            scaled_value: round_div_u128(numerator, rhs.scaled_value as u128) as u64,
        }
    }

    /// Format with exactly 5 decimal digits, e.g. `"2.00000"`.
    pub fn to_fixed_string(&self) -> String {
        let int_part = self.scaled_value / Self::SCALE;
        let frac_part = self.scaled_value % Self::SCALE;
        format!("{}.{:05}", int_part, frac_part)
    }
}

/// Round `numerator / denominator` to the nearest integer, ties to even.
fn round_div_u128(numerator: u128, denominator: u128) -> u128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let twice_remainder = remainder * 2;
    match twice_remainder.cmp(&denominator) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => {
            if quotient % 2 == 0 {
                quotient
            } else {
                quotient + 1
            }
        }
    }
}

impl Add for FixedDecimal {
    type Output = FixedDecimal;
    fn add(self, rhs: Self) -> Self::Output {
        FixedDecimal {
            scaled_value: self.scaled_value + rhs.scaled_value,
        }
    }
}

impl Sub for FixedDecimal {
    type Output = FixedDecimal;
    fn sub(self, rhs: Self) -> Self::Output {
        FixedDecimal {
            scaled_value: self.scaled_value - rhs.scaled_value,
        }
    }
}

impl Sum for FixedDecimal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(FixedDecimal::ZERO, |acc, v| acc + v)
    }
}

impl<'a> Sum<&'a FixedDecimal> for FixedDecimal {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(FixedDecimal::ZERO, |acc, v| acc + *v)
    }
}

/// Human-readable, trims trailing zeros. Used for logging; never for the
/// serialized audit trail, which always uses [`FixedDecimal::to_fixed_string`].
impl fmt::Display for FixedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int_part = self.scaled_value / Self::SCALE;
        let frac_part = self.scaled_value % Self::SCALE;
        if frac_part == 0 {
            write!(f, "{}", int_part)
        } else {
            let digits = format!("{:05}", frac_part);
            write!(f, "{}.{}", int_part, digits.trim_end_matches('0'))
        }
    }
}

impl fmt::Debug for FixedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fixed_string())
    }
}

impl FromStr for FixedDecimal {
    type Err = std::num::ParseIntError;

    fn from_str(buf: &str) -> Result<Self, Self::Err> {
        if let Some((int_part, frac_part)) = buf.split_once('.') {
            let int_part: u64 = int_part.parse()?;
            let mut frac_digits = frac_part.to_string();
            while frac_digits.len() < Self::DIGITS as usize {
                frac_digits.push('0');
            }
            frac_digits.truncate(Self::DIGITS as usize);
            let frac_part: u64 = frac_digits.parse()?;
            Ok(FixedDecimal {
                scaled_value: int_part * Self::SCALE + frac_part,
            })
        } else {
            let int_part: u64 = buf.parse()?;
            Ok(FixedDecimal {
                scaled_value: int_part * Self::SCALE,
            })
        }
    }
}

impl Serialize for FixedDecimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_fixed_string())
    }
}

impl<'de> Deserialize<'de> for FixedDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let buf = String::deserialize(deserializer)?;
        buf.parse().map_err(serde::de::Error::custom)
    }
}
