//! Fixed-point decimals with 18 fractional digits, as used by the staking module for shares,
//! exchange rates and caps.

use std::{fmt, str::FromStr};

use ethnum::U256;
use serde::{Deserialize, Serialize};

use crate::{errors::ParseError, types::Amount};

/// Number of fractional digits carried by [`Dec`].
pub const DEC_PRECISION: u32 = 18;

/// The raw representation of `1.0`.
pub const DEC_ONE_RAW: u128 = 10u128.pow(DEC_PRECISION);

/// Unsigned fixed-point decimal, stored as `value * 10^18`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dec(u128);

impl Dec {
    /// `0.0`
    pub const ZERO: Self = Self(0);

    /// `1.0`
    pub const ONE: Self = Self(DEC_ONE_RAW);

    /// Wraps a raw `value * 10^18` representation.
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// Returns the raw `value * 10^18` representation.
    pub const fn raw(&self) -> u128 {
        self.0
    }

    /// Converts a whole amount to a decimal, failing on overflow.
    pub const fn from_amount(amount: Amount) -> Option<Self> {
        match amount.checked_mul(DEC_ONE_RAW) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    /// Whether this decimal is exactly zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Raw value widened to 256 bits for overflow-free intermediate math.
    pub fn wide(&self) -> U256 {
        U256::from(self.0)
    }

    /// Computes `floor(amount * self)`.
    ///
    /// Returns `None` if the result does not fit in an [`Amount`].
    pub fn mul_floor(&self, amount: Amount) -> Option<Amount> {
        narrow(U256::from(amount) * self.wide() / U256::from(DEC_ONE_RAW))
    }

    /// Computes `floor(amount / self)`.
    ///
    /// Returns `None` if `self` is zero or the result does not fit in an [`Amount`].
    pub fn div_floor(&self, amount: Amount) -> Option<Amount> {
        if self.is_zero() {
            return None;
        }
        narrow(U256::from(amount) * U256::from(DEC_ONE_RAW) / self.wide())
    }
}

/// Narrows a 256-bit intermediate back to an [`Amount`], if it fits.
pub fn narrow(value: U256) -> Option<Amount> {
    (value <= U256::from(u128::MAX)).then(|| value.as_u128())
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.0 / DEC_ONE_RAW;
        let frac = self.0 % DEC_ONE_RAW;
        if frac == 0 {
            return write!(f, "{int}");
        }

        let frac = format!("{frac:018}");
        write!(f, "{int}.{}", frac.trim_end_matches('0'))
    }
}

impl FromStr for Dec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (int_part, frac_part) = match s.split_once('.') {
            Some((int, frac)) => (int, frac),
            None => (s, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty() || !all_digits(int_part) || !all_digits(frac_part) {
            return Err(ParseError::InvalidDecimal(s.to_owned()));
        }
        if frac_part.len() > DEC_PRECISION as usize {
            return Err(ParseError::TooPrecise(s.to_owned()));
        }

        let overflow = || ParseError::Overflow(s.to_owned());
        let int: u128 = int_part.parse().map_err(|_| overflow())?;

        let frac = if frac_part.is_empty() {
            0
        } else {
            let scale = 10u128.pow(DEC_PRECISION - frac_part.len() as u32);
            let digits: u128 = frac_part
                .parse()
                .map_err(|_| ParseError::InvalidDecimal(s.to_owned()))?;
            digits * scale
        };

        int.checked_mul(DEC_ONE_RAW)
            .and_then(|raw| raw.checked_add(frac))
            .map(Self)
            .ok_or_else(overflow)
    }
}

impl Serialize for Dec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Multiplier bounding how many liquid shares a validator may hold relative to its validator-bond
/// shares.
///
/// The staking module encodes "no bound" as `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondFactor {
    /// Liquid shares are not bounded by validator-bond shares.
    Unlimited,

    /// Liquid shares may not exceed `validator_bond_shares * factor`.
    Factor(Dec),
}

impl fmt::Display for BondFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str("-1"),
            Self::Factor(dec) => fmt::Display::fmt(dec, f),
        }
    }
}

impl FromStr for BondFactor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix('-') {
            Some(rest) if rest.parse::<Dec>()? == Dec::ONE => Ok(Self::Unlimited),
            Some(_) => Err(ParseError::InvalidDecimal(s.to_owned())),
            None => s.parse().map(Self::Factor),
        }
    }
}

impl Serialize for BondFactor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BondFactor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
