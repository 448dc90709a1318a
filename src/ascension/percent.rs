//! Fixed-point percentages for fixed-skill bonus accumulation.
//!
//! Values are held as ten-thousandths of a percentage point so sums of
//! dataset values such as `"12.5%"` and `"0.15%"` stay exact. Formatting to the
//! `"12.5%"` string form happens only when a value leaves the crate.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

const FRACTION_DIGITS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a percentage value: {raw:?}")]
pub struct PercentParseError {
    pub raw: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percent(i64);

impl Percent {
    /// Units per whole percentage point.
    pub const SCALE: i64 = 10_000;
    pub const ZERO: Percent = Percent(0);

    pub const fn from_units(units: i64) -> Self {
        Percent(units)
    }

    pub const fn units(self) -> i64 {
        self.0
    }

    /// Bare numeric params are percentage points (`12` means 12%).
    pub fn from_f64(value: f64) -> Option<Self> {
        let scaled = (value * Self::SCALE as f64).round();
        if !scaled.is_finite() || scaled.abs() > i64::MAX as f64 {
            return None;
        }
        Some(Percent(scaled as i64))
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Fraction form (`12.5%` -> 0.125), as used by damage formulas.
    pub fn as_ratio(self) -> f64 {
        self.as_f64() / 100.0
    }

    pub fn checked_add(self, other: Percent) -> Option<Percent> {
        self.0.checked_add(other.0).map(Percent)
    }
}

impl FromStr for Percent {
    type Err = PercentParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || PercentParseError {
            raw: raw.to_string(),
        };
        let trimmed = raw.trim();
        let body = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
        let (negative, digits) = match body.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, body.strip_prefix('+').unwrap_or(body)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
            return Err(invalid());
        }

        let mut units: i64 = 0;
        for digit in whole.bytes() {
            units = units
                .checked_mul(10)
                .and_then(|u| u.checked_add(i64::from(digit - b'0')))
                .ok_or_else(invalid)?;
        }
        units = units.checked_mul(Self::SCALE).ok_or_else(invalid)?;

        let mut place = Self::SCALE / 10;
        let mut rest = fraction.bytes();
        for digit in rest.by_ref().take(FRACTION_DIGITS) {
            units = units
                .checked_add(i64::from(digit - b'0') * place)
                .ok_or_else(invalid)?;
            place /= 10;
        }
        if rest.next().is_some_and(|digit| digit >= b'5') {
            units = units.checked_add(1).ok_or_else(invalid)?;
        }

        Ok(Percent(if negative { -units } else { units }))
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = Self::SCALE as u64;
        let whole = abs / scale;
        let fraction = abs % scale;
        if fraction == 0 {
            return write!(f, "{sign}{whole}%");
        }
        let digits = format!("{fraction:0width$}", width = FRACTION_DIGITS);
        write!(f, "{sign}{whole}.{}%", digits.trim_end_matches('0'))
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Add for Percent {
    type Output = Percent;

    fn add(self, rhs: Percent) -> Percent {
        Percent(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Percent {
    fn add_assign(&mut self, rhs: Percent) {
        *self = *self + rhs;
    }
}

impl Sum for Percent {
    fn sum<I: Iterator<Item = Percent>>(iter: I) -> Percent {
        iter.fold(Percent::ZERO, Add::add)
    }
}

/// Add `increment` to an already formatted percentage and return the new string.
pub fn sum_percentages(increment: Percent, accumulated: &str) -> Result<String, PercentParseError> {
    let total = accumulated.parse::<Percent>()? + increment;
    Ok(total.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pct(raw: &str) -> Percent {
        raw.parse().unwrap()
    }

    #[test]
    fn parses_percent_strings_and_bare_numbers() {
        assert_eq!(pct("15%").units(), 150_000);
        assert_eq!(pct("12.5%").units(), 125_000);
        assert_eq!(pct(" 0.15 % ").units(), 1_500);
        assert_eq!(pct("8").units(), 80_000);
        assert_eq!(pct("-3.2%").units(), -32_000);
        assert_eq!(pct(".5%").units(), 5_000);
    }

    #[test]
    fn rounds_past_four_fraction_digits() {
        assert_eq!(pct("1.23456%").units(), 12_346);
        assert_eq!(pct("1.23454%").units(), 12_345);
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert!("abc".parse::<Percent>().is_err());
        assert!("%".parse::<Percent>().is_err());
        assert!("1.2.3%".parse::<Percent>().is_err());
        assert!("".parse::<Percent>().is_err());
    }

    #[test]
    fn rejects_values_beyond_fixed_point_range() {
        assert!("922337203685477.9999%".parse::<Percent>().is_err());
        assert!("922337203685477.99995%".parse::<Percent>().is_err());
        assert!("-922337203685477.9999%".parse::<Percent>().is_err());
        assert_eq!(pct("922337203685477.5807%").units(), i64::MAX);
    }

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(pct("15%").to_string(), "15%");
        assert_eq!(pct("12.50%").to_string(), "12.5%");
        assert_eq!(pct("0.15%").to_string(), "0.15%");
        assert_eq!(pct("-0.5%").to_string(), "-0.5%");
        assert_eq!(Percent::ZERO.to_string(), "0%");
    }

    #[test]
    fn sums_without_float_drift() {
        let total: Percent = ["0.1%", "0.2%", "12.5%"].iter().map(|raw| pct(raw)).sum();
        assert_eq!(total.to_string(), "12.8%");
        assert_eq!(Percent::from_f64(1.8), Some(pct("1.8%")));
    }

    #[test]
    fn sum_percentages_adds_to_formatted_total() {
        assert_eq!(sum_percentages(pct("15%"), "0%").unwrap(), "15%");
        assert_eq!(sum_percentages(pct("2.5%"), "10%").unwrap(), "12.5%");
        assert!(sum_percentages(pct("1%"), "n/a").is_err());
    }

    #[test]
    fn serializes_as_display_string() {
        let json = serde_json::to_string(&pct("12.5%")).unwrap();
        assert_eq!(json, "\"12.5%\"");
    }
}
