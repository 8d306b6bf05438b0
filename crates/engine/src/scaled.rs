//! Fixed-point values used by percentage and weighted splits.
//!
//! Both [`Percentage`] and [`Weight`] keep four fractional digits as an
//! integer count of `1/10_000` units, so split arithmetic never touches
//! floating point.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, util};

/// Number of fractional digits kept by scaled values.
pub const SCALE_DIGITS: u32 = 4;
/// `10^SCALE_DIGITS`.
pub const SCALE: i64 = 10_000;

/// Largest scaled magnitude accepted from a float.
const MAX_SCALED: f64 = 9_000_000_000_000_000.0;

fn scaled_from_number(value: f64, field: &str) -> ResultEngine<i64> {
    if !value.is_finite() {
        return Err(EngineError::InvalidNumber {
            field: field.to_string(),
            reason: format!("{value} is not a finite number"),
        });
    }
    let scaled = (value * SCALE as f64).round();
    if scaled.abs() > MAX_SCALED {
        return Err(EngineError::InvalidNumber {
            field: field.to_string(),
            reason: "value too large".to_string(),
        });
    }
    if scaled == 0.0 && value != 0.0 {
        return Err(EngineError::InvalidNumber {
            field: field.to_string(),
            reason: format!("{value} has more than {SCALE_DIGITS} decimals"),
        });
    }
    Ok(scaled as i64)
}

/// A percentage with four decimals, `33.3333%` is stored as `333_333`.
///
/// ```rust
/// use engine::Percentage;
///
/// let pct: Percentage = "33.34".parse().unwrap();
/// assert_eq!(pct.scaled(), 333_400);
/// assert_eq!(pct.to_string(), "33.34");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Percentage(i64);

impl Percentage {
    pub const ZERO: Percentage = Percentage(0);
    pub const HUNDRED: Percentage = Percentage(100 * SCALE);
    /// Accepted distance between the sum of percentages and 100 (`0.01%`).
    pub const TOLERANCE: Percentage = Percentage(SCALE / 100);

    #[must_use]
    pub const fn from_scaled(scaled: i64) -> Self {
        Self(scaled)
    }

    /// Whole percentage points, `from_points(25)` is 25%.
    ///
    /// Saturates at the `i64` bounds, which lie far outside `[0, 100]`.
    #[must_use]
    pub const fn from_points(points: i64) -> Self {
        Self(points.saturating_mul(SCALE))
    }

    #[must_use]
    pub const fn scaled(self) -> i64 {
        self.0
    }

    /// Converts a JSON-style number, rounding to four decimals.
    pub fn try_from_number(value: f64) -> ResultEngine<Self> {
        scaled_from_number(value, "percentage").map(Self)
    }

    /// `true` when the value lies in `[0, 100]`.
    #[must_use]
    pub const fn is_in_range(self) -> bool {
        self.0 >= 0 && self.0 <= Self::HUNDRED.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&util::format_decimal(self.0, SCALE_DIGITS, true))
    }
}

impl FromStr for Percentage {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed);
        util::parse_decimal(number, SCALE_DIGITS, "percentage").map(Self)
    }
}

/// Relative weight of a participant in a shares split.
///
/// Like [`Percentage`] it keeps four decimals, so `1.5` shares is `15_000`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Weight(i64);

impl Weight {
    pub const ONE: Weight = Weight(SCALE);

    #[must_use]
    pub const fn from_scaled(scaled: i64) -> Self {
        Self(scaled)
    }

    /// Whole shares, `from_units(2)` weighs twice as much as `Weight::ONE`.
    ///
    /// Saturates at the `i64` bounds instead of overflowing.
    #[must_use]
    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(SCALE))
    }

    #[must_use]
    pub const fn scaled(self) -> i64 {
        self.0
    }

    pub fn try_from_number(value: f64) -> ResultEngine<Self> {
        scaled_from_number(value, "weight").map(Self)
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&util::format_decimal(self.0, SCALE_DIGITS, true))
    }
}

impl FromStr for Weight {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        util::parse_decimal(s, SCALE_DIGITS, "weight").map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_parses_with_optional_sign() {
        assert_eq!("25%".parse::<Percentage>().unwrap(), Percentage::from_points(25));
        assert_eq!(
            "33.3333".parse::<Percentage>().unwrap(),
            Percentage::from_scaled(333_333)
        );
        assert!("33.33333".parse::<Percentage>().is_err());
    }

    #[test]
    fn numbers_round_to_four_decimals() {
        assert_eq!(
            Percentage::try_from_number(33.34).unwrap(),
            Percentage::from_scaled(333_400)
        );
        assert_eq!(
            Weight::try_from_number(0.1 + 0.2).unwrap(),
            Weight::from_scaled(3_000)
        );
        assert!(Weight::try_from_number(f64::INFINITY).is_err());
    }

    #[test]
    fn nonzero_numbers_below_precision_are_rejected() {
        for value in [0.00004, -0.00004, 1e-12] {
            assert!(matches!(
                Weight::try_from_number(value),
                Err(EngineError::InvalidNumber { .. })
            ));
            assert!(matches!(
                Percentage::try_from_number(value),
                Err(EngineError::InvalidNumber { .. })
            ));
        }
        assert_eq!(Percentage::try_from_number(0.0).unwrap(), Percentage::ZERO);
        assert_eq!(Percentage::try_from_number(-0.0).unwrap(), Percentage::ZERO);
        assert_eq!(Weight::try_from_number(0.0001).unwrap(), Weight::from_scaled(1));
    }

    #[test]
    fn whole_unit_constructors_saturate() {
        assert_eq!(Percentage::from_points(i64::MAX).scaled(), i64::MAX);
        assert!(!Percentage::from_points(i64::MAX).is_in_range());
        assert!(!Percentage::from_points(i64::MIN).is_in_range());
        assert_eq!(Weight::from_units(i64::MAX).scaled(), i64::MAX);
        assert!(!Weight::from_units(i64::MIN).is_positive());
    }

    #[test]
    fn range_and_sign_checks() {
        assert!(Percentage::HUNDRED.is_in_range());
        assert!(!Percentage::from_scaled(-1).is_in_range());
        assert!(!Percentage::from_points(101).is_in_range());
        assert!(Weight::ONE.is_positive());
        assert!(!Weight::from_units(0).is_positive());
    }

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(Weight::from_scaled(15_000).to_string(), "1.5");
        assert_eq!(Percentage::HUNDRED.to_string(), "100");
    }
}
