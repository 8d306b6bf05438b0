use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, ResultEngine, util};

/// Largest integer magnitude an `f64` represents exactly (2^53).
const MAX_EXACT_F64: f64 = 9_007_199_254_740_992.0;

/// Signed money amount represented as an integer number of **minor units**.
///
/// Use this type for **all** monetary values in the engine (totals, shares)
/// to avoid floating-point drift. Which minor unit is meant (cents, pence,
/// yen) depends on the [`Currency`] the caller pairs it with.
///
/// `Display` prints the raw minor-unit count; use [`Money::display`] for a
/// human readable amount.
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount = Money::new(10_50);
/// assert_eq!(amount.minor(), 1050);
/// assert_eq!(amount.to_string(), "1050");
/// assert_eq!(amount.display(Currency::Eur).to_string(), "10.50 EUR");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more decimals than the currency has):
///
/// ```rust
/// use engine::{Currency, Money};
///
/// assert_eq!(Money::from_major_str("10,5", Currency::Eur).unwrap().minor(), 1050);
/// assert_eq!(Money::from_major_str("1500", Currency::Jpy).unwrap().minor(), 1500);
/// assert!(Money::from_major_str("12.345", Currency::Usd).is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Converts a JSON-style number into minor units.
    ///
    /// Rejects non-finite values, values with a fractional part and values
    /// outside the range an `f64` represents exactly.
    pub fn try_from_number(value: f64) -> ResultEngine<Money> {
        if !value.is_finite() {
            return Err(EngineError::InvalidNumber {
                field: "amount".to_string(),
                reason: format!("{value} is not a finite number"),
            });
        }
        if value.fract() != 0.0 {
            return Err(EngineError::FractionalAmount {
                value: value.to_string(),
            });
        }
        if value.abs() > MAX_EXACT_F64 {
            return Err(EngineError::InvalidNumber {
                field: "amount".to_string(),
                reason: "amount too large".to_string(),
            });
        }
        Ok(Money(value as i64))
    }

    /// Parses a decimal string in major units (`"10.50"`) for `currency`.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading
    /// `+`/`-`. At most `currency.minor_units()` fractional digits are
    /// accepted.
    pub fn from_major_str(s: &str, currency: Currency) -> ResultEngine<Money> {
        util::parse_decimal(s, u32::from(currency.minor_units()), "amount").map(Money)
    }

    /// Formats the amount in major units without currency (`"10.50"`).
    #[must_use]
    pub fn to_major_string(self, currency: Currency) -> String {
        util::format_decimal(self.0, u32::from(currency.minor_units()), false)
    }

    /// Returns a displayable `amount CODE` view (`"10.50 EUR"`).
    #[must_use]
    pub const fn display(self, currency: Currency) -> MoneyDisplay {
        MoneyDisplay {
            amount: self,
            currency,
        }
    }
}

/// Human readable money amount, see [`Money::display`].
#[derive(Clone, Copy, Debug)]
pub struct MoneyDisplay {
    amount: Money,
    currency: Currency,
}

impl fmt::Display for MoneyDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.amount.to_major_string(self.currency),
            self.currency.code()
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}
