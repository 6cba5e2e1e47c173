use super::Currency;

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch while applying {0} operation on {1} and {2}")]
    CurrencyMismatch(&'static str, MoneyValue, MoneyValue),

    #[error("Overflow error while applying {0} operation on {1} and {2}")]
    Overflow(&'static str, MoneyValue, MoneyValue),

    #[error("Division by zero while applying {0} operation on {1}")]
    DivisionByZero(&'static str, MoneyValue),

    #[error("Money parse error: {0}, {1}")]
    Parse(&'static str, String),
}

/// Amount of minor units (satoshi, wei, cents...) in one major unit of a currency
pub(crate) fn minor_units_per_major(precision: u32) -> i128 {
    return 10i128.pow(precision.min(38));
}

/// A currency-tagged amount, stored as an exact count of minor units.
///
/// Arithmetic and ordering are only defined between values of the same currency,
/// every other combination fails with [`MoneyError::CurrencyMismatch`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoneyValue {
    minor: i128,
    currency: Currency,
}

impl MoneyValue {
    pub fn new(minor: i128, currency: impl Into<Currency>) -> Self {
        return Self {
            minor,
            currency: currency.into(),
        };
    }

    pub fn zero(currency: impl Into<Currency>) -> Self {
        return Self::new(0, currency);
    }

    /// One major unit of `currency`, e.g. 1 BTC or 1 USD
    pub fn one(currency: impl Into<Currency>) -> Self {
        let currency = currency.into();
        let minor = minor_units_per_major(currency.precision());
        return Self { minor, currency };
    }

    pub fn minor(&self) -> i128 {
        return self.minor;
    }

    pub fn currency(&self) -> &Currency {
        return &self.currency;
    }

    pub fn is_zero(&self) -> bool {
        return self.minor == 0;
    }

    pub fn is_positive(&self) -> bool {
        return self.minor > 0;
    }

    pub fn is_negative(&self) -> bool {
        return self.minor < 0;
    }

    /// Parses a decimal string of major units, such as `"0.015"`, into exact minor units.
    pub fn parse(string: &str, currency: impl Into<Currency>) -> Result<Self, MoneyError> {
        let currency = currency.into();
        let precision = currency.precision() as usize;

        let trimmed = string.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let mut parts = digits.split('.');

        let whole = parts.next().unwrap_or_default();
        let fraction = parts.next().unwrap_or_default();

        if parts.next().is_some() {
            Err(MoneyError::Parse("Too many decimal points", string.to_string()))?
        }

        if whole.is_empty() && fraction.is_empty() {
            Err(MoneyError::Parse("No digits", string.to_string()))?
        }

        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !all_digits(whole) || !all_digits(fraction) {
            Err(MoneyError::Parse("Invalid digit", string.to_string()))?
        }

        if fraction.len() > precision {
            Err(MoneyError::Parse("Too many decimal places", string.to_string()))?
        }

        let too_large = || MoneyError::Parse("Amount too large", string.to_string());

        let whole: i128 = match whole {
            "" => 0,
            whole => whole.parse().map_err(|_| too_large())?,
        };

        let fraction = format!("{:0<width$}", fraction, width = precision);
        let fraction: i128 = match fraction.as_str() {
            "" => 0,
            fraction => fraction.parse().map_err(|_| too_large())?,
        };

        let minor = whole
            .checked_mul(minor_units_per_major(precision as u32))
            .and_then(|minor| minor.checked_add(fraction))
            .ok_or_else(too_large)?;

        let minor = if negative { -minor } else { minor };

        return Ok(Self { minor, currency });
    }

    pub fn add(&self, other: &Self) -> Result<Self, MoneyError> {
        self.ensure_same_currency("add", other)?;

        let minor = self
            .minor
            .checked_add(other.minor)
            .ok_or_else(|| MoneyError::Overflow("add", self.clone(), other.clone()))?;

        return Ok(Self::new(minor, self.currency.clone()));
    }

    pub fn sub(&self, other: &Self) -> Result<Self, MoneyError> {
        self.ensure_same_currency("sub", other)?;

        let minor = self
            .minor
            .checked_sub(other.minor)
            .ok_or_else(|| MoneyError::Overflow("sub", self.clone(), other.clone()))?;

        return Ok(Self::new(minor, self.currency.clone()));
    }

    pub fn is_lt(&self, other: &Self) -> Result<bool, MoneyError> {
        self.ensure_same_currency("compare", other)?;
        return Ok(self.minor < other.minor);
    }

    pub fn is_lte(&self, other: &Self) -> Result<bool, MoneyError> {
        self.ensure_same_currency("compare", other)?;
        return Ok(self.minor <= other.minor);
    }

    pub fn is_gt(&self, other: &Self) -> Result<bool, MoneyError> {
        self.ensure_same_currency("compare", other)?;
        return Ok(self.minor > other.minor);
    }

    pub fn is_gte(&self, other: &Self) -> Result<bool, MoneyError> {
        self.ensure_same_currency("compare", other)?;
        return Ok(self.minor >= other.minor);
    }

    /// `max(self, 0)`
    pub fn clamped_at_zero(&self) -> Self {
        if self.minor < 0 {
            return Self::zero(self.currency.clone());
        }

        return self.clone();
    }

    /// Major units without the currency code, e.g. `"1.50000000"`
    pub fn to_major_string(&self) -> String {
        let precision = self.currency.precision();
        let scale = minor_units_per_major(precision).unsigned_abs();

        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        let whole = abs / scale;
        let fraction = abs % scale;

        if precision == 0 {
            return format!("{sign}{whole}");
        }

        return format!(
            "{sign}{whole}.{fraction:0width$}",
            width = precision as usize
        );
    }

    fn ensure_same_currency(&self, operation: &'static str, other: &Self) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            Err(MoneyError::CurrencyMismatch(
                operation,
                self.clone(),
                other.clone(),
            ))?
        }

        return Ok(());
    }
}

impl fmt::Display for MoneyValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "{} {}", self.to_major_string(), self.currency);
    }
}
