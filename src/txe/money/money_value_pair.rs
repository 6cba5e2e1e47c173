use super::{Currency, MoneyError, MoneyValue};

/// Exchange rate snapshot: `base` is worth `quote`.
///
/// Usually `base` is one major unit of a crypto currency and `quote` its price in fiat.
/// Pairs are immutable, derived pairs are new values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyValuePair {
    base: MoneyValue,
    quote: MoneyValue,
}

impl MoneyValuePair {
    pub fn new(base: MoneyValue, quote: MoneyValue) -> Result<Self, MoneyError> {
        if base.is_zero() {
            Err(MoneyError::DivisionByZero("pair", base.clone()))?
        }

        return Ok(Self { base, quote });
    }

    /// Builds a pair from the price of one major unit of `base`
    pub fn exchange_rate(rate: MoneyValue, base: impl Into<Currency>) -> Self {
        return Self {
            base: MoneyValue::one(base),
            quote: rate,
        };
    }

    pub fn base(&self) -> &MoneyValue {
        return &self.base;
    }

    pub fn quote(&self) -> &MoneyValue {
        return &self.quote;
    }

    /// Converts a value in the base currency into the quote currency, rounding toward zero
    pub fn convert(&self, value: &MoneyValue) -> Result<MoneyValue, MoneyError> {
        if value.currency() != self.base.currency() {
            Err(MoneyError::CurrencyMismatch(
                "convert",
                value.clone(),
                self.base.clone(),
            ))?
        }

        let scaled = value
            .minor()
            .checked_mul(self.quote.minor())
            .ok_or_else(|| MoneyError::Overflow("convert", value.clone(), self.quote.clone()))?;

        let minor = scaled / self.base.minor();

        return Ok(MoneyValue::new(minor, self.quote.currency().clone()));
    }

    /// Same rate seen from the other side: `quote` is worth `base`
    pub fn inverse(&self) -> Result<Self, MoneyError> {
        return Self::new(self.quote.clone(), self.base.clone());
    }

    /// Inverse pair normalised to one major unit of the current quote currency
    pub fn inverse_quote(&self) -> Result<Self, MoneyError> {
        let inverse = self.inverse()?;

        let one = MoneyValue::one(self.quote.currency().clone());
        let quote = inverse.convert(&one)?;

        return Self::new(one, quote);
    }
}
