use crate::Result;

use txe::fees::FeeLevel;
use txe::models::AccountKind;
use txe::money::{CryptoCurrency, MoneyValue};

use serde::Deserialize;

use thiserror::Error;

/// Represents one row of a scenario file
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioRow {
    #[serde(rename = "type")]
    pub typ: ScenarioRowType,

    pub account: Option<String>,
    pub asset: Option<String>,
    pub amount: Option<String>,
    pub target: Option<String>,
    pub option: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioRowType {
    Token,
    Balance,
    Fee,
    Minimum,
    Price,
    Contract,
    Send,
}

#[derive(Error, Debug)]
pub enum InputParseError {
    #[error("Error parsing scenario row: {0} value missing: {1:?}")]
    MissingField(&'static str, ScenarioRow),

    #[error("Error parsing scenario row: unknown asset {0:?}")]
    UnknownAsset(String),

    #[error("Error parsing scenario row: unknown fiat currency {0:?}")]
    UnknownFiatCurrency(String),

    #[error("Error parsing scenario row: unknown account kind {0:?}")]
    UnknownAccountKind(String),

    #[error("Error parsing scenario row: unknown fee option {0:?}")]
    UnknownFeeOption(String),

    #[error("Error parsing scenario row: invalid token precision {0:?}")]
    InvalidPrecision(String),
}

/// Fee rows either quote an on-chain level or a custodial product's fixed fee
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeOption {
    Regular,
    Priority,
    Custodial(AccountKind),
}

impl ScenarioRow {
    pub fn account(&self) -> Result<&str> {
        return self.required("account", &self.account);
    }

    pub fn asset(&self) -> Result<&str> {
        return self.required("asset", &self.asset);
    }

    pub fn amount(&self) -> Result<&str> {
        return self.required("amount", &self.amount);
    }

    pub fn target(&self) -> Result<&str> {
        return self.required("target", &self.target);
    }

    pub fn option(&self) -> Option<&str> {
        return self.option.as_deref().filter(|option| !option.is_empty());
    }

    pub fn option_or<'a>(&'a self, default: &'a str) -> &'a str {
        return self.option().unwrap_or(default);
    }

    pub fn fee_option(&self) -> Result<FeeOption> {
        let option = self.option_or("regular");

        let fee_option = match option.to_lowercase().as_str() {
            "regular" => FeeOption::Regular,
            "priority" => FeeOption::Priority,
            other => FeeOption::Custodial(parse_custodial_kind(other)?),
        };

        return Ok(fee_option);
    }

    /// Fee level of a send row: empty means the default regular level
    pub fn fee_level(&self, asset: &CryptoCurrency) -> Result<Option<FeeLevel>> {
        let Some(option) = self.option() else {
            return Ok(None);
        };

        let level = match option.split_once(':') {
            Some(("custom", fee)) => {
                FeeLevel::Custom(MoneyValue::parse(fee, asset.fee_currency())?)
            }
            Some(_) => Err(InputParseError::UnknownFeeOption(option.to_string()))?,
            None => match option.to_lowercase().as_str() {
                "regular" => return Ok(None),
                "priority" => FeeLevel::Priority,
                _ => Err(InputParseError::UnknownFeeOption(option.to_string()))?,
            },
        };

        return Ok(Some(level));
    }

    fn required<'a>(&'a self, name: &'static str, value: &'a Option<String>) -> Result<&'a str> {
        return value
            .as_deref()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| InputParseError::MissingField(name, self.clone()).into());
    }
}

pub fn parse_account_kind(kind: &str) -> Result<AccountKind> {
    let kind = match kind.to_lowercase().as_str() {
        "private" => AccountKind::NonCustodial,
        "trading" => AccountKind::Trading,
        "interest" => AccountKind::Interest,
        _ => Err(InputParseError::UnknownAccountKind(kind.to_string()))?,
    };

    return Ok(kind);
}

fn parse_custodial_kind(kind: &str) -> Result<AccountKind> {
    return match parse_account_kind(kind) {
        Ok(AccountKind::NonCustodial) | Err(_) => {
            Err(InputParseError::UnknownFeeOption(kind.to_string()).into())
        }
        Ok(kind) => Ok(kind),
    };
}

/// `alice` or `alice:trading`, private accounts by default
pub fn parse_account_ref(reference: &str) -> Result<(String, AccountKind)> {
    return match reference.split_once(':') {
        Some((name, kind)) => Ok((name.to_string(), parse_account_kind(kind)?)),
        None => Ok((reference.to_string(), AccountKind::NonCustodial)),
    };
}
