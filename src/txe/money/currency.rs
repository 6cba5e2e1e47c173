use std::fmt;

use serde::{Deserialize, Serialize};

/// An ERC-20 token living on the Ethereum chain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Erc20Token {
    pub code: String,
    pub contract_address: String,
    pub precision: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CryptoCurrency {
    Bitcoin,
    BitcoinCash,
    Ethereum,
    Erc20(Erc20Token),
}

impl CryptoCurrency {
    pub fn code(&self) -> &str {
        return match self {
            Self::Bitcoin => "BTC",
            Self::BitcoinCash => "BCH",
            Self::Ethereum => "ETH",
            Self::Erc20(token) => &token.code,
        };
    }

    /// Number of decimal places in one major unit
    pub fn precision(&self) -> u32 {
        return match self {
            Self::Bitcoin | Self::BitcoinCash => 8,
            Self::Ethereum => 18,
            Self::Erc20(token) => token.precision,
        };
    }

    /// The currency network fees are paid in when sending this asset on-chain
    pub fn fee_currency(&self) -> CryptoCurrency {
        return match self {
            Self::Erc20(_) => Self::Ethereum,
            other => other.clone(),
        };
    }

    pub fn is_erc20(&self) -> bool {
        return matches!(self, Self::Erc20(_));
    }

    /// Account-based chains order transactions by nonce, so only one may be in flight at a time
    pub fn uses_nonce(&self) -> bool {
        return matches!(self.fee_currency(), Self::Ethereum);
    }

    /// Resolves the native coins by ticker. Tokens have to be registered by the caller.
    pub fn from_code(code: &str) -> Option<Self> {
        return match code.to_uppercase().as_str() {
            "BTC" => Some(Self::Bitcoin),
            "BCH" => Some(Self::BitcoinCash),
            "ETH" => Some(Self::Ethereum),
            _ => None,
        };
    }
}

impl fmt::Display for CryptoCurrency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "{}", self.code());
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum FiatCurrency {
    Usd,
    Eur,
    Gbp,
}

impl FiatCurrency {
    pub fn code(&self) -> &'static str {
        return match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
        };
    }

    pub fn precision(&self) -> u32 {
        return 2;
    }

    pub fn from_code(code: &str) -> Option<Self> {
        return match code.to_uppercase().as_str() {
            "USD" => Some(Self::Usd),
            "EUR" => Some(Self::Eur),
            "GBP" => Some(Self::Gbp),
            _ => None,
        };
    }
}

impl fmt::Display for FiatCurrency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "{}", self.code());
    }
}

/// Any currency a [`MoneyValue`](super::MoneyValue) can be denominated in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Currency {
    Crypto(CryptoCurrency),
    Fiat(FiatCurrency),
}

impl Currency {
    pub fn code(&self) -> &str {
        return match self {
            Self::Crypto(crypto) => crypto.code(),
            Self::Fiat(fiat) => fiat.code(),
        };
    }

    pub fn precision(&self) -> u32 {
        return match self {
            Self::Crypto(crypto) => crypto.precision(),
            Self::Fiat(fiat) => fiat.precision(),
        };
    }

    pub fn as_crypto(&self) -> Option<&CryptoCurrency> {
        return match self {
            Self::Crypto(crypto) => Some(crypto),
            Self::Fiat(_) => None,
        };
    }
}

impl From<CryptoCurrency> for Currency {
    fn from(value: CryptoCurrency) -> Self {
        return Self::Crypto(value);
    }
}

impl From<&CryptoCurrency> for Currency {
    fn from(value: &CryptoCurrency) -> Self {
        return Self::Crypto(value.clone());
    }
}

impl From<FiatCurrency> for Currency {
    fn from(value: FiatCurrency) -> Self {
        return Self::Fiat(value);
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "{}", self.code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usdt() -> CryptoCurrency {
        CryptoCurrency::Erc20(Erc20Token {
            code: "USDT".to_string(),
            contract_address: "0xdac17f958d2ee523a2206206994597c13d831ec7".to_string(),
            precision: 6,
        })
    }

    #[test]
    fn fee_currency() {
        assert_eq!(CryptoCurrency::Bitcoin.fee_currency(), CryptoCurrency::Bitcoin);
        assert_eq!(CryptoCurrency::Ethereum.fee_currency(), CryptoCurrency::Ethereum);
        assert_eq!(usdt().fee_currency(), CryptoCurrency::Ethereum);
    }

    #[test]
    fn uses_nonce() {
        assert!(!CryptoCurrency::Bitcoin.uses_nonce());
        assert!(!CryptoCurrency::BitcoinCash.uses_nonce());
        assert!(CryptoCurrency::Ethereum.uses_nonce());
        assert!(usdt().uses_nonce());
    }

    #[test]
    fn from_code() {
        assert_eq!(CryptoCurrency::from_code("btc"), Some(CryptoCurrency::Bitcoin));
        assert_eq!(CryptoCurrency::from_code("USDT"), None);
        assert_eq!(FiatCurrency::from_code("eur"), Some(FiatCurrency::Eur));
        assert_eq!(FiatCurrency::from_code("JPY"), None);
    }

    #[test]
    fn precision() {
        assert_eq!(Currency::from(usdt()).precision(), 6);
        assert_eq!(Currency::from(CryptoCurrency::Ethereum).precision(), 18);
        assert_eq!(Currency::from(FiatCurrency::Gbp).precision(), 2);
    }
}
