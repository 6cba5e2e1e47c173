mod currency;
mod money_value;
mod money_value_pair;

pub use currency::{CryptoCurrency, Currency, Erc20Token, FiatCurrency};
pub use money_value::{MoneyError, MoneyValue};
pub use money_value_pair::MoneyValuePair;
