mod fee_cache;
mod fee_level;
mod fee_quote;
mod fee_selection;

pub use fee_cache::FeeCache;
pub use fee_level::FeeLevel;
pub use fee_quote::{CustodialFees, FeeLimits, FeeQuote};
pub use fee_selection::FeeSelection;
