mod account_id;
mod transaction_hash;

pub use account_id::AccountId;
pub use transaction_hash::TransactionHash;
