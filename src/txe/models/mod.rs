mod account;
mod asset_action;
mod confirmation;
mod pending_transaction;
mod target;
mod transaction_result;
mod validation_state;

pub use account::{AccountKind, BlockchainAccount};
pub use asset_action::AssetAction;
pub use confirmation::{ConfirmationKind, TransactionConfirmation};
pub use pending_transaction::PendingTransaction;
pub use target::{ReceiveAddress, TransactionTarget};
pub use transaction_result::TransactionResult;
pub use validation_state::ValidationState;
