use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetAction {
    Send,
    Withdraw,
    InterestTransfer,
    InterestWithdraw,
}

impl fmt::Display for AssetAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Send => "send",
            Self::Withdraw => "withdraw",
            Self::InterestTransfer => "interest-transfer",
            Self::InterestWithdraw => "interest-withdraw",
        };

        return write!(f, "{name}");
    }
}
