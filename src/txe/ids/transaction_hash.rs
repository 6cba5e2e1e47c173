use std::fmt;

/// Reference of a transaction broadcast to a chain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionHash(pub String);

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "{}", self.0);
    }
}
