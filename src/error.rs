use crate::id::{AccountId, TokenId};
use std::io;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with the registry
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Token absent from the queried collection; also covers a collection
    /// that was never set up
    #[error("Token {0} not found")]
    NotFound(TokenId),

    /// Account already has an initialized collection
    #[error("Collection already initialized for {0}")]
    AlreadyInitialized(AccountId),

    /// Transfer or mint target has no initialized collection
    #[error("Recipient {0} has no collection")]
    RecipientNotInitialized(AccountId),

    /// Whole-collection read against an account that never set one up
    #[error("No collection for {0}")]
    CollectionNotFound(AccountId),

    /// An id was deposited into a collection that already holds it;
    /// unreachable while ids stay globally unique
    #[error("Token {0} already present in collection")]
    DuplicateDeposit(TokenId),

    /// Caller lacks the required capability
    #[error("Account {0} lacks mint authority")]
    Unauthorized(AccountId),

    /// Mint quantity below the minimum of one
    #[error("Invalid mint quantity: {0}")]
    InvalidQuantity(u64),

    /// Any failure inside an atomic batch mint, wrapping the cause
    #[error("Batch mint failed: {0}")]
    MintFailed(#[source] Box<RegistryError>),

    /// IO errors that occur when reading/writing snapshot files
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Registry lock was poisoned by a panicking writer
    #[error("Lock error: {0}")]
    Lock(String),

    /// Generic errors that don't fit in other categories
    #[error("Other error: {0}")]
    Other(String),

    /// Anyhow error wrapper for error context
    #[error(transparent)]
    Context(#[from] anyhow::Error),
}

// Additional From conversions for common error types

impl From<bincode::Error> for RegistryError {
    fn from(err: bincode::Error) -> Self {
        RegistryError::Serialization(err.to_string())
    }
}

impl From<String> for RegistryError {
    fn from(err: String) -> Self {
        RegistryError::Other(err)
    }
}

impl From<&str> for RegistryError {
    fn from(err: &str) -> Self {
        RegistryError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_subject() {
        let err = RegistryError::NotFound(TokenId::new(9999));
        assert_eq!(err.to_string(), "Token nft:9999 not found");

        let err = RegistryError::InvalidQuantity(0);
        assert_eq!(err.to_string(), "Invalid mint quantity: 0");
    }

    #[test]
    fn test_mint_failed_preserves_cause() {
        let cause = RegistryError::RecipientNotInitialized(AccountId::default());
        let err = RegistryError::MintFailed(Box::new(cause));

        assert!(err.to_string().starts_with("Batch mint failed:"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
