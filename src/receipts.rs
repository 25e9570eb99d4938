use crate::error::RegistryError;
use crate::id::{AccountId, TokenId};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A mutating operation submitted to the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Collection setup for an account
    SetupAccount { account: AccountId },

    /// Batch mint of `quantity` tokens from one logical item
    MintBatch {
        item_uuid: String,
        recipient: AccountId,
        quantity: u64,
    },

    /// Single token transfer between collections
    Transfer {
        sender: AccountId,
        recipient: AccountId,
        id: TokenId,
    },

    /// Ordered bulk transfer between collections
    TransferBulk {
        sender: AccountId,
        recipient: AccountId,
        ids: Vec<TokenId>,
    },
}

/// A record of a processed mutating operation
///
/// The registry journals one receipt per submitted mutation, successful or
/// not. Failed operations leave registry state untouched; the receipt is the
/// only trace they leave behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationReceipt {
    /// The operation that was submitted
    pub operation: Operation,

    /// Whether the operation committed
    pub success: bool,

    /// Error message from a failed operation
    pub error: Option<String>,

    /// Ids created or moved by the operation (empty when it failed)
    pub ids: Vec<TokenId>,

    /// When the operation was processed (Unix timestamp, milliseconds)
    pub timestamp: u64,
}

impl OperationReceipt {
    /// Build a receipt for an operation outcome
    pub fn new(operation: Operation, ids: Vec<TokenId>, error: Option<&RegistryError>) -> Self {
        Self {
            operation,
            success: error.is_none(),
            error: error.map(|e| e.to_string()),
            ids,
            timestamp: Utc::now().timestamp_millis() as u64,
        }
    }

    /// Number of ids touched by the operation
    pub fn id_count(&self) -> usize {
        self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_receipt() {
        let account = AccountId::from_seeds(&[b"Collector"]);
        let receipt = OperationReceipt::new(
            Operation::SetupAccount { account },
            Vec::new(),
            None,
        );

        assert!(receipt.success);
        assert!(receipt.error.is_none());
        assert_eq!(receipt.id_count(), 0);
        assert!(receipt.timestamp > 0);
    }

    #[test]
    fn test_failed_receipt_carries_error_message() {
        let account = AccountId::from_seeds(&[b"Collector"]);
        let err = RegistryError::AlreadyInitialized(account);
        let receipt = OperationReceipt::new(
            Operation::SetupAccount { account },
            Vec::new(),
            Some(&err),
        );

        assert!(!receipt.success);
        assert_eq!(receipt.error.as_deref(), Some(err.to_string().as_str()));
    }
}
