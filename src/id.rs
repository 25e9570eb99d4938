use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

// TokenId uniquely identifies one minted token. Ids are handed out by the
// registry's allocator starting at 0 and are never reused or mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(u64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nft:{}", self.0)
    }
}

impl From<u64> for TokenId {
    fn from(value: u64) -> Self {
        TokenId(value)
    }
}

impl TokenId {
    pub fn new(value: u64) -> Self {
        TokenId(value)
    }

    /// Get the raw numeric value
    pub fn value(&self) -> u64 {
        self.0
    }
}

// AccountId identifies the holder of a collection. It is a 32 byte long
// opaque identifier, resembling a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId([u8; 32]);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format as a hex string with a prefix of the first 6 bytes
        let prefix = hex::encode(&self.0[0..6]);
        write!(f, "acct:{}", prefix)
    }
}

impl Default for AccountId {
    fn default() -> Self {
        AccountId([0; 32])
    }
}

impl AccountId {
    pub fn new(bytes: [u8; 32]) -> Self {
        AccountId(bytes)
    }

    /// Create an AccountId from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        AccountId(bytes)
    }

    /// Get a reference to the internal bytes
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    /// Derive an AccountId from arbitrary seed material
    ///
    /// The derivation is deterministic: the same seeds always yield the same
    /// account. Useful for test harnesses that address accounts by name.
    pub fn from_seeds(seeds: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();

        // Domain separator
        hasher.update(b"NFT_Registry_Account");

        for seed in seeds {
            hasher.update(seed);
        }

        AccountId(hasher.finalize().into())
    }
}

/// Issues globally unique, monotonically increasing token identifiers.
///
/// Each call to `next_id` returns a value strictly greater than every value
/// returned before it, starting at 0. There is no rollback: an id handed out
/// to a mint attempt that later aborts stays consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        IdAllocator { next: 0 }
    }

    /// Allocate the next token identifier
    pub fn next_id(&mut self) -> TokenId {
        let id = TokenId(self.next);
        self.next += 1;
        id
    }

    /// Number of identifiers issued so far
    pub fn issued(&self) -> u64 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_is_monotonic_and_consecutive() {
        let mut allocator = IdAllocator::new();
        let ids: Vec<TokenId> = (0..5).map(|_| allocator.next_id()).collect();

        for (expected, id) in ids.iter().enumerate() {
            assert_eq!(id.value(), expected as u64);
        }
        assert_eq!(allocator.issued(), 5);
    }

    #[test]
    fn test_allocator_starts_at_zero() {
        let mut allocator = IdAllocator::new();
        assert_eq!(allocator.issued(), 0);
        assert_eq!(allocator.next_id(), TokenId::new(0));
    }

    #[test]
    fn test_account_derivation_is_deterministic() {
        let a = AccountId::from_seeds(&[b"Collector"]);
        let b = AccountId::from_seeds(&[b"Collector"]);
        let c = AccountId::from_seeds(&[b"CollectorB"]);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display_formats() {
        let id = TokenId::new(42);
        assert_eq!(id.to_string(), "nft:42");

        let account = AccountId::new([0xab; 32]);
        assert_eq!(account.to_string(), "acct:abababababab");
    }
}
