use crate::id::TokenId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable descriptive fields shared by every token minted from one item
///
/// All fields are set at mint time and never change afterwards. `artwork` and
/// `logotype` carry content identifiers (e.g. IPFS hashes) rather than raw
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMetadata {
    /// Content identifier of the artwork
    pub artwork: String,

    /// Content identifier of the logotype
    pub logotype: String,

    pub description: String,

    pub creator: String,

    pub company: String,

    pub role: String,

    pub creation_date: String,
}

/// One minted token
///
/// Every token minted in the same batch shares `item_uuid`, `total_units`,
/// `metadata` and `additional_info`; the `unit` values of a batch cover
/// `1..=total_units` contiguously, each exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Unique identifier, assigned once by the registry's allocator
    pub id: TokenId,

    /// Logical item this token was minted from, shared by the whole batch
    pub item_uuid: String,

    /// 1-based position of this token within its mint batch
    pub unit: u64,

    /// Size of the batch this token was minted in
    pub total_units: u64,

    /// Immutable descriptive fields
    pub metadata: ItemMetadata,

    /// Open-ended string map, set once at mint time and immutable thereafter
    pub additional_info: BTreeMap<String, String>,
}

impl Token {
    pub fn new(
        id: TokenId,
        item_uuid: String,
        unit: u64,
        total_units: u64,
        metadata: ItemMetadata,
        additional_info: BTreeMap<String, String>,
    ) -> Self {
        Self {
            id,
            item_uuid,
            unit,
            total_units,
            metadata,
            additional_info,
        }
    }

    /// Get the token ID
    pub fn id(&self) -> TokenId {
        self.id
    }

    /// Check whether this token is the only one in its batch
    pub fn is_unique_edition(&self) -> bool {
        self.total_units == 1
    }
}
