use crate::error::RegistryError;
use crate::id::{AccountId, TokenId};
use crate::objects::{ItemMetadata, Token};
use crate::registry::{Registry, RegistryState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Additional-info key that overrides the artwork-derived thumbnail
pub const ARTWORK_THUMBNAIL_KEY: &str = "artworkThumbnail";

/// Path used for the artwork-derived thumbnail fallback
pub const DEFAULT_THUMBNAIL_PATH: &str = "sm.png";

/// Metadata-only projection of a token: batch coordinates plus the
/// immutable descriptive fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataView {
    pub item_uuid: String,
    pub unit: u64,
    pub total_units: u64,
    #[serde(flatten)]
    pub fields: ItemMetadata,
}

/// Content-addressed thumbnail reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub cid: String,
    pub path: String,
}

/// Wallet-facing projection of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayView {
    pub name: String,
    pub description: String,
    pub thumbnail: Thumbnail,
}

impl MetadataView {
    pub(crate) fn for_token(token: &Token) -> Self {
        Self {
            item_uuid: token.item_uuid.clone(),
            unit: token.unit,
            total_units: token.total_units,
            fields: token.metadata.clone(),
        }
    }
}

impl DisplayView {
    /// Compose the display projection for a token
    ///
    /// `name` is `"{company} - {role}"`. The thumbnail prefers an
    /// `artworkThumbnail` entry in the token's additional info and falls back
    /// to the artwork content id under the `sm.png` path.
    pub(crate) fn for_token(token: &Token) -> Self {
        let thumbnail = match token.additional_info.get(ARTWORK_THUMBNAIL_KEY) {
            Some(cid) => Thumbnail {
                cid: cid.clone(),
                path: ARTWORK_THUMBNAIL_KEY.to_string(),
            },
            None => Thumbnail {
                cid: token.metadata.artwork.clone(),
                path: DEFAULT_THUMBNAIL_PATH.to_string(),
            },
        };

        Self {
            name: format!("{} - {}", token.metadata.company, token.metadata.role),
            description: token.metadata.description.clone(),
            thumbnail,
        }
    }
}

/// Resolve `id` within `account`'s collection
///
/// Collapses "account has no collection" and "id not in the collection" into
/// `NotFound`; reads fail hard rather than returning an empty value.
fn lookup<'a>(
    state: &'a RegistryState,
    account: &AccountId,
    id: TokenId,
) -> Result<&'a Token, RegistryError> {
    let held = state
        .collections
        .get(account)
        .map(|collection| collection.contains(id))
        .unwrap_or(false);
    if !held {
        return Err(RegistryError::NotFound(id));
    }
    state.tokens.get(&id).ok_or(RegistryError::NotFound(id))
}

// Read-only projections. These never mutate state and are callable by any
// party; each takes a short-lived shared lock and answers from that snapshot.
impl Registry {
    /// Total number of tokens ever minted
    pub fn supply(&self) -> Result<u64, RegistryError> {
        Ok(self.read_state()?.tokens.len() as u64)
    }

    /// Full record of `id` as held in `account`'s collection
    pub fn token(&self, account: &AccountId, id: TokenId) -> Result<Token, RegistryError> {
        let state = self.read_state()?;
        lookup(&state, account, id).cloned()
    }

    /// Metadata-only projection of `id`
    pub fn metadata_view(
        &self,
        account: &AccountId,
        id: TokenId,
    ) -> Result<MetadataView, RegistryError> {
        let state = self.read_state()?;
        Ok(MetadataView::for_token(lookup(&state, account, id)?))
    }

    /// Display projection of `id` (name, description, thumbnail)
    pub fn display_view(
        &self,
        account: &AccountId,
        id: TokenId,
    ) -> Result<DisplayView, RegistryError> {
        let state = self.read_state()?;
        Ok(DisplayView::for_token(lookup(&state, account, id)?))
    }

    /// Additional-info map of `id` exactly as supplied at mint time
    pub fn additional_info(
        &self,
        account: &AccountId,
        id: TokenId,
    ) -> Result<BTreeMap<String, String>, RegistryError> {
        let state = self.read_state()?;
        Ok(lookup(&state, account, id)?.additional_info.clone())
    }

    /// Number of tokens in `account`'s collection
    pub fn collection_length(&self, account: &AccountId) -> Result<u64, RegistryError> {
        let state = self.read_state()?;
        state
            .collections
            .get(account)
            .map(|collection| collection.len() as u64)
            .ok_or(RegistryError::CollectionNotFound(*account))
    }

    /// Ids in `account`'s collection, in deposit order
    pub fn collection_ids(&self, account: &AccountId) -> Result<Vec<TokenId>, RegistryError> {
        let state = self.read_state()?;
        state
            .collections
            .get(account)
            .map(|collection| collection.ids().to_vec())
            .ok_or(RegistryError::CollectionNotFound(*account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AccountId {
        AccountId::from_seeds(&[b"Admin"])
    }

    fn sample_metadata() -> ItemMetadata {
        ItemMetadata {
            artwork: "QmArtworkCid".to_string(),
            logotype: "QmLogotypeCid".to_string(),
            description: "Proof of collaboration".to_string(),
            creator: "Jane Doe".to_string(),
            company: "Acme".to_string(),
            role: "Advisor".to_string(),
            creation_date: "2021-10-01".to_string(),
        }
    }

    fn minted_registry(additional_info: BTreeMap<String, String>) -> (Registry, AccountId) {
        let registry = Registry::new(admin());
        let account = AccountId::from_seeds(&[b"Collector"]);
        registry.setup_account(account).unwrap();
        registry
            .mint_batch(
                &admin(),
                "item-uuid-1",
                &account,
                1,
                sample_metadata(),
                additional_info,
            )
            .unwrap();
        (registry, account)
    }

    #[test]
    fn test_supply_starts_at_zero() {
        let registry = Registry::new(admin());
        assert_eq!(registry.supply().unwrap(), 0);
    }

    #[test]
    fn test_token_read_back_matches_mint() {
        let (registry, account) = minted_registry(BTreeMap::new());
        let token = registry.token(&account, TokenId::new(0)).unwrap();

        assert_eq!(token.item_uuid, "item-uuid-1");
        assert_eq!(token.unit, 1);
        assert_eq!(token.total_units, 1);
        assert_eq!(token.metadata, sample_metadata());
    }

    #[test]
    fn test_metadata_view_projection() {
        let (registry, account) = minted_registry(BTreeMap::new());
        let view = registry.metadata_view(&account, TokenId::new(0)).unwrap();

        assert_eq!(view.item_uuid, "item-uuid-1");
        assert_eq!(view.unit, 1);
        assert_eq!(view.total_units, 1);
        assert_eq!(view.fields, sample_metadata());
    }

    #[test]
    fn test_display_view_name_and_thumbnail_fallback() {
        let (registry, account) = minted_registry(BTreeMap::new());
        let view = registry.display_view(&account, TokenId::new(0)).unwrap();

        assert_eq!(view.name, "Acme - Advisor");
        assert_eq!(view.description, "Proof of collaboration");
        assert_eq!(
            view.thumbnail,
            Thumbnail {
                cid: "QmArtworkCid".to_string(),
                path: DEFAULT_THUMBNAIL_PATH.to_string(),
            }
        );
    }

    #[test]
    fn test_display_view_thumbnail_override() {
        let mut info = BTreeMap::new();
        info.insert(
            ARTWORK_THUMBNAIL_KEY.to_string(),
            "QmThumbnailCid".to_string(),
        );
        let (registry, account) = minted_registry(info);
        let view = registry.display_view(&account, TokenId::new(0)).unwrap();

        assert_eq!(
            view.thumbnail,
            Thumbnail {
                cid: "QmThumbnailCid".to_string(),
                path: ARTWORK_THUMBNAIL_KEY.to_string(),
            }
        );
    }

    #[test]
    fn test_additional_info_round_trip() {
        let mut info = BTreeMap::new();
        info.insert("extraInfo".to_string(), "extra info".to_string());
        info.insert("testInfo".to_string(), "test info".to_string());
        let (registry, account) = minted_registry(info.clone());

        assert_eq!(
            registry.additional_info(&account, TokenId::new(0)).unwrap(),
            info
        );
    }

    #[test]
    fn test_reads_collapse_missing_collection_to_not_found() {
        let (registry, _) = minted_registry(BTreeMap::new());
        let stranger = AccountId::from_seeds(&[b"Stranger"]);

        let err = registry.token(&stranger, TokenId::new(0)).unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(id) if id == TokenId::new(0)));
        let err = registry
            .additional_info(&stranger, TokenId::new(0))
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[test]
    fn test_collection_ids_follow_deposit_order() {
        let (registry, account) = minted_registry(BTreeMap::new());
        registry
            .mint_batch(
                &admin(),
                "item-uuid-2",
                &account,
                2,
                sample_metadata(),
                BTreeMap::new(),
            )
            .unwrap();

        let ids: Vec<u64> = registry
            .collection_ids(&account)
            .unwrap()
            .iter()
            .map(|id| id.value())
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(registry.collection_length(&account).unwrap(), 3);
    }
}
