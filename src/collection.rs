use crate::error::RegistryError;
use crate::id::{AccountId, TokenId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Per-account ownership store
///
/// Holds the set of token ids an account currently owns. Membership is
/// unique, and enumeration follows deposit order so reads stay deterministic.
/// A token id lives in at most one collection system-wide at any instant;
/// the registry enforces that by moving ids between collections only inside
/// a single mutating operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    /// The account this collection belongs to
    owner: AccountId,

    /// Ids in deposit order
    order: Vec<TokenId>,

    /// Mirror of `order` for constant-time membership checks
    members: HashSet<TokenId>,
}

impl Collection {
    /// Create an empty collection for an account
    pub fn new(owner: AccountId) -> Self {
        Self {
            owner,
            order: Vec::new(),
            members: HashSet::new(),
        }
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Number of tokens currently held
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check whether this collection currently holds `id`
    pub fn contains(&self, id: TokenId) -> bool {
        self.members.contains(&id)
    }

    /// Held ids in deposit order
    pub fn ids(&self) -> &[TokenId] {
        &self.order
    }

    /// Insert `id` into this collection
    ///
    /// Fails with `DuplicateDeposit` if the id is already present. Given the
    /// registry's global uniqueness invariant this cannot happen in practice.
    pub fn deposit(&mut self, id: TokenId) -> Result<(), RegistryError> {
        if !self.members.insert(id) {
            return Err(RegistryError::DuplicateDeposit(id));
        }
        self.order.push(id);
        Ok(())
    }

    /// Remove `id` from this collection
    ///
    /// Fails with `NotFound` if the id is absent, which covers ids that were
    /// never minted, are held elsewhere, or were already withdrawn.
    pub fn withdraw(&mut self, id: TokenId) -> Result<TokenId, RegistryError> {
        if !self.members.remove(&id) {
            return Err(RegistryError::NotFound(id));
        }
        self.order.retain(|held| *held != id);
        Ok(id)
    }
}
