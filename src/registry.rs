use crate::collection::Collection;
use crate::error::RegistryError;
use crate::id::{AccountId, IdAllocator, TokenId};
use crate::objects::{ItemMetadata, Token};
use crate::receipts::{Operation, OperationReceipt};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The registry's logical state: the id counter, the append-only token
/// table and the per-account collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RegistryState {
    /// Global monotonic id source
    pub(crate) allocator: IdAllocator,

    /// id -> token table; entries are immutable once written and never deleted
    pub(crate) tokens: HashMap<TokenId, Token>,

    /// Per-account ownership stores
    pub(crate) collections: HashMap<AccountId, Collection>,
}

/// Process-wide NFT registry
///
/// The registry is a single logical state machine. Every mutating operation
/// (account setup, batch mint, transfer, bulk transfer) runs under the write
/// lock for its whole duration, so mutations are serializable and no partial
/// state is ever observable. Reads take short-lived shared locks and see a
/// consistent snapshot.
///
/// Minting requires the admin capability fixed at construction; transfers are
/// driven by the sender's account. Signature verification of either party is
/// the execution environment's concern, not the registry's.
#[derive(Debug)]
pub struct Registry {
    /// Holder of the mint authority
    admin: AccountId,

    state: RwLock<RegistryState>,

    /// Journal of processed mutations, successful and failed alike
    receipts: RwLock<Vec<OperationReceipt>>,
}

impl Registry {
    /// Create an empty registry with `admin` holding the mint authority
    pub fn new(admin: AccountId) -> Self {
        info!("registry created, mint authority held by {}", admin);
        Self {
            admin,
            state: RwLock::new(RegistryState::default()),
            receipts: RwLock::new(Vec::new()),
        }
    }

    /// Rebuild a registry around previously captured state
    pub(crate) fn from_state(admin: AccountId, state: RegistryState) -> Self {
        Self {
            admin,
            state: RwLock::new(state),
            receipts: RwLock::new(Vec::new()),
        }
    }

    /// The account holding the mint authority
    pub fn admin(&self) -> &AccountId {
        &self.admin
    }

    pub(crate) fn read_state(&self) -> Result<RwLockReadGuard<'_, RegistryState>, RegistryError> {
        self.state
            .read()
            .map_err(|e| RegistryError::Lock(e.to_string()))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, RegistryState>, RegistryError> {
        self.state
            .write()
            .map_err(|e| RegistryError::Lock(e.to_string()))
    }

    /// Journal the outcome of a mutating operation
    fn record(&self, operation: Operation, ids: Vec<TokenId>, error: Option<&RegistryError>) {
        match self.receipts.write() {
            Ok(mut receipts) => receipts.push(OperationReceipt::new(operation, ids, error)),
            Err(e) => warn!("receipt journal unavailable: {}", e),
        }
    }

    /// Receipts of every mutation processed so far, in submission order
    pub fn receipts(&self) -> Result<Vec<OperationReceipt>, RegistryError> {
        let receipts = self
            .receipts
            .read()
            .map_err(|e| RegistryError::Lock(e.to_string()))?;
        Ok(receipts.clone())
    }

    /// Create an empty collection for `account`
    ///
    /// Fails with `AlreadyInitialized` if the account already has one.
    pub fn setup_account(&self, account: AccountId) -> Result<(), RegistryError> {
        let outcome = (|| {
            let mut state = self.write_state()?;
            if state.collections.contains_key(&account) {
                return Err(RegistryError::AlreadyInitialized(account));
            }
            state.collections.insert(account, Collection::new(account));
            Ok(())
        })();

        match &outcome {
            Ok(()) => info!("collection initialized for {}", account),
            Err(e) => warn!("setup_account for {} rejected: {}", account, e),
        }
        self.record(
            Operation::SetupAccount { account },
            Vec::new(),
            outcome.as_ref().err(),
        );
        outcome
    }

    /// Mint `quantity` tokens of one logical item into `recipient`'s collection
    ///
    /// The tokens share `item_uuid`, `fields` and `additional_info`; their
    /// `unit` values cover `1..=quantity` in allocation order and
    /// `total_units` equals the batch size. The whole batch commits or none
    /// of it does. Ids consumed by a failed attempt stay consumed; they are
    /// simply never deposited anywhere.
    ///
    /// Returns the newly created ids in unit order.
    pub fn mint_batch(
        &self,
        caller: &AccountId,
        item_uuid: &str,
        recipient: &AccountId,
        quantity: u64,
        fields: ItemMetadata,
        additional_info: BTreeMap<String, String>,
    ) -> Result<Vec<TokenId>, RegistryError> {
        let outcome =
            self.mint_batch_locked(caller, item_uuid, recipient, quantity, fields, additional_info);

        match &outcome {
            Ok(ids) => info!(
                "minted {} token(s) of item {} into {}",
                ids.len(),
                item_uuid,
                recipient
            ),
            Err(e) => warn!("mint of item {} into {} failed: {}", item_uuid, recipient, e),
        }
        self.record(
            Operation::MintBatch {
                item_uuid: item_uuid.to_string(),
                recipient: *recipient,
                quantity,
            },
            outcome.as_deref().unwrap_or_default().to_vec(),
            outcome.as_ref().err(),
        );
        outcome
    }

    fn mint_batch_locked(
        &self,
        caller: &AccountId,
        item_uuid: &str,
        recipient: &AccountId,
        quantity: u64,
        fields: ItemMetadata,
        additional_info: BTreeMap<String, String>,
    ) -> Result<Vec<TokenId>, RegistryError> {
        if caller != &self.admin {
            return Err(RegistryError::Unauthorized(*caller));
        }
        if quantity < 1 {
            return Err(RegistryError::InvalidQuantity(quantity));
        }

        let mut state = self.write_state()?;
        let state = &mut *state;

        // Ids are consumed up front; a failed mint burns them rather than
        // rolling the counter back.
        let mut batch = Vec::with_capacity(quantity as usize);
        for unit in 1..=quantity {
            let id = state.allocator.next_id();
            batch.push(Token::new(
                id,
                item_uuid.to_string(),
                unit,
                quantity,
                fields.clone(),
                additional_info.clone(),
            ));
        }

        let collection = state
            .collections
            .get_mut(recipient)
            .ok_or_else(|| {
                RegistryError::MintFailed(Box::new(RegistryError::RecipientNotInitialized(
                    *recipient,
                )))
            })?;

        // Nothing past this point can fail: the ids are fresh, so every
        // deposit below must succeed.
        let ids: Vec<TokenId> = batch.iter().map(|token| token.id).collect();
        for token in batch {
            collection
                .deposit(token.id)
                .map_err(|e| RegistryError::MintFailed(Box::new(e)))?;
            state.tokens.insert(token.id, token);
        }

        Ok(ids)
    }

    /// Move `id` from `sender`'s collection into `recipient`'s
    ///
    /// The withdrawal and the deposit happen under one write lock, so no
    /// observer sees the id absent from both collections or present in two.
    /// A failed transfer leaves both collections untouched.
    pub fn transfer(
        &self,
        sender: &AccountId,
        recipient: &AccountId,
        id: TokenId,
    ) -> Result<(), RegistryError> {
        let outcome = (|| {
            let mut state = self.write_state()?;
            Self::transfer_locked(&mut state, sender, recipient, &[id])
        })();

        match &outcome {
            Ok(()) => info!("transferred {} from {} to {}", id, sender, recipient),
            Err(e) => warn!(
                "transfer of {} from {} to {} failed: {}",
                id, sender, recipient, e
            ),
        }
        self.record(
            Operation::Transfer {
                sender: *sender,
                recipient: *recipient,
                id,
            },
            if outcome.is_ok() { vec![id] } else { Vec::new() },
            outcome.as_ref().err(),
        );
        outcome
    }

    /// Move several ids from `sender`'s collection into `recipient`'s
    ///
    /// Applies the transfers in the given order as one atomic step: the first
    /// id missing from the sender's collection fails the whole call with
    /// `NotFound` naming it, and no transfer from the call takes effect.
    pub fn transfer_bulk(
        &self,
        sender: &AccountId,
        recipient: &AccountId,
        ids: &[TokenId],
    ) -> Result<(), RegistryError> {
        let outcome = (|| {
            let mut state = self.write_state()?;
            Self::transfer_locked(&mut state, sender, recipient, ids)
        })();

        match &outcome {
            Ok(()) => info!(
                "transferred {} token(s) from {} to {}",
                ids.len(),
                sender,
                recipient
            ),
            Err(e) => warn!(
                "bulk transfer of {} token(s) from {} to {} failed: {}",
                ids.len(),
                sender,
                recipient,
                e
            ),
        }
        self.record(
            Operation::TransferBulk {
                sender: *sender,
                recipient: *recipient,
                ids: ids.to_vec(),
            },
            if outcome.is_ok() { ids.to_vec() } else { Vec::new() },
            outcome.as_ref().err(),
        );
        outcome
    }

    /// Validate-then-move transfer core, shared by single and bulk transfers
    ///
    /// All presence checks run before the first id moves, so a failure cannot
    /// leave a partially transferred batch behind.
    fn transfer_locked(
        state: &mut RegistryState,
        sender: &AccountId,
        recipient: &AccountId,
        ids: &[TokenId],
    ) -> Result<(), RegistryError> {
        if !state.collections.contains_key(recipient) {
            return Err(RegistryError::RecipientNotInitialized(*recipient));
        }

        {
            let sender_collection = match state.collections.get(sender) {
                Some(collection) => collection,
                None => {
                    // A sender with no collection holds nothing; report the
                    // first requested id as missing.
                    return Err(RegistryError::NotFound(
                        ids.first().copied().unwrap_or(TokenId::new(0)),
                    ));
                }
            };
            let mut seen = std::collections::HashSet::new();
            for &id in ids {
                // A repeated id would vanish from the sender after its first
                // move, so treat the repetition as missing as well.
                if !sender_collection.contains(id) || !seen.insert(id) {
                    return Err(RegistryError::NotFound(id));
                }
            }
        }

        for &id in ids {
            state
                .collections
                .get_mut(sender)
                .ok_or(RegistryError::NotFound(id))?
                .withdraw(id)?;
            state
                .collections
                .get_mut(recipient)
                .ok_or(RegistryError::RecipientNotInitialized(*recipient))?
                .deposit(id)?;
        }

        Ok(())
    }
}
