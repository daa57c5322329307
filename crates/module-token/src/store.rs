//! # Token Storage Region
//!
//! The shared storage region holding all token records. Lives under
//! [`TOKEN_REGION`] in the router's state; the marketplace module reads and
//! writes it too — that shared access is the point of routing both modules
//! through one address.
//!
//! Semantics are the usual non-fungible ones: a single owner per token, at
//! most one per-token approval (cleared on every transfer), any number of
//! operator approvals per owner. Token ids are assigned sequentially from 1
//! and never reused, so `minted` counts toward `max_supply` even after
//! burns.

use crate::errors::TokenError;
use serde::{Deserialize, Serialize};
use shared_types::{Address, TokenId};
use std::collections::{BTreeMap, BTreeSet};

/// Name of the token storage region.
pub const TOKEN_REGION: &str = "token.store";

/// All token records for the collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenStore {
    initialized: bool,
    name: String,
    symbol: String,
    max_supply: u64,
    minted: u64,
    owners: BTreeMap<TokenId, Address>,
    balances: BTreeMap<Address, u64>,
    token_approvals: BTreeMap<TokenId, Address>,
    operator_approvals: BTreeMap<Address, BTreeSet<Address>>,
    token_uris: BTreeMap<TokenId, String>,
}

impl TokenStore {
    /// Configures the collection. One-shot.
    pub fn init(
        &mut self,
        name: String,
        symbol: String,
        max_supply: u64,
    ) -> Result<(), TokenError> {
        if self.initialized {
            return Err(TokenError::AlreadyInitialized);
        }
        self.initialized = true;
        self.name = name;
        self.symbol = symbol;
        self.max_supply = max_supply;
        Ok(())
    }

    /// Whether `init` has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Collection symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Configured maximum supply.
    #[must_use]
    pub fn max_supply(&self) -> u64 {
        self.max_supply
    }

    /// Tokens minted so far (burns do not decrement).
    #[must_use]
    pub fn minted(&self) -> u64 {
        self.minted
    }

    /// Whether the token exists.
    #[must_use]
    pub fn exists(&self, token_id: TokenId) -> bool {
        self.owners.contains_key(&token_id)
    }

    /// Owner of the token.
    pub fn owner_of(&self, token_id: TokenId) -> Result<Address, TokenError> {
        self.owners
            .get(&token_id)
            .copied()
            .ok_or(TokenError::UnknownToken(token_id))
    }

    /// Number of tokens held by `holder`.
    #[must_use]
    pub fn balance_of(&self, holder: Address) -> u64 {
        self.balances.get(&holder).copied().unwrap_or(0)
    }

    /// The per-token approved address, if any.
    #[must_use]
    pub fn approved_for(&self, token_id: TokenId) -> Option<Address> {
        self.token_approvals.get(&token_id).copied()
    }

    /// Whether `operator` is an approved operator for `owner`.
    #[must_use]
    pub fn is_operator(&self, owner: Address, operator: Address) -> bool {
        self.operator_approvals
            .get(&owner)
            .is_some_and(|set| set.contains(&operator))
    }

    /// Whether `actor` may move the token: owner, approved address, or
    /// approved operator of the owner.
    pub fn is_authorized(&self, actor: Address, token_id: TokenId) -> Result<bool, TokenError> {
        let owner = self.owner_of(token_id)?;
        Ok(actor == owner
            || self.approved_for(token_id) == Some(actor)
            || self.is_operator(owner, actor))
    }

    /// Mints the next token id to `to` with the given metadata URI.
    pub fn mint(&mut self, to: Address, uri: String) -> Result<TokenId, TokenError> {
        if to.is_zero() {
            return Err(TokenError::ZeroRecipient);
        }
        if self.minted >= self.max_supply {
            return Err(TokenError::MaxSupplyReached {
                max: self.max_supply,
            });
        }
        self.minted += 1;
        let token_id = self.minted;
        self.owners.insert(token_id, to);
        self.token_uris.insert(token_id, uri);
        *self.balances.entry(to).or_default() += 1;
        Ok(token_id)
    }

    /// Moves the token from `from` to `to`, clearing its per-token
    /// approval. Authorization is the caller's job; this only enforces
    /// record consistency.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        token_id: TokenId,
    ) -> Result<(), TokenError> {
        let owner = self.owner_of(token_id)?;
        if owner != from {
            return Err(TokenError::WrongOwner);
        }
        if to.is_zero() {
            return Err(TokenError::ZeroRecipient);
        }
        self.token_approvals.remove(&token_id);
        self.owners.insert(token_id, to);
        self.decrement_balance(from);
        *self.balances.entry(to).or_default() += 1;
        Ok(())
    }

    /// Destroys the token and its records.
    pub fn burn(&mut self, token_id: TokenId) -> Result<(), TokenError> {
        let owner = self.owner_of(token_id)?;
        self.owners.remove(&token_id);
        self.token_approvals.remove(&token_id);
        self.token_uris.remove(&token_id);
        self.decrement_balance(owner);
        Ok(())
    }

    /// Sets the per-token approved address. `Address::ZERO` clears it.
    pub fn approve(&mut self, spender: Address, token_id: TokenId) -> Result<(), TokenError> {
        if !self.exists(token_id) {
            return Err(TokenError::UnknownToken(token_id));
        }
        if spender.is_zero() {
            self.token_approvals.remove(&token_id);
        } else {
            self.token_approvals.insert(token_id, spender);
        }
        Ok(())
    }

    /// Grants or revokes operator status for all of `owner`'s tokens.
    pub fn set_operator(&mut self, owner: Address, operator: Address, approved: bool) {
        let set = self.operator_approvals.entry(owner).or_default();
        if approved {
            set.insert(operator);
        } else {
            set.remove(&operator);
        }
    }

    /// Metadata URI of the token.
    pub fn token_uri(&self, token_id: TokenId) -> Result<&str, TokenError> {
        self.token_uris
            .get(&token_id)
            .map(String::as_str)
            .ok_or(TokenError::UnknownToken(token_id))
    }

    /// Replaces the metadata URI of an existing token.
    pub fn set_token_uri(&mut self, token_id: TokenId, uri: String) -> Result<(), TokenError> {
        if !self.exists(token_id) {
            return Err(TokenError::UnknownToken(token_id));
        }
        self.token_uris.insert(token_id, uri);
        Ok(())
    }

    fn decrement_balance(&mut self, holder: Address) {
        if let Some(count) = self.balances.get_mut(&holder) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.balances.remove(&holder);
            }
        }
    }
}
