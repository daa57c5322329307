//! # Routed Token Module
//!
//! The operation surface of the token module: canonical signatures, payload
//! decoding, authorization, and event emission. All storage lives in the
//! router's [`TOKEN_REGION`]; this type itself is stateless.
//!
//! ## Operations
//!
//! | Signature | Access | Effect |
//! |-----------|--------|--------|
//! | `init_token(String,String,u64)` | owner | configure the collection, once |
//! | `mint(Address,String)` | owner | mint the next token id |
//! | `transfer(Address,Address,TokenId)` | authorized | move a token |
//! | `approve(Address,TokenId)` | token owner / operator | set per-token approval |
//! | `set_approval_for_all(Address,bool)` | anyone (own tokens) | grant/revoke an operator |
//! | `burn(TokenId)` | authorized | destroy a token |
//! | `set_token_uri(TokenId,String)` | owner | replace a token's metadata URI |
//! | views | anyone | `owner_of`, `get_approved`, `is_approved_for_all`, `token_uri`, `balance_of`, `collection_info` |

use crate::errors::TokenError;
use crate::messages::{
    ApproveRequest, CollectionInfo, InitTokenRequest, MintRequest, OperatorQuery,
    SetApprovalForAllRequest, SetTokenUriRequest, TransferRequest,
};
use crate::store::{TokenStore, TOKEN_REGION};
use dispatch_core::codec;
use dispatch_core::errors::DispatchError;
use dispatch_core::frame::Frame;
use dispatch_core::module::{Module, OperationDef};
use serde_json::json;
use shared_types::{Address, Bytes, Selector, TokenId};

// =============================================================================
// CANONICAL SIGNATURES
// =============================================================================

/// Configure the collection. Owner-only, one-shot.
pub const INIT_TOKEN: &str = "init_token(String,String,u64)";
/// Mint the next token id to a recipient. Owner-only.
pub const MINT: &str = "mint(Address,String)";
/// Move a token between holders.
pub const TRANSFER: &str = "transfer(Address,Address,TokenId)";
/// Set or clear the per-token approved address.
pub const APPROVE: &str = "approve(Address,TokenId)";
/// Grant or revoke operator status over all of the caller's tokens.
pub const SET_APPROVAL_FOR_ALL: &str = "set_approval_for_all(Address,bool)";
/// Destroy a token.
pub const BURN: &str = "burn(TokenId)";
/// Replace a token's metadata URI. Owner-only.
pub const SET_TOKEN_URI: &str = "set_token_uri(TokenId,String)";
/// Owner of a token.
pub const OWNER_OF: &str = "owner_of(TokenId)";
/// Per-token approved address, zero if none.
pub const GET_APPROVED: &str = "get_approved(TokenId)";
/// Whether an operator is approved for a holder.
pub const IS_APPROVED_FOR_ALL: &str = "is_approved_for_all(Address,Address)";
/// Metadata URI of a token.
pub const TOKEN_URI: &str = "token_uri(TokenId)";
/// Token count held by an address.
pub const BALANCE_OF: &str = "balance_of(Address)";
/// Collection metadata and mint progress.
pub const COLLECTION_INFO: &str = "collection_info()";

/// The routed token module.
pub struct TokenModule;

impl TokenModule {
    fn init(frame: &mut Frame<'_>, payload: &[u8]) -> Result<Bytes, DispatchError> {
        frame.require_owner()?;
        let request: InitTokenRequest = codec::decode(payload)?;
        tracing::info!(
            name = %request.name,
            symbol = %request.symbol,
            max_supply = request.max_supply,
            "initializing token collection"
        );
        let store = frame.state.region_mut::<TokenStore>(TOKEN_REGION)?;
        store.init(request.name, request.symbol, request.max_supply)?;
        codec::encode(&())
    }

    fn mint(frame: &mut Frame<'_>, payload: &[u8]) -> Result<Bytes, DispatchError> {
        frame.require_owner()?;
        let request: MintRequest = codec::decode(payload)?;
        let to = request.to;
        let store = frame.state.region_mut::<TokenStore>(TOKEN_REGION)?;
        let token_id = store.mint(to, request.uri)?;
        frame.emit(
            "Transfer",
            json!({
                "from": Address::ZERO.to_string(),
                "to": to.to_string(),
                "token_id": token_id,
            }),
        );
        codec::encode(&token_id)
    }

    fn transfer(frame: &mut Frame<'_>, payload: &[u8]) -> Result<Bytes, DispatchError> {
        let request: TransferRequest = codec::decode(payload)?;
        let caller = frame.caller;
        let store = frame.state.region_mut::<TokenStore>(TOKEN_REGION)?;
        if !store.is_authorized(caller, request.token_id)? {
            return Err(TokenError::NotAuthorized.into());
        }
        store.transfer(request.from, request.to, request.token_id)?;
        frame.emit(
            "Transfer",
            json!({
                "from": request.from.to_string(),
                "to": request.to.to_string(),
                "token_id": request.token_id,
            }),
        );
        codec::encode(&())
    }

    fn approve(frame: &mut Frame<'_>, payload: &[u8]) -> Result<Bytes, DispatchError> {
        let request: ApproveRequest = codec::decode(payload)?;
        let caller = frame.caller;
        let store = frame.state.region_mut::<TokenStore>(TOKEN_REGION)?;
        let owner = store.owner_of(request.token_id)?;
        if caller != owner && !store.is_operator(owner, caller) {
            return Err(TokenError::NotAuthorized.into());
        }
        store.approve(request.spender, request.token_id)?;
        frame.emit(
            "Approval",
            json!({
                "owner": owner.to_string(),
                "approved": request.spender.to_string(),
                "token_id": request.token_id,
            }),
        );
        codec::encode(&())
    }

    fn set_approval_for_all(frame: &mut Frame<'_>, payload: &[u8]) -> Result<Bytes, DispatchError> {
        let request: SetApprovalForAllRequest = codec::decode(payload)?;
        let caller = frame.caller;
        let store = frame.state.region_mut::<TokenStore>(TOKEN_REGION)?;
        store.set_operator(caller, request.operator, request.approved);
        frame.emit(
            "ApprovalForAll",
            json!({
                "owner": caller.to_string(),
                "operator": request.operator.to_string(),
                "approved": request.approved,
            }),
        );
        codec::encode(&())
    }

    fn burn(frame: &mut Frame<'_>, payload: &[u8]) -> Result<Bytes, DispatchError> {
        let token_id: TokenId = codec::decode(payload)?;
        let caller = frame.caller;
        let store = frame.state.region_mut::<TokenStore>(TOKEN_REGION)?;
        if !store.is_authorized(caller, token_id)? {
            return Err(TokenError::NotAuthorized.into());
        }
        let owner = store.owner_of(token_id)?;
        store.burn(token_id)?;
        frame.emit(
            "Transfer",
            json!({
                "from": owner.to_string(),
                "to": Address::ZERO.to_string(),
                "token_id": token_id,
            }),
        );
        codec::encode(&())
    }

    fn set_token_uri(frame: &mut Frame<'_>, payload: &[u8]) -> Result<Bytes, DispatchError> {
        frame.require_owner()?;
        let request: SetTokenUriRequest = codec::decode(payload)?;
        let store = frame.state.region_mut::<TokenStore>(TOKEN_REGION)?;
        store.set_token_uri(request.token_id, request.uri)?;
        codec::encode(&())
    }

    fn view(frame: &mut Frame<'_>, selector: Selector, payload: &[u8]) -> Result<Bytes, DispatchError> {
        let store = frame.state.region_mut::<TokenStore>(TOKEN_REGION)?;
        if selector == Selector::from_signature(OWNER_OF) {
            let token_id: TokenId = codec::decode(payload)?;
            codec::encode(&store.owner_of(token_id)?)
        } else if selector == Selector::from_signature(GET_APPROVED) {
            let token_id: TokenId = codec::decode(payload)?;
            if !store.exists(token_id) {
                return Err(TokenError::UnknownToken(token_id).into());
            }
            codec::encode(&store.approved_for(token_id).unwrap_or(Address::ZERO))
        } else if selector == Selector::from_signature(IS_APPROVED_FOR_ALL) {
            let query: OperatorQuery = codec::decode(payload)?;
            codec::encode(&store.is_operator(query.owner, query.operator))
        } else if selector == Selector::from_signature(TOKEN_URI) {
            let token_id: TokenId = codec::decode(payload)?;
            codec::encode(&store.token_uri(token_id)?.to_owned())
        } else if selector == Selector::from_signature(BALANCE_OF) {
            let holder: Address = codec::decode(payload)?;
            codec::encode(&store.balance_of(holder))
        } else if selector == Selector::from_signature(COLLECTION_INFO) {
            codec::encode(&CollectionInfo {
                name: store.name().to_owned(),
                symbol: store.symbol().to_owned(),
                max_supply: store.max_supply(),
                minted: store.minted(),
            })
        } else {
            Err(DispatchError::UnknownOperation(selector))
        }
    }
}

impl Module for TokenModule {
    fn name(&self) -> &'static str {
        "token"
    }

    fn operations(&self) -> Vec<OperationDef> {
        vec![
            OperationDef::new(INIT_TOKEN),
            OperationDef::new(MINT),
            OperationDef::new(TRANSFER),
            OperationDef::new(APPROVE),
            OperationDef::new(SET_APPROVAL_FOR_ALL),
            OperationDef::new(BURN),
            OperationDef::new(SET_TOKEN_URI),
            OperationDef::new(OWNER_OF),
            OperationDef::new(GET_APPROVED),
            OperationDef::new(IS_APPROVED_FOR_ALL),
            OperationDef::new(TOKEN_URI),
            OperationDef::new(BALANCE_OF),
            OperationDef::new(COLLECTION_INFO),
        ]
    }

    fn call(
        &self,
        frame: &mut Frame<'_>,
        selector: Selector,
        payload: &[u8],
    ) -> Result<Bytes, DispatchError> {
        if selector == Selector::from_signature(INIT_TOKEN) {
            Self::init(frame, payload)
        } else if selector == Selector::from_signature(MINT) {
            Self::mint(frame, payload)
        } else if selector == Selector::from_signature(TRANSFER) {
            Self::transfer(frame, payload)
        } else if selector == Selector::from_signature(APPROVE) {
            Self::approve(frame, payload)
        } else if selector == Selector::from_signature(SET_APPROVAL_FOR_ALL) {
            Self::set_approval_for_all(frame, payload)
        } else if selector == Selector::from_signature(BURN) {
            Self::burn(frame, payload)
        } else if selector == Selector::from_signature(SET_TOKEN_URI) {
            Self::set_token_uri(frame, payload)
        } else {
            Self::view(frame, selector, payload)
        }
    }
}
