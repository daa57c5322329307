//! Request and response payloads for the token module's routed operations.
//! Callers encode these with the wire codec; field order is the canonical
//! argument order of each operation's signature.

use serde::{Deserialize, Serialize};
use shared_types::{Address, TokenId};

/// Payload of `init_token(String,String,u64)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitTokenRequest {
    /// Collection name.
    pub name: String,
    /// Collection symbol.
    pub symbol: String,
    /// Hard mint ceiling.
    pub max_supply: u64,
}

/// Payload of `mint(Address,String)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    /// Recipient of the new token.
    pub to: Address,
    /// Metadata URI for the new token.
    pub uri: String,
}

/// Payload of `transfer(Address,Address,TokenId)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Current owner of the token.
    pub from: Address,
    /// Recipient.
    pub to: Address,
    /// The token to move.
    pub token_id: TokenId,
}

/// Payload of `approve(Address,TokenId)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveRequest {
    /// Address granted single-token spending rights; zero clears.
    pub spender: Address,
    /// The token being approved.
    pub token_id: TokenId,
}

/// Payload of `set_approval_for_all(Address,bool)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetApprovalForAllRequest {
    /// The operator whose status changes.
    pub operator: Address,
    /// Grant or revoke.
    pub approved: bool,
}

/// Payload of `set_token_uri(TokenId,String)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetTokenUriRequest {
    /// The token whose metadata changes.
    pub token_id: TokenId,
    /// The replacement URI.
    pub uri: String,
}

/// Payload of `is_approved_for_all(Address,Address)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorQuery {
    /// The token holder.
    pub owner: Address,
    /// The candidate operator.
    pub operator: Address,
}

/// Response of `collection_info()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    /// Collection name.
    pub name: String,
    /// Collection symbol.
    pub symbol: String,
    /// Hard mint ceiling.
    pub max_supply: u64,
    /// Tokens minted so far (burns do not decrement).
    pub minted: u64,
}
