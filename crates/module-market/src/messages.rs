//! Request and response payloads for the marketplace's routed operations.

use serde::{Deserialize, Serialize};
use shared_types::{Address, TokenId, U256};

/// Payload of `list_item(Address,TokenId,U256)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItemRequest {
    /// The collection the token belongs to. Must be this marketplace's own
    /// collection.
    pub collection: Address,
    /// The token to list.
    pub token_id: TokenId,
    /// Asking price. Must be nonzero.
    pub price: U256,
}

/// Payload of `buy_item(u64,Address,TokenId)`. Collection and token id are
/// repeated so a buyer cannot be sold a different token than the one they
/// inspected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyItemRequest {
    /// The listing being purchased.
    pub listing_id: u64,
    /// Expected collection.
    pub collection: Address,
    /// Expected token id.
    pub token_id: TokenId,
}

/// Payload of `cancel_listing(u64,Address,TokenId)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelListingRequest {
    /// The listing being canceled.
    pub listing_id: u64,
    /// Expected collection.
    pub collection: Address,
    /// Expected token id.
    pub token_id: TokenId,
}

/// Payload of `update_listing_price(u64,U256)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePriceRequest {
    /// The listing being repriced.
    pub listing_id: u64,
    /// The new asking price. Must be nonzero.
    pub price: U256,
}

/// Response of `market_info()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketInfo {
    /// Current sale fee in per-mille.
    pub fee_per_mille: u16,
    /// Accrued, not-yet-withdrawn fees.
    pub fee_pool: U256,
    /// Number of currently active listings.
    pub active_listings: u64,
}
