//! # Routed Marketplace Module
//!
//! The operation surface of the marketplace: fixed-price listings over the
//! token collection served by the same router. Ownership and approval checks
//! read the token module's storage region directly, so a listing can never
//! disagree with the token records it was created against.
//!
//! ## Sale ordering
//!
//! `buy_item` deactivates the listing and accrues the fee before any token
//! or value moves. A payment recipient that re-enters the marketplace during
//! its payout therefore observes the sale as already settled, and a payout
//! failure unwinds the whole purchase through the router's snapshot.

use crate::errors::MarketError;
use crate::messages::{
    BuyItemRequest, CancelListingRequest, ListItemRequest, MarketInfo, UpdatePriceRequest,
};
use crate::store::{Listing, MarketStore, MARKET_REGION};
use dispatch_core::codec;
use dispatch_core::errors::DispatchError;
use dispatch_core::frame::Frame;
use dispatch_core::module::{Module, OperationDef};
use module_token::store::{TokenStore, TOKEN_REGION};
use serde_json::json;
use shared_types::{Bytes, Selector, U256};

// =============================================================================
// CANONICAL SIGNATURES
// =============================================================================

/// Configure the marketplace fee. Owner-only, one-shot.
pub const INIT_MARKET: &str = "init_market(u16)";
/// List an owned, approved token at a fixed price.
pub const LIST_ITEM: &str = "list_item(Address,TokenId,U256)";
/// Purchase an active listing. Payable.
pub const BUY_ITEM: &str = "buy_item(u64,Address,TokenId)";
/// Cancel an active listing. Seller-only.
pub const CANCEL_LISTING: &str = "cancel_listing(u64,Address,TokenId)";
/// Reprice an active listing. Seller-only.
pub const UPDATE_LISTING_PRICE: &str = "update_listing_price(u64,U256)";
/// Change the sale fee for future sales. Owner-only.
pub const UPDATE_FEE: &str = "update_fee(u16)";
/// Withdraw the accrued fee pool. Owner-only.
pub const WITHDRAW_FEES: &str = "withdraw_fees()";
/// The listing with an id, active or not.
pub const GET_LISTING: &str = "get_listing(u64)";
/// Fee configuration and pool state.
pub const MARKET_INFO: &str = "market_info()";

/// The routed marketplace module.
pub struct MarketModule;

impl MarketModule {
    fn init(frame: &mut Frame<'_>, payload: &[u8]) -> Result<Bytes, DispatchError> {
        frame.require_owner()?;
        let fee_per_mille: u16 = codec::decode(payload)?;
        tracing::info!(fee_per_mille, "initializing marketplace");
        let store = frame.state.region_mut::<MarketStore>(MARKET_REGION)?;
        store.init(fee_per_mille)?;
        codec::encode(&())
    }

    fn list_item(frame: &mut Frame<'_>, payload: &[u8]) -> Result<Bytes, DispatchError> {
        let request: ListItemRequest = codec::decode(payload)?;
        let seller = frame.caller;
        let router = frame.router;

        if request.collection != router {
            return Err(MarketError::UnknownCollection.into());
        }
        if request.price.is_zero() {
            return Err(MarketError::ZeroPrice.into());
        }

        let tokens = frame.state.region_mut::<TokenStore>(TOKEN_REGION)?;
        if tokens.owner_of(request.token_id)? != seller {
            return Err(MarketError::NotTokenOwner.into());
        }
        // The marketplace must be able to move the token at sale time.
        if tokens.approved_for(request.token_id) != Some(router)
            && !tokens.is_operator(seller, router)
        {
            return Err(MarketError::NotApproved.into());
        }

        let market = frame.state.region_mut::<MarketStore>(MARKET_REGION)?;
        let listing_id =
            market.create_listing(request.collection, request.token_id, seller, request.price);
        frame.emit(
            "ItemListed",
            json!({
                "listing_id": listing_id,
                "collection": request.collection.to_string(),
                "token_id": request.token_id,
                "seller": seller.to_string(),
                "price": request.price.to_string(),
            }),
        );
        codec::encode(&listing_id)
    }

    fn buy_item(frame: &mut Frame<'_>, payload: &[u8]) -> Result<Bytes, DispatchError> {
        let request: BuyItemRequest = codec::decode(payload)?;
        let buyer = frame.caller;
        let value = frame.value;

        let market = frame.state.region_mut::<MarketStore>(MARKET_REGION)?;
        let listing = market.active_listing(request.listing_id)?.clone();
        if listing.collection != request.collection || listing.token_id != request.token_id {
            return Err(MarketError::ListingMismatch.into());
        }
        if value < listing.price {
            return Err(MarketError::InsufficientPayment.into());
        }

        let tokens = frame.state.region_mut::<TokenStore>(TOKEN_REGION)?;
        if tokens.owner_of(listing.token_id)? != listing.seller {
            return Err(MarketError::StaleListing.into());
        }

        // Settle the sale before anything moves: a payout hook that
        // re-enters sees the listing inactive and the fee accrued, and a
        // failure from here on unwinds through the router's snapshot.
        let market = frame.state.region_mut::<MarketStore>(MARKET_REGION)?;
        market.active_listing_mut(request.listing_id)?.active = false;
        let fee = market.fee_for(listing.price);
        market.accrue_fee(fee);

        let tokens = frame.state.region_mut::<TokenStore>(TOKEN_REGION)?;
        tokens.transfer(listing.seller, buyer, listing.token_id)?;

        frame.pay(listing.seller, listing.price - fee)?;
        let overpayment = value - listing.price;
        if !overpayment.is_zero() {
            frame.pay(buyer, overpayment)?;
        }

        frame.emit(
            "ItemSold",
            json!({
                "listing_id": listing.id,
                "collection": listing.collection.to_string(),
                "token_id": listing.token_id,
                "seller": listing.seller.to_string(),
                "buyer": buyer.to_string(),
                "price": listing.price.to_string(),
            }),
        );
        codec::encode(&())
    }

    fn cancel_listing(frame: &mut Frame<'_>, payload: &[u8]) -> Result<Bytes, DispatchError> {
        let request: CancelListingRequest = codec::decode(payload)?;
        let caller = frame.caller;

        let market = frame.state.region_mut::<MarketStore>(MARKET_REGION)?;
        let listing = market.active_listing_mut(request.listing_id)?;
        if listing.collection != request.collection || listing.token_id != request.token_id {
            return Err(MarketError::ListingMismatch.into());
        }
        if listing.seller != caller {
            return Err(MarketError::NotSeller.into());
        }
        listing.active = false;

        frame.emit(
            "ItemCanceled",
            json!({
                "listing_id": request.listing_id,
                "collection": request.collection.to_string(),
                "token_id": request.token_id,
                "seller": caller.to_string(),
            }),
        );
        codec::encode(&())
    }

    fn update_price(frame: &mut Frame<'_>, payload: &[u8]) -> Result<Bytes, DispatchError> {
        let request: UpdatePriceRequest = codec::decode(payload)?;
        let caller = frame.caller;

        if request.price.is_zero() {
            return Err(MarketError::ZeroPrice.into());
        }
        let market = frame.state.region_mut::<MarketStore>(MARKET_REGION)?;
        let listing = market.active_listing_mut(request.listing_id)?;
        if listing.seller != caller {
            return Err(MarketError::NotSeller.into());
        }
        let old_price = listing.price;
        listing.price = request.price;

        frame.emit(
            "PriceUpdated",
            json!({
                "listing_id": request.listing_id,
                "old_price": old_price.to_string(),
                "new_price": request.price.to_string(),
            }),
        );
        codec::encode(&())
    }

    fn update_fee(frame: &mut Frame<'_>, payload: &[u8]) -> Result<Bytes, DispatchError> {
        frame.require_owner()?;
        let fee_per_mille: u16 = codec::decode(payload)?;
        let market = frame.state.region_mut::<MarketStore>(MARKET_REGION)?;
        let old_fee = market.fee_per_mille();
        market.set_fee(fee_per_mille)?;

        frame.emit(
            "FeeUpdated",
            json!({
                "old_fee_per_mille": old_fee,
                "new_fee_per_mille": fee_per_mille,
            }),
        );
        codec::encode(&())
    }

    fn withdraw_fees(frame: &mut Frame<'_>) -> Result<Bytes, DispatchError> {
        frame.require_owner()?;
        let recipient = frame.caller;

        // The pool is zeroed before the payout; a re-entering recipient
        // finds nothing left to withdraw.
        let market = frame.state.region_mut::<MarketStore>(MARKET_REGION)?;
        let amount = market.drain_fees()?;
        frame.pay(recipient, amount)?;

        frame.emit(
            "FeeWithdrawn",
            json!({
                "to": recipient.to_string(),
                "amount": amount.to_string(),
            }),
        );
        codec::encode(&amount)
    }

    fn view(frame: &mut Frame<'_>, selector: Selector, payload: &[u8]) -> Result<Bytes, DispatchError> {
        let market = frame.state.region_mut::<MarketStore>(MARKET_REGION)?;
        if selector == Selector::from_signature(GET_LISTING) {
            let listing_id: u64 = codec::decode(payload)?;
            codec::encode(&market.listing(listing_id).cloned())
        } else if selector == Selector::from_signature(MARKET_INFO) {
            codec::encode(&MarketInfo {
                fee_per_mille: market.fee_per_mille(),
                fee_pool: market.fee_pool(),
                active_listings: market.active_listings().len() as u64,
            })
        } else {
            Err(DispatchError::UnknownOperation(selector))
        }
    }
}

impl Module for MarketModule {
    fn name(&self) -> &'static str {
        "market"
    }

    fn operations(&self) -> Vec<OperationDef> {
        vec![
            OperationDef::new(INIT_MARKET),
            OperationDef::new(LIST_ITEM),
            OperationDef::new(BUY_ITEM),
            OperationDef::new(CANCEL_LISTING),
            OperationDef::new(UPDATE_LISTING_PRICE),
            OperationDef::new(UPDATE_FEE),
            OperationDef::new(WITHDRAW_FEES),
            OperationDef::new(GET_LISTING),
            OperationDef::new(MARKET_INFO),
        ]
    }

    fn call(
        &self,
        frame: &mut Frame<'_>,
        selector: Selector,
        payload: &[u8],
    ) -> Result<Bytes, DispatchError> {
        if selector == Selector::from_signature(INIT_MARKET) {
            Self::init(frame, payload)
        } else if selector == Selector::from_signature(LIST_ITEM) {
            Self::list_item(frame, payload)
        } else if selector == Selector::from_signature(BUY_ITEM) {
            Self::buy_item(frame, payload)
        } else if selector == Selector::from_signature(CANCEL_LISTING) {
            Self::cancel_listing(frame, payload)
        } else if selector == Selector::from_signature(UPDATE_LISTING_PRICE) {
            Self::update_price(frame, payload)
        } else if selector == Selector::from_signature(UPDATE_FEE) {
            Self::update_fee(frame, payload)
        } else if selector == Selector::from_signature(WITHDRAW_FEES) {
            Self::withdraw_fees(frame)
        } else {
            Self::view(frame, selector, payload)
        }
    }
}
