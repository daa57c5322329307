//! Hostile payment recipients: sellers and owners whose payout hooks
//! reject. Every failure must unwind the whole routed call — no token moves,
//! no fee sticks, no listing flips.

use crate::harness::{RejectingSink, TestBed, BUYER, OWNER, SELLER, STRANGER};
use dispatch_core::codec;
use dispatch_core::errors::DispatchError;
use module_market::module as market_ops;
use module_market::{Listing, MarketInfo};
use shared_types::U256;

const PRICE: u64 = 1000;
const FEE: u64 = 25;

#[test]
fn test_rejecting_seller_unwinds_the_whole_sale() {
    let mut bed = TestBed::new();
    let (listing_id, token_id) = bed.listed_token(SELLER, PRICE);
    bed.router.install_sink(SELLER, RejectingSink);
    bed.fund(BUYER, PRICE);

    let err = bed.buy(BUYER, listing_id, token_id, PRICE).unwrap_err();
    assert!(matches!(err, DispatchError::Transfer { .. }));

    // Token, funds, listing, and fee pool all exactly as before.
    assert_eq!(bed.token_owner(token_id), SELLER);
    assert_eq!(bed.balance(BUYER), U256::from(PRICE));
    assert_eq!(bed.balance(SELLER), U256::zero());
    let query = codec::encode(&listing_id).unwrap();
    let listing: Option<Listing> = bed.query(STRANGER, market_ops::GET_LISTING, &query);
    assert!(listing.unwrap().active);
    let info: MarketInfo = bed.query(STRANGER, market_ops::MARKET_INFO, &[]);
    assert_eq!(info.fee_pool, U256::zero());
}

#[test]
fn test_rejecting_buyer_refund_unwinds_the_whole_sale() {
    let mut bed = TestBed::new();
    let (listing_id, token_id) = bed.listed_token(SELLER, PRICE);
    // The buyer overpays and refuses the refund; the sale must fail rather
    // than keep the difference.
    bed.router.install_sink(BUYER, RejectingSink);
    bed.fund(BUYER, PRICE + 500);

    let err = bed
        .buy(BUYER, listing_id, token_id, PRICE + 500)
        .unwrap_err();
    assert!(matches!(err, DispatchError::Transfer { .. }));

    assert_eq!(bed.token_owner(token_id), SELLER);
    assert_eq!(bed.balance(BUYER), U256::from(PRICE + 500));
    let query = codec::encode(&listing_id).unwrap();
    let listing: Option<Listing> = bed.query(STRANGER, market_ops::GET_LISTING, &query);
    assert!(listing.unwrap().active);
}

#[test]
fn test_exact_payment_never_touches_a_rejecting_buyer() {
    let mut bed = TestBed::new();
    let (listing_id, token_id) = bed.listed_token(SELLER, PRICE);
    // No refund is due at the exact price, so the hostile hook never runs.
    bed.router.install_sink(BUYER, RejectingSink);
    bed.fund(BUYER, PRICE);

    bed.buy(BUYER, listing_id, token_id, PRICE).unwrap();
    assert_eq!(bed.token_owner(token_id), BUYER);
}

#[test]
fn test_rejecting_owner_keeps_fees_in_the_pool() {
    let mut bed = TestBed::new();
    let (listing_id, token_id) = bed.listed_token(SELLER, PRICE);
    bed.fund(BUYER, PRICE);
    bed.buy(BUYER, listing_id, token_id, PRICE).unwrap();

    bed.router.install_sink(OWNER, RejectingSink);
    let err = bed.call(OWNER, market_ops::WITHDRAW_FEES, &[]).unwrap_err();
    assert!(matches!(err, DispatchError::Transfer { .. }));

    // The drained pool was restored with the rest of the state.
    let info: MarketInfo = bed.query(STRANGER, market_ops::MARKET_INFO, &[]);
    assert_eq!(info.fee_pool, U256::from(FEE));
    assert_eq!(bed.balance(OWNER), U256::zero());
}
