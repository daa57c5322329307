//! End-to-end marketplace flows across the token and market modules: the
//! full list → buy → withdraw lifecycle, with the ledger checked at every
//! step.

use crate::harness::{TestBed, BUYER, OWNER, ROUTER_ADDR, SELLER, STRANGER};
use dispatch_core::codec;
use dispatch_core::errors::DispatchError;
use module_market::messages::{CancelListingRequest, UpdatePriceRequest};
use module_market::module as market_ops;
use module_market::{Listing, MarketInfo};
use module_token::messages::SetApprovalForAllRequest;
use module_token::module as token_ops;
use shared_types::U256;

const PRICE: u64 = 10_000;
const FEE: u64 = 250; // 2.5% of 10_000

#[test]
fn test_full_sale_lifecycle() {
    let mut bed = TestBed::new();
    let (listing_id, token_id) = bed.listed_token(SELLER, PRICE);
    bed.fund(BUYER, PRICE);

    bed.buy(BUYER, listing_id, token_id, PRICE).unwrap();

    assert_eq!(bed.token_owner(token_id), BUYER);
    assert_eq!(bed.balance(SELLER), U256::from(PRICE - FEE));
    assert_eq!(bed.balance(BUYER), U256::zero());
    assert_eq!(bed.balance(ROUTER_ADDR), U256::from(FEE));

    let bytes = bed.call(OWNER, market_ops::WITHDRAW_FEES, &[]).unwrap();
    assert_eq!(codec::decode::<U256>(&bytes).unwrap(), U256::from(FEE));
    assert_eq!(bed.balance(OWNER), U256::from(FEE));
    assert_eq!(bed.balance(ROUTER_ADDR), U256::zero());

    let names = bed.event_names();
    for expected in ["ItemListed", "ItemSold", "FeeWithdrawn"] {
        assert!(names.contains(&expected), "missing event {expected}");
    }
}

#[test]
fn test_operator_approval_supports_listing() {
    let mut bed = TestBed::new();
    let token_id = bed.mint(SELLER);
    // Blanket operator approval instead of the per-token one.
    let payload = codec::encode(&SetApprovalForAllRequest {
        operator: ROUTER_ADDR,
        approved: true,
    })
    .unwrap();
    bed.call(SELLER, token_ops::SET_APPROVAL_FOR_ALL, &payload)
        .unwrap();

    let listing_id = bed.list(SELLER, token_id, PRICE);
    bed.fund(BUYER, PRICE);
    bed.buy(BUYER, listing_id, token_id, PRICE).unwrap();
    assert_eq!(bed.token_owner(token_id), BUYER);
}

#[test]
fn test_resale_accrues_fees_cumulatively() {
    let mut bed = TestBed::new();
    let (first, token_id) = bed.listed_token(SELLER, PRICE);
    bed.fund(BUYER, PRICE);
    bed.buy(BUYER, first, token_id, PRICE).unwrap();

    // The buyer turns around and relists at double the price.
    bed.approve_market(BUYER, token_id);
    let second = bed.list(BUYER, token_id, 2 * PRICE);
    bed.fund(STRANGER, 2 * PRICE);
    bed.buy(STRANGER, second, token_id, 2 * PRICE).unwrap();

    assert_eq!(bed.token_owner(token_id), STRANGER);
    let info: MarketInfo = bed.query(STRANGER, market_ops::MARKET_INFO, &[]);
    assert_eq!(info.fee_pool, U256::from(3 * FEE));
    assert_eq!(info.active_listings, 0);
}

#[test]
fn test_cancel_then_relist_uses_fresh_id() {
    let mut bed = TestBed::new();
    let (listing_id, token_id) = bed.listed_token(SELLER, PRICE);

    let payload = codec::encode(&CancelListingRequest {
        listing_id,
        collection: ROUTER_ADDR,
        token_id,
    })
    .unwrap();
    bed.call(SELLER, market_ops::CANCEL_LISTING, &payload)
        .unwrap();

    let relisted = bed.list(SELLER, token_id, PRICE / 2);
    assert_eq!(relisted, listing_id + 1);

    // The old id still resolves, inactive; the new one is live.
    let query = codec::encode(&listing_id).unwrap();
    let old: Option<Listing> = bed.query(STRANGER, market_ops::GET_LISTING, &query);
    assert!(!old.unwrap().active);

    bed.fund(BUYER, PRICE / 2);
    bed.buy(BUYER, relisted, token_id, PRICE / 2).unwrap();
    assert_eq!(bed.token_owner(token_id), BUYER);
}

#[test]
fn test_fee_change_applies_to_later_sales_only() {
    let mut bed = TestBed::new();
    let (first, first_token) = bed.listed_token(SELLER, PRICE);
    bed.fund(BUYER, PRICE);
    bed.buy(BUYER, first, first_token, PRICE).unwrap();

    let payload = codec::encode(&100u16).unwrap();
    bed.call(OWNER, market_ops::UPDATE_FEE, &payload).unwrap();

    let (second, second_token) = bed.listed_token(SELLER, PRICE);
    bed.fund(STRANGER, PRICE);
    bed.buy(STRANGER, second, second_token, PRICE).unwrap();

    let info: MarketInfo = bed.query(STRANGER, market_ops::MARKET_INFO, &[]);
    // 2.5% of the first sale, 10% of the second.
    assert_eq!(info.fee_pool, U256::from(FEE + PRICE / 10));
}

#[test]
fn test_failed_purchase_leaves_everything_untouched() {
    let mut bed = TestBed::new();
    let (listing_id, token_id) = bed.listed_token(SELLER, PRICE);
    bed.fund(BUYER, PRICE - 1);

    // The buyer can attach at most what they hold; with a full price attach
    // the ledger move itself fails, with less the marketplace rejects.
    let err = bed.buy(BUYER, listing_id, token_id, PRICE).unwrap_err();
    assert!(matches!(err, DispatchError::Transfer { .. }));
    let err = bed.buy(BUYER, listing_id, token_id, PRICE - 1).unwrap_err();
    assert_eq!(err, DispatchError::Domain("Insufficient payment".into()));

    assert_eq!(bed.token_owner(token_id), SELLER);
    assert_eq!(bed.balance(BUYER), U256::from(PRICE - 1));
    let query = codec::encode(&listing_id).unwrap();
    let listing: Option<Listing> = bed.query(STRANGER, market_ops::GET_LISTING, &query);
    assert!(listing.unwrap().active);
}

#[test]
fn test_fee_split_is_exact_for_arbitrary_prices() {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let price: u64 = rng.gen_range(1..1_000_000);
        let overpay: u64 = rng.gen_range(0..1_000);

        let mut bed = TestBed::new();
        let (listing_id, token_id) = bed.listed_token(SELLER, price);
        bed.fund(BUYER, price + overpay);
        bed.buy(BUYER, listing_id, token_id, price + overpay).unwrap();

        let fee = price * 25 / 1000;
        assert_eq!(bed.balance(SELLER), U256::from(price - fee));
        assert_eq!(bed.balance(BUYER), U256::from(overpay));
        assert_eq!(bed.balance(ROUTER_ADDR), U256::from(fee));
    }
}

#[test]
fn test_reprice_changes_the_required_payment() {
    let mut bed = TestBed::new();
    let (listing_id, token_id) = bed.listed_token(SELLER, PRICE);

    let payload = codec::encode(&UpdatePriceRequest {
        listing_id,
        price: U256::from(3 * PRICE),
    })
    .unwrap();
    bed.call(SELLER, market_ops::UPDATE_LISTING_PRICE, &payload)
        .unwrap();

    bed.fund(BUYER, 3 * PRICE);
    let err = bed.buy(BUYER, listing_id, token_id, PRICE).unwrap_err();
    assert_eq!(err, DispatchError::Domain("Insufficient payment".into()));
    bed.buy(BUYER, listing_id, token_id, 3 * PRICE).unwrap();
    assert_eq!(bed.balance(SELLER), U256::from(3 * PRICE - 3 * FEE));
}
