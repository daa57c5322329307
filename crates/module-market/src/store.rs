//! # Marketplace Storage Region
//!
//! Listings, fee configuration, and the accrued fee pool. Lives under
//! [`MARKET_REGION`] in the router's state, next to (but separate from) the
//! token module's region.
//!
//! Listing ids are assigned sequentially from 1 and never reused. A sold or
//! canceled listing stays in the map with `active = false` so past ids keep
//! resolving.

use crate::errors::MarketError;
use serde::{Deserialize, Serialize};
use shared_types::{Address, TokenId, U256};
use std::collections::BTreeMap;

/// Name of the marketplace storage region.
pub const MARKET_REGION: &str = "market.store";

/// Hard ceiling on the sale fee, in per-mille (100 = 10%).
pub const MAX_FEE_PER_MILLE: u16 = 100;

/// One fixed-price listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Sequential listing id, starting at 1.
    pub id: u64,
    /// The collection the token belongs to.
    pub collection: Address,
    /// The listed token.
    pub token_id: TokenId,
    /// The address that created the listing.
    pub seller: Address,
    /// Asking price.
    pub price: U256,
    /// False once sold or canceled.
    pub active: bool,
}

/// All marketplace records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketStore {
    initialized: bool,
    fee_per_mille: u16,
    fee_pool: U256,
    next_listing_id: u64,
    listings: BTreeMap<u64, Listing>,
}

impl MarketStore {
    /// Configures the marketplace. One-shot.
    pub fn init(&mut self, fee_per_mille: u16) -> Result<(), MarketError> {
        if self.initialized {
            return Err(MarketError::AlreadyInitialized);
        }
        if fee_per_mille > MAX_FEE_PER_MILLE {
            return Err(MarketError::FeeTooHigh);
        }
        self.initialized = true;
        self.fee_per_mille = fee_per_mille;
        Ok(())
    }

    /// Whether `init` has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Current sale fee in per-mille.
    #[must_use]
    pub fn fee_per_mille(&self) -> u16 {
        self.fee_per_mille
    }

    /// Replaces the sale fee. Applies to future sales only.
    pub fn set_fee(&mut self, fee_per_mille: u16) -> Result<(), MarketError> {
        if fee_per_mille > MAX_FEE_PER_MILLE {
            return Err(MarketError::FeeTooHigh);
        }
        self.fee_per_mille = fee_per_mille;
        Ok(())
    }

    /// The marketplace's cut of `price` at the current fee.
    #[must_use]
    pub fn fee_for(&self, price: U256) -> U256 {
        price * U256::from(self.fee_per_mille) / U256::from(1000u64)
    }

    /// Accrued, not-yet-withdrawn fees.
    #[must_use]
    pub fn fee_pool(&self) -> U256 {
        self.fee_pool
    }

    /// Adds `amount` to the fee pool.
    pub fn accrue_fee(&mut self, amount: U256) {
        self.fee_pool = self.fee_pool.saturating_add(amount);
    }

    /// Empties the fee pool, returning what was in it.
    pub fn drain_fees(&mut self) -> Result<U256, MarketError> {
        if self.fee_pool.is_zero() {
            return Err(MarketError::NoFees);
        }
        Ok(std::mem::take(&mut self.fee_pool))
    }

    /// Records a new active listing and returns its id.
    pub fn create_listing(
        &mut self,
        collection: Address,
        token_id: TokenId,
        seller: Address,
        price: U256,
    ) -> u64 {
        self.next_listing_id += 1;
        let id = self.next_listing_id;
        self.listings.insert(
            id,
            Listing {
                id,
                collection,
                token_id,
                seller,
                price,
                active: true,
            },
        );
        id
    }

    /// The listing with this id, active or not.
    #[must_use]
    pub fn listing(&self, id: u64) -> Option<&Listing> {
        self.listings.get(&id)
    }

    /// The active listing with this id.
    pub fn active_listing(&self, id: u64) -> Result<&Listing, MarketError> {
        self.listings
            .get(&id)
            .filter(|listing| listing.active)
            .ok_or(MarketError::NotListed)
    }

    /// Mutable access to the active listing with this id.
    pub fn active_listing_mut(&mut self, id: u64) -> Result<&mut Listing, MarketError> {
        self.listings
            .get_mut(&id)
            .filter(|listing| listing.active)
            .ok_or(MarketError::NotListed)
    }

    /// All listings still active, in id order.
    #[must_use]
    pub fn active_listings(&self) -> Vec<&Listing> {
        self.listings
            .values()
            .filter(|listing| listing.active)
            .collect()
    }
}
