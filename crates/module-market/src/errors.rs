//! # Marketplace Errors
//!
//! Business-rule violations in the marketplace module. Display strings are
//! part of the external surface; clients match on them, so they stay stable
//! across upgrades.

use dispatch_core::errors::DispatchError;
use thiserror::Error;

/// Marketplace-domain validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarketError {
    /// `init_market` was called twice.
    #[error("marketplace already initialized")]
    AlreadyInitialized,

    /// Listing or repricing at zero.
    #[error("Price must be greater than zero")]
    ZeroPrice,

    /// Listing a token from a collection this marketplace does not manage.
    #[error("unknown collection")]
    UnknownCollection,

    /// The caller does not own the token being listed.
    #[error("Not the owner")]
    NotTokenOwner,

    /// The marketplace has neither a per-token approval nor operator status
    /// for the token being listed.
    #[error("NFT not approved")]
    NotApproved,

    /// The listing id does not exist or the listing is inactive.
    #[error("Item not listed")]
    NotListed,

    /// The collection or token id in the request does not match the listing.
    #[error("listing does not match collection and token")]
    ListingMismatch,

    /// Attached value below the listing price.
    #[error("Insufficient payment")]
    InsufficientPayment,

    /// The seller parted with the token after listing it.
    #[error("seller no longer owns the token")]
    StaleListing,

    /// Only the seller may cancel or reprice a listing.
    #[error("Not the seller")]
    NotSeller,

    /// Fee above the hard per-mille cap.
    #[error("Fee too high")]
    FeeTooHigh,

    /// Withdrawal with an empty fee pool.
    #[error("No fees to withdraw")]
    NoFees,
}

impl From<MarketError> for DispatchError {
    fn from(err: MarketError) -> Self {
        DispatchError::Domain(err.to_string())
    }
}
