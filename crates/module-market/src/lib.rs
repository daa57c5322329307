//! # Marketplace Module
//!
//! A routed fixed-price marketplace over the token collection behind the
//! same router: list, buy, cancel, reprice, plus owner-controlled fee
//! configuration and withdrawal.
//!
//! Because both modules execute against the router's state, every ownership
//! and approval check reads the token module's live records. The sale path
//! settles listing state and fee accrual before any value moves, so payout
//! hooks that re-enter observe a finished sale.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod errors;
pub mod messages;
pub mod module;
pub mod store;

pub use errors::MarketError;
pub use messages::{
    BuyItemRequest, CancelListingRequest, ListItemRequest, MarketInfo, UpdatePriceRequest,
};
pub use module::MarketModule;
pub use store::{Listing, MarketStore, MARKET_REGION, MAX_FEE_PER_MILLE};
