//! # Token Module
//!
//! A routed non-fungible token collection: sequential minting under a hard
//! supply cap, single-owner transfer with per-token and operator approvals,
//! burning, and per-token metadata URIs.
//!
//! The module holds no state of its own. Everything lives in the router's
//! [`store::TOKEN_REGION`] storage region, which the marketplace module
//! reads and writes as well — listings check ownership and approvals against
//! the same records a direct token call sees.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod errors;
pub mod messages;
pub mod module;
pub mod store;

pub use errors::TokenError;
pub use messages::{
    ApproveRequest, CollectionInfo, InitTokenRequest, MintRequest, OperatorQuery,
    SetApprovalForAllRequest, SetTokenUriRequest, TransferRequest,
};
pub use module::TokenModule;
pub use store::{TokenStore, TOKEN_REGION};
