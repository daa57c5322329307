//! # Token Errors
//!
//! Business-rule violations in the token module. All of them cross the
//! module seam as `DispatchError::Domain`.

use dispatch_core::errors::DispatchError;
use shared_types::TokenId;
use thiserror::Error;

/// Token-domain validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// `init_token` was called twice.
    #[error("collection already initialized")]
    AlreadyInitialized,

    /// The token id does not exist (never minted, or burned).
    #[error("invalid token id: {0}")]
    UnknownToken(TokenId),

    /// Caller is neither the token owner, the approved address, nor an
    /// approved operator.
    #[error("caller is not token owner or approved")]
    NotAuthorized,

    /// Mint or transfer to the zero address.
    #[error("transfer to the zero address")]
    ZeroRecipient,

    /// The stated sender does not own the token.
    #[error("transfer from incorrect owner")]
    WrongOwner,

    /// Minting past the configured maximum supply.
    #[error("max supply reached: {max}")]
    MaxSupplyReached {
        /// The configured ceiling.
        max: u64,
    },
}

impl From<TokenError> for DispatchError {
    fn from(err: TokenError) -> Self {
        DispatchError::Domain(err.to_string())
    }
}
