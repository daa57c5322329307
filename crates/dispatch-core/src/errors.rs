//! # Error Types
//!
//! The failure taxonomy every routed call resolves into. A failure at any
//! depth of a call chain aborts and reverts the whole chain; nothing in the
//! core retries or recovers locally.

use shared_types::{Address, Selector, U256};
use thiserror::Error;

// =============================================================================
// DISPATCH ERRORS
// =============================================================================

/// Errors produced by the router, the registry, the cut controller, or a
/// routed module.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The registry has no owner for the requested selector.
    #[error("unknown operation: {0}")]
    UnknownOperation(Selector),

    /// Caller is not the contract owner.
    #[error("unauthorized: caller {caller} is not the contract owner")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// A cut tried to add a selector that already has an owner.
    #[error("selector conflict: {selector} is already owned by module {owner}")]
    SelectorConflict {
        /// The colliding selector.
        selector: Selector,
        /// The module that currently owns it.
        owner: Address,
    },

    /// A cut named the zero address as a module to add.
    #[error("cut names the zero address as a module")]
    NullModule,

    /// The replace action is disabled in this implementation.
    #[error("replace action is not supported")]
    ReplaceUnsupported,

    /// The cut initializer was malformed.
    #[error("invalid init: {0}")]
    InvalidInit(#[from] InitViolation),

    /// A business-rule violation inside a domain module.
    #[error("domain validation failed: {0}")]
    Domain(String),

    /// A forwarded payment or value movement did not complete.
    #[error("transfer of {amount} to {to} failed: {reason}")]
    Transfer {
        /// Intended recipient.
        to: Address,
        /// Amount that failed to move.
        amount: U256,
        /// Why the transfer failed.
        reason: String,
    },

    /// Call payload could not be decoded.
    #[error("malformed call payload: {0}")]
    Codec(String),
}

impl DispatchError {
    /// Shorthand for a domain validation failure with the given reason.
    #[must_use]
    pub fn domain(reason: impl Into<String>) -> Self {
        Self::Domain(reason.into())
    }
}

// =============================================================================
// INIT VIOLATIONS
// =============================================================================

/// Ways the one-shot initializer attached to a cut can be malformed. Each of
/// these guards against a forgotten or miswired migration step silently
/// doing nothing.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InitViolation {
    /// An init payload was supplied but the target is the null reference.
    #[error("init payload supplied without an init target")]
    PayloadWithoutTarget,

    /// An init target was supplied but the payload is empty or shorter than
    /// a selector.
    #[error("init target supplied without a callable payload")]
    TargetWithoutPayload,

    /// No module code is installed at the init target.
    #[error("init target {0} has no code installed")]
    MissingTargetCode(Address),
}
