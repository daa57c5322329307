//! # Dispatch Core — Proxy Router & Upgrade Machinery
//!
//! ## Purpose
//!
//! Makes many independently deployable modules behave as one atomic object:
//! a stable proxy router resolves each inbound operation selector through a
//! registry and forwards execution into the owning module while preserving
//! the router's own storage context. Upgrades are atomic batches of registry
//! changes (cuts) with an optional one-shot initializer.
//!
//! ## Core Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | One owner per selector, no silent overwrite | `registry.rs` — `Registry::add` |
//! | Module known iff it owns ≥ 1 selector | `registry.rs` — `Registry::add`/`remove` |
//! | Failed batch leaves registry unchanged | `cut.rs` — candidate-then-swap |
//! | Failed call leaves no observable state change | `router.rs` — snapshot restore |
//! | Router usable from birth | `router.rs` — cut module pre-registered |
//!
//! ## Execution Model
//!
//! Strictly single-threaded: one inbound call runs to completion, nested
//! forwarded calls included, before the next is admitted. External
//! serialization is the host's job; nothing here locks. Reentrancy through
//! payment sinks is answered by ordering (value-bearing state mutates before
//! any payment is forwarded), not by locking.
//!
//! ## Usage Example
//!
//! ```ignore
//! use dispatch_core::prelude::*;
//!
//! let mut router = Router::new(config, cut_address, CutModule);
//! router.install(token_address, TokenModule);
//! // Register the token module's operations through a routed cut…
//! let result = router.invoke(caller, value, selector, &payload)?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod codec;
pub mod cut;
pub mod errors;
pub mod events;
pub mod frame;
pub mod guard;
pub mod invariants;
pub mod module;
pub mod ownership;
pub mod registry;
pub mod router;
pub mod state;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::codec;
    pub use crate::cut::{apply, CutAction, CutChange, CutModule, CutRequest, InitCall, APPLY_CUT};
    pub use crate::errors::{DispatchError, InitViolation};
    pub use crate::events::Event;
    pub use crate::frame::{Frame, MAX_CALL_DEPTH};
    pub use crate::guard::OwnershipGuard;
    pub use crate::invariants::check_all;
    pub use crate::module::{Module, OperationDef, PaymentSink};
    pub use crate::ownership::{OwnershipModule, OWNER, TRANSFER_OWNERSHIP};
    pub use crate::registry::Registry;
    pub use crate::router::{CodeTable, Router, RouterConfig};
    pub use crate::state::{Ledger, Region, StateError, SystemState};

    pub use shared_types::{Address, Bytes, Selector, TokenId, U256};
}
