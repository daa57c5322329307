//! # Ownership Transfer Module
//!
//! Routed operations over the [`OwnershipGuard`](crate::guard::OwnershipGuard):
//! query the current owner and transfer ownership. Intrinsic to the core, but
//! routed like any other module so a deployment can choose not to expose it.

use crate::codec;
use crate::errors::DispatchError;
use crate::frame::Frame;
use crate::module::{Module, OperationDef};
use serde_json::json;
use shared_types::{Address, Bytes, Selector};

/// Canonical signature: query the current owner.
pub const OWNER: &str = "owner()";
/// Canonical signature: transfer ownership to a new address.
pub const TRANSFER_OWNERSHIP: &str = "transfer_ownership(Address)";

/// The routed ownership module.
pub struct OwnershipModule;

impl Module for OwnershipModule {
    fn name(&self) -> &'static str {
        "ownership"
    }

    fn operations(&self) -> Vec<OperationDef> {
        vec![
            OperationDef::new(OWNER),
            OperationDef::new(TRANSFER_OWNERSHIP),
        ]
    }

    fn call(
        &self,
        frame: &mut Frame<'_>,
        selector: Selector,
        payload: &[u8],
    ) -> Result<Bytes, DispatchError> {
        if selector == Selector::from_signature(OWNER) {
            codec::encode(&frame.state.guard().owner())
        } else if selector == Selector::from_signature(TRANSFER_OWNERSHIP) {
            let new_owner: Address = codec::decode(payload)?;
            let caller = frame.caller;
            let previous = frame.state.guard_mut().transfer(caller, new_owner)?;
            frame.emit(
                "OwnershipTransferred",
                json!({
                    "previous": format!("{previous:?}"),
                    "new": format!("{new_owner:?}"),
                }),
            );
            Ok(Bytes::new())
        } else {
            Err(DispatchError::UnknownOperation(selector))
        }
    }
}
