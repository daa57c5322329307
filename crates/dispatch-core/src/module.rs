//! # Module Contract
//!
//! The seam between the dispatch core and everything routed through it. A
//! module owns no state: it declares the operations it implements and
//! executes them against the shared state handed to it through the call
//! frame.

use crate::errors::DispatchError;
use crate::frame::Frame;
use shared_types::{Address, Bytes, Selector, U256};

/// One operation a module implements: the canonical signature it is known
/// by and the selector derived from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperationDef {
    /// Canonical signature, e.g. `transfer(Address,Address,TokenId)`.
    pub signature: &'static str,
    /// Selector derived from the signature.
    pub selector: Selector,
}

impl OperationDef {
    /// Derives the definition for a canonical signature.
    #[must_use]
    pub fn new(signature: &'static str) -> Self {
        Self {
            signature,
            selector: Selector::from_signature(signature),
        }
    }
}

/// An independently deployable unit implementing one or more routed
/// operations against shared state.
pub trait Module {
    /// Human-readable module name, used in logs and events.
    fn name(&self) -> &'static str;

    /// The operations this module implements. Deployment tooling reads this
    /// manifest to build the cut that registers the module.
    fn operations(&self) -> Vec<OperationDef>;

    /// Executes one operation. `selector` is guaranteed to be one the
    /// registry routed here, but the module must still reject selectors it
    /// does not recognize.
    fn call(
        &self,
        frame: &mut Frame<'_>,
        selector: Selector,
        payload: &[u8],
    ) -> Result<Bytes, DispatchError>;

    /// Convenience: just the selectors from [`operations`](Self::operations).
    fn selectors(&self) -> Vec<Selector> {
        self.operations().iter().map(|op| op.selector).collect()
    }
}

/// A payment recipient that is itself callable code. Registered per address
/// in the router's code table; the hook runs synchronously inside the
/// paying call chain and may re-enter the router. Returning an error rejects
/// the payment, failing the enclosing transfer.
pub trait PaymentSink {
    /// Invoked after the ledger has moved `amount` to this sink's address.
    fn on_payment(
        &self,
        frame: &mut Frame<'_>,
        from: Address,
        amount: U256,
    ) -> Result<(), DispatchError>;
}
