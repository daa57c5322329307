//! # Call Frame
//!
//! The execution context handed to every module operation. A frame carries
//! the mutable borrow of the router's [`SystemState`] plus the immutable
//! code tables, so a module's reads and writes land on the router's state —
//! never on state of its own. Nested forwarded calls are child frames over
//! the same borrow; a failure at any depth propagates up as a plain `Err`
//! and the router's snapshot undoes the whole chain.

use crate::errors::{DispatchError, InitViolation};
use crate::events::Event;
use crate::router::CodeTable;
use crate::state::SystemState;
use serde_json::Value;
use shared_types::{Address, Bytes, Selector, U256};

/// Maximum nesting depth for forwarded calls. Far beyond anything the
/// domain modules produce; exists to turn a dispatch cycle into a clean
/// failure instead of a stack overflow.
pub const MAX_CALL_DEPTH: u16 = 64;

/// Execution context for one routed call.
pub struct Frame<'a> {
    /// The router's persistent state.
    pub state: &'a mut SystemState,
    code: &'a CodeTable,
    /// The router's own address — the identity every caller observes.
    pub router: Address,
    /// The caller of this frame.
    pub caller: Address,
    /// Value attached to this call.
    pub value: U256,
    /// Nesting depth; 0 for the inbound call.
    pub depth: u16,
}

impl<'a> Frame<'a> {
    /// Root frame for an inbound call. The router builds one per dispatch;
    /// module unit tests may build their own over a scratch state.
    pub fn new(
        state: &'a mut SystemState,
        code: &'a CodeTable,
        router: Address,
        caller: Address,
        value: U256,
    ) -> Self {
        Self {
            state,
            code,
            router,
            caller,
            value,
            depth: 0,
        }
    }

    /// Child frame for a nested call. Borrows this frame's state, so the
    /// child must be dropped before the parent continues.
    pub fn child(&mut self, caller: Address, value: U256) -> Frame<'_> {
        Frame {
            state: &mut *self.state,
            code: self.code,
            router: self.router,
            caller,
            value,
            depth: self.depth.saturating_add(1),
        }
    }

    /// Resolves `selector` through the registry and executes the owning
    /// module in this frame. The dispatch path for the current call.
    pub fn dispatch(&mut self, selector: Selector, payload: &[u8]) -> Result<Bytes, DispatchError> {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(DispatchError::domain("call depth exceeded"));
        }
        let target = self
            .state
            .registry()
            .resolve(selector)
            .ok_or(DispatchError::UnknownOperation(selector))?;
        let module = self
            .code
            .module(target)
            .ok_or(DispatchError::UnknownOperation(selector))?;
        tracing::debug!(
            module = module.name(),
            target = %target,
            selector = %selector,
            depth = self.depth,
            "forwarding call"
        );
        module.call(self, selector, payload)
    }

    /// Nested routed call with a fresh caller identity. Used by payment
    /// sinks re-entering the system. Carries no value movement; the ledger
    /// only moves on inbound calls and explicit [`pay`](Self::pay).
    pub fn route(
        &mut self,
        caller: Address,
        selector: Selector,
        payload: &[u8],
    ) -> Result<Bytes, DispatchError> {
        let mut child = self.child(caller, U256::zero());
        child.dispatch(selector, payload)
    }

    /// Direct call into installed module code, bypassing the registry. The
    /// cut controller uses this for one-shot initializers, which need not be
    /// routed yet. `calldata` is selector-prefixed.
    ///
    /// The current caller identity carries through, so an owner-gated
    /// initializer invoked from an owner-gated cut passes its guard.
    pub fn call_code(&mut self, target: Address, calldata: &[u8]) -> Result<Bytes, DispatchError> {
        let module = self
            .code
            .module(target)
            .ok_or(DispatchError::InvalidInit(InitViolation::MissingTargetCode(
                target,
            )))?;
        let (selector, payload) = Selector::split_calldata(calldata)
            .ok_or(DispatchError::InvalidInit(InitViolation::TargetWithoutPayload))?;
        let caller = self.caller;
        let mut child = self.child(caller, U256::zero());
        module.call(&mut child, selector, payload)
    }

    /// Forwards `amount` from the router to `to`.
    ///
    /// The ledger moves first; if the recipient is callable code its payment
    /// hook then runs inside this call chain and may reject or re-enter.
    /// Either failure surfaces as [`DispatchError::Transfer`] — callers must
    /// propagate it so the enclosing operation fails atomically.
    pub fn pay(&mut self, to: Address, amount: U256) -> Result<(), DispatchError> {
        let router = self.router;
        self.state
            .ledger_mut()
            .transfer(router, to, amount)
            .map_err(|e| DispatchError::Transfer {
                to,
                amount,
                reason: e.to_string(),
            })?;
        if let Some(sink) = self.code.sink(to) {
            let mut child = self.child(router, amount);
            sink.on_payment(&mut child, router, amount)
                .map_err(|e| DispatchError::Transfer {
                    to,
                    amount,
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// Appends an event to the state's log.
    pub fn emit(&mut self, name: &'static str, attributes: Value) {
        self.state.emit(Event::new(name, attributes));
    }

    /// Guard check against the current contract owner.
    pub fn require_owner(&self) -> Result<(), DispatchError> {
        self.state.guard().require_owner(self.caller)
    }
}
