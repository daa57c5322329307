//! # Proxy Router
//!
//! The single stable entry point. Every inbound call resolves its selector
//! through the registry and executes the owning module against the router's
//! own state; the caller only ever observes the router's identity. The
//! router snapshots state before each inbound call and restores it on any
//! failure, which is the one rollback mechanism the whole system relies on.
//!
//! ## Bootstrapping
//!
//! A router with zero registered operations can never be upgraded — no
//! selector resolves, including the cut operation itself. [`Router::new`]
//! therefore pre-registers the cut module at construction time.
//! [`Router::bare`] exists so tests can demonstrate the inert configuration.

use crate::errors::DispatchError;
use crate::frame::Frame;
use crate::module::{Module, PaymentSink};
use crate::state::SystemState;
use serde::Deserialize;
use shared_types::{Address, Bytes, Selector, U256};
use std::collections::HashMap;
use uuid::Uuid;

// =============================================================================
// CODE TABLE
// =============================================================================

/// Installed module code and payment sinks, keyed by address. Deployment
/// writes it; dispatch only reads it. Registering an address here does not
/// route anything — only a cut does that.
#[derive(Default)]
pub struct CodeTable {
    modules: HashMap<Address, Box<dyn Module>>,
    sinks: HashMap<Address, Box<dyn PaymentSink>>,
}

impl CodeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs module code at `address`, replacing any previous code there.
    pub fn install(&mut self, address: Address, module: impl Module + 'static) {
        self.modules.insert(address, Box::new(module));
    }

    /// Installs a payment sink at `address`.
    pub fn install_sink(&mut self, address: Address, sink: impl PaymentSink + 'static) {
        self.sinks.insert(address, Box::new(sink));
    }

    /// Module code at `address`, if installed.
    #[must_use]
    pub fn module(&self, address: Address) -> Option<&dyn Module> {
        self.modules.get(&address).map(AsRef::as_ref)
    }

    /// Payment sink at `address`, if installed.
    #[must_use]
    pub fn sink(&self, address: Address) -> Option<&dyn PaymentSink> {
        self.sinks.get(&address).map(AsRef::as_ref)
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Router deployment configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct RouterConfig {
    /// The router's own address; the identity every caller observes and the
    /// scope of all storage regions.
    pub address: Address,
    /// Initial contract owner.
    pub owner: Address,
    /// Whether a call with empty calldata is accepted as a plain value
    /// transfer. Off by default: such calls fail with `UnknownOperation`.
    #[serde(default)]
    pub accept_plain_transfers: bool,
}

// =============================================================================
// ROUTER
// =============================================================================

/// The proxy router: owns the system state and the installed code.
pub struct Router {
    config: RouterConfig,
    state: SystemState,
    code: CodeTable,
}

impl Router {
    /// Constructs a router with the cut module pre-registered so the first
    /// upgrade is possible. `cut_address` is where the cut module's code is
    /// installed; its operations are written straight into the registry
    /// (construction is the one mutation that bypasses the cut path).
    #[must_use]
    pub fn new(
        config: RouterConfig,
        cut_address: Address,
        cut_module: impl Module + 'static,
    ) -> Self {
        let mut state = SystemState::new(config.owner);
        let selectors = cut_module.selectors();
        // Infallible for a non-zero address over an empty registry.
        if !cut_address.is_zero() {
            let _ = state.registry_mut().add(cut_address, &selectors);
        }
        let mut code = CodeTable::new();
        code.install(cut_address, cut_module);
        tracing::info!(
            router = %config.address,
            owner = %config.owner,
            cut = %cut_address,
            operations = selectors.len(),
            "router constructed"
        );
        Self {
            config,
            state,
            code,
        }
    }

    /// Constructs a router with no registered operations. Permanently inert:
    /// every call fails with `UnknownOperation` and no cut can ever be
    /// applied. Exists to make the bootstrap invariant testable, not to be
    /// deployed.
    #[must_use]
    pub fn bare(config: RouterConfig) -> Self {
        let state = SystemState::new(config.owner);
        Self {
            config,
            state,
            code: CodeTable::new(),
        }
    }

    /// The router's own address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.config.address
    }

    /// Read access to the system state.
    #[must_use]
    pub fn state(&self) -> &SystemState {
        &self.state
    }

    /// Mutable state access for deployment tooling and tests (pre-funding
    /// the ledger, seeding fixtures). Routed calls never come through here.
    pub fn state_mut(&mut self) -> &mut SystemState {
        &mut self.state
    }

    /// Installs module code. See [`CodeTable::install`].
    pub fn install(&mut self, address: Address, module: impl Module + 'static) {
        self.code.install(address, module);
    }

    /// Installs a payment sink. See [`CodeTable::install_sink`].
    pub fn install_sink(&mut self, address: Address, sink: impl PaymentSink + 'static) {
        self.code.install_sink(address, sink);
    }

    /// Raw entry point: splits selector-prefixed calldata and dispatches.
    ///
    /// Empty calldata is a plain inbound transfer, accepted only when the
    /// deployment opts in; calldata shorter than a selector matches no
    /// operation.
    pub fn call(
        &mut self,
        caller: Address,
        value: U256,
        calldata: &[u8],
    ) -> Result<Bytes, DispatchError> {
        if calldata.is_empty() {
            return self.receive(caller, value);
        }
        match Selector::split_calldata(calldata) {
            Some((selector, payload)) => self.invoke(caller, value, selector, payload),
            None => Err(DispatchError::UnknownOperation(Selector::ZERO)),
        }
    }

    /// Dispatches one inbound operation call.
    ///
    /// Snapshot first; on any failure at any depth the pre-call state is
    /// restored wholesale, so no partial effect is ever observable.
    pub fn invoke(
        &mut self,
        caller: Address,
        value: U256,
        selector: Selector,
        payload: &[u8],
    ) -> Result<Bytes, DispatchError> {
        let call_id = Uuid::new_v4();
        let span = tracing::debug_span!(
            "dispatch",
            %call_id,
            %selector,
            caller = %caller,
            value = %value,
        );
        let _enter = span.enter();

        let snapshot = self.state.clone();
        let result = self.execute(caller, value, selector, payload);
        match &result {
            Ok(output) => {
                tracing::debug!(output_len = output.len(), "call succeeded");
            }
            Err(err) => {
                tracing::debug!(error = %err, "call failed, state restored");
                self.state = snapshot;
            }
        }
        result
    }

    fn execute(
        &mut self,
        caller: Address,
        value: U256,
        selector: Selector,
        payload: &[u8],
    ) -> Result<Bytes, DispatchError> {
        self.move_inbound_value(caller, value)?;
        let mut frame = Frame::new(
            &mut self.state,
            &self.code,
            self.config.address,
            caller,
            value,
        );
        frame.dispatch(selector, payload)
    }

    /// Plain inbound transfer with no calldata.
    fn receive(&mut self, caller: Address, value: U256) -> Result<Bytes, DispatchError> {
        if !self.config.accept_plain_transfers {
            return Err(DispatchError::UnknownOperation(Selector::ZERO));
        }
        self.move_inbound_value(caller, value)?;
        Ok(Bytes::new())
    }

    /// Moves attached value from the caller's account to the router before
    /// the module runs; the host ledger does the same ordering.
    fn move_inbound_value(&mut self, caller: Address, value: U256) -> Result<(), DispatchError> {
        if value.is_zero() {
            return Ok(());
        }
        let router = self.config.address;
        self.state
            .ledger_mut()
            .transfer(caller, router, value)
            .map_err(|e| DispatchError::Transfer {
                to: router,
                amount: value,
                reason: e.to_string(),
            })
    }
}
