//! # Introspection Module
//!
//! Read-only queries over the operation registry, exposed as routed
//! operations: enumerate the known modules, enumerate the operations a
//! module owns, and resolve an operation selector to its owner. External
//! tooling uses these to discover the live configuration without
//! out-of-band knowledge — a prerequisite for constructing correct cuts.
//!
//! Every operation here is a pure projection; nothing mutates.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use dispatch_core::codec;
use dispatch_core::errors::DispatchError;
use dispatch_core::frame::Frame;
use dispatch_core::module::{Module, OperationDef};
use serde::{Deserialize, Serialize};
use shared_types::{Address, Bytes, Selector};

/// Canonical signature: all known modules, in first-registration order.
pub const MODULES: &str = "modules()";
/// Canonical signature: the selectors a module owns.
pub const MODULE_OPERATIONS: &str = "module_operations(Address)";
/// Canonical signature: the module owning a selector, if any.
pub const OPERATION_MODULE: &str = "operation_module(Selector)";
/// Canonical signature: every module with its full selector set.
pub const MODULE_SUMMARIES: &str = "module_summaries()";

/// One module together with the selectors it owns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSummary {
    /// The module address.
    pub module: Address,
    /// The selectors it owns, sorted.
    pub selectors: Vec<Selector>,
}

/// The routed introspection module.
pub struct IntrospectModule;

impl Module for IntrospectModule {
    fn name(&self) -> &'static str {
        "introspect"
    }

    fn operations(&self) -> Vec<OperationDef> {
        vec![
            OperationDef::new(MODULES),
            OperationDef::new(MODULE_OPERATIONS),
            OperationDef::new(OPERATION_MODULE),
            OperationDef::new(MODULE_SUMMARIES),
        ]
    }

    fn call(
        &self,
        frame: &mut Frame<'_>,
        selector: Selector,
        payload: &[u8],
    ) -> Result<Bytes, DispatchError> {
        let registry = frame.state.registry();
        if selector == Selector::from_signature(MODULES) {
            codec::encode(&registry.modules().to_vec())
        } else if selector == Selector::from_signature(MODULE_OPERATIONS) {
            let module: Address = codec::decode(payload)?;
            codec::encode(&registry.operations_of(module))
        } else if selector == Selector::from_signature(OPERATION_MODULE) {
            let wanted: Selector = codec::decode(payload)?;
            codec::encode(&registry.resolve(wanted))
        } else if selector == Selector::from_signature(MODULE_SUMMARIES) {
            let summaries: Vec<ModuleSummary> = registry
                .modules()
                .iter()
                .map(|module| ModuleSummary {
                    module: *module,
                    selectors: registry.operations_of(*module),
                })
                .collect();
            codec::encode(&summaries)
        } else {
            Err(DispatchError::UnknownOperation(selector))
        }
    }
}
