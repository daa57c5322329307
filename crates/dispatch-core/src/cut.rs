//! # Cut Controller
//!
//! Applies a batch of registry changes atomically, optionally followed by a
//! one-shot initializer call into a target module. The batch is validated
//! against a candidate copy of the registry and swapped in only when every
//! change passes, so the live registry never exposes a partial cut. An
//! initializer failure propagates out of the routed call and the router's
//! snapshot rolls the registry changes back with everything else.
//!
//! Cuts are themselves a routed operation ([`CutModule`]), pre-registered at
//! router construction — without that, a fresh router could never be
//! upgraded at all.

use crate::codec;
use crate::errors::{DispatchError, InitViolation};
use crate::frame::Frame;
use crate::module::{Module, OperationDef};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_types::{Address, Bytes, Selector};

/// Canonical signature of the cut operation.
pub const APPLY_CUT: &str = "apply_cut(Vec<CutChange>,Option<InitCall>)";

/// What a single cut change does with its selectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutAction {
    /// Register the selectors as owned by the module.
    Add,
    /// Reassign the selectors to the module. Disabled in this
    /// implementation; always fails.
    Replace,
    /// Retire the selectors from the module. An empty selector list retires
    /// the whole module.
    Remove,
}

/// One registry change inside a cut.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutChange {
    /// The module the change concerns.
    pub module: Address,
    /// Add, replace, or remove.
    pub action: CutAction,
    /// The selectors affected.
    pub selectors: Vec<Selector>,
}

/// One-shot initializer forwarded after the registry changes commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitCall {
    /// Module whose code runs the initializer. Need not be routed yet.
    pub target: Address,
    /// Selector-prefixed calldata for the initializer.
    pub payload: Bytes,
}

/// A full cut request: ordered changes plus optional initializer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutRequest {
    /// Registry changes, applied in order.
    pub changes: Vec<CutChange>,
    /// Optional one-shot initializer.
    pub init: Option<InitCall>,
}

/// Validates the initializer shape before any change is applied.
///
/// A zero target with an empty payload is treated as "no initializer" (the
/// wire form of `None`); a zero target with a payload is the forgotten-
/// migration hazard this check guards against; a real target needs at least a
/// selector's worth of payload.
fn normalize_init(init: Option<&InitCall>) -> Result<Option<&InitCall>, DispatchError> {
    match init {
        None => Ok(None),
        Some(call) if call.target.is_zero() => {
            if call.payload.is_empty() {
                Ok(None)
            } else {
                Err(InitViolation::PayloadWithoutTarget.into())
            }
        }
        Some(call) => {
            if call.payload.len() < 4 {
                Err(InitViolation::TargetWithoutPayload.into())
            } else {
                Ok(Some(call))
            }
        }
    }
}

/// Applies a cut inside an owner-guarded routed call.
pub fn apply(frame: &mut Frame<'_>, request: &CutRequest) -> Result<(), DispatchError> {
    frame.require_owner()?;
    let init = normalize_init(request.init.as_ref())?;

    // Validate the whole batch on a candidate; the live registry is only
    // touched once every change has passed.
    let mut candidate = frame.state.registry().clone();
    for change in &request.changes {
        match change.action {
            CutAction::Add => candidate.add(change.module, &change.selectors)?,
            CutAction::Replace => candidate.replace(change.module, &change.selectors)?,
            CutAction::Remove => candidate.remove(change.module, &change.selectors)?,
        }
    }
    *frame.state.registry_mut() = candidate;

    tracing::info!(
        changes = request.changes.len(),
        init = init.is_some(),
        operations = frame.state.registry().operation_count(),
        "cut applied"
    );
    frame.emit(
        "CutApplied",
        json!({
            "changes": request.changes.len(),
            "init": init.map(|call| format!("{:?}", call.target)),
        }),
    );

    if let Some(call) = init {
        // Failure here propagates as the cut's failure; the router snapshot
        // takes the registry changes back with it.
        frame.call_code(call.target, &call.payload)?;
    }
    Ok(())
}

/// The routed cut module.
pub struct CutModule;

impl CutModule {
    /// Selector of the cut operation.
    #[must_use]
    pub fn selector() -> Selector {
        Selector::from_signature(APPLY_CUT)
    }
}

impl Module for CutModule {
    fn name(&self) -> &'static str {
        "cut"
    }

    fn operations(&self) -> Vec<OperationDef> {
        vec![OperationDef::new(APPLY_CUT)]
    }

    fn call(
        &self,
        frame: &mut Frame<'_>,
        selector: Selector,
        payload: &[u8],
    ) -> Result<Bytes, DispatchError> {
        if selector != Self::selector() {
            return Err(DispatchError::UnknownOperation(selector));
        }
        let request: CutRequest = codec::decode(payload)?;
        apply(frame, &request)?;
        Ok(Bytes::new())
    }
}
