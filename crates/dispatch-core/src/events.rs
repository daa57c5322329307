//! # Event Log
//!
//! Notifications appended to the system state as routed calls execute.
//! Events live inside [`SystemState`](crate::state::SystemState), so they
//! participate in snapshot rollback: a failed call leaves no events behind.
//!
//! Attributes are a JSON value rather than a closed enum so domain modules
//! can emit their own event shapes without the core knowing about them.

use serde::Serialize;
use serde_json::Value;

/// A single emitted event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    /// Event name, e.g. `ItemListed` or `OwnershipTransferred`.
    pub name: &'static str,
    /// Structured attributes.
    pub attributes: Value,
}

impl Event {
    /// Creates an event with the given name and attributes.
    #[must_use]
    pub fn new(name: &'static str, attributes: Value) -> Self {
        Self { name, attributes }
    }
}
