//! # Module Registry
//!
//! The authoritative mapping from operation selector to owning module, with
//! the inverse index and the ordered list of known modules. All three views
//! are kept mutually consistent by construction:
//!
//! - a selector has at most one owner, and registering an already-owned
//!   selector is rejected outright (no silent overwrite);
//! - a module is "known" iff it owns at least one selector;
//! - `known_modules` preserves first-registration order and never holds
//!   duplicates.
//!
//! Batch mutations reject before touching anything, so a failed call leaves
//! the registry byte-for-byte unchanged.

use crate::errors::DispatchError;
use shared_types::{Address, Selector};
use std::collections::{BTreeSet, HashMap};

/// Selector-to-module routing table with inverse index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
    /// Selector -> owning module. Absence means unregistered.
    pub(crate) operation_owner: HashMap<Selector, Address>,
    /// Module -> selectors it owns. An entry exists iff the set is non-empty.
    pub(crate) module_operations: HashMap<Address, BTreeSet<Selector>>,
    /// Known modules in first-registration order.
    pub(crate) known_modules: Vec<Address>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a selector to its owning module. Pure lookup.
    #[must_use]
    pub fn resolve(&self, selector: Selector) -> Option<Address> {
        self.operation_owner.get(&selector).copied()
    }

    /// Registers `selectors` as owned by `module`.
    ///
    /// Fails with [`DispatchError::NullModule`] for the zero address and
    /// with [`DispatchError::SelectorConflict`] if any selector already has
    /// an owner. Either way the whole batch is rejected and the registry is
    /// unchanged.
    pub fn add(&mut self, module: Address, selectors: &[Selector]) -> Result<(), DispatchError> {
        if module.is_zero() {
            return Err(DispatchError::NullModule);
        }
        // Validate the entire batch before mutating anything.
        for selector in selectors {
            if let Some(owner) = self.operation_owner.get(selector) {
                return Err(DispatchError::SelectorConflict {
                    selector: *selector,
                    owner: *owner,
                });
            }
        }
        if selectors.is_empty() {
            return Ok(());
        }
        for selector in selectors {
            self.operation_owner.insert(*selector, module);
        }
        let entry = self.module_operations.entry(module).or_default();
        entry.extend(selectors.iter().copied());
        if !self.known_modules.contains(&module) {
            self.known_modules.push(module);
        }
        Ok(())
    }

    /// Retires `selectors` from `module`.
    ///
    /// Selectors not owned by `module` are silently ignored, so retirement
    /// is idempotent. An empty selector list retires every operation the
    /// module currently owns. When the module's operation set empties, the
    /// module is dropped from `known_modules`.
    pub fn remove(&mut self, module: Address, selectors: &[Selector]) -> Result<(), DispatchError> {
        let targets: Vec<Selector> = if selectors.is_empty() {
            self.module_operations
                .get(&module)
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default()
        } else {
            selectors.to_vec()
        };

        for selector in targets {
            if self.operation_owner.get(&selector) != Some(&module) {
                continue;
            }
            self.operation_owner.remove(&selector);
            if let Some(set) = self.module_operations.get_mut(&module) {
                set.remove(&selector);
            }
        }
        if self
            .module_operations
            .get(&module)
            .is_some_and(BTreeSet::is_empty)
        {
            self.module_operations.remove(&module);
            self.known_modules.retain(|m| *m != module);
        }
        Ok(())
    }

    /// Reassigning selectors in place is disabled in this implementation;
    /// retire with [`remove`](Self::remove) and re-register instead.
    pub fn replace(
        &mut self,
        _module: Address,
        _selectors: &[Selector],
    ) -> Result<(), DispatchError> {
        Err(DispatchError::ReplaceUnsupported)
    }

    /// Known modules in first-registration order.
    #[must_use]
    pub fn modules(&self) -> &[Address] {
        &self.known_modules
    }

    /// Selectors owned by `module`, sorted. Empty for unknown modules.
    #[must_use]
    pub fn operations_of(&self, module: Address) -> Vec<Selector> {
        self.module_operations
            .get(&module)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Total number of registered operations.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.operation_owner.len()
    }

    /// True when no operation is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operation_owner.is_empty()
    }
}
