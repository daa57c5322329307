//! # Registry Invariants
//!
//! Runtime-checkable consistency conditions over the [`Registry`]. The
//! registry's mutators preserve these by construction; the checks exist so
//! tests can assert them after every mutation, including failed ones.

use crate::registry::Registry;
use std::collections::BTreeSet;

/// Owner map and inverse index agree in both directions: every
/// selector-to-module entry appears in that module's operation set, and
/// every operation-set member points back at its module.
#[must_use]
pub fn check_owner_index_consistent(registry: &Registry) -> bool {
    let forward = registry.operation_owner.iter().all(|(selector, module)| {
        registry
            .module_operations
            .get(module)
            .is_some_and(|set| set.contains(selector))
    });
    let backward = registry.module_operations.iter().all(|(module, set)| {
        set.iter()
            .all(|selector| registry.operation_owner.get(selector) == Some(module))
    });
    forward && backward
}

/// A module appears in `known_modules` iff it owns at least one selector.
#[must_use]
pub fn check_known_modules_consistent(registry: &Registry) -> bool {
    let known: BTreeSet<_> = registry.known_modules.iter().copied().collect();
    let owning: BTreeSet<_> = registry
        .module_operations
        .iter()
        .filter(|(_, set)| !set.is_empty())
        .map(|(module, _)| *module)
        .collect();
    known == owning
}

/// `known_modules` holds no duplicate entries.
#[must_use]
pub fn check_no_duplicate_modules(registry: &Registry) -> bool {
    let unique: BTreeSet<_> = registry.known_modules.iter().copied().collect();
    unique.len() == registry.known_modules.len()
}

/// All registry invariants at once.
#[must_use]
pub fn check_all(registry: &Registry) -> bool {
    check_owner_index_consistent(registry)
        && check_known_modules_consistent(registry)
        && check_no_duplicate_modules(registry)
}
