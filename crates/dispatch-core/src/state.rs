//! # System State
//!
//! The single shared state object every routed call executes against. The
//! router owns one `SystemState`; modules receive it by mutable reference
//! through their call frame and never hold state of their own — this is the
//! context-preserving forwarding that lets many modules behave as one
//! logical object.
//!
//! The whole aggregate is `Clone`: a clone taken before a call is the
//! snapshot that makes every call all-or-nothing.
//!
//! ## Storage regions
//!
//! Domain modules keep their data in named regions. Region names are an
//! out-of-band convention between module authors; the core detects collisions
//! between operation selectors, not between storage regions. Two modules
//! sharing a region name on purpose (token + marketplace sharing the token
//! store) is exactly how the one-address pattern pays off.

use crate::errors::DispatchError;
use crate::events::Event;
use crate::guard::OwnershipGuard;
use crate::registry::Registry;
use shared_types::{Address, U256};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

// =============================================================================
// STORAGE REGIONS
// =============================================================================

/// A named storage region owned by a module. Implemented automatically for
/// any `'static` cloneable type; modules define a plain struct and register
/// it under their region name.
pub trait Region: Any {
    /// Upcast for downcasting to the concrete store type.
    fn as_any(&self) -> &dyn Any;
    /// Mutable upcast.
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Clone into a fresh box; required for state snapshots.
    fn clone_box(&self) -> Box<dyn Region>;
}

impl<T: Any + Clone> Region for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn Region> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Region> {
    fn clone(&self) -> Self {
        (**self).clone_box()
    }
}

/// State access failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A region name is already bound to a different concrete type — two
    /// modules declared overlapping storage.
    #[error("storage region '{name}' is bound to a different type")]
    RegionTypeMismatch {
        /// The clashing region name.
        name: &'static str,
    },
}

impl From<StateError> for DispatchError {
    fn from(err: StateError) -> Self {
        DispatchError::Domain(err.to_string())
    }
}

// =============================================================================
// LEDGER
// =============================================================================

/// Value accounting errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Debit larger than the account balance.
    #[error("insufficient balance: {holder} has {available}, needs {required}")]
    InsufficientBalance {
        /// Account being debited.
        holder: Address,
        /// Amount requested.
        required: U256,
        /// Amount available.
        available: U256,
    },
}

/// Per-address value balances. Models the funds the host ledger has placed
/// under the router's control plus the external accounts it pays out to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ledger {
    balances: HashMap<Address, U256>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `holder`, zero if the account has never been touched.
    #[must_use]
    pub fn balance_of(&self, holder: Address) -> U256 {
        self.balances.get(&holder).copied().unwrap_or_default()
    }

    /// Credits `holder` with `amount`.
    pub fn deposit(&mut self, holder: Address, amount: U256) {
        let entry = self.balances.entry(holder).or_default();
        *entry = entry.saturating_add(amount);
    }

    /// Debits `holder` by `amount`.
    pub fn withdraw(&mut self, holder: Address, amount: U256) -> Result<(), LedgerError> {
        let available = self.balance_of(holder);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                holder,
                required: amount,
                available,
            });
        }
        self.balances.insert(holder, available - amount);
        Ok(())
    }

    /// Moves `amount` from `from` to `to`.
    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        self.withdraw(from, amount)?;
        self.deposit(to, amount);
        Ok(())
    }
}

// =============================================================================
// SYSTEM STATE
// =============================================================================

/// The router's persistent state: registry, ownership, value ledger, module
/// storage regions, and the event log. Explicitly constructed, no hidden
/// statics; tests build a fresh one per case.
#[derive(Clone)]
pub struct SystemState {
    registry: Registry,
    guard: OwnershipGuard,
    ledger: Ledger,
    regions: BTreeMap<&'static str, Box<dyn Region>>,
    events: Vec<Event>,
}

impl SystemState {
    /// Creates a fresh state owned by `owner`.
    #[must_use]
    pub fn new(owner: Address) -> Self {
        Self {
            registry: Registry::new(),
            guard: OwnershipGuard::new(owner),
            ledger: Ledger::new(),
            regions: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// The operation registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable registry access. Reserved for the cut controller and router
    /// construction; domain modules have no business here.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// The ownership guard.
    #[must_use]
    pub fn guard(&self) -> &OwnershipGuard {
        &self.guard
    }

    /// Mutable guard access.
    pub fn guard_mut(&mut self) -> &mut OwnershipGuard {
        &mut self.guard
    }

    /// The value ledger.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Mutable ledger access.
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    /// Immutable view of a storage region, `None` if it was never created.
    ///
    /// # Errors
    ///
    /// Fails if the name is bound to a different concrete type.
    pub fn region<T: Region>(&self, name: &'static str) -> Result<Option<&T>, StateError> {
        match self.regions.get(name) {
            None => Ok(None),
            Some(boxed) => (**boxed)
                .as_any()
                .downcast_ref::<T>()
                .map(Some)
                .ok_or(StateError::RegionTypeMismatch { name }),
        }
    }

    /// Mutable view of a storage region, created from `Default` on first
    /// access.
    ///
    /// # Errors
    ///
    /// Fails if the name is bound to a different concrete type.
    pub fn region_mut<T: Region + Default>(
        &mut self,
        name: &'static str,
    ) -> Result<&mut T, StateError> {
        let boxed = self
            .regions
            .entry(name)
            .or_insert_with(|| Box::new(T::default()));
        (**boxed)
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or(StateError::RegionTypeMismatch { name })
    }

    /// Appends an event to the log.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Events emitted so far, in order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

impl std::fmt::Debug for SystemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemState")
            .field("registry", &self.registry)
            .field("guard", &self.guard)
            .field("ledger", &self.ledger)
            .field("regions", &self.regions.keys().collect::<Vec<_>>())
            .field("events", &self.events.len())
            .finish()
    }
}
