//! # Ownership Guard
//!
//! Single-writer access control. One address is the contract owner; only it
//! may mutate the registry through cuts or invoke privileged module
//! operations. The owner changes only through an explicit, guarded transfer.

use crate::errors::DispatchError;
use shared_types::Address;

/// Holds the current contract owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnershipGuard {
    current_owner: Address,
}

impl OwnershipGuard {
    /// Creates a guard with the given initial owner.
    #[must_use]
    pub fn new(owner: Address) -> Self {
        Self {
            current_owner: owner,
        }
    }

    /// The current owner.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.current_owner
    }

    /// Fails with [`DispatchError::Unauthorized`] unless `caller` is the
    /// current owner.
    pub fn require_owner(&self, caller: Address) -> Result<(), DispatchError> {
        if caller == self.current_owner {
            Ok(())
        } else {
            Err(DispatchError::Unauthorized { caller })
        }
    }

    /// Transfers ownership to `new_owner`. Requires `caller` to be the
    /// current owner; the zero address is rejected. Returns the previous
    /// owner on success.
    pub fn transfer(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<Address, DispatchError> {
        self.require_owner(caller)?;
        if new_owner.is_zero() {
            return Err(DispatchError::domain(
                "new owner cannot be the zero address",
            ));
        }
        let previous = self.current_owner;
        self.current_owner = new_owner;
        tracing::info!(previous = %previous, new = %new_owner, "ownership transferred");
        Ok(previous)
    }
}
