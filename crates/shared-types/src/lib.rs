//! # Shared Types Crate
//!
//! Value objects shared by the dispatch core and every module crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-module primitives are defined here.
//! - **Value semantics**: Everything in this crate is `Copy` or cheaply
//!   cloneable, comparable, and serializable.
//! - **No behavior**: Business rules live in the module crates; these types
//!   only know how to construct, compare, and display themselves.

pub mod address;
pub mod selector;

pub use address::Address;
pub use selector::{keccak256, Selector};

// Re-export U256 from primitive-types for 256-bit value arithmetic.
pub use primitive_types::U256;

/// Identifier of a non-fungible token. Ids are assigned sequentially
/// starting at 1; 0 is never a valid token.
pub type TokenId = u64;

/// Opaque call payload bytes.
pub type Bytes = Vec<u8>;
