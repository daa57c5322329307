//! # Payload Codec
//!
//! Bincode encoding for operation payloads and results. The router never
//! looks inside a payload; modules decode their own requests and encode
//! their own responses through these helpers so every codec failure surfaces
//! as the same [`DispatchError::Codec`] variant.

use crate::errors::DispatchError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::Bytes;

/// Encodes a response value into payload bytes.
pub fn encode<T: Serialize>(value: &T) -> Result<Bytes, DispatchError> {
    bincode::serialize(value).map_err(|e| DispatchError::Codec(e.to_string()))
}

/// Decodes a request payload.
pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, DispatchError> {
    bincode::deserialize(payload).map_err(|e| DispatchError::Codec(e.to_string()))
}
