//! Capability interface over the FHE backend.
//!
//! The protocol only ever handles ciphertexts through [`HomomorphicScheme`]:
//! it never sees their layout and never holds a key able to decrypt them.

use tfhe::conformance::ParameterSetConformant;
use tfhe::prelude::*;
use tfhe::{
    CompactCiphertextList, FheBool, FheUint64, FheUint64ConformanceParams, ServerKey,
    set_server_key,
};
use tracing::{debug, warn};

use crate::common::{fingerprint, safe_deserialize_item, short_fingerprint};
use crate::error::FheError;

pub trait HomomorphicScheme: Send + Sync {
    /// Encrypted 64-bit unsigned integer.
    type Uint64: Clone + Send + Sync + 'static;
    /// Encrypted boolean.
    type Bool: Clone + Send + Sync + 'static;

    /// Encrypted `lhs > rhs`.
    fn gt(&self, lhs: &Self::Uint64, rhs: &Self::Uint64) -> Self::Bool;

    /// Encrypted `lhs <= rhs`.
    fn le(&self, lhs: &Self::Uint64, rhs: &Self::Uint64) -> Self::Bool;

    /// Turns a client-submitted input blob into an encrypted integer.
    fn decode_input(&self, bytes: &[u8]) -> Result<Self::Uint64, FheError>;
}

/// tfhe-backed scheme. Holds only the evaluation (server) key.
#[derive(Clone)]
pub struct TfheScheme {
    server_key: ServerKey,
    size_limit: u64,
}

impl TfheScheme {
    pub fn new(server_key: ServerKey, size_limit: u64) -> Self {
        Self {
            server_key,
            size_limit,
        }
    }

    // Server keys are thread-local in tfhe.
    fn install_key(&self) {
        set_server_key(self.server_key.clone());
    }
}

impl HomomorphicScheme for TfheScheme {
    type Uint64 = FheUint64;
    type Bool = FheBool;

    fn gt(&self, lhs: &FheUint64, rhs: &FheUint64) -> FheBool {
        self.install_key();
        lhs.gt(rhs)
    }

    fn le(&self, lhs: &FheUint64, rhs: &FheUint64) -> FheBool {
        self.install_key();
        lhs.le(rhs)
    }

    fn decode_input(&self, bytes: &[u8]) -> Result<FheUint64, FheError> {
        trace_input(bytes);
        let list: CompactCiphertextList = safe_deserialize_item(bytes, self.size_limit)?;
        let value = expand_single(&list)?;
        // Evaluating a ciphertext built for other parameters panics inside tfhe.
        if !value.is_conformant(&FheUint64ConformanceParams::from(&self.server_key)) {
            warn!("submitted ciphertext does not match the server key parameters");
            return Err(FheError::NonConformant("u64"));
        }
        Ok(value)
    }
}

/// Extracts the only `FheUint64` of a compact list.
pub(crate) fn expand_single(list: &CompactCiphertextList) -> Result<FheUint64, FheError> {
    let expanded = list
        .expand()
        .map_err(|e| FheError::Expansion(e.to_string()))?;
    if expanded.len() != 1 {
        return Err(FheError::UnexpectedLayout {
            expected: "u64",
            found: expanded.len(),
        });
    }
    let value: FheUint64 = expanded
        .get(0)
        .map_err(|e| FheError::Expansion(e.to_string()))?
        .ok_or(FheError::UnexpectedLayout {
            expected: "u64",
            found: 0,
        })?;
    Ok(value)
}

/// Extracts the only `FheBool` of a compact list.
pub(crate) fn expand_single_bool(list: &CompactCiphertextList) -> Result<FheBool, FheError> {
    let expanded = list
        .expand()
        .map_err(|e| FheError::Expansion(e.to_string()))?;
    if expanded.len() != 1 {
        return Err(FheError::UnexpectedLayout {
            expected: "bool",
            found: expanded.len(),
        });
    }
    let value: FheBool = expanded
        .get(0)
        .map_err(|e| FheError::Expansion(e.to_string()))?
        .ok_or(FheError::UnexpectedLayout {
            expected: "bool",
            found: 0,
        })?;
    Ok(value)
}

/// Logs a digest of a submitted blob.
fn trace_input(bytes: &[u8]) {
    let digest = fingerprint(bytes);
    debug!(
        digest = %short_fingerprint(&digest),
        size = bytes.len(),
        "decoding encrypted input"
    );
}
