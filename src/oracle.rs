//! The decryption oracle seam.
//!
//! The oracle is the only party able to decrypt network ciphertexts. The
//! gateway hands it a ciphertext and an ephemeral public key and gets back a
//! ciphertext only the ephemeral key's owner can open. [`KeyHolderOracle`]
//! is an in-process stand-in for a threshold decryption service.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tfhe::prelude::*;
use tfhe::{ClientKey, CompactCiphertextList, CompactPublicKey, FheBool, FheUint64};
use tracing::debug;

use crate::auth::EphemeralPublicKey;
use crate::common::{safe_deserialize_item, safe_serialize_item, short_fingerprint};
use crate::error::{FheError, OracleError};
use crate::scheme::{HomomorphicScheme, TfheScheme};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Uint64,
    Bool,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Uint64 => "u64",
            ValueKind::Bool => "bool",
        }
    }
}

/// A value re-wrapped under a requester's ephemeral key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReencryptedCiphertext {
    kind: ValueKind,
    bytes: Vec<u8>,
}

impl ReencryptedCiphertext {
    pub fn new(kind: ValueKind, bytes: Vec<u8>) -> Self {
        Self { kind, bytes }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, FheError> {
        bincode::serialize(self).map_err(|e| FheError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FheError> {
        bincode::deserialize(bytes).map_err(|e| FheError::Serialization(e.to_string()))
    }

    pub(crate) fn expect_kind(&self, expected: ValueKind) -> Result<&[u8], FheError> {
        if self.kind != expected {
            return Err(FheError::KindMismatch {
                expected: expected.name(),
                found: self.kind.name(),
            });
        }
        Ok(&self.bytes)
    }
}

pub trait DecryptionOracle<S: HomomorphicScheme>: Send + Sync {
    fn reencrypt_uint64(
        &self,
        ciphertext: &S::Uint64,
        key: &EphemeralPublicKey,
    ) -> impl Future<Output = Result<ReencryptedCiphertext, OracleError>> + Send;

    fn reencrypt_bool(
        &self,
        ciphertext: &S::Bool,
        key: &EphemeralPublicKey,
    ) -> impl Future<Output = Result<ReencryptedCiphertext, OracleError>> + Send;

    /// Decrypts a boolean for public disclosure.
    fn public_decrypt_bool(
        &self,
        ciphertext: &S::Bool,
    ) -> impl Future<Output = Result<bool, OracleError>> + Send;
}

/// Holds the network client key and serves requests on tokio's blocking pool.
#[derive(Clone)]
pub struct KeyHolderOracle {
    client_key: Arc<ClientKey>,
    size_limit: u64,
}

impl KeyHolderOracle {
    pub fn new(client_key: ClientKey, size_limit: u64) -> Self {
        Self {
            client_key: Arc::new(client_key),
            size_limit,
        }
    }

    async fn run_blocking<T, F>(&self, job: F) -> Result<T, OracleError>
    where
        T: Send + 'static,
        F: FnOnce(&ClientKey, u64) -> Result<T, OracleError> + Send + 'static,
    {
        let client_key = Arc::clone(&self.client_key);
        let size_limit = self.size_limit;
        tokio::task::spawn_blocking(move || job(&client_key, size_limit))
            .await
            .map_err(|e| OracleError::TaskFailed(e.to_string()))?
    }
}

fn open_ephemeral_key(bytes: &[u8], size_limit: u64) -> Result<CompactPublicKey, OracleError> {
    safe_deserialize_item(bytes, size_limit).map_err(OracleError::InvalidEphemeralKey)
}

impl DecryptionOracle<TfheScheme> for KeyHolderOracle {
    async fn reencrypt_uint64(
        &self,
        ciphertext: &FheUint64,
        key: &EphemeralPublicKey,
    ) -> Result<ReencryptedCiphertext, OracleError> {
        let ciphertext = ciphertext.clone();
        let key_bytes = key.as_bytes().to_vec();
        let bytes = self
            .run_blocking(move |client_key, size_limit| {
                let ephemeral = open_ephemeral_key(&key_bytes, size_limit)?;
                let clear: u64 = ciphertext.decrypt(client_key);
                let list = CompactCiphertextList::builder(&ephemeral).push(clear).build();
                Ok(safe_serialize_item(&list, size_limit)?)
            })
            .await?;
        debug!(key = %short_fingerprint(key.fingerprint()), size = bytes.len(), "u64 reencrypted");
        Ok(ReencryptedCiphertext::new(ValueKind::Uint64, bytes))
    }

    async fn reencrypt_bool(
        &self,
        ciphertext: &FheBool,
        key: &EphemeralPublicKey,
    ) -> Result<ReencryptedCiphertext, OracleError> {
        let ciphertext = ciphertext.clone();
        let key_bytes = key.as_bytes().to_vec();
        let bytes = self
            .run_blocking(move |client_key, size_limit| {
                let ephemeral = open_ephemeral_key(&key_bytes, size_limit)?;
                let clear: bool = ciphertext.decrypt(client_key);
                let list = CompactCiphertextList::builder(&ephemeral).push(clear).build();
                Ok(safe_serialize_item(&list, size_limit)?)
            })
            .await?;
        debug!(key = %short_fingerprint(key.fingerprint()), size = bytes.len(), "bool reencrypted");
        Ok(ReencryptedCiphertext::new(ValueKind::Bool, bytes))
    }

    async fn public_decrypt_bool(&self, ciphertext: &FheBool) -> Result<bool, OracleError> {
        let ciphertext = ciphertext.clone();
        self.run_blocking(move |client_key, _| Ok(ciphertext.decrypt(client_key)))
            .await
    }
}
