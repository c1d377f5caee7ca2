//! Key material: the network key set and requester-side ephemeral keys.

use tfhe::prelude::*;
use tfhe::{
    ClientKey, CompactCiphertextList, CompactPublicKey, Config, ConfigBuilder, ServerKey,
    generate_keys,
};
use tracing::info;

use crate::auth::EphemeralPublicKey;
use crate::common::{safe_deserialize_item, safe_serialize_item};
use crate::error::FheError;
use crate::oracle::{KeyHolderOracle, ReencryptedCiphertext, ValueKind};
use crate::scheme::{TfheScheme, expand_single, expand_single_bool};

/// The network's FHE keys. The client key must only ever reach the oracle.
pub struct NetworkKeys {
    client_key: ClientKey,
    server_key: ServerKey,
    public_key: CompactPublicKey,
}

impl NetworkKeys {
    pub fn generate() -> Self {
        Self::generate_with(ConfigBuilder::default().build())
    }

    pub fn generate_with(config: Config) -> Self {
        let (client_key, server_key) = generate_keys(config);
        let public_key = CompactPublicKey::new(&client_key);
        info!("network keys generated");
        Self {
            client_key,
            server_key,
            public_key,
        }
    }

    /// Key clients encrypt their inputs under.
    pub fn public_key(&self) -> &CompactPublicKey {
        &self.public_key
    }

    /// Splits the key set between its two holders.
    pub fn into_services(self, size_limit: u64) -> (CompactPublicKey, TfheScheme, KeyHolderOracle) {
        (
            self.public_key,
            TfheScheme::new(self.server_key, size_limit),
            KeyHolderOracle::new(self.client_key, size_limit),
        )
    }
}

/// Encrypts a wealth value under the network key, ready for submission.
pub fn encrypt_wealth(
    value: u64,
    network_key: &CompactPublicKey,
    size_limit: u64,
) -> Result<Vec<u8>, FheError> {
    let list = CompactCiphertextList::builder(network_key).push(value).build();
    safe_serialize_item(&list, size_limit)
}

/// A requester's one-off key pair for reading reencrypted values.
pub struct EphemeralKeyPair {
    client_key: ClientKey,
    public_key: EphemeralPublicKey,
    size_limit: u64,
}

impl EphemeralKeyPair {
    pub fn generate(size_limit: u64) -> Result<Self, FheError> {
        Self::generate_with(ConfigBuilder::default().build(), size_limit)
    }

    pub fn generate_with(config: Config, size_limit: u64) -> Result<Self, FheError> {
        let client_key = ClientKey::generate(config);
        let public_key = CompactPublicKey::new(&client_key);
        let bytes = safe_serialize_item(&public_key, size_limit)?;
        Ok(Self {
            client_key,
            public_key: EphemeralPublicKey::from_bytes(bytes),
            size_limit,
        })
    }

    pub fn public_key(&self) -> &EphemeralPublicKey {
        &self.public_key
    }

    pub fn decrypt_wealth(&self, reencrypted: &ReencryptedCiphertext) -> Result<u64, FheError> {
        let bytes = reencrypted.expect_kind(ValueKind::Uint64)?;
        let list: CompactCiphertextList = safe_deserialize_item(bytes, self.size_limit)?;
        Ok(expand_single(&list)?.decrypt(&self.client_key))
    }

    pub fn decrypt_flag(&self, reencrypted: &ReencryptedCiphertext) -> Result<bool, FheError> {
        let bytes = reencrypted.expect_kind(ValueKind::Bool)?;
        let list: CompactCiphertextList = safe_deserialize_item(bytes, self.size_limit)?;
        Ok(expand_single_bool(&list)?.decrypt(&self.client_key))
    }
}
