//! Plaintext doubles of the FHE backend for fast unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::auth::EphemeralPublicKey;
use crate::error::{FheError, OracleError};
use crate::oracle::{DecryptionOracle, ReencryptedCiphertext, ValueKind};
use crate::scheme::HomomorphicScheme;

/// "Ciphertexts" are the plaintexts themselves.
pub struct PlainScheme;

impl HomomorphicScheme for PlainScheme {
    type Uint64 = u64;
    type Bool = bool;

    fn gt(&self, lhs: &u64, rhs: &u64) -> bool {
        lhs > rhs
    }

    fn le(&self, lhs: &u64, rhs: &u64) -> bool {
        lhs <= rhs
    }

    fn decode_input(&self, bytes: &[u8]) -> Result<u64, FheError> {
        let raw: [u8; 8] = bytes.try_into().map_err(|_| FheError::UnexpectedLayout {
            expected: "u64",
            found: bytes.len(),
        })?;
        Ok(u64::from_le_bytes(raw))
    }
}

/// Returns the value followed by the key fingerprint, and counts calls.
#[derive(Default)]
pub struct EchoOracle {
    calls: AtomicUsize,
}

impl EchoOracle {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn open_u64(reencrypted: &ReencryptedCiphertext) -> u64 {
        let bytes = reencrypted.expect_kind(ValueKind::Uint64).unwrap();
        u64::from_le_bytes(bytes[..8].try_into().unwrap())
    }

    pub fn open_bool(reencrypted: &ReencryptedCiphertext) -> bool {
        reencrypted.expect_kind(ValueKind::Bool).unwrap()[0] == 1
    }

    fn wrap(&self, kind: ValueKind, mut value: Vec<u8>, key: &EphemeralPublicKey) -> ReencryptedCiphertext {
        self.calls.fetch_add(1, Ordering::SeqCst);
        value.extend_from_slice(key.fingerprint());
        ReencryptedCiphertext::new(kind, value)
    }
}

impl DecryptionOracle<PlainScheme> for EchoOracle {
    async fn reencrypt_uint64(
        &self,
        ciphertext: &u64,
        key: &EphemeralPublicKey,
    ) -> Result<ReencryptedCiphertext, OracleError> {
        Ok(self.wrap(ValueKind::Uint64, ciphertext.to_le_bytes().to_vec(), key))
    }

    async fn reencrypt_bool(
        &self,
        ciphertext: &bool,
        key: &EphemeralPublicKey,
    ) -> Result<ReencryptedCiphertext, OracleError> {
        Ok(self.wrap(ValueKind::Bool, vec![u8::from(*ciphertext)], key))
    }

    async fn public_decrypt_bool(&self, ciphertext: &bool) -> Result<bool, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(*ciphertext)
    }
}
