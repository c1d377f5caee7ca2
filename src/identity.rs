//! Principals and the minimal signing wallet used by clients.

use std::fmt;
use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A principal, identified by its ed25519 verifying key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity([u8; 32]);

impl Identity {
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, IdentityError> {
        VerifyingKey::from_bytes(&bytes).map_err(|_| IdentityError::InvalidKey)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Checks `signature` over `message` under this identity's key. Weak keys
    /// and small-order signature points never verify.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        match VerifyingKey::from_bytes(&self.0) {
            Ok(key) => key.verify_strict(message, signature).is_ok(),
            Err(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("identity is not valid base64")]
    Encoding,

    #[error("identity must be 32 bytes, got {0}")]
    Length(usize),

    #[error("identity is not a valid ed25519 public key")]
    InvalidKey,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&STANDARD.encode(self.0))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({self})")
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = STANDARD.decode(s.trim()).map_err(|_| IdentityError::Encoding)?;
        let bytes: [u8; 32] = raw
            .as_slice()
            .try_into()
            .map_err(|_| IdentityError::Length(raw.len()))?;
        Self::from_bytes(bytes)
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Holds a signing key. Stands in for an external wallet.
pub struct Wallet {
    signing_key: SigningKey,
}

impl Wallet {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic wallet, for fixtures.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet").field("identity", &self.identity()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_round_trips_through_base64() {
        let wallet = Wallet::from_seed([7; 32]);
        let identity = wallet.identity();
        let parsed: Identity = identity.to_string().parse().unwrap();
        assert_eq!(parsed, identity);
    }

    #[test]
    fn rejects_bad_identity_strings() {
        assert_eq!("not base64!".parse::<Identity>(), Err(IdentityError::Encoding));
        assert_eq!(
            STANDARD.encode([1u8; 5]).parse::<Identity>(),
            Err(IdentityError::Length(5))
        );
    }

    #[test]
    fn signatures_verify_only_under_the_signer() {
        let alice = Wallet::from_seed([1; 32]);
        let eve = Wallet::from_seed([9; 32]);
        let signature = alice.sign(b"payload");
        assert!(alice.identity().verify(b"payload", &signature));
        assert!(!alice.identity().verify(b"other payload", &signature));
        assert!(!eve.identity().verify(b"payload", &signature));
    }

    #[test]
    fn small_order_key_and_signature_do_not_verify() {
        // Identity point as key and as R with s = 0 satisfies the lax equation
        // for every message.
        let mut point = [0u8; 32];
        point[0] = 1;
        let weak = Identity::from_bytes(point).unwrap();
        let mut raw = [0u8; 64];
        raw[..32].copy_from_slice(&point);
        let forged = Signature::from_bytes(&raw);
        assert!(!weak.verify(b"payload", &forged));
        assert!(!weak.verify(b"other payload", &forged));
    }
}
