//! Signed authorization for reencryption requests.
//!
//! A requester signs the fingerprint of an ephemeral public key under a
//! typed-data digest bound to one protocol instance. The gateway accepts the
//! token only if the signature verifies under the token's signer and that
//! signer is the transaction caller.

use ed25519_dalek::Signature;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::common::{fingerprint, short_fingerprint};
use crate::error::ProtocolError;
use crate::identity::{Identity, Wallet};
use crate::party::{Parties, Party};

const DOMAIN_VERSION: &str = "1";
const REENCRYPT_TYPE: &str = "Reencrypt(bytes32 publicKey)";

/// Opaque ephemeral public key as supplied by a requester.
#[derive(Clone, PartialEq, Eq)]
pub struct EphemeralPublicKey {
    bytes: Vec<u8>,
    fingerprint: [u8; 32],
}

impl EphemeralPublicKey {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let fingerprint = fingerprint(&bytes);
        Self { bytes, fingerprint }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn fingerprint(&self) -> &[u8; 32] {
        &self.fingerprint
    }
}

impl std::fmt::Debug for EphemeralPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralPublicKey")
            .field("len", &self.bytes.len())
            .field("fingerprint", &short_fingerprint(&self.fingerprint))
            .finish()
    }
}

/// Domain separator of one protocol instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDomain {
    name: String,
    instance: [u8; 32],
    verifying_contract: [u8; 32],
}

impl AuthorizationDomain {
    /// The verifying-contract address is derived from the domain name, both
    /// party identities and the deployment's instance nonce.
    pub fn new(name: &str, parties: &Parties, instance: [u8; 32]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update(parties.identity(Party::Alice).as_bytes());
        hasher.update(parties.identity(Party::Bob).as_bytes());
        hasher.update(instance);
        Self {
            name: name.to_string(),
            instance,
            verifying_contract: hasher.finalize().into(),
        }
    }

    /// Domain of a fresh deployment, with a random instance nonce.
    pub fn generate(name: &str, parties: &Parties) -> Self {
        let mut instance = [0u8; 32];
        OsRng.fill_bytes(&mut instance);
        Self::new(name, parties, instance)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance(&self) -> &[u8; 32] {
        &self.instance
    }

    pub fn verifying_contract(&self) -> &[u8; 32] {
        &self.verifying_contract
    }

    fn separator(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(Sha256::digest(self.name.as_bytes()));
        hasher.update(Sha256::digest(DOMAIN_VERSION.as_bytes()));
        hasher.update(self.verifying_contract);
        hasher.finalize().into()
    }

    /// Digest a requester signs to authorize reencryption under `key`.
    pub fn reencrypt_digest(&self, key: &EphemeralPublicKey) -> [u8; 32] {
        let mut struct_hasher = Sha256::new();
        struct_hasher.update(Sha256::digest(REENCRYPT_TYPE.as_bytes()));
        struct_hasher.update(key.fingerprint());
        let struct_hash = struct_hasher.finalize();

        let mut hasher = Sha256::new();
        hasher.update([0x19, 0x01]);
        hasher.update(self.separator());
        hasher.update(struct_hash);
        hasher.finalize().into()
    }
}

#[derive(Debug, Clone)]
pub struct AuthorizationToken {
    signer: Identity,
    public_key: EphemeralPublicKey,
    signature: Signature,
}

impl AuthorizationToken {
    pub fn sign(wallet: &Wallet, domain: &AuthorizationDomain, public_key: EphemeralPublicKey) -> Self {
        let signature = wallet.sign(&domain.reencrypt_digest(&public_key));
        Self {
            signer: wallet.identity(),
            public_key,
            signature,
        }
    }

    /// Rebuilds a token received as raw bytes.
    pub fn from_parts(
        signer: Identity,
        public_key: Vec<u8>,
        signature: &[u8],
    ) -> Result<Self, ProtocolError> {
        let signature = Signature::from_slice(signature)
            .map_err(|e| ProtocolError::MalformedToken(e.to_string()))?;
        if public_key.is_empty() {
            return Err(ProtocolError::MalformedToken("empty public key".into()));
        }
        Ok(Self {
            signer,
            public_key: EphemeralPublicKey::from_bytes(public_key),
            signature,
        })
    }

    pub fn signer(&self) -> &Identity {
        &self.signer
    }

    pub fn public_key(&self) -> &EphemeralPublicKey {
        &self.public_key
    }

    pub fn signature_bytes(&self) -> [u8; 64] {
        self.signature.to_bytes()
    }

    /// Succeeds only when the token was signed for `domain` by `caller`.
    pub fn verify_for(&self, domain: &AuthorizationDomain, caller: &Identity) -> Result<(), ProtocolError> {
        let digest = domain.reencrypt_digest(&self.public_key);
        if !self.signer.verify(&digest, &self.signature) {
            debug!(signer = %self.signer, "authorization signature does not verify");
            return Err(ProtocolError::SignerMismatch);
        }
        if self.signer != *caller {
            debug!(signer = %self.signer, caller = %caller, "authorization signed by another identity");
            return Err(ProtocolError::SignerMismatch);
        }
        Ok(())
    }
}
