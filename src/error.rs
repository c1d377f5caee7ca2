//! Error kinds surfaced at the protocol boundary.
//!
//! Every rejection is reported synchronously and leaves the protocol state
//! untouched. [`ProtocolError::code`] is the stable machine-readable reason;
//! `Display` is the human-readable revert message.

use crate::party::Party;

/// Failures of the FHE backend or of tfhe object (de)serialization.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FheError {
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("ciphertext list expansion failed: {0}")]
    Expansion(String),

    #[error("expected a list holding exactly one {expected}, found {found} entries")]
    UnexpectedLayout { expected: &'static str, found: usize },

    #[error("ciphertext holds a {found}, expected a {expected}")]
    KindMismatch { expected: &'static str, found: &'static str },

    #[error("{0} ciphertext does not match the network parameters")]
    NonConformant(&'static str),
}

/// Failures of the decryption oracle collaborator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OracleError {
    #[error("oracle rejected the ephemeral key: {0}")]
    InvalidEphemeralKey(FheError),

    #[error("oracle backend failure: {0}")]
    Backend(#[from] FheError),

    #[error("oracle task failed: {0}")]
    TaskFailed(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProtocolError {
    #[error("Only Alice or Bob can submit wealth")]
    Unauthorized,

    #[error("{0}'s wealth already submitted")]
    AlreadySubmitted(Party),

    #[error("User cannot reencrypt a non-owned value")]
    NotOwner,

    #[error("Authorization signer and transaction signer do not match")]
    SignerMismatch,

    #[error("{0} is not available yet")]
    NotAvailable(&'static str),

    #[error("Wealth comparison already performed")]
    AlreadyCompared,

    #[error("Both parties must submit before comparing")]
    NotReady,

    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(FheError),

    #[error("Malformed authorization token: {0}")]
    MalformedToken(String),

    #[error("Decryption oracle failure: {0}")]
    Oracle(#[from] OracleError),
}

impl ProtocolError {
    pub fn code(&self) -> &'static str {
        match self {
            ProtocolError::Unauthorized => "UNAUTHORIZED",
            ProtocolError::AlreadySubmitted(_) => "ALREADY_SUBMITTED",
            ProtocolError::NotOwner => "NOT_OWNER",
            ProtocolError::SignerMismatch => "SIGNER_MISMATCH",
            ProtocolError::NotAvailable(_) => "NOT_AVAILABLE",
            ProtocolError::AlreadyCompared => "ALREADY_COMPARED",
            ProtocolError::NotReady => "NOT_READY",
            ProtocolError::MalformedCiphertext(_) => "MALFORMED_CIPHERTEXT",
            ProtocolError::MalformedToken(_) => "MALFORMED_TOKEN",
            ProtocolError::Oracle(_) => "ORACLE_FAILURE",
        }
    }
}
