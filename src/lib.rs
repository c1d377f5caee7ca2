//! Yao's millionaires problem over FHE integers.
//!
//! Alice and Bob each submit their wealth once, encrypted under the network
//! key. The comparison runs homomorphically and stores two encrypted flags.
//! Reading anything back goes through a signed reencryption request: a party
//! can read its own wealth and both flags, nobody else can read anything.
//!
//! ```no_run
//! use millionaire_fhe::{
//!     AuthorizationToken, EphemeralKeyPair, MillionaireYao, NetworkKeys, ProtocolConfig, Wallet,
//!     encrypt_wealth,
//! };
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let (alice, bob) = (Wallet::generate(), Wallet::generate());
//! let config = ProtocolConfig::new(alice.identity(), bob.identity());
//! let (network_key, scheme, oracle) =
//!     NetworkKeys::generate().into_services(config.max_ciphertext_bytes);
//! let mut contract = MillionaireYao::deploy(&config, scheme, oracle)?;
//!
//! let limit = config.max_ciphertext_bytes;
//! contract.submit_wealth(&alice.identity(), &encrypt_wealth(1_000_000, &network_key, limit)?)?;
//! contract.submit_wealth(&bob.identity(), &encrypt_wealth(2_000_000, &network_key, limit)?)?;
//! contract.wealth_check(&alice.identity())?;
//!
//! let keys = EphemeralKeyPair::generate(limit)?;
//! let token = AuthorizationToken::sign(&alice, contract.domain(), keys.public_key().clone());
//! let mine = contract.wealth_of(&alice.identity(), &alice.identity(), &token).await?;
//! assert_eq!(keys.decrypt_wealth(&mine)?, 1_000_000);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod common;
pub mod comparator;
pub mod config;
pub mod contract;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod keys;
pub mod oracle;
pub mod party;
pub mod scheme;
pub mod state;

#[cfg(test)]
mod testing;

pub use auth::{AuthorizationDomain, AuthorizationToken, EphemeralPublicKey};
pub use comparator::{Outcome, OutcomeFlag};
pub use config::{ConfigError, ProtocolConfig};
pub use contract::{MillionaireYao, RevealedOutcome};
pub use error::{FheError, OracleError, ProtocolError};
pub use gateway::Target;
pub use identity::{Identity, Wallet};
pub use keys::{EphemeralKeyPair, NetworkKeys, encrypt_wealth};
pub use oracle::{DecryptionOracle, KeyHolderOracle, ReencryptedCiphertext, ValueKind};
pub use party::{Parties, Party};
pub use scheme::{HomomorphicScheme, TfheScheme};
pub use state::Phase;
