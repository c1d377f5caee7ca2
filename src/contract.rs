//! `MillionaireYao`: the protocol boundary.
//!
//! Mutating calls take `&mut self` and are applied one at a time, the way
//! the hosting ledger orders transactions. Reencryption only reads state.

use tracing::{info, warn};

use crate::auth::{AuthorizationDomain, AuthorizationToken};
use crate::common::short_fingerprint;
use crate::comparator::OutcomeFlag;
use crate::config::{ConfigError, ProtocolConfig};
use crate::error::ProtocolError;
use crate::gateway::{ReencryptionGateway, Target};
use crate::identity::Identity;
use crate::oracle::{DecryptionOracle, ReencryptedCiphertext};
use crate::party::Parties;
use crate::scheme::HomomorphicScheme;
use crate::state::{Phase, ProtocolState};

/// Plaintext outcome published through the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealedOutcome {
    pub alice_is_wealthier: bool,
    pub bob_is_wealthier: bool,
}

pub struct MillionaireYao<S: HomomorphicScheme, O> {
    parties: Parties,
    scheme: S,
    state: ProtocolState<S>,
    gateway: ReencryptionGateway<O>,
    revealed: Option<RevealedOutcome>,
}

impl<S, O> MillionaireYao<S, O>
where
    S: HomomorphicScheme,
    O: DecryptionOracle<S>,
{
    pub fn deploy(config: &ProtocolConfig, scheme: S, oracle: O) -> Result<Self, ConfigError> {
        config.validate()?;
        let parties = config.parties()?;
        let domain = AuthorizationDomain::generate(&config.domain_name, &parties);
        info!(
            alice = %config.alice,
            bob = %config.bob,
            domain = %config.domain_name,
            instance = %short_fingerprint(domain.instance()),
            "protocol instance deployed"
        );
        Ok(Self {
            parties,
            scheme,
            state: ProtocolState::new(),
            gateway: ReencryptionGateway::new(domain, parties, oracle),
            revealed: None,
        })
    }

    pub fn parties(&self) -> &Parties {
        &self.parties
    }

    /// Domain requesters sign their authorization tokens for.
    pub fn domain(&self) -> &AuthorizationDomain {
        self.gateway.domain()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Submits the caller's encrypted wealth. Each party may do so once.
    pub fn submit_wealth(&mut self, caller: &Identity, ciphertext: &[u8]) -> Result<Phase, ProtocolError> {
        if self.parties.resolve(caller).is_none() {
            warn!(caller = %caller, "wealth submission from outside the protocol");
            return Err(ProtocolError::Unauthorized);
        }
        let wealth = self
            .scheme
            .decode_input(ciphertext)
            .map_err(ProtocolError::MalformedCiphertext)?;
        self.state.submit_wealth(&self.parties, caller, wealth)
    }

    /// Reencrypts `owner`'s wealth for the caller, who must be `owner`.
    pub async fn wealth_of(
        &self,
        caller: &Identity,
        owner: &Identity,
        token: &AuthorizationToken,
    ) -> Result<ReencryptedCiphertext, ProtocolError> {
        self.gateway
            .reencrypt(&self.state, caller, Target::WealthOf(*owner), token)
            .await
    }

    /// Reencrypts one outcome flag for either party.
    pub async fn reencrypt_outcome(
        &self,
        caller: &Identity,
        flag: OutcomeFlag,
        token: &AuthorizationToken,
    ) -> Result<ReencryptedCiphertext, ProtocolError> {
        self.gateway
            .reencrypt(&self.state, caller, Target::Outcome(flag), token)
            .await
    }

    /// Compares the two submitted values. Anyone may trigger it, once.
    pub fn wealth_check(&mut self, caller: &Identity) -> Result<(), ProtocolError> {
        info!(caller = %caller, "wealth check requested");
        self.state.compare(&self.scheme).map(|_| ())
    }

    pub fn is_alice_wealthier(&self) -> Option<&S::Bool> {
        self.state.outcome_flag(OutcomeFlag::AliceIsWealthier)
    }

    pub fn is_bob_wealthier(&self) -> Option<&S::Bool> {
        self.state.outcome_flag(OutcomeFlag::BobIsWealthier)
    }

    /// Publicly decrypts both outcome flags. Repeated calls return the
    /// stored result without contacting the oracle again.
    pub async fn reveal_outcome(&mut self) -> Result<RevealedOutcome, ProtocolError> {
        if let Some(revealed) = self.revealed {
            return Ok(revealed);
        }
        let outcome = self
            .state
            .outcome()
            .ok_or(ProtocolError::NotAvailable("comparison outcome"))?;
        let oracle = self.gateway.oracle();
        let alice_is_wealthier = oracle.public_decrypt_bool(&outcome.alice_is_wealthier).await?;
        let bob_is_wealthier = oracle.public_decrypt_bool(&outcome.bob_is_wealthier).await?;

        let revealed = RevealedOutcome {
            alice_is_wealthier,
            bob_is_wealthier,
        };
        info!(alice_is_wealthier, bob_is_wealthier, "outcome revealed");
        self.revealed = Some(revealed);
        Ok(revealed)
    }

    pub fn revealed_outcome(&self) -> Option<RevealedOutcome> {
        self.revealed
    }
}
