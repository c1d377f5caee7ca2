//! Access control in front of the decryption oracle.

use tracing::{info, warn};

use crate::auth::{AuthorizationDomain, AuthorizationToken};
use crate::comparator::OutcomeFlag;
use crate::error::ProtocolError;
use crate::identity::Identity;
use crate::oracle::{DecryptionOracle, ReencryptedCiphertext};
use crate::party::Parties;
use crate::scheme::HomomorphicScheme;
use crate::state::ProtocolState;

/// What a reencryption request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The wealth submitted by this identity. Readable by its owner only.
    WealthOf(Identity),
    /// An outcome flag. Readable by either party.
    Outcome(OutcomeFlag),
}

enum Resolved<'a, S: HomomorphicScheme> {
    Wealth(&'a S::Uint64),
    Flag(&'a S::Bool),
}

pub struct ReencryptionGateway<O> {
    domain: AuthorizationDomain,
    parties: Parties,
    oracle: O,
}

impl<O> ReencryptionGateway<O> {
    pub fn new(domain: AuthorizationDomain, parties: Parties, oracle: O) -> Self {
        Self {
            domain,
            parties,
            oracle,
        }
    }

    pub fn domain(&self) -> &AuthorizationDomain {
        &self.domain
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Checks the request against the signer, ownership and availability
    /// rules, in that order, then forwards it to the oracle.
    pub async fn reencrypt<S>(
        &self,
        state: &ProtocolState<S>,
        caller: &Identity,
        target: Target,
        token: &AuthorizationToken,
    ) -> Result<ReencryptedCiphertext, ProtocolError>
    where
        S: HomomorphicScheme,
        O: DecryptionOracle<S>,
    {
        if let Err(err) = token.verify_for(&self.domain, caller) {
            warn!(caller = %caller, signer = %token.signer(), "reencryption token rejected");
            return Err(err);
        }

        let resolved = self.resolve(state, caller, target).inspect_err(|err| {
            warn!(caller = %caller, target = ?target, code = err.code(), "reencryption refused");
        })?;

        let reencrypted = match resolved {
            Resolved::Wealth(ciphertext) => {
                self.oracle
                    .reencrypt_uint64(ciphertext, token.public_key())
                    .await?
            }
            Resolved::Flag(ciphertext) => {
                self.oracle
                    .reencrypt_bool(ciphertext, token.public_key())
                    .await?
            }
        };
        info!(caller = %caller, target = ?target, "reencryption served");
        Ok(reencrypted)
    }

    fn resolve<'a, S: HomomorphicScheme>(
        &self,
        state: &'a ProtocolState<S>,
        caller: &Identity,
        target: Target,
    ) -> Result<Resolved<'a, S>, ProtocolError> {
        match target {
            Target::WealthOf(owner) => {
                let party = self.parties.resolve(&owner).ok_or(ProtocolError::NotOwner)?;
                if owner != *caller {
                    return Err(ProtocolError::NotOwner);
                }
                state
                    .wealth(party)
                    .map(Resolved::Wealth)
                    .ok_or(ProtocolError::NotAvailable("wealth"))
            }
            Target::Outcome(flag) => {
                self.parties.resolve(caller).ok_or(ProtocolError::NotOwner)?;
                state
                    .outcome_flag(flag)
                    .map(Resolved::Flag)
                    .ok_or(ProtocolError::NotAvailable("comparison outcome"))
            }
        }
    }
}
