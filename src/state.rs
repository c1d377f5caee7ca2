//! The protocol state machine: two write-once wealth slots and the outcome.
//!
//! Every transition validates first and mutates last, so a rejected call
//! leaves the state exactly as it was.

use tracing::{info, warn};

use crate::comparator::{self, Outcome, OutcomeFlag};
use crate::error::ProtocolError;
use crate::identity::Identity;
use crate::party::{Parties, Party};
use crate::scheme::HomomorphicScheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    /// Only the given party has submitted.
    OneSubmitted(Party),
    BothSubmitted,
    Compared,
}

pub struct ProtocolState<S: HomomorphicScheme> {
    alice: Option<S::Uint64>,
    bob: Option<S::Uint64>,
    outcome: Option<Outcome<S::Bool>>,
}

impl<S: HomomorphicScheme> Default for ProtocolState<S> {
    fn default() -> Self {
        Self {
            alice: None,
            bob: None,
            outcome: None,
        }
    }
}

impl<S: HomomorphicScheme> ProtocolState<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match (&self.alice, &self.bob, &self.outcome) {
            (_, _, Some(_)) => Phase::Compared,
            (Some(_), Some(_), None) => Phase::BothSubmitted,
            (Some(_), None, None) => Phase::OneSubmitted(Party::Alice),
            (None, Some(_), None) => Phase::OneSubmitted(Party::Bob),
            (None, None, None) => Phase::Empty,
        }
    }

    pub fn wealth(&self, party: Party) -> Option<&S::Uint64> {
        self.slot(party).as_ref()
    }

    pub fn outcome(&self) -> Option<&Outcome<S::Bool>> {
        self.outcome.as_ref()
    }

    pub fn outcome_flag(&self, which: OutcomeFlag) -> Option<&S::Bool> {
        self.outcome.as_ref().map(|outcome| outcome.flag(which))
    }

    fn slot(&self, party: Party) -> &Option<S::Uint64> {
        match party {
            Party::Alice => &self.alice,
            Party::Bob => &self.bob,
        }
    }

    fn slot_mut(&mut self, party: Party) -> &mut Option<S::Uint64> {
        match party {
            Party::Alice => &mut self.alice,
            Party::Bob => &mut self.bob,
        }
    }

    /// Stores `ciphertext` in the caller's slot. The slot is write-once.
    pub fn submit_wealth(
        &mut self,
        parties: &Parties,
        caller: &Identity,
        ciphertext: S::Uint64,
    ) -> Result<Phase, ProtocolError> {
        let Some(party) = parties.resolve(caller) else {
            warn!(caller = %caller, "wealth submission from outside the protocol");
            return Err(ProtocolError::Unauthorized);
        };
        let slot = self.slot_mut(party);
        if slot.is_some() {
            warn!(party = %party, "wealth resubmission rejected");
            return Err(ProtocolError::AlreadySubmitted(party));
        }
        *slot = Some(ciphertext);

        let phase = self.phase();
        info!(party = %party, phase = ?phase, "wealth submitted");
        Ok(phase)
    }

    /// Runs the homomorphic comparison once both slots are filled.
    pub fn compare(&mut self, scheme: &S) -> Result<&Outcome<S::Bool>, ProtocolError> {
        if self.outcome.is_some() {
            warn!("comparison requested again");
            return Err(ProtocolError::AlreadyCompared);
        }
        let (Some(alice), Some(bob)) = (&self.alice, &self.bob) else {
            warn!(phase = ?self.phase(), "comparison requested before both submissions");
            return Err(ProtocolError::NotReady);
        };

        let outcome = comparator::evaluate(scheme, alice, bob);
        info!("wealth comparison stored");
        Ok(self.outcome.insert(outcome))
    }
}
