use std::fmt;

use crate::identity::Identity;

/// One of the two privileged roles of a protocol instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Party {
    Alice,
    Bob,
}

impl Party {
    pub fn other(self) -> Party {
        match self {
            Party::Alice => Party::Bob,
            Party::Bob => Party::Alice,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Alice => f.write_str("Alice"),
            Party::Bob => f.write_str("Bob"),
        }
    }
}

/// The two identities bound to the roles at deployment. Never reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parties {
    alice: Identity,
    bob: Identity,
}

impl Parties {
    /// Returns `None` when both roles would be held by the same identity.
    pub fn new(alice: Identity, bob: Identity) -> Option<Self> {
        (alice != bob).then_some(Self { alice, bob })
    }

    pub fn identity(&self, party: Party) -> &Identity {
        match party {
            Party::Alice => &self.alice,
            Party::Bob => &self.bob,
        }
    }

    /// Role held by `identity`, if any.
    pub fn resolve(&self, identity: &Identity) -> Option<Party> {
        if *identity == self.alice {
            Some(Party::Alice)
        } else if *identity == self.bob {
            Some(Party::Bob)
        } else {
            None
        }
    }
}
