use tracing::debug_span;

use crate::scheme::HomomorphicScheme;

/// Both encrypted answers to "who is wealthier". Computed independently, so
/// neither is derived from a decryption of the other.
#[derive(Clone)]
pub struct Outcome<B> {
    pub alice_is_wealthier: B,
    pub bob_is_wealthier: B,
}

/// Selects one of the two outcome flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeFlag {
    AliceIsWealthier,
    BobIsWealthier,
}

impl<B> Outcome<B> {
    pub fn flag(&self, which: OutcomeFlag) -> &B {
        match which {
            OutcomeFlag::AliceIsWealthier => &self.alice_is_wealthier,
            OutcomeFlag::BobIsWealthier => &self.bob_is_wealthier,
        }
    }
}

/// `bob_is_wealthier = bob > alice`, `alice_is_wealthier = bob <= alice`.
/// A tie goes to Alice.
pub fn evaluate<S: HomomorphicScheme>(
    scheme: &S,
    alice: &S::Uint64,
    bob: &S::Uint64,
) -> Outcome<S::Bool> {
    let _span = debug_span!("homomorphic_compare").entered();
    let bob_is_wealthier = scheme.gt(bob, alice);
    let alice_is_wealthier = scheme.le(bob, alice);
    Outcome {
        alice_is_wealthier,
        bob_is_wealthier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::PlainScheme;

    #[test]
    fn richer_bob_wins() {
        let outcome = evaluate(&PlainScheme, &1_000_000, &2_000_000);
        assert!(outcome.bob_is_wealthier);
        assert!(!outcome.alice_is_wealthier);
    }

    #[test]
    fn richer_alice_wins() {
        let outcome = evaluate(&PlainScheme, &u64::MAX, &0);
        assert!(outcome.alice_is_wealthier);
        assert!(!outcome.bob_is_wealthier);
    }

    #[test]
    fn tie_goes_to_alice() {
        let outcome = evaluate(&PlainScheme, &42, &42);
        assert!(outcome.alice_is_wealthier);
        assert!(!*outcome.flag(OutcomeFlag::BobIsWealthier));
    }
}
