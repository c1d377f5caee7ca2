mod common;

use common::{ALICE_WEALTH, BOB_WEALTH, deploy, encrypt, submit_wealth};
use millionaire_fhe::{
    AuthorizationToken, EphemeralKeyPair, OutcomeFlag, Party, Phase, ProtocolError,
    RevealedOutcome,
};

#[tokio::test]
async fn test_check_who_is_wealthier() -> Result<(), Box<dyn std::error::Error>> {
    let mut instance = deploy();
    let contract = &mut instance.contract;

    submit_wealth(contract, &instance.alice, ALICE_WEALTH)?;
    submit_wealth(contract, &instance.bob, BOB_WEALTH)?;
    contract.wealth_check(&instance.eve.identity())?;
    assert_eq!(contract.phase(), Phase::Compared);
    assert!(contract.is_alice_wealthier().is_some());
    assert!(contract.is_bob_wealthier().is_some());

    let revealed = contract.reveal_outcome().await?;
    assert_eq!(revealed.bob_is_wealthier, BOB_WEALTH > ALICE_WEALTH);
    assert_eq!(revealed.alice_is_wealthier, BOB_WEALTH <= ALICE_WEALTH);

    // Each party can also read the flags privately.
    for wallet in [&instance.alice, &instance.bob] {
        let keys = EphemeralKeyPair::generate(common::services().limit)?;
        let token = AuthorizationToken::sign(wallet, contract.domain(), keys.public_key().clone());
        let bob_flag = contract
            .reencrypt_outcome(&wallet.identity(), OutcomeFlag::BobIsWealthier, &token)
            .await?;
        let alice_flag = contract
            .reencrypt_outcome(&wallet.identity(), OutcomeFlag::AliceIsWealthier, &token)
            .await?;
        assert!(keys.decrypt_flag(&bob_flag)?);
        assert!(!keys.decrypt_flag(&alice_flag)?);
    }
    Ok(())
}

#[tokio::test]
async fn test_tie_goes_to_alice() -> Result<(), Box<dyn std::error::Error>> {
    let mut instance = deploy();
    let contract = &mut instance.contract;

    submit_wealth(contract, &instance.alice, 750_000)?;
    submit_wealth(contract, &instance.bob, 750_000)?;
    contract.wealth_check(&instance.bob.identity())?;

    assert_eq!(
        contract.reveal_outcome().await?,
        RevealedOutcome {
            alice_is_wealthier: true,
            bob_is_wealthier: false,
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_submission_order_does_not_matter() -> Result<(), Box<dyn std::error::Error>> {
    let mut alice_first = deploy();
    submit_wealth(&mut alice_first.contract, &alice_first.alice, 5_000)?;
    submit_wealth(&mut alice_first.contract, &alice_first.bob, 4_999)?;
    alice_first.contract.wealth_check(&alice_first.alice.identity())?;

    let mut bob_first = deploy();
    submit_wealth(&mut bob_first.contract, &bob_first.bob, 4_999)?;
    assert_eq!(bob_first.contract.phase(), Phase::OneSubmitted(Party::Bob));
    submit_wealth(&mut bob_first.contract, &bob_first.alice, 5_000)?;
    bob_first.contract.wealth_check(&bob_first.bob.identity())?;

    let a = alice_first.contract.reveal_outcome().await?;
    let b = bob_first.contract.reveal_outcome().await?;
    assert_eq!(a, b);
    assert!(a.alice_is_wealthier);
    Ok(())
}

#[tokio::test]
async fn test_resubmission_and_outsiders_revert() -> Result<(), Box<dyn std::error::Error>> {
    let mut instance = deploy();
    let contract = &mut instance.contract;

    let err = contract
        .submit_wealth(&instance.eve.identity(), &encrypt(ALICE_WEALTH))
        .unwrap_err();
    assert!(matches!(err, ProtocolError::Unauthorized));
    assert_eq!(err.to_string(), "Only Alice or Bob can submit wealth");
    assert_eq!(contract.phase(), Phase::Empty);

    submit_wealth(contract, &instance.alice, ALICE_WEALTH)?;
    let err = submit_wealth(contract, &instance.alice, ALICE_WEALTH).unwrap_err();
    assert_eq!(err.to_string(), "Alice's wealth already submitted");

    submit_wealth(contract, &instance.bob, BOB_WEALTH)?;
    let err = submit_wealth(contract, &instance.bob, BOB_WEALTH).unwrap_err();
    assert_eq!(err.to_string(), "Bob's wealth already submitted");
    assert_eq!(contract.phase(), Phase::BothSubmitted);
    Ok(())
}

#[tokio::test]
async fn test_wealth_check_runs_once() -> Result<(), Box<dyn std::error::Error>> {
    let mut instance = deploy();
    let contract = &mut instance.contract;

    submit_wealth(contract, &instance.alice, ALICE_WEALTH)?;
    assert!(matches!(
        contract.wealth_check(&instance.alice.identity()),
        Err(ProtocolError::NotReady)
    ));
    submit_wealth(contract, &instance.bob, BOB_WEALTH)?;
    contract.wealth_check(&instance.alice.identity())?;
    assert!(matches!(
        contract.wealth_check(&instance.bob.identity()),
        Err(ProtocolError::AlreadyCompared)
    ));
    assert!(contract.reveal_outcome().await?.bob_is_wealthier);
    Ok(())
}
