#![allow(dead_code)]

use std::sync::OnceLock;

use millionaire_fhe::{
    KeyHolderOracle, MillionaireYao, NetworkKeys, Phase, ProtocolConfig, ProtocolError,
    TfheScheme, Wallet, encrypt_wealth,
};
use tfhe::CompactPublicKey;
use tracing_subscriber::EnvFilter;

pub const ALICE_WEALTH: u64 = 1_000_000;
pub const BOB_WEALTH: u64 = 2_000_000;

pub struct Services {
    pub network_key: CompactPublicKey,
    pub scheme: TfheScheme,
    pub oracle: KeyHolderOracle,
    pub limit: u64,
}

// Key generation dominates test time; every test in a binary shares one set.
static SERVICES: OnceLock<Services> = OnceLock::new();

pub fn services() -> &'static Services {
    SERVICES.get_or_init(|| {
        let limit = millionaire_fhe::common::DEFAULT_SERIALIZED_SIZE_LIMIT;
        let (network_key, scheme, oracle) = NetworkKeys::generate().into_services(limit);
        Services {
            network_key,
            scheme,
            oracle,
            limit,
        }
    })
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct Instance {
    pub alice: Wallet,
    pub bob: Wallet,
    pub eve: Wallet,
    pub contract: MillionaireYao<TfheScheme, KeyHolderOracle>,
}

/// Deploys a fresh instance, with eve as an unprivileged bystander.
pub fn deploy() -> Instance {
    init_tracing();
    let services = services();
    let alice = Wallet::generate();
    let bob = Wallet::generate();
    let eve = Wallet::generate();
    let config = ProtocolConfig::new(alice.identity(), bob.identity());
    let contract = MillionaireYao::deploy(&config, services.scheme.clone(), services.oracle.clone())
        .expect("valid config");
    Instance {
        alice,
        bob,
        eve,
        contract,
    }
}

pub fn encrypt(amount: u64) -> Vec<u8> {
    let services = services();
    encrypt_wealth(amount, &services.network_key, services.limit).expect("encrypt wealth")
}

pub fn submit_wealth(
    contract: &mut MillionaireYao<TfheScheme, KeyHolderOracle>,
    signer: &Wallet,
    amount: u64,
) -> Result<Phase, ProtocolError> {
    contract.submit_wealth(&signer.identity(), &encrypt(amount))
}
