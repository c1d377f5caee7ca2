// Runs one full protocol instance locally: key generation, both submissions,
// the homomorphic check, a reencrypted read-back for each party and the
// public reveal.

use std::path::PathBuf;

use clap::Parser;
use millionaire_fhe::{
    AuthorizationToken, EphemeralKeyPair, MillionaireYao, NetworkKeys, OutcomeFlag, ProtocolConfig,
    Wallet, encrypt_wealth,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
struct Opt {
    /// Alice's wealth.
    #[arg(long, default_value_t = 1_000_000)]
    alice_wealth: u64,

    /// Bob's wealth.
    #[arg(long, default_value_t = 2_000_000)]
    bob_wealth: u64,

    /// Authorization domain name.
    #[arg(long, default_value = millionaire_fhe::config::DEFAULT_DOMAIN_NAME)]
    domain: String,

    /// Optional path to write the generated instance config (JSON).
    #[arg(long)]
    config_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let opt = Opt::parse();

    let alice = Wallet::generate();
    let bob = Wallet::generate();
    let mut config = ProtocolConfig::new(alice.identity(), bob.identity());
    config.domain_name = opt.domain;
    config.validate()?;
    if let Some(path) = &opt.config_out {
        tokio::fs::write(path, serde_json::to_vec_pretty(&config)?).await?;
        info!(path = %path.display(), "instance config written");
    }
    let limit = config.max_ciphertext_bytes;

    let (network_key, scheme, oracle) =
        tokio::task::spawn_blocking(move || NetworkKeys::generate().into_services(limit)).await?;
    let mut contract = MillionaireYao::deploy(&config, scheme, oracle)?;

    contract.submit_wealth(&alice.identity(), &encrypt_wealth(opt.alice_wealth, &network_key, limit)?)?;
    contract.submit_wealth(&bob.identity(), &encrypt_wealth(opt.bob_wealth, &network_key, limit)?)?;
    // The comparison is CPU-bound and blocks its thread.
    let caller = alice.identity();
    let mut contract = tokio::task::spawn_blocking(move || {
        contract.wealth_check(&caller).map(|()| contract)
    })
    .await??;

    for (name, wallet) in [("alice", &alice), ("bob", &bob)] {
        let keys = EphemeralKeyPair::generate(limit)?;
        let token = AuthorizationToken::sign(wallet, contract.domain(), keys.public_key().clone());
        let own = contract
            .wealth_of(&wallet.identity(), &wallet.identity(), &token)
            .await?;
        let flag = contract
            .reencrypt_outcome(&wallet.identity(), OutcomeFlag::BobIsWealthier, &token)
            .await?;
        println!(
            "{name}: own wealth = {}, bob is wealthier = {}",
            keys.decrypt_wealth(&own)?,
            keys.decrypt_flag(&flag)?
        );
    }

    let revealed = contract.reveal_outcome().await?;
    println!(
        "revealed: alice is wealthier = {}, bob is wealthier = {}",
        revealed.alice_is_wealthier, revealed.bob_is_wealthier
    );
    Ok(())
}
