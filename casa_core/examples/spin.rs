use casa_core::{EngineParams, ProvablyFairRng, SessionState};

fn main() {
    // Example end-to-end spin with a provably-fair draw
    let server_seed = "example-server-seed";
    let client_seed = "example-client-seed";
    let params = EngineParams::default();
    let mut session = SessionState::new();
    let mut rng = ProvablyFairRng::new(server_seed, client_seed, session.play_count() + 1);
    match session.spin(&params, &mut rng) {
        Ok(outcome) => {
            let reels: Vec<&str> = outcome.reels.iter().map(|s| s.id.as_str()).collect();
            println!(
                "server_seed_hash={} reels={:?} winnings={} balance={} jackpot={:.6}%",
                rng.server_seed_hash_hex(),
                reels,
                outcome.winnings,
                outcome.new_balance,
                outcome.probability_sample
            );
        }
        Err(err) => eprintln!("{err}"),
    }
}
