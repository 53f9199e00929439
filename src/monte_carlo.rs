use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;
use crate::rates::check_intensity;

/// Empirical 1X2 split in percent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MonteCarloResult {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
    pub trials: u32,
}

pub fn run_monte_carlo(
    lambda_home: f64,
    lambda_away: f64,
    trials: u32,
) -> Result<MonteCarloResult, EngineError> {
    run_monte_carlo_with_rng(&mut rand::thread_rng(), lambda_home, lambda_away, trials)
}

pub fn run_monte_carlo_seeded(
    lambda_home: f64,
    lambda_away: f64,
    trials: u32,
    seed: u64,
) -> Result<MonteCarloResult, EngineError> {
    let mut rng = StdRng::seed_from_u64(seed);
    run_monte_carlo_with_rng(&mut rng, lambda_home, lambda_away, trials)
}

pub fn run_monte_carlo_with_rng<R: Rng>(
    rng: &mut R,
    lambda_home: f64,
    lambda_away: f64,
    trials: u32,
) -> Result<MonteCarloResult, EngineError> {
    if trials == 0 {
        return Err(EngineError::ZeroTrials);
    }
    check_intensity("home", lambda_home)?;
    check_intensity("away", lambda_away)?;

    let mut home = 0u32;
    let mut draw = 0u32;
    let mut away = 0u32;
    for _ in 0..trials {
        let h = sample_poisson(rng, lambda_home);
        let a = sample_poisson(rng, lambda_away);
        if h > a {
            home += 1;
        } else if h < a {
            away += 1;
        } else {
            draw += 1;
        }
    }

    let n = trials as f64;
    let out = MonteCarloResult {
        home_win: home as f64 / n * 100.0,
        draw: draw as f64 / n * 100.0,
        away_win: away as f64 / n * 100.0,
        trials,
    };
    debug!(trials, home, draw, away, "monte carlo tally");
    Ok(out)
}

// Knuth: multiply uniforms until the product drops to e^-lambda.
fn sample_poisson<R: Rng>(rng: &mut R, lambda: f64) -> u32 {
    let threshold = (-lambda).exp();
    let mut k = 0u32;
    let mut p = 1.0_f64;
    loop {
        k += 1;
        p *= rng.gen_range(0.0_f64..1.0);
        if p <= threshold {
            return k - 1;
        }
    }
}
