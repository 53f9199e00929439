use std::env;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DC_RHO: f64 = -0.05;
pub const DEFAULT_HT_SHARE: f64 = 0.45;
pub const DEFAULT_HIGH_PROB: f64 = 68.0;
pub const DEFAULT_MC_TRIALS: u32 = 10_000;

/// Tunables for one engine run. Grid sizes are fixed and live in `grid`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Dixon-Coles rho (negative lifts 0-0 and 1-1).
    pub dc_rho: f64,
    pub half_time_share: f64,
    pub high_prob_threshold: f64,
    pub monte_carlo_trials: u32,
    pub monte_carlo_seed: Option<u64>,
    /// Derive Pari/Dispari from the grid instead of the fixed 50/50.
    pub derive_parity: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dc_rho: DEFAULT_DC_RHO,
            half_time_share: DEFAULT_HT_SHARE,
            high_prob_threshold: DEFAULT_HIGH_PROB,
            monte_carlo_trials: DEFAULT_MC_TRIALS,
            monte_carlo_seed: None,
            derive_parity: false,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            dc_rho: env_parse("GOALGRID_DC_RHO")
                .unwrap_or(d.dc_rho)
                .clamp(-0.25, 0.05),
            half_time_share: env_parse("GOALGRID_HT_SHARE")
                .unwrap_or(d.half_time_share)
                .clamp(0.10, 0.90),
            high_prob_threshold: env_parse("GOALGRID_HIGH_PROB")
                .unwrap_or(d.high_prob_threshold)
                .clamp(0.0, 100.0),
            monte_carlo_trials: env_parse("GOALGRID_MC_TRIALS")
                .unwrap_or(d.monte_carlo_trials)
                .clamp(1, 5_000_000),
            monte_carlo_seed: env_parse("GOALGRID_MC_SEED"),
            derive_parity: env_bool("GOALGRID_DERIVE_PARITY").unwrap_or(d.derive_parity),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<T>().ok())
}

fn env_bool(key: &str) -> Option<bool> {
    let raw = env::var(key).ok()?;
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
