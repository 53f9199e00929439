use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::grid::{OutcomeSplit, ScoreGrid, poisson_probability};
use crate::markets::{MarketResult, generate_markets};
use crate::monte_carlo::{MonteCarloResult, run_monte_carlo, run_monte_carlo_seeded};
use crate::rates::{ScoringIntensities, estimate_rates};
use crate::stats::{InputMode, MatchContext, TeamStatistics, prepare_inputs};

pub const SCORE_MATRIX_GOALS: usize = 6;

/// One immutable snapshot of a run. A new input produces a new summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationSummary {
    pub home_lambda: f64,
    pub away_lambda: f64,
    /// Percentages from the full-time grid.
    pub full_time: OutcomeSplit,
    /// Percentages from the half-time grid.
    pub half_time: OutcomeSplit,
    pub markets: Vec<MarketResult>,
}

impl SimulationSummary {
    pub fn intensities(&self) -> ScoringIntensities {
        ScoringIntensities::new(self.home_lambda, self.away_lambda)
    }

    pub fn market(&self, label: &str) -> Option<&MarketResult> {
        self.markets.iter().find(|m| m.label == label)
    }

    /// Empirical cross-check of `full_time`. Never feeds back into the summary.
    pub fn monte_carlo(&self, cfg: &EngineConfig) -> Result<MonteCarloResult, EngineError> {
        match cfg.monte_carlo_seed {
            Some(seed) => run_monte_carlo_seeded(
                self.home_lambda,
                self.away_lambda,
                cfg.monte_carlo_trials,
                seed,
            ),
            None => run_monte_carlo(self.home_lambda, self.away_lambda, cfg.monte_carlo_trials),
        }
    }
}

pub fn build_simulation(
    intensities: ScoringIntensities,
    ctx: &MatchContext,
) -> Result<SimulationSummary, EngineError> {
    build_simulation_with(intensities, ctx, &EngineConfig::default())
}

pub fn build_simulation_with(
    intensities: ScoringIntensities,
    ctx: &MatchContext,
    cfg: &EngineConfig,
) -> Result<SimulationSummary, EngineError> {
    intensities.validate()?;
    let (lh, la) = (intensities.home, intensities.away);

    let grid = ScoreGrid::full_time(lh, la, cfg.dc_rho);
    let half = ScoreGrid::half_time(lh, la, cfg.half_time_share);
    let full_time = grid.outcome_split().to_percent();
    let half_time = half.outcome_split().to_percent();

    let markets = generate_markets(
        intensities,
        &grid,
        ctx,
        cfg.high_prob_threshold,
        cfg.derive_parity,
    );
    debug!(
        home_lambda = lh,
        away_lambda = la,
        p_home = full_time.home,
        p_draw = full_time.draw,
        p_away = full_time.away,
        markets = markets.len(),
        "simulation built"
    );

    Ok(SimulationSummary {
        home_lambda: lh,
        away_lambda: la,
        full_time,
        half_time,
        markets,
    })
}

/// Mode transform, rate estimation and simulation in one call.
pub fn simulate_match(
    mode: InputMode,
    home: &TeamStatistics,
    away: &TeamStatistics,
    ctx: &MatchContext,
    cfg: &EngineConfig,
) -> Result<SimulationSummary, EngineError> {
    let (home, away, ctx) = prepare_inputs(mode, home, away, ctx);
    let intensities = estimate_rates(&home, &away, &ctx);
    build_simulation_with(intensities, &ctx, cfg)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreCell {
    pub home: usize,
    pub away: usize,
    /// Percentage.
    pub probability: f64,
}

/// Plain independent-Poisson exact-score table for display, without the
/// low-score correction.
pub fn score_matrix(intensities: ScoringIntensities, size: usize) -> Vec<ScoreCell> {
    let mut out = Vec::with_capacity(size * size);
    for home in 0..size {
        for away in 0..size {
            let p = poisson_probability(home as u32, intensities.home)
                * poisson_probability(away as u32, intensities.away);
            out.push(ScoreCell {
                home,
                away,
                probability: p * 100.0,
            });
        }
    }
    out
}
