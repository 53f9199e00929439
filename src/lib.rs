pub mod config;
pub mod error;
pub mod grid;
pub mod markets;
pub mod monte_carlo;
pub mod rates;
pub mod simulation;
pub mod stats;

pub use config::EngineConfig;
pub use error::EngineError;
pub use grid::{ScoreGrid, poisson_probability};
pub use markets::{Category, MarketResult, generate_markets};
pub use monte_carlo::{MonteCarloResult, run_monte_carlo, run_monte_carlo_seeded};
pub use rates::{ScoringIntensities, estimate_rates};
pub use simulation::{SimulationSummary, build_simulation, build_simulation_with, simulate_match};
pub use stats::{InputMode, MatchCase, MatchContext, TeamStatistics, Weather, prepare_inputs};
