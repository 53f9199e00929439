use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;
use crate::stats::{MAX_KEY_ABSENCES, MatchContext, TeamStatistics};

const MIDWEEK_FACTOR: f64 = 0.85;
const ABSENCE_STEP: f64 = 0.06;

/// Poisson rates for the two sides. Derived from inputs on every run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoringIntensities {
    pub home: f64,
    pub away: f64,
}

impl ScoringIntensities {
    pub fn new(home: f64, away: f64) -> Self {
        Self { home, away }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        check_intensity("home", self.home)?;
        check_intensity("away", self.away)
    }
}

pub(crate) fn check_intensity(side: &'static str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidIntensity { side, value })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    Home,
    Away,
}

/// Per-game attacking and defensive output for one side at its venue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamPower {
    pub attack: f64,
    pub defense: f64,
}

pub fn team_power(stats: &TeamStatistics, venue: Venue) -> TeamPower {
    let (games, scored, conceded, xg_scored, xg_conceded) = match venue {
        Venue::Home => (
            stats.home_games_played,
            stats.home_goals_scored,
            stats.home_goals_conceded,
            stats.home_xg_scored,
            stats.home_xg_conceded,
        ),
        Venue::Away => (
            stats.away_games_played,
            stats.away_goals_scored,
            stats.away_goals_conceded,
            stats.away_xg_scored,
            stats.away_xg_conceded,
        ),
    };

    let total_games = if stats.played > 0 {
        stats.played as f64
    } else {
        debug!(?venue, "no games played, dividing by 1");
        1.0
    };
    let venue_games = match games.filter(|g| *g > 0) {
        Some(g) => g as f64,
        None if stats.played > 0 => stats.played as f64 / 2.0,
        None => 1.0,
    };

    let per_game = |venue_value: Option<f64>, aggregate: f64| match present(venue_value) {
        Some(v) => v / venue_games,
        None => aggregate / total_games,
    };

    let attack_goals = per_game(scored, stats.goals_scored);
    let attack_xg = per_game(
        xg_scored,
        present(stats.xg_scored).unwrap_or(stats.goals_scored),
    );
    let defense_goals = per_game(conceded, stats.goals_conceded);
    let defense_xg = per_game(
        xg_conceded,
        present(stats.xg_conceded).unwrap_or(stats.goals_conceded),
    );

    TeamPower {
        attack: (attack_goals + attack_xg) / 2.0,
        defense: (defense_goals + defense_xg) / 2.0,
    }
}

pub fn estimate_rates(
    home: &TeamStatistics,
    away: &TeamStatistics,
    ctx: &MatchContext,
) -> ScoringIntensities {
    let hp = team_power(home, Venue::Home);
    let ap = team_power(away, Venue::Away);

    let mut home_lambda = (hp.attack + ap.defense) / 2.0;
    let mut away_lambda = (ap.attack + hp.defense) / 2.0;

    let home_adv = if ctx.home_advantage.is_finite() {
        ctx.home_advantage.clamp(0.0, 100.0)
    } else {
        0.0
    };
    home_lambda *= 1.0 + home_adv / 100.0;

    let weather = ctx.weather.factor();
    home_lambda *= weather;
    away_lambda *= weather;

    if ctx.home_midweek {
        home_lambda *= MIDWEEK_FACTOR;
    }
    if ctx.away_midweek {
        away_lambda *= MIDWEEK_FACTOR;
    }

    home_lambda *= absence_factor(ctx.home_key_absences);
    away_lambda *= absence_factor(ctx.away_key_absences);

    let out = ScoringIntensities::new(home_lambda.max(0.0), away_lambda.max(0.0));
    debug!(
        home = %ctx.home_team,
        away = %ctx.away_team,
        home_lambda = out.home,
        away_lambda = out.away,
        "estimated scoring intensities"
    );
    out
}

fn absence_factor(absences: u8) -> f64 {
    1.0 - ABSENCE_STEP * absences.min(MAX_KEY_ABSENCES) as f64
}

// Zero counts as "not filled in".
fn present(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite() && *x > 0.0)
}
