use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const MAX_KEY_ABSENCES: u8 = 5;

/// Season numbers for one side. Venue-split fields are optional; a missing
/// or zero value falls back to the aggregate figures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TeamStatistics {
    pub played: u32,
    pub goals_scored: f64,
    pub goals_conceded: f64,
    pub xg_scored: Option<f64>,
    pub xg_conceded: Option<f64>,

    pub home_games_played: Option<u32>,
    pub home_goals_scored: Option<f64>,
    pub home_goals_conceded: Option<f64>,
    pub home_xg_scored: Option<f64>,
    pub home_xg_conceded: Option<f64>,

    pub away_games_played: Option<u32>,
    pub away_goals_scored: Option<f64>,
    pub away_goals_conceded: Option<f64>,
    pub away_xg_scored: Option<f64>,
    pub away_xg_conceded: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    #[serde(alias = "good")]
    Normal,
    Rain,
    Extreme,
}

impl Weather {
    pub fn factor(self) -> f64 {
        match self {
            Weather::Normal => 1.0,
            Weather::Rain => 0.94,
            Weather::Extreme => 0.80,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchContext {
    pub home_team: String,
    pub away_team: String,
    pub weather: Weather,
    pub home_midweek: bool,
    pub away_midweek: bool,
    pub home_key_absences: u8,
    pub away_key_absences: u8,
    /// Percentage, e.g. 12 for +12%.
    pub home_advantage: f64,
    pub market_odds: HashMap<String, Option<f64>>,
}

impl Default for MatchContext {
    fn default() -> Self {
        Self {
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
            weather: Weather::Normal,
            home_midweek: false,
            away_midweek: false,
            home_key_absences: 0,
            away_key_absences: 0,
            home_advantage: 12.0,
            market_odds: HashMap::new(),
        }
    }
}

impl MatchContext {
    /// Usable bookmaker odd for `label`: present, finite and positive.
    pub fn bookmaker_odd(&self, label: &str) -> Option<f64> {
        self.market_odds
            .get(label)
            .copied()
            .flatten()
            .filter(|odd| odd.is_finite() && *odd > 0.0)
    }

    pub fn set_bookmaker_odd(&mut self, label: impl Into<String>, odd: f64) {
        self.market_odds.insert(label.into(), Some(odd));
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Advanced,
    Basic,
}

/// Everything the caller collects for one fixture, as read from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MatchCase {
    pub home: TeamStatistics,
    pub away: TeamStatistics,
    #[serde(default)]
    pub context: MatchContext,
    #[serde(default)]
    pub mode: InputMode,
}

/// Input transform applied before rate estimation. Basic mode ignores xG
/// (forced to the goal figures) and every contextual adjustment.
pub fn prepare_inputs(
    mode: InputMode,
    home: &TeamStatistics,
    away: &TeamStatistics,
    ctx: &MatchContext,
) -> (TeamStatistics, TeamStatistics, MatchContext) {
    match mode {
        InputMode::Advanced => (home.clone(), away.clone(), ctx.clone()),
        InputMode::Basic => {
            let ctx = MatchContext {
                weather: Weather::Normal,
                home_midweek: false,
                away_midweek: false,
                home_key_absences: 0,
                away_key_absences: 0,
                home_advantage: 0.0,
                ..ctx.clone()
            };
            (goals_only(home), goals_only(away), ctx)
        }
    }
}

fn goals_only(stats: &TeamStatistics) -> TeamStatistics {
    TeamStatistics {
        xg_scored: Some(stats.goals_scored),
        xg_conceded: Some(stats.goals_conceded),
        home_xg_scored: stats.home_goals_scored,
        home_xg_conceded: stats.home_goals_conceded,
        away_xg_scored: stats.away_goals_scored,
        away_xg_conceded: stats.away_goals_conceded,
        ..stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_accepts_good_alias() {
        let w: Weather = serde_json::from_str("\"good\"").unwrap();
        assert_eq!(w, Weather::Normal);
        let w: Weather = serde_json::from_str("\"extreme\"").unwrap();
        assert_eq!(w, Weather::Extreme);
    }

    #[test]
    fn bookmaker_odd_skips_unusable_values() {
        let mut ctx = MatchContext::default();
        ctx.set_bookmaker_odd("1", 1.95);
        ctx.set_bookmaker_odd("X", f64::NAN);
        ctx.set_bookmaker_odd("2", 0.0);
        ctx.market_odds.insert("1X".to_string(), None);

        assert_eq!(ctx.bookmaker_odd("1"), Some(1.95));
        assert_eq!(ctx.bookmaker_odd("X"), None);
        assert_eq!(ctx.bookmaker_odd("2"), None);
        assert_eq!(ctx.bookmaker_odd("1X"), None);
        assert_eq!(ctx.bookmaker_odd("12"), None);
    }

    #[test]
    fn basic_mode_resets_context_but_keeps_odds() {
        let mut ctx = MatchContext {
            weather: Weather::Rain,
            home_midweek: true,
            away_key_absences: 3,
            home_advantage: 20.0,
            ..MatchContext::default()
        };
        ctx.set_bookmaker_odd("1", 2.10);
        let stats = TeamStatistics {
            played: 10,
            goals_scored: 14.0,
            goals_conceded: 9.0,
            xg_scored: Some(17.2),
            home_goals_scored: Some(8.0),
            home_xg_scored: Some(6.5),
            ..TeamStatistics::default()
        };

        let (h, _, c) = prepare_inputs(InputMode::Basic, &stats, &stats, &ctx);
        assert_eq!(c.weather, Weather::Normal);
        assert!(!c.home_midweek);
        assert_eq!(c.away_key_absences, 0);
        assert_eq!(c.home_advantage, 0.0);
        assert_eq!(c.bookmaker_odd("1"), Some(2.10));
        assert_eq!(h.xg_scored, Some(14.0));
        assert_eq!(h.xg_conceded, Some(9.0));
        assert_eq!(h.home_xg_scored, Some(8.0));
        assert_eq!(h.away_xg_scored, None);
    }

    #[test]
    fn match_case_defaults_context_and_mode() {
        let case: MatchCase = serde_json::from_str(
            r#"{"home":{"played":10,"goals_scored":12},"away":{"played":10,"goals_conceded":9}}"#,
        )
        .unwrap();
        assert_eq!(case.mode, InputMode::Advanced);
        assert_eq!(case.context.home_advantage, 12.0);
        assert_eq!(case.home.xg_scored, None);
        assert_eq!(case.away.goals_conceded, 9.0);
    }

    #[test]
    fn advanced_mode_is_identity() {
        let stats = TeamStatistics {
            played: 4,
            goals_scored: 5.0,
            xg_scored: Some(6.1),
            ..TeamStatistics::default()
        };
        let ctx = MatchContext::default();
        let (h, a, c) = prepare_inputs(InputMode::Advanced, &stats, &stats, &ctx);
        assert_eq!(h, stats);
        assert_eq!(a, stats);
        assert_eq!(c, ctx);
    }
}
