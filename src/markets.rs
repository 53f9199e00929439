use std::cmp::Ordering;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::grid::{ScoreGrid, poisson_probability};
use crate::rates::ScoringIntensities;
use crate::stats::MatchContext;

/// Fair odd shown when a market has no probability mass.
pub const NO_PRICE_ODD: f64 = 999.0;

pub const TOTAL_LINES: [f64; 7] = [0.5, 1.5, 2.5, 3.5, 4.5, 5.5, 6.5];
pub const MULTIGOAL_BANDS: [(usize, usize); 14] = [
    (1, 2),
    (1, 3),
    (1, 4),
    (1, 5),
    (2, 3),
    (2, 4),
    (2, 5),
    (2, 6),
    (3, 4),
    (3, 5),
    (3, 6),
    (4, 5),
    (4, 6),
    (5, 6),
];
pub const CORRECT_SCORE_MAX_GOALS: usize = 5;
pub const CORRECT_SCORE_KEEP: usize = 25;

// Empirical push/half-win haircuts on the +/-1.5 handicap lines.
const AH_MINUS_COEF: f64 = 85.0;
const AH_PLUS_COEF: f64 = 95.0;

const INSIGHT_MIN_PROB: f64 = 65.0;
const INSIGHT_MIN_VALUE: f64 = 1.10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "Main")]
    Main,
    #[serde(rename = "DC")]
    DoubleChance,
    #[serde(rename = "DNB")]
    DrawNoBet,
    #[serde(rename = "Over/Under")]
    OverUnder,
    #[serde(rename = "Goal/No Goal")]
    GoalNoGoal,
    #[serde(rename = "Multigoal")]
    Multigoal,
    #[serde(rename = "Correct Score")]
    CorrectScore,
    #[serde(rename = "Asian Handicap")]
    AsianHandicap,
    #[serde(rename = "Specials")]
    Specials,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Main => "Main",
            Category::DoubleChance => "DC",
            Category::DrawNoBet => "DNB",
            Category::OverUnder => "Over/Under",
            Category::GoalNoGoal => "Goal/No Goal",
            Category::Multigoal => "Multigoal",
            Category::CorrectScore => "Correct Score",
            Category::AsianHandicap => "Asian Handicap",
            Category::Specials => "Specials",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarketRule {
    HomeWin,
    Draw,
    AwayWin,
    HomeOrDraw,
    DrawOrAway,
    HomeOrAway,
    DrawNoBet(Side),
    Under(f64),
    Over(f64),
    BothTeamsScore,
    NotBothTeamsScore,
    TotalBetween { min: usize, max: usize },
    /// Win by 2+, minus the one-goal wins up to 3-2.
    HandicapMinusOneHalf(Side),
    HandicapMinusHalf(Side),
    HandicapPlusHalf(Side),
    /// Win or draw, plus the one-goal loss from 0-0 start.
    HandicapPlusOneHalf(Side),
    WinToNil(Side),
    ScoresBothHalves(Side),
    CleanSheet(Side),
    EvenTotal,
    OddTotal,
    TwoPlusGoals(Side),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketSpec {
    pub label: String,
    pub category: Category,
    pub rule: MarketRule,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogItem {
    Market(MarketSpec),
    /// The `keep` most likely exact scores up to `max_goals` a side,
    /// emitted in descending probability.
    TopCorrectScores { max_goals: usize, keep: usize },
}

impl CatalogItem {
    /// Upper bound on the markets this entry emits.
    pub fn market_count(&self) -> usize {
        match self {
            CatalogItem::Market(_) => 1,
            CatalogItem::TopCorrectScores { keep, .. } => *keep,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketResult {
    pub label: String,
    pub category: Category,
    /// Percentage, 0..=100.
    pub probability: f64,
    pub fair_odd: f64,
    pub bookmaker_odd: Option<f64>,
    /// probability * bookmaker_odd / 100; above 1 is a positive edge.
    pub value: Option<f64>,
    pub high_probability: bool,
}

impl MarketResult {
    pub fn new(
        label: impl Into<String>,
        category: Category,
        probability: f64,
        bookmaker_odd: Option<f64>,
        high_prob_threshold: f64,
    ) -> Self {
        let bookmaker_odd = bookmaker_odd.filter(|odd| odd.is_finite() && *odd > 0.0);
        Self {
            label: label.into(),
            category,
            probability,
            fair_odd: fair_odd(probability),
            bookmaker_odd,
            value: bookmaker_odd.map(|odd| expected_value(probability, odd)),
            high_probability: probability > high_prob_threshold,
        }
    }
}

pub fn fair_odd(probability: f64) -> f64 {
    if probability > 0.0 {
        100.0 / probability
    } else {
        NO_PRICE_ODD
    }
}

pub fn expected_value(probability: f64, bookmaker_odd: f64) -> f64 {
    probability * bookmaker_odd / 100.0
}

static CATALOG: Lazy<Vec<CatalogItem>> = Lazy::new(build_catalog);

pub fn catalog() -> &'static [CatalogItem] {
    &CATALOG
}

fn build_catalog() -> Vec<CatalogItem> {
    use Category::*;
    use MarketRule::*;

    let mut out = Vec::new();
    let mut push = |label: String, category: Category, rule: MarketRule| {
        out.push(CatalogItem::Market(MarketSpec {
            label,
            category,
            rule,
        }));
    };

    push("1".into(), Main, HomeWin);
    push("X".into(), Main, Draw);
    push("2".into(), Main, AwayWin);
    push("1X".into(), DoubleChance, HomeOrDraw);
    push("X2".into(), DoubleChance, DrawOrAway);
    push("12".into(), DoubleChance, HomeOrAway);
    push("DNB 1".into(), Category::DrawNoBet, MarketRule::DrawNoBet(Side::Home));
    push("DNB 2".into(), Category::DrawNoBet, MarketRule::DrawNoBet(Side::Away));

    for line in TOTAL_LINES {
        push(format!("Under {line:.1}"), OverUnder, Under(line));
        push(format!("Over {line:.1}"), OverUnder, Over(line));
    }

    push("BTTS Yes".into(), GoalNoGoal, BothTeamsScore);
    push("BTTS No".into(), GoalNoGoal, NotBothTeamsScore);

    for (min, max) in MULTIGOAL_BANDS {
        push(format!("MG {min}-{max}"), Multigoal, TotalBetween { min, max });
    }

    out.push(CatalogItem::TopCorrectScores {
        max_goals: CORRECT_SCORE_MAX_GOALS,
        keep: CORRECT_SCORE_KEEP,
    });

    let mut push = |label: &str, category: Category, rule: MarketRule| {
        out.push(CatalogItem::Market(MarketSpec {
            label: label.to_string(),
            category,
            rule,
        }));
    };

    push("H. -1.5", AsianHandicap, HandicapMinusOneHalf(Side::Home));
    push("H. -0.5", AsianHandicap, HandicapMinusHalf(Side::Home));
    push("A. -1.5", AsianHandicap, HandicapMinusOneHalf(Side::Away));
    push("A. -0.5", AsianHandicap, HandicapMinusHalf(Side::Away));
    push("H. +0.5", AsianHandicap, HandicapPlusHalf(Side::Home));
    push("A. +0.5", AsianHandicap, HandicapPlusHalf(Side::Away));
    push("H. +1.5", AsianHandicap, HandicapPlusOneHalf(Side::Home));
    push("A. +1.5", AsianHandicap, HandicapPlusOneHalf(Side::Away));

    push("Win Nil H", Specials, WinToNil(Side::Home));
    push("Win Nil A", Specials, WinToNil(Side::Away));
    push("Score Both H", Specials, ScoresBothHalves(Side::Home));
    push("Score Both A", Specials, ScoresBothHalves(Side::Away));
    push("Clean Sheet H", Specials, CleanSheet(Side::Home));
    push("Clean Sheet A", Specials, CleanSheet(Side::Away));
    push("Pari", Specials, EvenTotal);
    push("Dispari", Specials, OddTotal);
    push("H 1.5+ Goals", Specials, TwoPlusGoals(Side::Home));
    push("A 1.5+ Goals", Specials, TwoPlusGoals(Side::Away));

    out
}

/// Everything a market formula may read, computed once per run.
pub struct MarketInputs<'a> {
    pub grid: &'a ScoreGrid,
    pub lambda_home: f64,
    pub lambda_away: f64,
    pub p1: f64,
    pub px: f64,
    pub p2: f64,
    pub derive_parity: bool,
}

impl<'a> MarketInputs<'a> {
    pub fn new(intensities: ScoringIntensities, grid: &'a ScoreGrid, derive_parity: bool) -> Self {
        let split = grid.outcome_split();
        Self {
            grid,
            lambda_home: intensities.home,
            lambda_away: intensities.away,
            p1: split.home,
            px: split.draw,
            p2: split.away,
            derive_parity,
        }
    }

    fn lambda(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.lambda_home,
            Side::Away => self.lambda_away,
        }
    }

    fn opponent_lambda(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.lambda_away,
            Side::Away => self.lambda_home,
        }
    }

    fn win(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.p1,
            Side::Away => self.p2,
        }
    }

    // Cell with `side` on `own` goals and the opponent on `other`.
    fn cell(&self, side: Side, own: usize, other: usize) -> f64 {
        match side {
            Side::Home => self.grid.get(own, other),
            Side::Away => self.grid.get(other, own),
        }
    }

    /// Probability in percent.
    pub fn probability(&self, rule: MarketRule) -> f64 {
        use MarketRule::*;

        let grid = self.grid;
        match rule {
            HomeWin => self.p1 * 100.0,
            Draw => self.px * 100.0,
            AwayWin => self.p2 * 100.0,
            HomeOrDraw => (self.p1 + self.px) * 100.0,
            DrawOrAway => (self.px + self.p2) * 100.0,
            HomeOrAway => (self.p1 + self.p2) * 100.0,
            DrawNoBet(side) => {
                let decisive = self.p1 + self.p2;
                if decisive > 0.0 {
                    self.win(side) / decisive * 100.0
                } else {
                    0.0
                }
            }
            Under(line) => grid.sum_where(|h, a| ((h + a) as f64) < line) * 100.0,
            Over(line) => (1.0 - grid.sum_where(|h, a| ((h + a) as f64) < line)) * 100.0,
            BothTeamsScore => self.both_score() * 100.0,
            NotBothTeamsScore => 100.0 - self.both_score() * 100.0,
            TotalBetween { min, max } => {
                grid.sum_where(|h, a| (min..=max).contains(&(h + a))) * 100.0
            }
            HandicapMinusOneHalf(side) => {
                let narrow =
                    self.cell(side, 1, 0) + self.cell(side, 2, 1) + self.cell(side, 3, 2);
                (self.win(side) - narrow) * AH_MINUS_COEF
            }
            HandicapMinusHalf(side) => self.win(side) * 100.0,
            HandicapPlusHalf(side) => (self.win(side) + self.px) * 100.0,
            HandicapPlusOneHalf(side) => {
                (self.win(side) + self.px + self.cell(side, 0, 1)) * AH_PLUS_COEF
            }
            WinToNil(side) => {
                self.win(side) * poisson_probability(0, self.opponent_lambda(side)) * 100.0
            }
            ScoresBothHalves(side) => {
                (1.0 - poisson_probability(0, self.lambda(side) / 2.0)).powi(2) * 100.0
            }
            CleanSheet(side) => poisson_probability(0, self.opponent_lambda(side)) * 100.0,
            EvenTotal if self.derive_parity => grid.sum_where(|h, a| (h + a) % 2 == 0) * 100.0,
            OddTotal if self.derive_parity => grid.sum_where(|h, a| (h + a) % 2 == 1) * 100.0,
            EvenTotal | OddTotal => 50.0,
            TwoPlusGoals(side) => {
                let lambda = self.lambda(side);
                (1.0 - poisson_probability(0, lambda) - poisson_probability(1, lambda)) * 100.0
            }
        }
    }

    fn both_score(&self) -> f64 {
        (1.0 - poisson_probability(0, self.lambda_home))
            * (1.0 - poisson_probability(0, self.lambda_away))
    }

    fn top_correct_scores(&self, max_goals: usize, keep: usize) -> Vec<(String, f64)> {
        let mut scores = Vec::with_capacity((max_goals + 1) * (max_goals + 1));
        for h in 0..=max_goals {
            for a in 0..=max_goals {
                scores.push((format!("{h}-{a}"), self.grid.get(h, a) * 100.0));
            }
        }
        // Stable sort keeps row-major order among ties.
        scores.sort_by(|a, b| b.1.total_cmp(&a.1));
        scores.truncate(keep);
        scores
    }
}

pub fn generate_markets(
    intensities: ScoringIntensities,
    grid: &ScoreGrid,
    ctx: &MatchContext,
    high_prob_threshold: f64,
    derive_parity: bool,
) -> Vec<MarketResult> {
    let inputs = MarketInputs::new(intensities, grid, derive_parity);
    let price = |label: String, category: Category, probability: f64| {
        let odd = ctx.bookmaker_odd(&label);
        MarketResult::new(label, category, probability, odd, high_prob_threshold)
    };

    let mut out = Vec::with_capacity(catalog().iter().map(CatalogItem::market_count).sum());
    for item in catalog() {
        match item {
            CatalogItem::Market(spec) => {
                out.push(price(
                    spec.label.clone(),
                    spec.category,
                    inputs.probability(spec.rule),
                ));
            }
            CatalogItem::TopCorrectScores { max_goals, keep } => {
                for (label, p) in inputs.top_correct_scores(*max_goals, *keep) {
                    out.push(price(label, Category::CorrectScore, p));
                }
            }
        }
    }
    out
}

/// Distinct categories in first-appearance order.
pub fn categories(markets: &[MarketResult]) -> Vec<Category> {
    let mut out: Vec<Category> = Vec::new();
    for m in markets {
        if !out.contains(&m.category) {
            out.push(m.category);
        }
    }
    out
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Probability,
    Value,
}

pub fn markets_in_category(
    markets: &[MarketResult],
    category: Category,
    sort: SortKey,
) -> Vec<&MarketResult> {
    let mut rows: Vec<&MarketResult> = markets
        .iter()
        .filter(|m| m.category == category)
        .collect();
    match sort {
        SortKey::Probability => rows.sort_by(|a, b| desc(a.probability, b.probability)),
        SortKey::Value => rows.sort_by(|a, b| desc(value_or_zero(a), value_or_zero(b))),
    }
    rows
}

/// Up to `limit` standout markets: likely ones or ones priced with an edge,
/// best value first.
pub fn value_insights(markets: &[MarketResult], limit: usize) -> Vec<&MarketResult> {
    let mut rows: Vec<&MarketResult> = markets
        .iter()
        .filter(|m| m.probability > INSIGHT_MIN_PROB || value_or_zero(m) > INSIGHT_MIN_VALUE)
        .collect();
    rows.sort_by(|a, b| desc(value_or_zero(a), value_or_zero(b)));
    rows.truncate(limit);
    rows
}

fn value_or_zero(m: &MarketResult) -> f64 {
    m.value.unwrap_or(0.0)
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
