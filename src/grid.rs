use serde::{Deserialize, Serialize};

pub const FULL_TIME_GOALS: usize = 10;
pub const HALF_TIME_GOALS: usize = 6;

/// P(X = k) for X ~ Poisson(lambda). Iterative factorial is exact enough for
/// the goal counts used here.
pub fn poisson_probability(k: u32, lambda: f64) -> f64 {
    let numer = lambda.powi(k as i32) * (-lambda).exp();
    let denom = (1..=k).fold(1.0_f64, |acc, n| acc * n as f64).max(1.0);
    numer / denom
}

/// Dixon-Coles low-score multiplier. Exactly 1 outside the four cells.
pub fn dc_tau(
    home_goals: usize,
    away_goals: usize,
    lambda_home: f64,
    lambda_away: f64,
    rho: f64,
) -> f64 {
    match (home_goals, away_goals) {
        (0, 0) => 1.0 - lambda_home * lambda_away * rho,
        (0, 1) => 1.0 + lambda_home * rho,
        (1, 0) => 1.0 + lambda_away * rho,
        (1, 1) => 1.0 - rho,
        _ => 1.0,
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OutcomeSplit {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OutcomeSplit {
    pub fn to_percent(self) -> Self {
        Self {
            home: self.home * 100.0,
            draw: self.draw * 100.0,
            away: self.away * 100.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.home + self.draw + self.away
    }
}

/// Square joint distribution over (home goals, away goals), truncated at
/// `size - 1` goals per side. Cells are row-major by home goals.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreGrid {
    size: usize,
    cells: Vec<f64>,
}

impl ScoreGrid {
    pub fn build(lambda_home: f64, lambda_away: f64, size: usize, rho: f64) -> Self {
        let pmf_h: Vec<f64> = (0..size as u32)
            .map(|k| poisson_probability(k, lambda_home))
            .collect();
        let pmf_a: Vec<f64> = (0..size as u32)
            .map(|k| poisson_probability(k, lambda_away))
            .collect();

        let mut cells = Vec::with_capacity(size * size);
        for (h, p_h) in pmf_h.iter().enumerate() {
            for (a, p_a) in pmf_a.iter().enumerate() {
                cells.push(p_h * p_a * dc_tau(h, a, lambda_home, lambda_away, rho));
            }
        }
        Self { size, cells }
    }

    pub fn full_time(lambda_home: f64, lambda_away: f64, rho: f64) -> Self {
        Self::build(lambda_home, lambda_away, FULL_TIME_GOALS, rho)
    }

    /// First-half grid: both rates scaled by `share`, truncated at 5 goals.
    /// Plain independent Poisson, no low-score correction.
    pub fn half_time(lambda_home: f64, lambda_away: f64, share: f64) -> Self {
        Self::build(lambda_home * share, lambda_away * share, HALF_TIME_GOALS, 0.0)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, home_goals: usize, away_goals: usize) -> f64 {
        if home_goals >= self.size || away_goals >= self.size {
            return 0.0;
        }
        self.cells[home_goals * self.size + away_goals]
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, p)| (idx / self.size, idx % self.size, *p))
    }

    pub fn sum_where(&self, pred: impl Fn(usize, usize) -> bool) -> f64 {
        self.cells()
            .filter(|(h, a, _)| pred(*h, *a))
            .map(|(_, _, p)| p)
            .sum()
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }

    pub fn outcome_split(&self) -> OutcomeSplit {
        let mut split = OutcomeSplit {
            home: 0.0,
            draw: 0.0,
            away: 0.0,
        };
        for (h, a, p) in self.cells() {
            if h > a {
                split.home += p;
            } else if h < a {
                split.away += p;
            } else {
                split.draw += p;
            }
        }
        split
    }
}
