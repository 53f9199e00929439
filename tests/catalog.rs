use std::collections::HashSet;

use goalgrid::markets::{
    CORRECT_SCORE_KEEP, CatalogItem, Category, MarketRule, catalog, categories,
};
use goalgrid::{MatchContext, ScoringIntensities, build_simulation};

fn looks_like_score(label: &str) -> bool {
    let mut parts = label.split('-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(a), None) => h.parse::<u8>().is_ok() && a.parse::<u8>().is_ok(),
        _ => false,
    }
}

#[test]
fn catalog_labels_are_unique() {
    let mut seen = HashSet::new();
    for item in catalog() {
        if let CatalogItem::Market(spec) = item {
            assert!(seen.insert(spec.label.clone()), "duplicate label {}", spec.label);
        }
    }
    // Exact-score labels ("2-1") never collide with the fixed ones.
    assert!(seen.iter().all(|l| !looks_like_score(l)));
}

#[test]
fn catalog_has_one_correct_score_block() {
    let blocks = catalog()
        .iter()
        .filter(|item| matches!(item, CatalogItem::TopCorrectScores { .. }))
        .count();
    assert_eq!(blocks, 1);
    let fixed = catalog().len() - blocks;
    assert_eq!(fixed + CORRECT_SCORE_KEEP, 81);
}

#[test]
fn catalog_parity_entries_are_placeholders() {
    let parity: Vec<&str> = catalog()
        .iter()
        .filter_map(|item| match item {
            CatalogItem::Market(spec)
                if matches!(spec.rule, MarketRule::EvenTotal | MarketRule::OddTotal) =>
            {
                Some(spec.label.as_str())
            }
            _ => None,
        })
        .collect();
    assert_eq!(parity, vec!["Pari", "Dispari"]);
}

#[test]
fn generated_labels_are_unique_and_ordered() {
    for (home, away) in [(0.4, 0.3), (1.5, 1.0), (2.9, 0.6), (0.8, 3.1)] {
        let summary =
            build_simulation(ScoringIntensities::new(home, away), &MatchContext::default())
                .unwrap();
        let labels: HashSet<&str> = summary.markets.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels.len(), summary.markets.len());
        assert_eq!(summary.markets.len(), 81);

        assert_eq!(
            categories(&summary.markets),
            vec![
                Category::Main,
                Category::DoubleChance,
                Category::DrawNoBet,
                Category::OverUnder,
                Category::GoalNoGoal,
                Category::Multigoal,
                Category::CorrectScore,
                Category::AsianHandicap,
                Category::Specials,
            ]
        );
    }
}

#[test]
fn generation_is_deterministic() {
    let intensities = ScoringIntensities::new(1.7, 1.2);
    let a = build_simulation(intensities, &MatchContext::default()).unwrap();
    let b = build_simulation(intensities, &MatchContext::default()).unwrap();
    assert_eq!(a, b);
}
