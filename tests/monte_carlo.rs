use goalgrid::{
    EngineConfig, EngineError, MatchContext, ScoringIntensities, build_simulation,
    run_monte_carlo, run_monte_carlo_seeded,
};

#[test]
fn converges_to_grid_split() {
    let summary =
        build_simulation(ScoringIntensities::new(1.5, 1.0), &MatchContext::default()).unwrap();
    let mc = run_monte_carlo_seeded(1.5, 1.0, 10_000, 2024).unwrap();

    assert_eq!(mc.trials, 10_000);
    assert!((mc.home_win - summary.full_time.home).abs() < 3.0, "{mc:?}");
    assert!((mc.draw - summary.full_time.draw).abs() < 3.0, "{mc:?}");
    assert!((mc.away_win - summary.full_time.away).abs() < 3.0, "{mc:?}");
}

#[test]
fn summary_monte_carlo_honours_config_seed() {
    let summary =
        build_simulation(ScoringIntensities::new(2.1, 0.7), &MatchContext::default()).unwrap();
    let cfg = EngineConfig {
        monte_carlo_trials: 4_000,
        monte_carlo_seed: Some(11),
        ..EngineConfig::default()
    };
    let a = summary.monte_carlo(&cfg).unwrap();
    let b = summary.monte_carlo(&cfg).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.trials, 4_000);
    assert!(a.home_win > a.away_win);
}

#[test]
fn unseeded_run_is_valid() {
    let mc = run_monte_carlo(1.2, 1.2, 1_000).unwrap();
    assert!((mc.home_win + mc.draw + mc.away_win - 100.0).abs() < 1e-9);
}

#[test]
fn boundary_rejects_invalid_input() {
    assert_eq!(run_monte_carlo(1.0, 1.0, 0), Err(EngineError::ZeroTrials));
    assert!(run_monte_carlo(f64::INFINITY, 1.0, 10).is_err());
}
