use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use goalgrid::markets::{self, Category, SortKey};
use goalgrid::simulation::{SCORE_MATRIX_GOALS, score_matrix};
use goalgrid::{EngineConfig, InputMode, MatchCase, SimulationSummary, simulate_match};

#[derive(Parser, Debug)]
#[command(name = "goalgrid")]
#[command(about = "Poisson / Dixon-Coles goal model and market pricer", long_about = None)]
struct Cli {
    /// JSON match case (team stats, context, odds)
    #[arg(default_value = "tests/fixtures/baseline_case.json")]
    case: PathBuf,

    /// Ignore xG and context (goals-only Poisson)
    #[arg(long)]
    basic: bool,

    /// Only print this category, e.g. "Over/Under"
    #[arg(short, long)]
    category: Option<String>,

    /// Sort markets within a category by value instead of probability
    #[arg(long)]
    by_value: bool,

    /// Run the Monte Carlo cross-check
    #[arg(short, long)]
    monte_carlo: bool,

    /// Override the Monte Carlo trial count
    #[arg(long)]
    trials: Option<u32>,

    /// Fixed Monte Carlo seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("goalgrid=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = EngineConfig::from_env();
    if let Some(trials) = cli.trials {
        cfg.monte_carlo_trials = trials;
    }
    if cli.seed.is_some() {
        cfg.monte_carlo_seed = cli.seed;
    }

    let raw = fs::read_to_string(&cli.case)
        .with_context(|| format!("read match case {}", cli.case.display()))?;
    let mut case: MatchCase = serde_json::from_str(&raw).context("parse match case")?;
    if cli.basic {
        case.mode = InputMode::Basic;
    }
    info!(case = %cli.case.display(), mode = ?case.mode, "running simulation");

    let summary = simulate_match(case.mode, &case.home, &case.away, &case.context, &cfg)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_header(&case, &summary);
    let sort = if cli.by_value {
        SortKey::Value
    } else {
        SortKey::Probability
    };
    for category in markets::categories(&summary.markets) {
        if let Some(want) = cli.category.as_deref()
            && !category.label().eq_ignore_ascii_case(want)
        {
            continue;
        }
        print_category(&summary, category, sort);
    }

    let insights = markets::value_insights(&summary.markets, 3);
    if !insights.is_empty() {
        println!();
        println!("Insights");
        for m in insights {
            println!(
                "  {:<14} {:>6.2}%  value {}",
                m.label,
                m.probability,
                m.value.map_or("-".to_string(), |v| format!("{v:.2}"))
            );
        }
    }

    if cli.monte_carlo {
        let mc = summary.monte_carlo(&cfg)?;
        println!();
        println!("Monte Carlo ({} trials)", mc.trials);
        println!(
            "  Home: {:.1}%  (grid {:.1}%)",
            mc.home_win, summary.full_time.home
        );
        println!("  Draw: {:.1}%  (grid {:.1}%)", mc.draw, summary.full_time.draw);
        println!(
            "  Away: {:.1}%  (grid {:.1}%)",
            mc.away_win, summary.full_time.away
        );
    }

    Ok(())
}

fn print_header(case: &MatchCase, summary: &SimulationSummary) {
    println!(
        "{} vs {}  [{:?}]",
        case.context.home_team, case.context.away_team, case.mode
    );
    println!(
        "Lambda: {:.3} - {:.3}",
        summary.home_lambda, summary.away_lambda
    );
    println!(
        "FT 1X2: {:.1}% / {:.1}% / {:.1}%",
        summary.full_time.home, summary.full_time.draw, summary.full_time.away
    );
    println!(
        "HT 1X2: {:.1}% / {:.1}% / {:.1}%",
        summary.half_time.home, summary.half_time.draw, summary.half_time.away
    );

    println!();
    print!("      ");
    for away in 0..SCORE_MATRIX_GOALS {
        print!("{away:>6}");
    }
    println!();
    let cells = score_matrix(summary.intensities(), SCORE_MATRIX_GOALS);
    for row in cells.chunks(SCORE_MATRIX_GOALS) {
        print!("{:>6}", row[0].home);
        for cell in row {
            print!("{:>6.1}", cell.probability);
        }
        println!();
    }
}

fn print_category(summary: &SimulationSummary, category: Category, sort: SortKey) {
    println!();
    println!("{}", category.label());
    for m in markets::markets_in_category(&summary.markets, category, sort) {
        let flag = if m.high_probability { "*" } else { " " };
        let book = m
            .bookmaker_odd
            .map_or("-".to_string(), |odd| format!("{odd:.2}"));
        let value = m.value.map_or("-".to_string(), |v| format!("{v:.2}"));
        println!(
            " {flag}{:<14} {:>6.2}%  fair {:>7.2}  book {:>6}  value {:>5}",
            m.label, m.probability, m.fair_odd, book, value
        );
    }
}
