//! Auto command - headless rounds against a random stand-in
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_batch(), report_results()
//! - Level 3: play_round(), compute_statistics()
//! - Level 4: formatting utilities
//!
//! Pacing delays are never slept here; continuations run immediately.

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sim_core::{GameEvent, GameGraph, Player, Session, SessionConfig, Wakeup};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct AutoArgs {
    /// Number of rounds to play
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single round
#[derive(Clone, Debug)]
struct RoundRecord {
    round: u32,
    loser: Player,
    moves: usize,
    reconsidered: usize,
    triangle: String,
}

/// Aggregated batch results
#[derive(Clone, Debug)]
struct BatchResults {
    rounds: Vec<RoundRecord>,
    human_losses: usize,
    computer_losses: usize,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run auto command
pub fn run(args: AutoArgs, config: SessionConfig) -> Result<()> {
    let graph = GameGraph::new().context("Failed to build game graph")?;

    tracing::info!("Starting {} headless rounds (seed={:?})", args.games, config.seed);

    let results = play_batch(&graph, &args, config)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all rounds on one session, resetting in between
fn play_batch(graph: &GameGraph, args: &AutoArgs, config: SessionConfig) -> Result<BatchResults> {
    let mut stand_in = create_rng(config.seed.map(|s| s.wrapping_add(1)));
    let mut session = Session::new(graph, config);
    let mut rounds = Vec::with_capacity(args.games);

    for _ in 0..args.games {
        let record = play_round(&mut session, &mut stand_in)?;

        tracing::info!(
            "Round {}: {:?} lost after {} moves",
            record.round,
            record.loser,
            record.moves
        );

        rounds.push(record);
    }

    Ok(compute_statistics(rounds))
}

/// Report batch results
fn report_results(results: &BatchResults, args: &AutoArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play until someone loses, then run the reset
fn play_round(session: &mut Session, stand_in: &mut ChaCha8Rng) -> Result<RoundRecord> {
    let round = session.round();
    let mut moves = 0;
    let mut reconsidered = 0;
    let mut pending: Option<Wakeup> = None;

    loop {
        let advance = match pending.take() {
            Some(wakeup) => session.wake(wakeup)?,
            None => {
                let edge = session.store().random_neutral_edge(stand_in)?;
                session.claim(edge)?
            }
        };

        for event in &advance.events {
            match event {
                GameEvent::Claimed { .. } => moves += 1,
                GameEvent::Reconsidered { .. } => reconsidered += 1,
                GameEvent::Lost { loser, triangle } => {
                    let sides: Vec<&str> = triangle
                        .iter()
                        .map(|&e| session.graph().edge(e).key.as_str())
                        .collect();
                    let record = RoundRecord {
                        round,
                        loser: *loser,
                        moves,
                        reconsidered,
                        triangle: sides.join("-"),
                    };
                    if let Some(reset) = advance.wakeup {
                        session.wake(reset)?;
                    }
                    return Ok(record);
                }
                _ => {}
            }
        }

        pending = advance.wakeup;
    }
}

/// Compute loss counts and averages
fn compute_statistics(rounds: Vec<RoundRecord>) -> BatchResults {
    let human_losses = rounds.iter().filter(|r| r.loser == Player::Human).count();
    let computer_losses = rounds.iter().filter(|r| r.loser == Player::Computer).count();

    let total_moves: usize = rounds.iter().map(|r| r.moves).sum();
    let avg_moves = if rounds.is_empty() {
        0.0
    } else {
        total_moves as f32 / rounds.len() as f32
    };

    BatchResults {
        rounds,
        human_losses,
        computer_losses,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &BatchResults) {
    #[derive(serde::Serialize)]
    struct JsonRound {
        round: u32,
        loser: Player,
        moves: usize,
        reconsidered: usize,
        triangle: String,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_rounds: usize,
        human_losses: usize,
        computer_losses: usize,
        avg_moves: f32,
        computer_win_rate: f32,
        rounds: Vec<JsonRound>,
    }

    let total = results.rounds.len();
    let output = JsonOutput {
        total_rounds: total,
        human_losses: results.human_losses,
        computer_losses: results.computer_losses,
        avg_moves: results.avg_moves,
        computer_win_rate: percent(results.human_losses, total) / 100.0,
        rounds: results
            .rounds
            .iter()
            .map(|r| JsonRound {
                round: r.round,
                loser: r.loser,
                moves: r.moves,
                reconsidered: r.reconsidered,
                triangle: r.triangle.clone(),
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &BatchResults) {
    let total = results.rounds.len();
    let reconsidered: usize = results.rounds.iter().map(|r| r.reconsidered).sum();

    println!("\n=== Batch Results ===");
    println!("Total rounds:     {}", total);
    println!(
        "Human lost:       {} ({:.1}%)",
        results.human_losses,
        percent(results.human_losses, total)
    );
    println!(
        "Computer lost:    {} ({:.1}%)",
        results.computer_losses,
        percent(results.computer_losses, total)
    );
    println!("Avg moves:        {:.1}", results.avg_moves);
    println!("Retries used:     {}", reconsidered);
}
