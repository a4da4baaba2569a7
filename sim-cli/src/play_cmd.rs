//! Play command - interactive game against the computer
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_loop()
//! - Level 3: read_command(), apply(), report()
//! - Level 4: parse_command()

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::Input;

use sim_core::{
    Advance, GameGraph, Player, Pos, Session, SessionConfig, SessionObserver, SimError, Wakeup,
    HIT_RADIUS,
};

use crate::render;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Skip the pacing delays
    #[arg(long)]
    pub fast: bool,

    /// Stop after this many rounds
    #[arg(long)]
    pub rounds: Option<u32>,
}

/// Losses per side
#[derive(Clone, Copy, Debug, Default)]
struct Score {
    human_losses: u32,
    computer_losses: u32,
}

impl Score {
    fn record(&mut self, loser: Player) {
        match loser {
            Player::Human => self.human_losses += 1,
            Player::Computer => self.computer_losses += 1,
        }
    }

    fn rounds(&self) -> u32 {
        self.human_losses + self.computer_losses
    }
}

/// A line of user input
#[derive(Clone, Debug, PartialEq)]
enum Command {
    Quit,
    Key(String),
    At(Pos),
}

/// Prints a banner whenever the board is cleared
struct RoundBanner;

impl SessionObserver for RoundBanner {
    fn on_round_reset(&mut self, round: u32) {
        println!("\n=== Round {} ===", round);
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, config: SessionConfig) -> Result<()> {
    let graph = GameGraph::new().context("Failed to build game graph")?;

    let config = if args.fast {
        SessionConfig {
            seed: config.seed,
            ..SessionConfig::instant()
        }
    } else {
        config
    };

    tracing::info!(fast = args.fast, rounds = ?args.rounds, "Starting interactive game");

    let mut session = Session::new(&graph, config);
    session.add_observer(Box::new(RoundBanner));

    render::print_rules();
    println!("Enter an edge (e.g. AB), a coordinate (x,y), or q to quit.");

    let score = play_loop(&mut session, args.rounds)?;

    println!(
        "\nFinal score: human lost {}, computer lost {}",
        score.human_losses, score.computer_losses
    );
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Alternate between user input and due continuations until quit
fn play_loop(session: &mut Session, max_rounds: Option<u32>) -> Result<Score> {
    let mut score = Score::default();
    let mut pending: Option<Wakeup> = None;

    loop {
        let advance = match pending.take() {
            Some(wakeup) => {
                std::thread::sleep(wakeup.delay);
                session.wake(wakeup)?
            }
            None => {
                render::print_board(session);
                match read_command()? {
                    Command::Quit => return Ok(score),
                    command => match apply(session, command)? {
                        Some(advance) => advance,
                        None => continue,
                    },
                }
            }
        };

        report(session, &advance);

        if let Some(loser) = advance.loser() {
            score.record(loser);
            if max_rounds.is_some_and(|max| score.rounds() >= max) {
                render::print_board(session);
                return Ok(score);
            }
        }

        pending = advance.wakeup;
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn read_command() -> Result<Command> {
    let line: String = Input::new()
        .with_prompt("Edge")
        .interact_text()
        .context("Failed to read input")?;
    Ok(parse_command(&line))
}

/// Hand the command to the session; `None` for input that names no edge
fn apply(session: &mut Session, command: Command) -> Result<Option<Advance>> {
    match command {
        Command::Quit => Ok(None),
        Command::At(pos) => Ok(Some(session.claim_at(pos, HIT_RADIUS))),
        Command::Key(key) => match session.claim_key(&key) {
            Ok(advance) => Ok(Some(advance)),
            Err(SimError::UnknownEdge(key)) => {
                println!("Unknown edge '{}'", key);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        },
    }
}

fn report(session: &Session, advance: &Advance) {
    for event in &advance.events {
        println!("{}", render::describe_event(session.graph(), event));
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if matches!(line.to_ascii_lowercase().as_str(), "q" | "quit" | "exit") {
        return Command::Quit;
    }

    if let Some((x, y)) = line.split_once(',') {
        if let (Ok(x), Ok(y)) = (x.trim().parse::<f64>(), y.trim().parse::<f64>()) {
            return Command::At(Pos::new(x, y));
        }
    }

    Command::Key(line.to_string())
}
