//! Turn engine: human/computer alternation, losses and round resets
//!
//! The host owns time. Every entry point ([`Session::claim`],
//! [`Session::wake`]) runs synchronously and returns an [`Advance`] listing
//! what happened plus, optionally, a [`Wakeup`] the host must hand back
//! after its delay. Wakeups carry the round they were issued in, so one left
//! over from a finished round is ignored.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ai::ComputerPlayer;
use crate::config::SessionConfig;
use crate::detector::check_for_completed_triangle;
use crate::error::{Result, SimError};
use crate::graph::{EdgeId, GameGraph, Pos};
use crate::ownership::{EdgeState, Owner, OwnershipStore};

// ============================================================================
// CORE TYPES
// ============================================================================

/// A side in the game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Human,
    Computer,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Human => Player::Computer,
            Player::Computer => Player::Human,
        }
    }
}

/// Where the session is in the turn cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the human to claim an edge
    HumanTurn,
    /// Computer move scheduled
    ComputerThinking,
    /// Computer has moved; hand-back to the human scheduled
    ComputerMoved,
    /// Someone lost; reset scheduled
    RoundOver,
}

/// Deferred continuation kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    ComputerMove,
    HandBack,
    ResetRound,
}

/// A continuation the host runs after `delay` by calling [`Session::wake`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wakeup {
    pub step: Step,
    pub round: u32,
    pub delay: Duration,
}

/// Why an input changed nothing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ignored {
    NotYourTurn,
    EdgeTaken,
    NoEdge,
    RoundOver,
    StaleWakeup,
}

/// Something that happened during an advance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Claimed { player: Player, edge: EdgeId },
    /// Computer tried an edge, saw it lose, and undid it
    Reconsidered { edge: EdgeId },
    TurnPassed { to: Player },
    Lost { loser: Player, triangle: [EdgeId; 3] },
    RoundReset { round: u32 },
    Ignored(Ignored),
}

/// Result of one call into the session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Advance {
    pub events: Vec<GameEvent>,
    pub wakeup: Option<Wakeup>,
}

impl Advance {
    fn ignored(reason: Ignored) -> Self {
        Self {
            events: vec![GameEvent::Ignored(reason)],
            wakeup: None,
        }
    }

    /// True if the input was a no-op
    pub fn is_ignored(&self) -> bool {
        matches!(self.events.as_slice(), [GameEvent::Ignored(_)])
    }

    /// Loser, if this advance ended the round
    pub fn loser(&self) -> Option<Player> {
        self.events.iter().find_map(|e| match e {
            GameEvent::Lost { loser, .. } => Some(*loser),
            _ => None,
        })
    }
}

/// Hooks for hosts that keep view state alongside the session
pub trait SessionObserver {
    /// Called for every event, in order
    fn on_event(&mut self, _event: &GameEvent) {}

    /// Called after the board has been cleared for a new round
    fn on_round_reset(&mut self, _round: u32) {}
}

// ============================================================================
// SNAPSHOT
// ============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct EdgeSnapshot {
    pub key: String,
    pub owner: Owner,
    pub contributed_to_loss: bool,
}

/// Serializable view of a session
#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub round: u32,
    pub phase: Phase,
    pub current_turn: Player,
    pub loser: Option<Player>,
    pub edges: Vec<EdgeSnapshot>,
}

// ============================================================================
// SESSION
// ============================================================================

/// One human-vs-computer game over a shared [`GameGraph`]
pub struct Session<'g> {
    graph: &'g GameGraph,
    store: OwnershipStore,
    current_turn: Player,
    loser: Option<Player>,
    phase: Phase,
    round: u32,
    computer: ComputerPlayer,
    config: SessionConfig,
    observers: Vec<Box<dyn SessionObserver + 'g>>,
}

impl<'g> Session<'g> {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Fresh session at round 1, human to move
    pub fn new(graph: &'g GameGraph, config: SessionConfig) -> Self {
        Self {
            graph,
            store: OwnershipStore::new(),
            current_turn: Player::Human,
            loser: None,
            phase: Phase::HumanTurn,
            round: 1,
            computer: ComputerPlayer::new(config.seed),
            config,
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn SessionObserver + 'g>) {
        self.observers.push(observer);
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn graph(&self) -> &'g GameGraph {
        self.graph
    }

    pub fn store(&self) -> &OwnershipStore {
        &self.store
    }

    pub fn edge_state(&self, edge: EdgeId) -> EdgeState {
        self.store.get(edge)
    }

    pub fn current_turn(&self) -> Player {
        self.current_turn
    }

    pub fn loser(&self) -> Option<Player> {
        self.loser
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The wakeup the session is waiting for, if any
    pub fn expected_step(&self) -> Option<Step> {
        match self.phase {
            Phase::HumanTurn => None,
            Phase::ComputerThinking => Some(Step::ComputerMove),
            Phase::ComputerMoved => Some(Step::HandBack),
            Phase::RoundOver => Some(Step::ResetRound),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            round: self.round,
            phase: self.phase,
            current_turn: self.current_turn,
            loser: self.loser,
            edges: self
                .store
                .iter()
                .map(|(edge, state)| EdgeSnapshot {
                    key: self.graph.edge(edge).key.clone(),
                    owner: state.owner,
                    contributed_to_loss: state.contributed_to_loss,
                })
                .collect(),
        }
    }

    // ========================================================================
    // HUMAN INPUT
    // ========================================================================

    /// Attempt to claim an edge for the human
    pub fn claim(&mut self, edge: EdgeId) -> Result<Advance> {
        if !self.graph.contains_edge(edge) {
            return Err(SimError::UnknownEdge(format!("#{}", edge.0)));
        }
        let advance = self.claim_internal(edge);
        Ok(self.publish(advance))
    }

    /// Claim by label key ("AB", "ba")
    pub fn claim_key(&mut self, key: &str) -> Result<Advance> {
        let edge = self.graph.edge_by_key(key)?;
        self.claim(edge)
    }

    /// Claim whatever edge lies under a screen position
    pub fn claim_at(&mut self, pos: Pos, radius: f64) -> Advance {
        let advance = match self.graph.edge_at(pos, radius) {
            Some(edge) => self.claim_internal(edge),
            None => Advance::ignored(Ignored::NoEdge),
        };
        self.publish(advance)
    }

    fn claim_internal(&mut self, edge: EdgeId) -> Advance {
        if self.loser.is_some() || self.phase == Phase::RoundOver {
            return Advance::ignored(Ignored::RoundOver);
        }
        if self.phase != Phase::HumanTurn || self.current_turn != Player::Human {
            return Advance::ignored(Ignored::NotYourTurn);
        }
        if self.store.owner(edge) != Owner::Neutral {
            return Advance::ignored(Ignored::EdgeTaken);
        }

        self.store.set_owner(edge, Owner::Human);
        tracing::debug!(round = self.round, edge = %self.graph.edge(edge).key, "Human claims edge");

        let mut events = vec![GameEvent::Claimed {
            player: Player::Human,
            edge,
        }];

        match check_for_completed_triangle(self.graph, &self.store, edge, Player::Human) {
            Some(triangle) => self.end_round(Player::Human, triangle, events),
            None => {
                self.current_turn = Player::Computer;
                self.phase = Phase::ComputerThinking;
                events.push(GameEvent::TurnPassed {
                    to: Player::Computer,
                });
                Advance {
                    events,
                    wakeup: Some(self.schedule(Step::ComputerMove, self.config.think_delay())),
                }
            }
        }
    }

    // ========================================================================
    // CONTINUATIONS
    // ========================================================================

    /// Run a continuation previously returned in an [`Advance`]
    pub fn wake(&mut self, wakeup: Wakeup) -> Result<Advance> {
        if wakeup.round != self.round || self.expected_step() != Some(wakeup.step) {
            tracing::debug!(?wakeup, round = self.round, phase = ?self.phase, "Ignoring stale wakeup");
            return Ok(self.publish(Advance::ignored(Ignored::StaleWakeup)));
        }

        let advance = match wakeup.step {
            Step::ComputerMove => self.computer_turn()?,
            Step::HandBack => self.hand_back(),
            Step::ResetRound => return Ok(self.reset_round()),
        };
        Ok(self.publish(advance))
    }

    fn computer_turn(&mut self) -> Result<Advance> {
        let mv = self.computer.play(self.graph, &mut self.store)?;

        let mut events = Vec::with_capacity(3);
        if let Some(rejected) = mv.rejected {
            events.push(GameEvent::Reconsidered { edge: rejected });
        }
        events.push(GameEvent::Claimed {
            player: Player::Computer,
            edge: mv.edge,
        });
        tracing::debug!(round = self.round, edge = %self.graph.edge(mv.edge).key, "Computer claims edge");

        match mv.completed {
            Some(triangle) => Ok(self.end_round(Player::Computer, triangle, events)),
            None => {
                self.phase = Phase::ComputerMoved;
                Ok(Advance {
                    events,
                    wakeup: Some(self.schedule(Step::HandBack, self.config.handback_delay())),
                })
            }
        }
    }

    fn hand_back(&mut self) -> Advance {
        self.current_turn = Player::Human;
        self.phase = Phase::HumanTurn;
        Advance {
            events: vec![GameEvent::TurnPassed { to: Player::Human }],
            wakeup: None,
        }
    }

    fn end_round(&mut self, loser: Player, triangle: [EdgeId; 3], mut events: Vec<GameEvent>) -> Advance {
        self.store.mark_loss(&triangle);
        self.loser = Some(loser);
        self.phase = Phase::RoundOver;

        tracing::info!(
            round = self.round,
            ?loser,
            triangle = %triangle.iter().map(|&e| self.graph.edge(e).key.as_str()).collect::<Vec<_>>().join(","),
            "Round lost"
        );

        events.push(GameEvent::Lost { loser, triangle });
        Advance {
            events,
            wakeup: Some(self.schedule(Step::ResetRound, self.config.reset_delay())),
        }
    }

    /// Clear the board and start the next round.
    ///
    /// Any wakeup issued before this call becomes stale.
    pub fn reset_round(&mut self) -> Advance {
        self.store.reset_edges();
        self.loser = None;
        self.current_turn = Player::Human;
        self.phase = Phase::HumanTurn;
        self.round += 1;

        tracing::debug!(round = self.round, "Round reset");

        for observer in &mut self.observers {
            observer.on_round_reset(self.round);
        }

        let advance = Advance {
            events: vec![GameEvent::RoundReset { round: self.round }],
            wakeup: None,
        };
        self.publish(advance)
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn schedule(&self, step: Step, delay: Duration) -> Wakeup {
        Wakeup {
            step,
            round: self.round,
            delay,
        }
    }

    fn publish(&mut self, advance: Advance) -> Advance {
        for observer in &mut self.observers {
            for event in &advance.events {
                observer.on_event(event);
            }
        }
        advance
    }
}

// ============================================================================
// TESTS
// ============================================================================
