//! SIM Core - Game engine and computer opponent
//!
//! This crate provides the core game logic for Sim on six points:
//! - Fixed topology (points, edges, triangles) with integer ids
//! - Per-edge ownership for the current round
//! - Triangle completion detection
//! - Computer player with a one-retry lookahead
//! - Host-driven turn state machine with delayed continuations

pub mod graph;
pub mod ownership;
pub mod detector;
pub mod ai;
pub mod game;
pub mod config;
pub mod error;

// Re-exports for convenient access
pub use graph::{
    GameGraph, Point, Edge, Triangle, PointId, EdgeId, TriangleId, Pos,
    label_of, index_of, sort_code, HIT_RADIUS, NUM_EDGES, NUM_POINTS, NUM_TRIANGLES,
};
pub use ownership::{EdgeState, Owner, OwnershipStore, POINT_RGB};
pub use detector::{check_for_completed_triangle, completed_triangles};
pub use ai::{ComputerMove, ComputerPlayer};
pub use game::{
    Advance, GameEvent, Ignored, Phase, Player, Session, SessionObserver,
    SessionSnapshot, Step, Wakeup,
};
pub use config::SessionConfig;
pub use error::{Result, SimError};

/// How to play, for hosts to show
pub const RULES: &str = "\
1. Take turns with the computer to color edges.
2. Your color is blue, the computer uses red.
3. Avoid coloring a triangle completely in your color:
   the first to complete a triangle LOSES the game!";
