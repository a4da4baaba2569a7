//! Computer player: random pick with a single retry

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::detector::check_for_completed_triangle;
use crate::error::Result;
use crate::game::Player;
use crate::graph::{EdgeId, GameGraph};
use crate::ownership::{Owner, OwnershipStore};

/// Outcome of one computer move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComputerMove {
    /// Edge the computer ended up coloring
    pub edge: EdgeId,
    /// First pick, undone because it completed a triangle
    pub rejected: Option<EdgeId>,
    /// Triangle completed by `edge`, if the retry lost too
    pub completed: Option<[EdgeId; 3]>,
}

/// The computer opponent.
///
/// Tries a random neutral edge; if that would complete one of its own
/// triangles it undoes it and tries exactly one more random neutral edge,
/// which stands whatever the result. The retry may land on the same edge.
pub struct ComputerPlayer {
    rng: ChaCha8Rng,
}

impl ComputerPlayer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    /// Pick and color an edge for the computer
    pub fn play(&mut self, graph: &GameGraph, store: &mut OwnershipStore) -> Result<ComputerMove> {
        let first = self.try_edge(graph, store)?;
        if check_for_completed_triangle(graph, store, first, Player::Computer).is_none() {
            return Ok(ComputerMove {
                edge: first,
                rejected: None,
                completed: None,
            });
        }

        store.set_owner(first, Owner::Neutral);
        tracing::debug!(edge = %graph.edge(first).key, "Computer rejects losing edge");

        let second = self.try_edge(graph, store)?;
        let completed = check_for_completed_triangle(graph, store, second, Player::Computer);

        Ok(ComputerMove {
            edge: second,
            rejected: Some(first),
            completed,
        })
    }

    fn try_edge(&mut self, graph: &GameGraph, store: &mut OwnershipStore) -> Result<EdgeId> {
        let edge = store.random_neutral_edge(&mut self.rng)?;
        store.set_owner(edge, Owner::Computer);
        tracing::trace!(edge = %graph.edge(edge).key, "Computer tries edge");
        Ok(edge)
    }
}
