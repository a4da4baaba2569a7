//! Per-edge ownership for the current round

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::game::Player;
use crate::graph::{EdgeId, NUM_EDGES};

/// Display colors (RGB) used by hosts
pub const NEUTRAL_RGB: (u8, u8, u8) = (100, 100, 100);
pub const HUMAN_RGB: (u8, u8, u8) = (100, 100, 200);
pub const COMPUTER_RGB: (u8, u8, u8) = (200, 100, 100);
pub const POINT_RGB: (u8, u8, u8) = (200, 200, 200);

/// Who has colored an edge
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Owner {
    #[default]
    Neutral,
    Human,
    Computer,
}

impl Owner {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Owner::Neutral => NEUTRAL_RGB,
            Owner::Human => HUMAN_RGB,
            Owner::Computer => COMPUTER_RGB,
        }
    }
}

impl From<Player> for Owner {
    fn from(player: Player) -> Self {
        match player {
            Player::Human => Owner::Human,
            Player::Computer => Owner::Computer,
        }
    }
}

/// Mutable part of an edge
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeState {
    pub owner: Owner,
    pub contributed_to_loss: bool,
}

/// Ownership of all 15 edges, indexed by [`EdgeId`]
#[derive(Clone, Debug, Default)]
pub struct OwnershipStore {
    edges: [EdgeState; NUM_EDGES],
}

impl OwnershipStore {
    /// All edges neutral
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every owner and loss flag
    pub fn reset_edges(&mut self) {
        self.edges = [EdgeState::default(); NUM_EDGES];
    }

    pub fn get(&self, edge: EdgeId) -> EdgeState {
        self.edges[edge.index()]
    }

    pub fn owner(&self, edge: EdgeId) -> Owner {
        self.edges[edge.index()].owner
    }

    pub fn set_owner(&mut self, edge: EdgeId, owner: Owner) {
        self.edges[edge.index()].owner = owner;
    }

    /// Flag edges as part of the losing triangle
    pub fn mark_loss(&mut self, edges: &[EdgeId]) {
        for &edge in edges {
            self.edges[edge.index()].contributed_to_loss = true;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeId, EdgeState)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, &state)| (EdgeId(i as u8), state))
    }

    /// Edges with the given owner, in edge order
    pub fn owned_by(&self, owner: Owner) -> impl Iterator<Item = EdgeId> + '_ {
        self.iter()
            .filter(move |(_, state)| state.owner == owner)
            .map(|(edge, _)| edge)
    }

    pub fn neutral_count(&self) -> usize {
        self.owned_by(Owner::Neutral).count()
    }

    /// Uniformly random neutral edge.
    ///
    /// Fails with [`SimError::NoNeutralEdges`] on a fully colored board.
    pub fn random_neutral_edge<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<EdgeId> {
        let neutral: Vec<EdgeId> = self.owned_by(Owner::Neutral).collect();
        neutral.choose(rng).copied().ok_or(SimError::NoNeutralEdges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_new_store_is_neutral() {
        let store = OwnershipStore::new();
        assert_eq!(store.neutral_count(), NUM_EDGES);
        assert!(store.iter().all(|(_, s)| !s.contributed_to_loss));
    }

    #[test]
    fn test_reset_edges() {
        let mut store = OwnershipStore::new();
        store.set_owner(EdgeId(0), Owner::Human);
        store.set_owner(EdgeId(7), Owner::Computer);
        store.mark_loss(&[EdgeId(0), EdgeId(3)]);

        store.reset_edges();
        assert!(store.iter().all(|(_, s)| s == EdgeState::default()));

        // idempotent
        store.reset_edges();
        assert_eq!(store.neutral_count(), NUM_EDGES);
    }

    #[test]
    fn test_owned_by() {
        let mut store = OwnershipStore::new();
        store.set_owner(EdgeId(4), Owner::Computer);
        store.set_owner(EdgeId(2), Owner::Computer);
        store.set_owner(EdgeId(9), Owner::Human);

        let computer: Vec<EdgeId> = store.owned_by(Owner::Computer).collect();
        assert_eq!(computer, vec![EdgeId(2), EdgeId(4)]);
        assert_eq!(store.neutral_count(), NUM_EDGES - 3);
    }

    #[test]
    fn test_random_neutral_edge_only_neutral() {
        let mut store = OwnershipStore::new();
        for i in 0..10 {
            let owner = if i % 2 == 0 { Owner::Human } else { Owner::Computer };
            store.set_owner(EdgeId(i), owner);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut seen = FxHashSet::default();
        for _ in 0..500 {
            let edge = store.random_neutral_edge(&mut rng).unwrap();
            assert_eq!(store.owner(edge), Owner::Neutral);
            seen.insert(edge);
        }
        // all five neutral edges come up
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_random_neutral_edge_exhausted() {
        let mut store = OwnershipStore::new();
        for i in 0..NUM_EDGES as u8 {
            store.set_owner(EdgeId(i), Owner::Human);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            store.random_neutral_edge(&mut rng),
            Err(SimError::NoNeutralEdges)
        ));
    }

    #[test]
    fn test_owner_colors() {
        assert_eq!(Owner::from(Player::Human).rgb(), HUMAN_RGB);
        assert_eq!(Owner::from(Player::Computer).rgb(), COMPUTER_RGB);
        assert_eq!(Owner::default().rgb(), NEUTRAL_RGB);
    }
}
