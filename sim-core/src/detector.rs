//! Triangle completion checks

use crate::game::Player;
use crate::graph::{EdgeId, GameGraph, TriangleId};
use crate::ownership::{Owner, OwnershipStore};

/// Check whether coloring `edge` completed a triangle for `player`.
///
/// Only triangles having `edge` as a side are considered. Returns the three
/// sides of the first such triangle (in triangle order) owned entirely by
/// `player`. No side effects.
pub fn check_for_completed_triangle(
    graph: &GameGraph,
    store: &OwnershipStore,
    edge: EdgeId,
    player: Player,
) -> Option<[EdgeId; 3]> {
    let owner = Owner::from(player);

    graph
        .triangles_containing(edge)
        .iter()
        .map(|&t| graph.triangle_edges(t))
        .find(|sides| sides.iter().all(|&e| store.owner(e) == owner))
}

/// Every triangle on the board fully owned by `player`
pub fn completed_triangles(
    graph: &GameGraph,
    store: &OwnershipStore,
    player: Player,
) -> Vec<TriangleId> {
    let owner = Owner::from(player);

    graph
        .triangles()
        .iter()
        .filter(|t| t.edges.iter().all(|&e| store.owner(e) == owner))
        .map(|t| t.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (GameGraph, OwnershipStore) {
        (GameGraph::new().unwrap(), OwnershipStore::new())
    }

    fn claim(graph: &GameGraph, store: &mut OwnershipStore, key: &str, owner: Owner) -> EdgeId {
        let edge = graph.edge_by_key(key).unwrap();
        store.set_owner(edge, owner);
        edge
    }

    #[test]
    fn test_completed_triangle_found() {
        let (graph, mut store) = setup();
        let ab = claim(&graph, &mut store, "AB", Owner::Human);
        let ac = claim(&graph, &mut store, "AC", Owner::Human);
        let bc = claim(&graph, &mut store, "BC", Owner::Human);

        let found = check_for_completed_triangle(&graph, &store, bc, Player::Human);
        assert_eq!(found, Some([ab, ac, bc]));
    }

    #[test]
    fn test_other_owner_sees_nothing() {
        let (graph, mut store) = setup();
        claim(&graph, &mut store, "AB", Owner::Human);
        claim(&graph, &mut store, "AC", Owner::Human);
        let bc = claim(&graph, &mut store, "BC", Owner::Human);

        assert_eq!(
            check_for_completed_triangle(&graph, &store, bc, Player::Computer),
            None
        );
    }

    #[test]
    fn test_mixed_triangle_is_not_completed() {
        let (graph, mut store) = setup();
        claim(&graph, &mut store, "AB", Owner::Human);
        claim(&graph, &mut store, "AC", Owner::Computer);
        let bc = claim(&graph, &mut store, "BC", Owner::Human);

        assert_eq!(
            check_for_completed_triangle(&graph, &store, bc, Player::Human),
            None
        );
        assert!(completed_triangles(&graph, &store, Player::Human).is_empty());
    }

    #[test]
    fn test_only_triangles_through_edge_count() {
        let (graph, mut store) = setup();
        // DEF completed for computer, but the query edge AB is not a side of it
        claim(&graph, &mut store, "DE", Owner::Computer);
        claim(&graph, &mut store, "DF", Owner::Computer);
        claim(&graph, &mut store, "EF", Owner::Computer);
        let ab = claim(&graph, &mut store, "AB", Owner::Computer);

        assert_eq!(
            check_for_completed_triangle(&graph, &store, ab, Player::Computer),
            None
        );

        let def = graph.triangle_by_key("DEF").unwrap();
        assert_eq!(completed_triangles(&graph, &store, Player::Computer), vec![def]);
    }

    #[test]
    fn test_first_triangle_in_order_wins() {
        let (graph, mut store) = setup();
        // Both ABC and ABD are completed through AB
        for key in ["AC", "BC", "AD", "BD"] {
            claim(&graph, &mut store, key, Owner::Human);
        }
        let ab = claim(&graph, &mut store, "AB", Owner::Human);

        let abc = graph.triangle_by_key("ABC").unwrap();
        assert_eq!(
            check_for_completed_triangle(&graph, &store, ab, Player::Human),
            Some(graph.triangle_edges(abc))
        );
    }
}
