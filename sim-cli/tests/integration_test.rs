//! Integration tests for the Sim engine
//!
//! Drives full rounds the way a host does: claims for the human side,
//! wakeups handed straight back for the computer side.

use sim_core::{
    completed_triangles, Advance, GameEvent, GameGraph, Ignored, Owner, Phase, Player, Session,
    SessionConfig, Step, Wakeup,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Play until the round is lost; returns every advance in order.
/// The reset wakeup is left pending on the last advance.
fn play_until_loss(session: &mut Session, rng: &mut ChaCha8Rng) -> Vec<Advance> {
    let mut history = Vec::new();
    let mut pending: Option<Wakeup> = None;

    loop {
        let advance = match pending.take() {
            Some(wakeup) => session.wake(wakeup).unwrap(),
            None => {
                let edge = session.store().random_neutral_edge(rng).unwrap();
                session.claim(edge).unwrap()
            }
        };
        pending = advance.wakeup;
        let lost = advance.loser().is_some();
        history.push(advance);
        if lost {
            return history;
        }
        assert!(history.len() < 64, "round did not terminate");
    }
}

// ============================================================================
// FULL ROUNDS
// ============================================================================

#[test]
fn test_every_round_ends_with_one_flagged_triangle() {
    let graph = GameGraph::new().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(100);

    for seed in 0..50 {
        let mut session = Session::new(&graph, SessionConfig::instant().with_seed(seed));
        let history = play_until_loss(&mut session, &mut rng);
        let loser = session.loser().expect("round must have a loser");
        assert_eq!(session.phase(), Phase::RoundOver);

        let flagged: Vec<_> = session
            .store()
            .iter()
            .filter(|(_, s)| s.contributed_to_loss)
            .map(|(e, _)| e)
            .collect();
        assert_eq!(flagged.len(), 3);
        for &e in &flagged {
            assert_eq!(session.edge_state(e).owner, Owner::from(loser));
        }

        let triangle = graph.triangles().iter().find(|t| {
            let mut sides = t.edges.to_vec();
            sides.sort();
            sides == flagged
        });
        assert!(triangle.is_some(), "flagged edges must form a triangle");

        // the winner never completed anything
        assert!(completed_triangles(&graph, session.store(), loser.opponent()).is_empty());
        assert!(!completed_triangles(&graph, session.store(), loser).is_empty());

        let last = history.last().unwrap();
        assert_eq!(last.wakeup.unwrap().step, Step::ResetRound);
    }
}

#[test]
fn test_turns_alternate() {
    let graph = GameGraph::new().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut session = Session::new(&graph, SessionConfig::instant().with_seed(6));

    let history = play_until_loss(&mut session, &mut rng);
    let claims: Vec<Player> = history
        .iter()
        .flat_map(|a| a.events.iter())
        .filter_map(|e| match e {
            GameEvent::Claimed { player, .. } => Some(*player),
            _ => None,
        })
        .collect();

    assert_eq!(claims[0], Player::Human);
    for pair in claims.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn test_reset_restores_fresh_round() {
    let graph = GameGraph::new().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let mut session = Session::new(&graph, SessionConfig::instant().with_seed(18));

    for round in 1..=5 {
        assert_eq!(session.round(), round);
        let history = play_until_loss(&mut session, &mut rng);
        let reset = history.last().unwrap().wakeup.unwrap();

        let advance = session.wake(reset).unwrap();
        assert_eq!(advance.events, vec![GameEvent::RoundReset { round: round + 1 }]);
        assert_eq!(session.loser(), None);
        assert_eq!(session.current_turn(), Player::Human);
        assert_eq!(session.phase(), Phase::HumanTurn);
        assert!(session
            .store()
            .iter()
            .all(|(_, s)| s.owner == Owner::Neutral && !s.contributed_to_loss));
    }
}

#[test]
fn test_same_seeds_replay_identically() {
    let graph = GameGraph::new().unwrap();

    let run = || {
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let mut session = Session::new(&graph, SessionConfig::instant().with_seed(78));
        play_until_loss(&mut session, &mut rng)
    };

    assert_eq!(run(), run());
}

// ============================================================================
// HOST BEHAVIOR
// ============================================================================

#[test]
fn test_input_while_computer_thinks_is_ignored() {
    let graph = GameGraph::new().unwrap();
    let mut session = Session::new(&graph, SessionConfig::default().with_seed(1));

    let advance = session.claim_key("AB").unwrap();
    let thinking = advance.wakeup.unwrap();
    assert_eq!(thinking.step, Step::ComputerMove);

    let before = session.store().neutral_count();
    for key in ["CD", "EF", "AB"] {
        let ignored = session.claim_key(key).unwrap();
        assert!(ignored.is_ignored());
    }
    assert_eq!(session.store().neutral_count(), before);

    session.wake(thinking).unwrap();
    assert_eq!(session.store().neutral_count(), before - 1);
}

#[test]
fn test_leftover_wakeup_cannot_fire_after_reset() {
    let graph = GameGraph::new().unwrap();
    let mut session = Session::new(&graph, SessionConfig::instant().with_seed(2));

    let thinking = session.claim_key("AC").unwrap().wakeup.unwrap();
    session.reset_round();

    let advance = session.wake(thinking).unwrap();
    assert_eq!(advance.events, vec![GameEvent::Ignored(Ignored::StaleWakeup)]);
    assert_eq!(session.store().neutral_count(), 15);

    // the new round plays normally
    let thinking = session.claim_key("AC").unwrap().wakeup.unwrap();
    assert_eq!(thinking.round, 2);
    session.wake(thinking).unwrap();
    assert_eq!(session.store().owned_by(Owner::Computer).count(), 1);
}

#[test]
fn test_snapshot_serializes() {
    let graph = GameGraph::new().unwrap();
    let mut session = Session::new(&graph, SessionConfig::instant());
    session.claim_key("ef").unwrap();

    let json = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(json["round"], 1);
    assert_eq!(json["current_turn"], "computer");
    assert_eq!(json["phase"], "ComputerThinking");
    assert_eq!(json["edges"].as_array().unwrap().len(), 15);
    assert_eq!(json["edges"][14]["key"], "EF");
    assert_eq!(json["edges"][14]["owner"], "human");
}
