//! Terminal rendering of the board and events
//!
//! Level 4 - formatting utilities shared by the commands

use colored::{ColoredString, Colorize};

use sim_core::{
    EdgeId, GameEvent, GameGraph, Ignored, Owner, Player, Session, POINT_RGB, RULES,
};

/// Text in an owner's color
pub fn paint(text: &str, owner: Owner) -> ColoredString {
    let (r, g, b) = owner.rgb();
    text.truecolor(r, g, b)
}

fn player_name(player: Player) -> ColoredString {
    match player {
        Player::Human => paint("human", Owner::Human),
        Player::Computer => paint("computer", Owner::Computer),
    }
}

fn edge_key(graph: &GameGraph, edge: EdgeId) -> &str {
    &graph.edge(edge).key
}

pub fn print_rules() {
    println!("{}", "=== Sim ===".bold());
    println!("{}", RULES);
    println!();
}

/// Points, edges and triangles
pub fn print_graph(graph: &GameGraph) {
    let (r, g, b) = POINT_RGB;

    println!("{}", "Points:".bold());
    for p in graph.points() {
        println!(
            "  {}  ({:>4}, {:>4})  before={} after={}",
            p.label.to_string().truecolor(r, g, b).bold(),
            p.pos.x,
            p.pos.y,
            p.label_before,
            p.label_after
        );
    }

    println!("{}", "Edges:".bold());
    let keys: Vec<&str> = graph.edges().iter().map(|e| e.key.as_str()).collect();
    println!("  {}", keys.join(" "));

    println!("{}", "Triangles:".bold());
    let keys: Vec<&str> = graph.triangles().iter().map(|t| t.key.as_str()).collect();
    println!("  {}", keys.join(" "));
}

/// Edge list grouped by owner, plus the turn line
pub fn print_board(session: &Session) {
    let graph = session.graph();

    println!();
    for owner in [Owner::Human, Owner::Computer, Owner::Neutral] {
        let edges: Vec<String> = session
            .store()
            .owned_by(owner)
            .map(|e| {
                let key = paint(edge_key(graph, e), owner);
                if session.edge_state(e).contributed_to_loss {
                    key.bold().underline().to_string()
                } else {
                    key.to_string()
                }
            })
            .collect();
        let label = format!("{:<9}", format!("{:?}:", owner).to_lowercase());
        println!("  {} {}", paint(&label, owner), edges.join(" "));
    }

    match session.loser() {
        Some(loser) => println!("{} has lost!", player_name(loser)),
        None => println!("turn: {}", player_name(session.current_turn())),
    }
}

/// One line per event
pub fn describe_event(graph: &GameGraph, event: &GameEvent) -> String {
    match event {
        GameEvent::Claimed { player, edge } => {
            format!("{} colors {}", player_name(*player), edge_key(graph, *edge))
        }
        GameEvent::Reconsidered { edge } => {
            format!("{} reconsiders {}", player_name(Player::Computer), edge_key(graph, *edge))
        }
        GameEvent::TurnPassed { to } => format!("turn: {}", player_name(*to)),
        GameEvent::Lost { loser, triangle } => {
            let sides: Vec<&str> = triangle.iter().map(|&e| edge_key(graph, e)).collect();
            format!(
                "{} completed {} and has lost!",
                player_name(*loser),
                sides.join("-").bold()
            )
        }
        GameEvent::RoundReset { round } => format!("=== Round {} ===", round),
        GameEvent::Ignored(reason) => match reason {
            Ignored::NotYourTurn => "Not your turn".to_string(),
            Ignored::EdgeTaken => "That edge is already colored".to_string(),
            Ignored::NoEdge => "No edge there".to_string(),
            Ignored::RoundOver => "Round is over".to_string(),
            Ignored::StaleWakeup => "(stale continuation skipped)".to_string(),
        },
    }
}
