//! Fixed Sim topology: 6 points on a hexagon, 15 edges, 20 triangles
//!
//! Everything here is built once by [`GameGraph::new`] and never mutated.
//! Points, edges and triangles are addressed by small integer ids; the
//! canonical label keys ("AC", "ACE") are kept for lookups and display.

use std::f64::consts::PI;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

// ============================================================================
// CONSTANTS
// ============================================================================

pub const NUM_POINTS: usize = 6;
pub const NUM_EDGES: usize = NUM_POINTS * (NUM_POINTS - 1) / 2;
pub const NUM_TRIANGLES: usize = 20;

/// Every edge is a side of one triangle per remaining point
pub const TRIANGLES_PER_EDGE: usize = NUM_POINTS - 2;

/// Point alphabet, in hexagon order
pub const LABELS: [char; NUM_POINTS] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// Layout radius in screen units
pub const RADIUS: f64 = 300.0;

/// Layout center
pub const CENTER: Pos = Pos {
    x: RADIUS * 1.5,
    y: RADIUS * 1.5,
};

/// Default pick radius for coordinate hit-testing
pub const HIT_RADIUS: f64 = 12.0;

// ============================================================================
// IDS AND GEOMETRY
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(pub u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriangleId(pub u8);

impl PointId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TriangleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Screen position
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pos {
    pub x: f64,
    pub y: f64,
}

impl Pos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A corner of the hexagon
#[derive(Clone, Debug, Serialize)]
pub struct Point {
    pub id: PointId,
    pub label: char,
    pub label_before: char,
    pub label_after: char,
    pub angle: f64,
    pub pos: Pos,
}

/// A line between two points
#[derive(Clone, Debug, Serialize)]
pub struct Edge {
    pub id: EdgeId,
    /// Canonical key, labels sorted ("AC")
    pub key: String,
    pub points: [PointId; 2],
    pub from: Pos,
    pub to: Pos,
}

/// Three points and the edges joining them
#[derive(Clone, Debug, Serialize)]
pub struct Triangle {
    pub id: TriangleId,
    /// Canonical key, labels sorted ("ACE")
    pub key: String,
    pub points: [PointId; 3],
    pub edges: [EdgeId; 3],
}

// ============================================================================
// LABEL HELPERS
// ============================================================================

/// Label for a point index, wrapping around in both directions
pub fn label_of(index: i64) -> char {
    LABELS[index.rem_euclid(NUM_POINTS as i64) as usize]
}

/// Point index for a label (case-insensitive)
pub fn index_of(label: char) -> Result<u8> {
    let upper = label.to_ascii_uppercase();
    LABELS
        .iter()
        .position(|&c| c == upper)
        .map(|i| i as u8)
        .ok_or(SimError::InvalidLabel(label))
}

/// Canonical form of a multi-label key: "aec" -> "ACE"
pub fn sort_code(code: &str) -> String {
    let mut chars: Vec<char> = code.chars().map(|c| c.to_ascii_uppercase()).collect();
    chars.sort_unstable();
    chars.into_iter().collect()
}

// ============================================================================
// GRAPH
// ============================================================================

/// Immutable board topology shared by every session
#[derive(Clone, Debug)]
pub struct GameGraph {
    points: Vec<Point>,
    edges: Vec<Edge>,
    triangles: Vec<Triangle>,

    /// Point pair -> edge, both orders filled
    pair_edges: [[Option<EdgeId>; NUM_POINTS]; NUM_POINTS],

    edge_keys: FxHashMap<String, EdgeId>,
    triangle_keys: FxHashMap<String, TriangleId>,

    /// Triangles each edge is a side of, in triangle order
    edge_triangles: Vec<[TriangleId; TRIANGLES_PER_EDGE]>,
}

impl GameGraph {
    /// Build and verify the full topology
    pub fn new() -> Result<Self> {
        let points = build_points();
        expect_count("points", NUM_POINTS, points.len())?;

        let edges = build_edges(&points);
        expect_count("edges", NUM_EDGES, edges.len())?;

        let mut pair_edges = [[None; NUM_POINTS]; NUM_POINTS];
        let mut edge_keys = FxHashMap::default();
        for edge in &edges {
            if edge_keys.insert(edge.key.clone(), edge.id).is_some() {
                return Err(SimError::DuplicateKey(edge.key.clone()));
            }
            let [a, b] = edge.points;
            pair_edges[a.index()][b.index()] = Some(edge.id);
            pair_edges[b.index()][a.index()] = Some(edge.id);
        }

        let codes = build_triangles(&points);
        expect_count("triangles", NUM_TRIANGLES, codes.len())?;

        let mut triangles = Vec::with_capacity(NUM_TRIANGLES);
        let mut triangle_keys = FxHashMap::default();
        for (i, code) in codes.into_iter().enumerate() {
            let id = TriangleId(i as u8);
            let triangle = make_triangle(id, code, &pair_edges)?;
            if triangle_keys.insert(triangle.key.clone(), id).is_some() {
                return Err(SimError::DuplicateKey(triangle.key));
            }
            triangles.push(triangle);
        }

        let edge_triangles = edges
            .iter()
            .map(|edge| {
                let found: Vec<TriangleId> = triangles
                    .iter()
                    .filter(|t| t.edges.contains(&edge.id))
                    .map(|t| t.id)
                    .collect();
                <[TriangleId; TRIANGLES_PER_EDGE]>::try_from(found).map_err(|found| {
                    SimError::Topology {
                        what: "triangles on an edge",
                        expected: TRIANGLES_PER_EDGE,
                        found: found.len(),
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            points = points.len(),
            edges = edges.len(),
            triangles = triangles.len(),
            "Built game graph"
        );

        Ok(Self {
            points,
            edges,
            triangles,
            pair_edges,
            edge_keys,
            triangle_keys,
            edge_triangles,
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn point(&self, id: PointId) -> &Point {
        &self.points[id.index()]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    pub fn triangle(&self, id: TriangleId) -> &Triangle {
        &self.triangles[id.index()]
    }

    /// Whether an id names one of this graph's edges
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        id.index() < self.edges.len()
    }

    // ========================================================================
    // LOOKUPS
    // ========================================================================

    /// Edge joining two points, `None` for a point with itself
    pub fn edge_between(&self, a: PointId, b: PointId) -> Option<EdgeId> {
        self.pair_edges
            .get(a.index())
            .and_then(|row| row.get(b.index()))
            .copied()
            .flatten()
    }

    /// Edge by label key in any order or case ("ca" == "AC")
    pub fn edge_by_key(&self, key: &str) -> Result<EdgeId> {
        self.edge_keys
            .get(&sort_code(key.trim()))
            .copied()
            .ok_or_else(|| SimError::UnknownEdge(key.to_string()))
    }

    /// Triangle by label key in any order or case
    pub fn triangle_by_key(&self, key: &str) -> Result<TriangleId> {
        self.triangle_keys
            .get(&sort_code(key.trim()))
            .copied()
            .ok_or_else(|| SimError::UnknownTriangle(key.to_string()))
    }

    /// Triangles having this edge as a side
    pub fn triangles_containing(&self, edge: EdgeId) -> &[TriangleId; TRIANGLES_PER_EDGE] {
        &self.edge_triangles[edge.index()]
    }

    /// The three sides of a triangle
    pub fn triangle_edges(&self, triangle: TriangleId) -> [EdgeId; 3] {
        self.triangle(triangle).edges
    }

    /// First edge (in edge order) passing within `radius` of a position.
    ///
    /// The long diagonals cross at the center; a pick there resolves to
    /// the first of them only.
    pub fn edge_at(&self, pos: Pos, radius: f64) -> Option<EdgeId> {
        self.edges
            .iter()
            .find(|e| segment_hits_circle(e.from, e.to, pos, radius))
            .map(|e| e.id)
    }
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

fn expect_count(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(SimError::Topology {
            what,
            expected,
            found,
        })
    }
}

/// Points at angles i*pi/3, positions rounded to whole units
pub fn build_points() -> Vec<Point> {
    (0..NUM_POINTS as i64)
        .map(|i| {
            let angle = i as f64 * PI / 3.0;
            Point {
                id: PointId(i as u8),
                label: label_of(i),
                label_before: label_of(i - 1),
                label_after: label_of(i + 1),
                angle,
                pos: Pos::new(
                    (CENTER.x + RADIUS * angle.cos()).round(),
                    (CENTER.y + RADIUS * angle.sin()).round(),
                ),
            }
        })
        .collect()
}

/// One edge per unordered pair (i < j)
pub fn build_edges(points: &[Point]) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(NUM_EDGES);
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            edges.push(Edge {
                id: EdgeId(edges.len() as u8),
                key: sort_code(&format!("{}{}", a.label, b.label)),
                points: [a.id, b.id],
                from: a.pos,
                to: b.pos,
            });
        }
    }
    edges
}

/// Sorted triangle codes.
///
/// Each point contributes the triangles it forms with its predecessor and
/// any third point, the same with its successor, and the skip-2 triangle
/// (i, i+2, i+4). Together these cover every 3-subset at least once.
pub fn build_triangles(points: &[Point]) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut codes = Vec::with_capacity(NUM_TRIANGLES);
    let mut add = |code: String| {
        if seen.insert(code.clone()) {
            codes.push(code);
        }
    };

    for (i, point) in points.iter().enumerate() {
        for neighbor in [point.label_before, point.label_after] {
            for third in points {
                if third.label != point.label && third.label != neighbor {
                    add(sort_code(&format!("{}{}{}", point.label, neighbor, third.label)));
                }
            }
        }

        let i = i as i64;
        add(sort_code(&format!(
            "{}{}{}",
            label_of(i),
            label_of(i + 2),
            label_of(i + 4)
        )));
    }

    codes.sort();
    codes
}

fn make_triangle(
    id: TriangleId,
    code: String,
    pair_edges: &[[Option<EdgeId>; NUM_POINTS]; NUM_POINTS],
) -> Result<Triangle> {
    let labels = code
        .chars()
        .map(|c| index_of(c).map(PointId))
        .collect::<Result<Vec<_>>>()?;
    let points: [PointId; 3] = labels
        .try_into()
        .map_err(|_| SimError::UnknownTriangle(code.clone()))?;

    // Sides in key order: (0,1), (0,2), (1,2)
    let side = |a: PointId, b: PointId| {
        pair_edges[a.index()][b.index()].ok_or_else(|| SimError::UnknownTriangle(code.clone()))
    };
    let edges = [
        side(points[0], points[1])?,
        side(points[0], points[2])?,
        side(points[1], points[2])?,
    ];

    Ok(Triangle {
        id,
        key: code,
        points,
        edges,
    })
}

fn segment_hits_circle(a: Pos, b: Pos, center: Pos, radius: f64) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((center.x - a.x) * dx + (center.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let ox = a.x + t * dx - center.x;
    let oy = a.y + t * dy - center.y;
    ox * ox + oy * oy <= radius * radius
}

// ============================================================================
// TESTS
// ============================================================================
