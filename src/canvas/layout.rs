use super::node::Position;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    /// Data flows left to right.
    #[default]
    Horizontal,
    /// Data flows top to bottom.
    Vertical,
}

/// Distances used by the default layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutSpacing {
    /// Distance between consecutive ranks along the flow direction.
    pub rank_gap: f64,
    /// Distance between nodes sharing a rank.
    pub lane_gap: f64,
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        Self {
            rank_gap: 280.0,
            lane_gap: 120.0,
        }
    }
}

impl LayoutSpacing {
    pub fn place(&self, rank: usize, lane: usize, orientation: Orientation) -> Position {
        let along = rank as f64 * self.rank_gap;
        let across = lane as f64 * self.lane_gap;
        match orientation {
            Orientation::Horizontal => Position::new(along, across),
            Orientation::Vertical => Position::new(across, along),
        }
    }
}

/// Ranks nodes by their longest input depth.
///
/// Nodes are identified by index in declaration order; `edges` are
/// `(source, target)` index pairs. Ties are resolved in declaration order by
/// always releasing the lowest ready index first. Nodes caught in a cycle are
/// placed on one rank after every acyclic node.
pub fn compute_ranks(node_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut indegree = vec![0usize; node_count];
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for &(source, target) in edges {
        if source < node_count && target < node_count && source != target {
            indegree[target] += 1;
            outgoing[source].push(target);
        }
    }

    let mut rank = vec![0usize; node_count];
    let mut placed = vec![false; node_count];
    let mut ready: BTreeSet<usize> = (0..node_count).filter(|&i| indegree[i] == 0).collect();
    while let Some(node) = ready.pop_first() {
        placed[node] = true;
        for &next in &outgoing[node] {
            rank[next] = rank[next].max(rank[node] + 1);
            indegree[next] -= 1;
            if indegree[next] == 0 {
                ready.insert(next);
            }
        }
    }

    let cycle_rank = (0..node_count)
        .filter(|&i| placed[i])
        .map(|i| rank[i] + 1)
        .max()
        .unwrap_or(0);
    for (i, was_placed) in placed.into_iter().enumerate() {
        if !was_placed {
            rank[i] = cycle_rank;
        }
    }
    rank
}

/// Turns ranks into positions, stacking nodes of equal rank in declaration order.
pub fn layout_positions(
    ranks: &[usize],
    orientation: Orientation,
    spacing: &LayoutSpacing,
) -> Vec<Position> {
    let mut lanes: AHashMap<usize, usize> = AHashMap::new();
    ranks
        .iter()
        .map(|&rank| {
            let lane = lanes.entry(rank).or_insert(0);
            let position = spacing.place(rank, *lane, orientation);
            *lane += 1;
            position
        })
        .collect()
}
