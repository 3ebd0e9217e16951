//! Short-circuit detection.

use petgraph::algo::dijkstra;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use super::{network, NodeId, PrunedGraph};

/// Smallest total resistance of any path between two nodes.
///
/// Only resistive edges are walked; sources are not paths. Returns `None`
/// when `to` cannot be reached.
pub fn shortest_resistance(graph: &PrunedGraph, from: NodeId, to: NodeId) -> Option<f64> {
    let n = graph.node_count;
    if from.0 >= n || to.0 >= n {
        return None;
    }

    let net = network(n, graph.edges.iter().map(|e| (e.a, e.b, e.resistance)));
    let goal = NodeIndex::new(to.0);
    dijkstra(&net, NodeIndex::new(from.0), Some(goal), |edge| *edge.weight())
        .get(&goal)
        .copied()
}

/// Resistance of the ground-to-positive path if it is at or below
/// `threshold`, i.e. the primary source is shorted.
pub fn find_short(graph: &PrunedGraph, threshold: f64) -> Option<f64> {
    let positive = graph.positive?;
    shortest_resistance(graph, PrunedGraph::GROUND, positive).filter(|&r| r <= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, EdgeOwner};
    use crate::schematic::WireId;
    use std::collections::HashSet;

    fn graph(node_count: usize, edges: &[(usize, usize, f64)], positive: usize) -> PrunedGraph {
        PrunedGraph {
            node_count,
            positive: Some(NodeId(positive)),
            edges: edges
                .iter()
                .enumerate()
                .map(|(i, &(a, b, r))| Edge::new(NodeId(a), NodeId(b), r, EdgeOwner::Wire(WireId(i))))
                .collect(),
            sources: Vec::new(),
            remap: Vec::new(),
            wires: HashSet::new(),
            loads: HashSet::new(),
            links: HashSet::new(),
        }
    }

    #[test]
    fn test_picks_cheapest_path() {
        // 0 -100- 1 -100- 3 and 0 -10- 2 -10- 3
        let g = graph(4, &[(0, 1, 100.0), (1, 3, 100.0), (0, 2, 10.0), (2, 3, 10.0)], 3);
        let r = shortest_resistance(&g, NodeId(0), NodeId(3)).unwrap();
        assert!((r - 20.0).abs() < 1e-12);
        assert_eq!(find_short(&g, 1e-6), None);
    }

    #[test]
    fn test_wire_path_is_short() {
        let g = graph(3, &[(0, 1, 1e-9), (1, 2, 1e-9), (0, 2, 50.0)], 2);
        let r = find_short(&g, 1e-6).unwrap();
        assert!(r <= 1e-6);
    }

    #[test]
    fn test_unreachable_is_none() {
        let g = graph(3, &[(0, 1, 1.0)], 2);
        assert_eq!(shortest_resistance(&g, NodeId(0), NodeId(2)), None);
        assert_eq!(find_short(&g, 1e-6), None);
    }
}
