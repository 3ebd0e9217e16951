//! Connectivity pruning.

use std::collections::HashSet;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;

use crate::components::Component;
use crate::schematic::{ComponentId, Schematic, WireId};

use super::{network, CircuitGraph, Edge, EdgeOwner, NodeId, VoltageSource};

/// The part of the graph that can carry current, renumbered with ground as
/// node 0.
#[derive(Debug, Clone)]
pub struct PrunedGraph {
    /// Number of nodes, ground included
    pub node_count: usize,
    /// Positive terminal of the primary source, if it survived
    pub positive: Option<NodeId>,
    pub edges: Vec<Edge>,
    pub sources: Vec<VoltageSource>,
    /// Original node index to pruned node index
    pub remap: Vec<Option<NodeId>>,
    /// Wires that survived
    pub wires: HashSet<WireId>,
    /// Resistors, light bulbs and power users that survived
    pub loads: HashSet<ComponentId>,
    /// Ammeters and switch-likes that survived
    pub links: HashSet<ComponentId>,
}

impl PrunedGraph {
    /// The ground node.
    pub const GROUND: NodeId = NodeId(0);

    /// Map an original node to its pruned index.
    pub fn node(&self, original: NodeId) -> Option<NodeId> {
        self.remap.get(original.0).copied().flatten()
    }

    /// Whether a component edge survived pruning.
    pub fn contains_component(&self, id: ComponentId) -> bool {
        self.loads.contains(&id) || self.links.contains(&id)
    }
}

/// Keep the nodes reachable from both `ground` and `positive`.
///
/// Traversal follows resistive edges and the positive-to-internal link of
/// every source. Edges and sources touching a dropped node are dropped.
pub fn prune(
    graph: &CircuitGraph,
    schematic: &Schematic,
    ground: NodeId,
    positive: NodeId,
) -> PrunedGraph {
    let n = graph.registry.len();
    let net = network(
        n,
        graph
            .edges
            .iter()
            .map(|e| (e.a, e.b, ()))
            .chain(graph.sources.iter().map(|s| (s.positive, s.internal, ()))),
    );

    let from_ground = reach(&net, ground);
    let from_positive = reach(&net, positive);

    let mut remap = vec![None; n];
    remap[ground.0] = Some(PrunedGraph::GROUND);
    let mut node_count = 1;
    for i in 0..n {
        if i != ground.0 && from_ground[i] && from_positive[i] {
            remap[i] = Some(NodeId(node_count));
            node_count += 1;
        }
    }
    let map = |node: NodeId| remap[node.0];

    let edges: Vec<Edge> = graph
        .edges
        .iter()
        .filter_map(|e| Some(Edge { a: map(e.a)?, b: map(e.b)?, ..*e }))
        .collect();

    let sources: Vec<VoltageSource> = graph
        .sources
        .iter()
        .filter_map(|s| {
            Some(VoltageSource {
                negative: map(s.negative)?,
                positive: map(s.positive)?,
                internal: map(s.internal)?,
                ..*s
            })
        })
        .collect();

    let mut wires = HashSet::new();
    let mut loads = HashSet::new();
    let mut links = HashSet::new();
    for edge in &edges {
        match edge.owner {
            EdgeOwner::Wire(id) => {
                wires.insert(id);
            }
            EdgeOwner::Component(id) => match schematic.component(id) {
                Some(Component::Ammeter(_)) | Some(Component::SwitchLike(_)) => {
                    links.insert(id);
                }
                Some(_) => {
                    loads.insert(id);
                }
                None => {}
            },
            EdgeOwner::SourceInternal(_) | EdgeOwner::GateBleed(_) => {}
        }
    }

    let positive = map(positive);

    tracing::trace!(
        nodes = node_count,
        edges = edges.len(),
        sources = sources.len(),
        dropped_edges = graph.edges.len() - edges.len(),
        "graph pruned"
    );

    PrunedGraph {
        node_count,
        positive,
        edges,
        sources,
        remap,
        wires,
        loads,
        links,
    }
}

fn reach(net: &UnGraph<(), ()>, start: NodeId) -> Vec<bool> {
    let mut seen = vec![false; net.node_count()];
    let mut bfs = Bfs::new(net, NodeIndex::new(start.0));
    while let Some(node) = bfs.next(net) {
        seen[node.index()] = true;
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Battery, Resistor};
    use crate::engine::EngineConfig;
    use crate::graph::{build, inject_sources, resolve_ground};
    use crate::schematic::Point;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn pruned(s: &Schematic) -> PrunedGraph {
        let config = EngineConfig::default();
        let mut graph = build(s, &config);
        let ground = resolve_ground(&graph, &config).unwrap();
        inject_sources(&mut graph, ground, &[], &config).unwrap();
        let positive = graph.primary_source().unwrap().positive;
        prune(&graph, s, ground, positive)
    }

    #[test]
    fn test_dangling_resistor_is_dropped() {
        let mut s = Schematic::new();
        s.add(Battery::new("B1", p(0.0, 0.0), p(0.0, 40.0), 9.0));
        let load = s.add(Resistor::new("R1", p(0.0, 40.0), p(0.0, 0.0), 100.0));
        let island = s.add(Resistor::new("R2", p(200.0, 0.0), p(240.0, 0.0), 100.0));
        let stub = s.wire(p(0.0, 40.0), p(80.0, 40.0));
        let lone_wire = s.wire(p(300.0, 0.0), p(300.0, 40.0));

        let g = pruned(&s);
        assert!(g.loads.contains(&load));
        assert!(!g.loads.contains(&island));
        // A stub off the positive rail stays connected; an unconnected wire does not
        assert!(g.wires.contains(&stub));
        assert!(!g.wires.contains(&lone_wire));
        assert_eq!(g.node(NodeId(0)), Some(PrunedGraph::GROUND));
        assert_eq!(g.sources.len(), 1);
    }

    #[test]
    fn test_ground_is_node_zero() {
        let mut s = Schematic::new();
        s.add(Resistor::new("R1", p(0.0, 40.0), p(0.0, 0.0), 100.0));
        s.add(Battery::new("B1", p(0.0, 0.0), p(0.0, 40.0), 9.0));
        let g = pruned(&s);
        // Battery negative is the second registered point but still ground
        assert_eq!(g.node(NodeId(1)), Some(PrunedGraph::GROUND));
        assert_eq!(g.node_count, 3);
        assert!(g.positive.is_some());
    }

    #[test]
    fn test_isolated_ground_keeps_nothing() {
        let mut s = Schematic::new();
        s.add(Battery::new("B1", p(0.0, 0.0), p(0.0, 40.0), 9.0));
        s.add(Resistor::new("R1", p(0.0, 40.0), p(0.0, 0.0), 100.0));
        s.add(crate::components::Ground::new("G1", p(200.0, 0.0)));
        s.wire(p(200.0, 0.0), p(240.0, 0.0));

        let config = EngineConfig::default();
        let mut graph = build(&s, &config);
        let ground = resolve_ground(&graph, &config).unwrap();
        assert_eq!(ground, graph.grounds[0].1);
        inject_sources(&mut graph, ground, &[], &config).unwrap();
        let positive = graph.primary_source().unwrap().positive;

        let g = prune(&graph, &s, ground, positive);
        assert!(g.edges.is_empty());
        assert!(g.wires.is_empty());
        assert_eq!(g.node_count, 1);

        // Anchoring on the battery's negative terminal keeps the loop
        let g = prune(&graph, &s, graph.batteries[0].negative, positive);
        assert!(!g.edges.is_empty());
        assert_eq!(g.loads.len(), 1);
    }
}
