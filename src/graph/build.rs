//! Graph builder: walks the snapshot and emits resistive edges.

use crate::components::Component;
use crate::engine::EngineConfig;
use crate::schematic::{Schematic, WireId};

use super::{BatteryTerminals, CircuitGraph, Edge, EdgeOwner, GatePins, NodeRegistry};

/// Build the unpruned graph for one tick.
///
/// Every terminal and wire endpoint is registered, conducting or not, so that
/// dangling elements still get a node. Elements that are not plain resistances
/// are collected into the per-kind lists of [`CircuitGraph`].
pub fn build(schematic: &Schematic, config: &EngineConfig) -> CircuitGraph {
    let mut graph = CircuitGraph {
        registry: NodeRegistry::new(config.grid),
        ..CircuitGraph::default()
    };
    let near_zero = crate::MIN_RESISTANCE;

    for (id, component) in schematic.iter_components() {
        let nodes: Vec<_> = component
            .terminals()
            .into_iter()
            .map(|p| graph.registry.register(p))
            .collect();
        let owner = EdgeOwner::Component(id);

        match component {
            Component::Resistor(r) => {
                graph.edges.push(Edge::new(nodes[0], nodes[1], r.resistance, owner));
            }
            Component::LightBulb(b) => {
                if !b.burnt {
                    graph.edges.push(Edge::new(nodes[0], nodes[1], b.resistance, owner));
                }
            }
            Component::PowerUser(p) => {
                graph.edges.push(Edge::new(nodes[0], nodes[1], p.resistance, owner));
            }
            Component::Ammeter(_) => {
                graph.edges.push(Edge::new(nodes[0], nodes[1], near_zero, owner));
            }
            Component::SwitchLike(s) => {
                if s.closed {
                    graph.edges.push(Edge::new(nodes[0], nodes[1], near_zero, owner));
                }
            }
            Component::Voltmeter(_) => {
                graph.voltmeters.push((id, [nodes[0], nodes[1]]));
            }
            Component::Battery(b) => {
                graph.batteries.push(BatteryTerminals {
                    id,
                    negative: nodes[0],
                    positive: nodes[1],
                    voltage: b.voltage,
                    internal_resistance: b.internal_resistance,
                });
            }
            Component::Ground(_) => graph.grounds.push((id, nodes[0])),
            Component::LogicGate(_) => {
                let (output, inputs) = match nodes.split_last() {
                    Some((output, inputs)) => (*output, inputs.to_vec()),
                    None => continue,
                };
                graph.gates.push(GatePins { id, inputs, output });
            }
            Component::InputPort(p) => graph.input_ports.push((id, nodes[0], p.active)),
            Component::OutputPort(_) => graph.output_ports.push((id, nodes[0])),
        }
    }

    for (i, wire) in schematic.wires.iter().enumerate() {
        let a = graph.registry.register(wire.ends[0]);
        let b = graph.registry.register(wire.ends[1]);
        graph.wire_ends.push([a, b]);
        graph.edges.push(Edge::new(a, b, near_zero, EdgeOwner::Wire(WireId(i))));
    }

    tracing::trace!(
        nodes = graph.registry.len(),
        edges = graph.edges.len(),
        batteries = graph.batteries.len(),
        gates = graph.gates.len(),
        "graph built"
    );

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Battery, Resistor, SwitchKind, SwitchLike, Voltmeter};
    use crate::graph::NodeId;
    use crate::schematic::Point;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_open_switch_has_no_edge_but_registers_nodes() {
        let mut s = Schematic::new();
        s.add(SwitchLike::new("S1", SwitchKind::Switch, p(0.0, 0.0), p(10.0, 0.0), false));
        let graph = build(&s, &EngineConfig::default());
        assert!(graph.edges.is_empty());
        assert_eq!(graph.registry.len(), 2);
    }

    #[test]
    fn test_edges_and_collections() {
        let mut s = Schematic::new();
        let b = s.add(Battery::new("B1", p(0.0, 0.0), p(0.0, 40.0), 9.0));
        s.add(Resistor::new("R1", p(0.0, 40.0), p(40.0, 40.0), 0.0));
        s.add(Voltmeter::new("V1", p(0.0, 40.0), p(0.0, 0.0)));
        s.wire(p(40.0, 40.0), p(0.0, 0.0));

        let graph = build(&s, &EngineConfig::default());
        assert_eq!(graph.registry.len(), 3);
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.batteries[0].id, b);
        assert_eq!(graph.batteries[0].negative, NodeId(0));
        assert_eq!(graph.voltmeters.len(), 1);
        // Zero resistance is floored
        assert!(graph.edges[0].resistance >= crate::MIN_RESISTANCE);
        assert!(graph.has_wire_at(NodeId(0)));
    }
}
