//! Ground resolution and source injection.

use crate::engine::EngineConfig;
use crate::error::{Result, WirelabError};
use crate::schematic::ComponentId;

use super::{CircuitGraph, Edge, EdgeOwner, GatePins, NodeId, SourceOrigin, VoltageSource};

/// Pick the 0 V reference node.
///
/// Preference order:
/// 1. the first ground symbol with a wire touching it
/// 2. the negative terminal of the first battery
/// 3. the first output port, when ground substitution is enabled
/// 4. a pin of the first logic gate, see [`GatePins::reference`]
pub fn resolve_ground(graph: &CircuitGraph, config: &EngineConfig) -> Result<NodeId> {
    if let Some(&(_, node)) = graph.grounds.iter().find(|(_, n)| graph.has_wire_at(*n)) {
        return Ok(node);
    }

    if let Some(battery) = graph.batteries.first() {
        return Ok(battery.negative);
    }

    if config.ground_substitution {
        if let Some(&(_, node)) = graph.output_ports.first() {
            return Ok(node);
        }
    }

    graph
        .gates
        .first()
        .map(GatePins::reference)
        .ok_or(WirelabError::UnresolvedGround)
}

/// Add every voltage source and gate bleed resistor to the graph.
///
/// `driven_gates` lists the gates whose output the preceding logic pass drove
/// HIGH; each gets a synthetic source, as does every active input port.
/// Fails with [`WirelabError::NoPowerSource`] when no source results.
pub fn inject_sources(
    graph: &mut CircuitGraph,
    ground: NodeId,
    driven_gates: &[ComponentId],
    config: &EngineConfig,
) -> Result<()> {
    let batteries = graph.batteries.clone();
    for battery in &batteries {
        add_source(
            graph,
            SourceOrigin::Real(battery.id),
            battery.voltage,
            battery.internal_resistance,
            battery.negative,
            battery.positive,
        );
    }

    let ports = graph.input_ports.clone();
    for (id, node, active) in ports {
        if active && node != ground {
            add_source(
                graph,
                SourceOrigin::InputPort(id),
                config.logic_voltage,
                config.synthetic_internal_resistance,
                ground,
                node,
            );
        }
    }

    let gates = graph.gates.clone();
    for gate in &gates {
        if driven_gates.contains(&gate.id) && gate.output != ground {
            add_source(
                graph,
                SourceOrigin::GateOutput(gate.id),
                config.logic_voltage,
                config.synthetic_internal_resistance,
                ground,
                gate.output,
            );
        }

        for &input in &gate.inputs {
            if input != ground {
                graph.edges.push(Edge::new(
                    input,
                    ground,
                    config.gate_input_bleed,
                    EdgeOwner::GateBleed(gate.id),
                ));
            }
        }
    }

    if graph.sources.is_empty() {
        return Err(WirelabError::NoPowerSource);
    }

    tracing::trace!(
        sources = graph.sources.len(),
        synthetic = graph.sources.iter().filter(|s| s.origin.is_synthetic()).count(),
        "sources injected"
    );

    Ok(())
}

fn add_source(
    graph: &mut CircuitGraph,
    origin: SourceOrigin,
    voltage: f64,
    internal_resistance: f64,
    negative: NodeId,
    positive: NodeId,
) {
    let internal = graph.registry.synthetic();
    let index = graph.sources.len();
    let edge = Edge::new(
        negative,
        internal,
        internal_resistance,
        EdgeOwner::SourceInternal(index),
    );
    graph.edges.push(edge);
    graph.sources.push(VoltageSource {
        origin,
        voltage,
        internal_resistance: edge.resistance,
        negative,
        positive,
        internal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Battery, GateKind, Ground, InputPort, InputPortKind, LogicGate, OutputPort};
    use crate::graph::build;
    use crate::schematic::{Point, Schematic};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_ground_symbol_needs_a_wire() {
        let mut s = Schematic::new();
        s.add(Ground::new("G1", p(100.0, 100.0)));
        s.add(Battery::new("B1", p(0.0, 0.0), p(0.0, 40.0), 9.0));
        let config = EngineConfig::default();

        let graph = build(&s, &config);
        // Unwired ground symbol is skipped in favor of the battery
        assert_eq!(resolve_ground(&graph, &config).unwrap(), graph.batteries[0].negative);

        s.wire(p(100.0, 100.0), p(0.0, 0.0));
        let graph = build(&s, &config);
        assert_eq!(resolve_ground(&graph, &config).unwrap(), graph.grounds[0].1);
    }

    #[test]
    fn test_output_port_ground_only_when_substituting() {
        let mut s = Schematic::new();
        s.add(OutputPort::new("O1", p(50.0, 0.0)));
        let config = EngineConfig::default();
        let graph = build(&s, &config);
        assert!(matches!(
            resolve_ground(&graph, &config),
            Err(WirelabError::UnresolvedGround)
        ));

        let config = config.with_ground_substitution(true);
        let graph = build(&s, &config);
        assert_eq!(resolve_ground(&graph, &config).unwrap(), graph.output_ports[0].1);
    }

    #[test]
    fn test_gate_is_last_resort_ground() {
        let mut s = Schematic::new();
        s.add(LogicGate::new("U1", GateKind::Not, vec![p(0.0, 0.0)], p(40.0, 0.0)));
        let config = EngineConfig::default();
        let graph = build(&s, &config);
        let ground = resolve_ground(&graph, &config).unwrap();
        assert_eq!(ground, graph.gates[0].inputs[0]);
        assert_ne!(ground, graph.gates[0].output);

        let bare = GatePins {
            id: graph.gates[0].id,
            inputs: Vec::new(),
            output: graph.gates[0].output,
        };
        assert_eq!(bare.reference(), bare.output);
    }

    #[test]
    fn test_injection_adds_internal_nodes_and_bleeds() {
        let mut s = Schematic::new();
        s.add(Battery::new("B1", p(0.0, 0.0), p(0.0, 40.0), 9.0));
        let port = s.add(InputPort::new("T1", InputPortKind::Toggle, p(80.0, 0.0), true));
        let gate = s.add(LogicGate::new(
            "U1",
            GateKind::And,
            vec![p(100.0, 0.0), p(100.0, 20.0)],
            p(140.0, 10.0),
        ));
        let config = EngineConfig::default();

        let mut graph = build(&s, &config);
        let ground = resolve_ground(&graph, &config).unwrap();
        let before = graph.registry.len();
        inject_sources(&mut graph, ground, &[gate], &config).unwrap();

        assert_eq!(graph.sources.len(), 3);
        assert!(!graph.sources[0].origin.is_synthetic());
        assert_eq!(graph.sources[1].origin, SourceOrigin::InputPort(port));
        assert_eq!(graph.sources[2].origin, SourceOrigin::GateOutput(gate));
        assert_eq!(graph.registry.len(), before + 3);

        let bleeds = graph
            .edges
            .iter()
            .filter(|e| matches!(e.owner, EdgeOwner::GateBleed(_)))
            .count();
        assert_eq!(bleeds, 2);
        assert!(!graph.all_sources_synthetic());
    }

    #[test]
    fn test_no_sources_is_no_power() {
        let mut s = Schematic::new();
        s.add(InputPort::new("T1", InputPortKind::Toggle, p(0.0, 0.0), false));
        s.add(LogicGate::new("U1", GateKind::Not, vec![p(10.0, 0.0)], p(30.0, 0.0)));
        let config = EngineConfig::default();
        let mut graph = build(&s, &config);
        let ground = resolve_ground(&graph, &config).unwrap();
        let err = inject_sources(&mut graph, ground, &[], &config).unwrap_err();
        assert!(matches!(err, WirelabError::NoPowerSource));
    }
}
