//! Digital bus propagation and gate evaluation.
//!
//! Wires carry a transient "logic powered" flag alongside their analog
//! values. A pass seeds power from active input ports, floods it through
//! wires that share a snapped endpoint, evaluates every gate once in sheet
//! order, floods again and finally updates output ports.
//!
//! The engine runs two passes per tick. Pass 1 starts cold and decides which
//! gate outputs are driven, so the graph builder can inject their synthetic
//! sources. Pass 2 samples the solved wire levels and currents. Nothing is
//! kept between ticks, so a chain of N gates needs up to N passes to settle
//! when outputs feed earlier gates in sheet order.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::components::Component;
use crate::engine::EngineConfig;
use crate::schematic::{snap, ComponentId, NodeKey, Point, Schematic, WireId};
use crate::solver::{GateReading, ResultSet};

/// Analog values a pass samples gate inputs from, indexed by wire.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WireSignals {
    pub level: Vec<f64>,
    pub current: Vec<f64>,
}

impl WireSignals {
    /// No voltage and no current on any of `wires` wires.
    pub fn cold(wires: usize) -> Self {
        Self {
            level: vec![0.0; wires],
            current: vec![0.0; wires],
        }
    }

    /// Levels and currents of a finished analog solve.
    pub fn from_results(results: &ResultSet) -> Self {
        Self {
            level: results.wires.iter().map(|w| w.level).collect(),
            current: results.wires.iter().map(|w| w.current).collect(),
        }
    }
}

/// Digital outcome of one pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogicState {
    /// Per wire: carrying a HIGH signal
    pub powered: Vec<bool>,
    /// Per wire: level after gate outputs were driven
    pub level: Vec<f64>,
    /// Every gate with its sampled inputs and output, in sheet order
    pub gates: Vec<(ComponentId, GateReading)>,
    /// Every input port with its toggle state
    pub input_ports: Vec<(ComponentId, bool)>,
    /// Every output port with its indicator state
    pub output_ports: Vec<(ComponentId, bool)>,
}

impl LogicState {
    /// Gates whose output this pass drove HIGH.
    pub fn driven_gates(&self) -> Vec<ComponentId> {
        self.gates
            .iter()
            .filter(|(_, reading)| reading.output_powered)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Copy the digital state onto a result set.
    pub fn apply_to(&self, results: &mut ResultSet) {
        for (wire, (&powered, &level)) in results
            .wires
            .iter_mut()
            .zip(self.powered.iter().zip(&self.level))
        {
            wire.logic_powered = powered;
            wire.level = level;
            wire.lit |= powered;
        }

        for (id, reading) in &self.gates {
            if let Some(component) = results.components.get_mut(id.0) {
                component.active = reading.output_powered;
                component.gate = Some(reading.clone());
            }
        }

        for &(id, active) in &self.input_ports {
            if let Some(component) = results.components.get_mut(id.0) {
                component.active = active;
            }
        }

        for &(id, active) in &self.output_ports {
            if let Some(component) = results.components.get_mut(id.0) {
                component.active |= active;
            }
        }
    }
}

/// Wire adjacency keyed by snapped endpoint.
#[derive(Debug, Clone)]
pub struct LogicBus {
    grid: f64,
    ends: Vec<[NodeKey; 2]>,
    touching: HashMap<NodeKey, Vec<WireId>>,
}

impl LogicBus {
    /// Index the wires of a schematic.
    pub fn new(schematic: &Schematic, grid: f64) -> Self {
        let mut ends = Vec::with_capacity(schematic.wires.len());
        let mut touching: HashMap<NodeKey, Vec<WireId>> = HashMap::new();

        for (i, wire) in schematic.wires.iter().enumerate() {
            let keys = [snap(wire.ends[0], grid), snap(wire.ends[1], grid)];
            for key in keys {
                let list = touching.entry(key).or_default();
                if !list.contains(&WireId(i)) {
                    list.push(WireId(i));
                }
            }
            ends.push(keys);
        }

        Self {
            grid,
            ends,
            touching,
        }
    }

    /// Wires with an endpoint at `point`.
    pub fn wires_at(&self, point: Point) -> &[WireId] {
        self.touching
            .get(&snap(point, self.grid))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Run one pass over the schematic.
    pub fn run(&self, schematic: &Schematic, signals: &WireSignals, config: &EngineConfig) -> LogicState {
        let n = self.ends.len();
        let mut powered = vec![false; n];
        let mut level: Vec<f64> = (0..n)
            .map(|i| signals.level.get(i).copied().unwrap_or(0.0))
            .collect();
        let current = |w: WireId| signals.current.get(w.0).copied().unwrap_or(0.0);

        // Seed
        let mut input_ports = Vec::new();
        for (id, component) in schematic.iter_components() {
            if let Component::InputPort(port) = component {
                input_ports.push((id, port.active));
                if port.active {
                    for w in self.wires_at(port.point) {
                        powered[w.0] = true;
                    }
                }
            }
        }

        self.flood(&mut powered, &mut level, config.logic_voltage);

        let mut gates = Vec::new();
        for (id, component) in schematic.iter_components() {
            let Component::LogicGate(gate) = component else {
                continue;
            };

            let inputs: Vec<bool> = gate
                .inputs
                .iter()
                .map(|&p| {
                    self.wires_at(p).iter().any(|&w| {
                        level[w.0] >= config.logic_high
                            || powered[w.0]
                            || current(w) > config.active_current
                    })
                })
                .collect();
            let output = gate.kind.evaluate(&inputs);

            for w in self.wires_at(gate.output) {
                if output {
                    powered[w.0] = true;
                    level[w.0] = config.logic_voltage;
                } else if !powered[w.0] {
                    level[w.0] = 0.0;
                }
            }

            gates.push((
                id,
                GateReading {
                    inputs,
                    output_powered: output,
                },
            ));
        }

        self.flood(&mut powered, &mut level, config.logic_voltage);

        let mut output_ports = Vec::new();
        for (id, component) in schematic.iter_components() {
            if let Component::OutputPort(port) = component {
                let attached = self.wires_at(port.point);
                let active = attached.iter().any(|w| powered[w.0]);
                if active {
                    for w in attached {
                        powered[w.0] = true;
                        level[w.0] = level[w.0].max(config.logic_voltage);
                    }
                }
                output_ports.push((id, active));
            }
        }

        tracing::trace!(
            powered = powered.iter().filter(|p| **p).count(),
            gates = gates.len(),
            "logic pass"
        );

        LogicState {
            powered,
            level,
            gates,
            input_ports,
            output_ports,
        }
    }

    /// Spread power to every wire sharing an endpoint with a powered wire.
    fn flood(&self, powered: &mut [bool], level: &mut [f64], logic_voltage: f64) {
        let mut seen: HashSet<NodeKey> = HashSet::new();
        let mut queue = VecDeque::new();
        for (i, ends) in self.ends.iter().enumerate() {
            if powered[i] {
                for key in ends {
                    if seen.insert(*key) {
                        queue.push_back(*key);
                    }
                }
            }
        }

        while let Some(key) = queue.pop_front() {
            let Some(wires) = self.touching.get(&key) else {
                continue;
            };
            for w in wires {
                powered[w.0] = true;
                level[w.0] = level[w.0].max(logic_voltage);
                for end in &self.ends[w.0] {
                    if seen.insert(*end) {
                        queue.push_back(*end);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{GateKind, InputPort, InputPortKind, LogicGate, OutputPort};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn run(s: &Schematic) -> LogicState {
        let config = EngineConfig::default();
        LogicBus::new(s, config.grid).run(s, &WireSignals::cold(s.wires.len()), &config)
    }

    #[test]
    fn test_flood_crosses_segments() {
        let mut s = Schematic::new();
        s.add(InputPort::new("T1", InputPortKind::Toggle, p(0.0, 0.0), true));
        let a = s.wire(p(0.0, 0.0), p(20.0, 0.0));
        let b = s.wire(p(20.0, 0.0), p(20.0, 20.0));
        let c = s.wire(p(20.0, 20.0), p(40.0, 20.0));
        let apart = s.wire(p(100.0, 0.0), p(120.0, 0.0));

        let state = run(&s);
        assert!(state.powered[a.0] && state.powered[b.0] && state.powered[c.0]);
        assert!(!state.powered[apart.0]);
        assert_eq!(state.level[c.0], 5.0);
    }

    #[test]
    fn test_inactive_port_seeds_nothing() {
        let mut s = Schematic::new();
        let port = s.add(InputPort::new("T1", InputPortKind::Custom, p(0.0, 0.0), false));
        s.wire(p(0.0, 0.0), p(20.0, 0.0));
        let state = run(&s);
        assert_eq!(state.powered, vec![false]);
        assert_eq!(state.input_ports, vec![(port, false)]);
    }

    #[test]
    fn test_gate_drives_output_and_port() {
        let mut s = Schematic::new();
        s.add(InputPort::new("A", InputPortKind::Toggle, p(0.0, 0.0), true));
        s.add(InputPort::new("B", InputPortKind::Toggle, p(0.0, 20.0), true));
        s.wire(p(0.0, 0.0), p(40.0, 0.0));
        s.wire(p(0.0, 20.0), p(40.0, 20.0));
        let gate = s.add(LogicGate::new(
            "U1",
            GateKind::And,
            vec![p(40.0, 0.0), p(40.0, 20.0)],
            p(80.0, 10.0),
        ));
        let out = s.wire(p(80.0, 10.0), p(120.0, 10.0));
        let port = s.add(OutputPort::new("Y", p(120.0, 10.0)));

        let state = run(&s);
        assert_eq!(state.gates[0].0, gate);
        assert_eq!(state.gates[0].1.inputs, vec![true, true]);
        assert!(state.gates[0].1.output_powered);
        assert!(state.powered[out.0]);
        assert_eq!(state.output_ports, vec![(port, true)]);
        assert_eq!(state.driven_gates(), vec![gate]);
    }

    #[test]
    fn test_analog_level_counts_as_high() {
        let mut s = Schematic::new();
        let input = s.wire(p(0.0, 0.0), p(40.0, 0.0));
        s.add(LogicGate::new("U1", GateKind::Not, vec![p(40.0, 0.0)], p(80.0, 0.0)));
        let config = EngineConfig::default();
        let bus = LogicBus::new(&s, config.grid);

        let mut signals = WireSignals::cold(1);
        assert!(bus.run(&s, &signals, &config).gates[0].1.output_powered);

        signals.level[input.0] = 2.5;
        assert!(!bus.run(&s, &signals, &config).gates[0].1.output_powered);

        let mut signals = WireSignals::cold(1);
        signals.current[input.0] = 1e-3;
        assert!(!bus.run(&s, &signals, &config).gates[0].1.output_powered);
    }

    #[test]
    fn test_snapping_joins_near_points() {
        let mut s = Schematic::new();
        s.add(InputPort::new("T1", InputPortKind::Toggle, p(0.0, 0.0), true));
        s.wire(p(0.0, 0.0), p(20.0, 0.0));
        let b = s.wire(p(20.3, -0.2), p(40.0, 0.0));
        assert!(run(&s).powered[b.0]);
    }
}
