//! Result set: solved values mapped back onto components and wires.

use crate::components::Component;
use crate::engine::EngineConfig;
use crate::error::WirelabError;
use crate::graph::{CircuitGraph, EdgeOwner, PrunedGraph, SourceOrigin};
use crate::schematic::{ComponentId, Schematic, WireId};

use super::Solution;

/// Outcome of the analog half of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickStatus {
    /// The system was solved
    #[default]
    Solved,
    /// No battery and no driven digital source
    NoPowerSource,
    /// No ground reference could be found
    UnresolvedGround,
    /// Pruning left nothing to solve
    DisconnectedGraph,
    /// Gaussian elimination hit a degenerate pivot
    SingularSystem,
    /// The primary source is shorted
    ShortCircuit,
}

impl TickStatus {
    /// Classify a tick failure.
    pub fn from_error(err: &WirelabError) -> Self {
        match err {
            WirelabError::NoPowerSource => TickStatus::NoPowerSource,
            WirelabError::UnresolvedGround => TickStatus::UnresolvedGround,
            WirelabError::DisconnectedGraph => TickStatus::DisconnectedGraph,
            WirelabError::ShortCircuit { .. } => TickStatus::ShortCircuit,
            _ => TickStatus::SingularSystem,
        }
    }

    /// Whether the analog solve succeeded.
    pub fn is_solved(self) -> bool {
        self == TickStatus::Solved
    }
}

/// Digital state of a logic gate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GateReading {
    /// Sampled level of each input, in pin order
    pub inputs: Vec<bool>,
    /// Whether the output is driven HIGH
    pub output_powered: bool,
}

/// Computed values for one component.
///
/// Fields that do not apply to a kind stay at their default.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentReading {
    /// Voltage across the component (meter reading for voltmeters), volts
    pub voltage: f64,
    /// Current through the component (meter reading for ammeters), amperes
    pub current: f64,
    /// Dissipated or delivered power, watts
    pub power: f64,
    /// Constant-power resistance for the next tick (power users)
    pub effective_resistance: Option<f64>,
    /// Carrying current, or driven (ports), or referenced (ground)
    pub active: bool,
    /// Light bulbs: glowing
    pub lit: bool,
    /// Light bulbs: fraction of rated power, 0..=1
    pub brightness: f64,
    /// Loads: drawing more than rated power
    pub overloaded: bool,
    /// Logic gates: digital state
    pub gate: Option<GateReading>,
}

/// Computed values for one wire.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WireReading {
    /// Voltage drop along the wire, volts
    pub voltage: f64,
    /// Current through the wire, amperes
    pub current: f64,
    /// Bus level: node potential from the solve, or the driven logic level
    pub level: f64,
    /// Carrying a HIGH digital signal
    pub logic_powered: bool,
    /// Glowing: carrying current or a HIGH signal
    pub lit: bool,
}

/// Everything one tick computes, keyed by component and wire identity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub status: TickStatus,
    /// Drives the editor's short-circuit warning
    pub short_circuit: bool,
    /// Indexed by [`ComponentId`]
    pub components: Vec<ComponentReading>,
    /// Indexed by [`WireId`]
    pub wires: Vec<WireReading>,
}

impl ResultSet {
    /// All-zero results sized for a schematic.
    pub fn empty(schematic: &Schematic, status: TickStatus) -> Self {
        Self {
            status,
            short_circuit: false,
            components: vec![ComponentReading::default(); schematic.components.len()],
            wires: vec![WireReading::default(); schematic.wires.len()],
        }
    }

    /// All-zero results for a failed solve. Only a short raises the flag.
    pub fn from_failure(schematic: &Schematic, err: &WirelabError) -> Self {
        let mut results = Self::empty(schematic, TickStatus::from_error(err));
        results.short_circuit = matches!(err, WirelabError::ShortCircuit { .. });
        results
    }

    /// Reading of a component.
    pub fn component(&self, id: ComponentId) -> Option<&ComponentReading> {
        self.components.get(id.0)
    }

    /// Reading of a wire.
    pub fn wire(&self, id: WireId) -> Option<&WireReading> {
        self.wires.get(id.0)
    }

    /// Reading of a component looked up by name.
    pub fn component_by_name(&self, schematic: &Schematic, name: &str) -> Option<&ComponentReading> {
        self.component(schematic.find_component(name)?)
    }
}

/// Map a solved graph back onto the snapshot's components and wires.
pub fn write_results(
    schematic: &Schematic,
    graph: &CircuitGraph,
    pruned: &PrunedGraph,
    solution: &Solution,
    config: &EngineConfig,
) -> ResultSet {
    let mut results = ResultSet::empty(schematic, TickStatus::Solved);
    let mut active = vec![false; pruned.node_count];
    let threshold = config.active_current;

    for edge in &pruned.edges {
        let v = solution.voltage(edge.a) - solution.voltage(edge.b);
        let i = v / edge.resistance;
        if i.abs() > threshold {
            active[edge.a.0] = true;
            active[edge.b.0] = true;
        }

        match edge.owner {
            EdgeOwner::Wire(id) => {
                let wire = &mut results.wires[id.0];
                wire.voltage = v.abs();
                wire.current = i.abs();
                wire.lit = i.abs() > threshold;
            }
            EdgeOwner::Component(id) => {
                if let Some(component) = schematic.component(id) {
                    write_edge_reading(&mut results.components[id.0], component, v, i, threshold);
                }
            }
            EdgeOwner::SourceInternal(_) | EdgeOwner::GateBleed(_) => {}
        }
    }

    for (id, ends) in graph.wire_ends.iter().enumerate() {
        if let (Some(a), Some(b)) = (pruned.node(ends[0]), pruned.node(ends[1])) {
            results.wires[id].level = solution.voltage(a).max(solution.voltage(b));
        }
    }

    for (k, source) in pruned.sources.iter().enumerate() {
        let current = solution.source_currents.get(k).copied().unwrap_or(0.0).abs();
        match source.origin {
            SourceOrigin::Real(id) => {
                let reading = &mut results.components[id.0];
                reading.voltage =
                    (solution.voltage(source.positive) - solution.voltage(source.negative)).abs();
                reading.current = current;
                reading.power = reading.voltage * current;
                reading.active = current > threshold;
            }
            SourceOrigin::InputPort(id) => results.components[id.0].current = current,
            SourceOrigin::GateOutput(_) => {}
        }
    }

    for &(id, [a, b]) in &graph.voltmeters {
        if let (Some(a), Some(b)) = (pruned.node(a), pruned.node(b)) {
            results.components[id.0].voltage = (solution.voltage(a) - solution.voltage(b)).abs();
        }
    }

    for &(id, node) in &graph.grounds {
        let carrying = graph
            .wire_ends
            .iter()
            .enumerate()
            .any(|(w, ends)| ends.contains(&node) && results.wires[w].current > threshold);
        let node_active = pruned.node(node).map(|n| active[n.0]).unwrap_or(false);
        results.components[id.0].active = node_active && carrying;
    }

    for &(id, node) in &graph.output_ports {
        results.components[id.0].active = pruned.node(node).map(|n| active[n.0]).unwrap_or(false);
    }

    zero_excluded(schematic, pruned, &mut results);
    results
}

fn write_edge_reading(
    reading: &mut ComponentReading,
    component: &Component,
    v: f64,
    i: f64,
    threshold: f64,
) {
    reading.voltage = v.abs();
    reading.current = i.abs();
    reading.active = i.abs() > threshold;

    match component {
        Component::Resistor(_) => {
            reading.power = reading.voltage * reading.current;
        }
        Component::LightBulb(bulb) => {
            reading.power = reading.voltage * reading.current;
            reading.lit = reading.active;
            reading.brightness = if bulb.rated_power > 0.0 {
                (reading.power / bulb.rated_power).min(1.0)
            } else if reading.lit {
                1.0
            } else {
                0.0
            };
            reading.overloaded = bulb.rated_power > 0.0 && reading.power > bulb.rated_power;
        }
        Component::PowerUser(load) => {
            reading.power = reading.voltage * reading.current;
            reading.effective_resistance = load.constant_power_resistance(v);
            reading.overloaded = load.rated_power > 0.0 && reading.power > load.rated_power;
        }
        _ => {}
    }
}

/// Force every element that did not survive pruning to read zero.
fn zero_excluded(schematic: &Schematic, pruned: &PrunedGraph, results: &mut ResultSet) {
    for (id, component) in schematic.iter_components() {
        let excluded = match component {
            Component::Resistor(_) | Component::LightBulb(_) | Component::PowerUser(_) => {
                !pruned.loads.contains(&id)
            }
            Component::Ammeter(_) | Component::SwitchLike(_) => !pruned.links.contains(&id),
            _ => false,
        };
        if excluded {
            results.components[id.0] = ComponentReading::default();
        }
    }

    for (i, wire) in results.wires.iter_mut().enumerate() {
        if !pruned.wires.contains(&WireId(i)) {
            *wire = WireReading::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_results_are_zero() {
        let mut s = Schematic::new();
        s.wire(Default::default(), Default::default());
        let results = ResultSet::from_failure(&s, &WirelabError::NoPowerSource);
        assert_eq!(results.status, TickStatus::NoPowerSource);
        assert!(!results.short_circuit);
        assert_eq!(results.wires[0], WireReading::default());

        let results = ResultSet::from_failure(&s, &WirelabError::ShortCircuit { resistance: 0.0 });
        assert!(results.short_circuit);
        assert_eq!(results.status, TickStatus::ShortCircuit);
    }

    #[test]
    fn test_disconnected_results_are_zero() {
        let mut s = Schematic::new();
        s.wire(Default::default(), crate::schematic::Point::new(40.0, 0.0));
        let results = ResultSet::from_failure(&s, &WirelabError::DisconnectedGraph);
        assert_eq!(results.status, TickStatus::DisconnectedGraph);
        assert!(!results.short_circuit);
        assert_eq!(results.wires[0], WireReading::default());
    }

    #[test]
    fn test_status_from_singular() {
        let status = TickStatus::from_error(&WirelabError::SingularMatrix { pivot: 2 });
        assert_eq!(status, TickStatus::SingularSystem);
        assert!(!status.is_solved());
    }
}
