//! Circuit graph construction.
//!
//! Each tick the schematic is turned into a resistive graph:
//!
//! 1. [`build`] registers every connection point in a [`NodeRegistry`] and
//!    emits one [`Edge`] per conducting element.
//! 2. [`resolve_ground`] picks the 0 V reference and [`inject_sources`] adds
//!    battery internals, synthetic sources for driven digital lines, and gate
//!    input bleed resistors.
//! 3. [`prune`] keeps the part connected to both ground and the primary
//!    positive terminal, renumbering it with ground as node 0.
//! 4. [`find_short`] searches the pruned graph for a near-zero path across
//!    the primary source.
//!
//! Nothing here outlives the tick.

mod build;
mod prune;
mod registry;
mod short;
mod sources;

pub use build::build;
pub use prune::{prune, PrunedGraph};
pub use registry::{NodeId, NodeRegistry};
pub use short::{find_short, shortest_resistance};
pub use sources::{inject_sources, resolve_ground};

use petgraph::graph::{NodeIndex, UnGraph};

use crate::schematic::{ComponentId, WireId};

/// Undirected petgraph view over `node_count` nodes, one per [`NodeId`].
///
/// Traversals run on this view; indices match `NodeId` one to one.
pub(crate) fn network<W>(
    node_count: usize,
    links: impl IntoIterator<Item = (NodeId, NodeId, W)>,
) -> UnGraph<(), W> {
    let mut net = UnGraph::with_capacity(node_count, 0);
    for _ in 0..node_count {
        net.add_node(());
    }
    for (a, b, weight) in links {
        net.add_edge(NodeIndex::new(a.0), NodeIndex::new(b.0), weight);
    }
    net
}

/// The element an edge writes its voltage and current back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOwner {
    /// A wire segment
    Wire(WireId),
    /// A resistor, bulb, power user, ammeter or closed switch-like
    Component(ComponentId),
    /// Internal resistance of the source at this index
    SourceInternal(usize),
    /// Leakage resistor from a gate input to ground
    GateBleed(ComponentId),
}

/// A resistive connection between two nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: NodeId,
    pub b: NodeId,
    /// Resistance in ohms, never below [`crate::MIN_RESISTANCE`]
    pub resistance: f64,
    pub owner: EdgeOwner,
}

impl Edge {
    /// Create an edge, flooring the resistance.
    pub fn new(a: NodeId, b: NodeId, resistance: f64, owner: EdgeOwner) -> Self {
        let resistance = if resistance.is_finite() {
            resistance.max(crate::MIN_RESISTANCE)
        } else {
            crate::MIN_RESISTANCE
        };
        Self {
            a,
            b,
            resistance,
            owner,
        }
    }

    /// Conductance (1/R).
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }
}

/// Where a voltage source comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    /// A placed battery
    Real(ComponentId),
    /// An active toggle source or custom input port
    InputPort(ComponentId),
    /// A gate whose output is driven HIGH
    GateOutput(ComponentId),
}

impl SourceOrigin {
    /// Whether the source is synthesized from digital state.
    pub fn is_synthetic(&self) -> bool {
        !matches!(self, SourceOrigin::Real(_))
    }
}

/// An ideal voltage source in series with its internal resistance.
///
/// The ideal part sits between `positive` and `internal`; the internal
/// resistance is an ordinary edge between `internal` and `negative`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageSource {
    pub origin: SourceOrigin,
    pub voltage: f64,
    pub internal_resistance: f64,
    pub negative: NodeId,
    pub positive: NodeId,
    pub internal: NodeId,
}

/// A placed battery waiting for source injection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryTerminals {
    pub id: ComponentId,
    pub negative: NodeId,
    pub positive: NodeId,
    pub voltage: f64,
    pub internal_resistance: f64,
}

/// Node indices of a logic gate's pins.
#[derive(Debug, Clone, PartialEq)]
pub struct GatePins {
    pub id: ComponentId,
    pub inputs: Vec<NodeId>,
    pub output: NodeId,
}

impl GatePins {
    /// Pin used when the gate itself has to provide the 0 V reference.
    ///
    /// The first input is preferred over the output: a driven output gets a
    /// synthetic source referenced to ground, which must not sit on ground
    /// itself. The output is the fallback for input-less gates.
    pub fn reference(&self) -> NodeId {
        self.inputs.first().copied().unwrap_or(self.output)
    }
}

/// The unpruned graph of one tick.
#[derive(Debug, Default)]
pub struct CircuitGraph {
    pub registry: NodeRegistry,
    pub edges: Vec<Edge>,
    /// Injected sources, real ones first
    pub sources: Vec<VoltageSource>,
    pub batteries: Vec<BatteryTerminals>,
    pub grounds: Vec<(ComponentId, NodeId)>,
    pub voltmeters: Vec<(ComponentId, [NodeId; 2])>,
    pub gates: Vec<GatePins>,
    /// Input ports with their active flag
    pub input_ports: Vec<(ComponentId, NodeId, bool)>,
    pub output_ports: Vec<(ComponentId, NodeId)>,
    /// Endpoint nodes of every wire, indexed by wire
    pub wire_ends: Vec<[NodeId; 2]>,
}

impl CircuitGraph {
    /// Whether any wire endpoint sits on `node`.
    pub fn has_wire_at(&self, node: NodeId) -> bool {
        self.wire_ends.iter().any(|ends| ends.contains(&node))
    }

    /// The source the solve is anchored on: the first real battery, or the
    /// first synthetic source when there is none.
    pub fn primary_source(&self) -> Option<&VoltageSource> {
        self.sources
            .iter()
            .find(|s| !s.origin.is_synthetic())
            .or_else(|| self.sources.first())
    }

    /// Whether every injected source is synthetic.
    pub fn all_sources_synthetic(&self) -> bool {
        self.sources.iter().all(|s| s.origin.is_synthetic())
    }
}
