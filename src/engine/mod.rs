//! The per-tick pipeline.
//!
//! ```text
//! snapshot ─► logic pass 1 ─► build ─► ground ─► inject ─► prune ─► short check
//!                                                                     │
//!   ResultSet ◄─ logic pass 2 ◄─ write results ◄─ MNA solve ◄─────────┘
//! ```
//!
//! Any analog failure leaves a zeroed [`ResultSet`] whose status names the
//! failure; logic pass 2 still runs on it.

use crate::error::{Result, WirelabError};
use crate::graph::{build, find_short, inject_sources, prune, resolve_ground, CircuitGraph, NodeId, PrunedGraph};
use crate::logic::{LogicBus, WireSignals};
use crate::schematic::{ComponentId, Schematic};
use crate::solver::{solve_graph, write_results, ResultSet, PIVOT_EPSILON};


/// Configuration for the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// World units per snapping cell when keying nodes
    pub grid: f64,
    /// Allow an output port to stand in for ground
    pub ground_substitution: bool,
    /// Largest ground-to-positive resistance treated as a short (ohms)
    pub short_threshold: f64,
    /// Lowest level sampled as HIGH by a gate input (volts)
    pub logic_high: f64,
    /// Level of a driven digital line (volts)
    pub logic_voltage: f64,
    /// Internal resistance of synthetic sources (ohms)
    pub synthetic_internal_resistance: f64,
    /// Leakage from every gate input to ground (ohms)
    pub gate_input_bleed: f64,
    /// Current above which an element counts as active (amperes)
    pub active_current: f64,
    /// Pivot magnitude below which the system is singular
    pub pivot_epsilon: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid: 1.0,
            ground_substitution: false,
            short_threshold: crate::SHORT_CIRCUIT_THRESHOLD,
            logic_high: crate::LOGIC_HIGH_THRESHOLD,
            logic_voltage: crate::LOGIC_VOLTAGE,
            synthetic_internal_resistance: crate::SYNTHETIC_INTERNAL_RESISTANCE,
            gate_input_bleed: crate::GATE_INPUT_BLEED,
            active_current: crate::ACTIVE_CURRENT,
            pivot_epsilon: PIVOT_EPSILON,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the snapping grid.
    pub fn with_grid(mut self, grid: f64) -> Self {
        self.grid = grid;
        self
    }

    /// Let the first output port act as ground when nothing else does.
    pub fn with_ground_substitution(mut self, enabled: bool) -> Self {
        self.ground_substitution = enabled;
        self
    }

    pub fn with_short_threshold(mut self, ohms: f64) -> Self {
        self.short_threshold = ohms;
        self
    }

    pub fn with_logic_high(mut self, volts: f64) -> Self {
        self.logic_high = volts;
        self
    }

    pub fn with_logic_voltage(mut self, volts: f64) -> Self {
        self.logic_voltage = volts;
        self
    }

    pub fn with_synthetic_internal_resistance(mut self, ohms: f64) -> Self {
        self.synthetic_internal_resistance = ohms;
        self
    }

    pub fn with_gate_input_bleed(mut self, ohms: f64) -> Self {
        self.gate_input_bleed = ohms;
        self
    }

    pub fn with_active_current(mut self, amperes: f64) -> Self {
        self.active_current = amperes;
        self
    }

    /// Set the singular-pivot cutoff.
    ///
    /// Raising it makes nearly floating nodes fail the solve instead of
    /// producing huge voltages.
    pub fn with_pivot_epsilon(mut self, epsilon: f64) -> Self {
        self.pivot_epsilon = epsilon;
        self
    }
}

/// The schematic simulation engine.
///
/// Holds only configuration; every tick is computed from the snapshot alone.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute one tick.
    pub fn tick(&self, schematic: &Schematic) -> ResultSet {
        let config = &self.config;
        let bus = LogicBus::new(schematic, config.grid);

        let before = bus.run(schematic, &WireSignals::cold(schematic.wires.len()), config);
        let driven = before.driven_gates();

        let mut results = match self.solve_analog(schematic, &driven) {
            Ok(results) => results,
            Err(err) => {
                if err.is_tick_failure() {
                    tracing::debug!(error = %err, "analog solve aborted");
                } else {
                    tracing::warn!(error = %err, "unexpected error during analog solve");
                }
                ResultSet::from_failure(schematic, &err)
            }
        };

        let after = bus.run(schematic, &WireSignals::from_results(&results), config);
        after.apply_to(&mut results);
        results
    }

    fn solve_analog(&self, schematic: &Schematic, driven: &[ComponentId]) -> Result<ResultSet> {
        let config = &self.config;
        let graph = build(schematic, config);
        let ground = resolve_ground(&graph, config)?;
        let battery_negative = graph.batteries.first().map(|b| b.negative);

        let (graph, pruned) = match self.assemble(schematic, graph, ground, driven)? {
            (graph, pruned) if !pruned.edges.is_empty() => (graph, pruned),
            _ => {
                let fallback = battery_negative
                    .filter(|&n| n != ground)
                    .ok_or(WirelabError::DisconnectedGraph)?;
                tracing::trace!(%ground, %fallback, "nothing survived pruning, retrying ground");
                let (graph, pruned) =
                    self.assemble(schematic, build(schematic, config), fallback, driven)?;
                if pruned.edges.is_empty() {
                    return Err(WirelabError::DisconnectedGraph);
                }
                (graph, pruned)
            }
        };

        if !graph.all_sources_synthetic() {
            if let Some(resistance) = find_short(&pruned, config.short_threshold) {
                tracing::debug!(resistance, "short circuit across primary source");
                return Err(WirelabError::ShortCircuit { resistance });
            }
        }

        let solution = solve_graph(&pruned, config.pivot_epsilon)?;
        Ok(write_results(schematic, &graph, &pruned, &solution, config))
    }

    /// Inject sources around `ground` and prune to the primary source.
    fn assemble(
        &self,
        schematic: &Schematic,
        mut graph: CircuitGraph,
        ground: NodeId,
        driven: &[ComponentId],
    ) -> Result<(CircuitGraph, PrunedGraph)> {
        inject_sources(&mut graph, ground, driven, &self.config)?;
        let positive = graph
            .primary_source()
            .map(|s| s.positive)
            .ok_or(WirelabError::NoPowerSource)?;
        let pruned = prune(&graph, schematic, ground, positive);
        Ok((graph, pruned))
    }
}

/// Compute one tick with the given configuration.
pub fn solve(schematic: &Schematic, config: &EngineConfig) -> ResultSet {
    Engine::new(*config).tick(schematic)
}
