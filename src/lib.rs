//! # Wirelab Core
//!
//! Steady-state circuit and logic simulation for interactive schematic
//! editors.
//!
//! This library provides:
//! - A snapshot model of placed components and wire segments
//! - Modified Nodal Analysis (MNA) of the resistive network, with short-circuit
//!   detection and connectivity pruning
//! - A digital bus pass that floods HIGH signals along wires and evaluates
//!   AND, OR, XOR, NAND and NOT gates
//! - A line-oriented DSL for writing snapshots by hand
//!
//! ## Architecture
//!
//! - [`schematic`] - The snapshot the editor hands over each tick
//! - [`components`] - Component kinds (a closed enum)
//! - [`graph`] - Node registry, graph builder, source injection, pruning, short detection
//! - [`solver`] - MNA assembly, Gaussian elimination and the result writer
//! - [`logic`] - Wire power flooding and gate evaluation
//! - [`engine`] - The per-tick pipeline and its configuration
//! - [`dsl`] - Parser for the snapshot description language
//!
//! ## Usage
//!
//! ```no_run
//! use wirelab_core::{dsl, Engine, EngineConfig};
//!
//! let schematic = dsl::parse_schematic("
//!     BAT  B1 (0,40) (0,0) 9
//!     R    R1 (0,0) (40,0) 100
//!     WIRE    (40,0) (0,40)
//! ").unwrap();
//!
//! let engine = Engine::new(EngineConfig::default());
//! let results = engine.tick(&schematic);
//! let r1 = results.component_by_name(&schematic, "R1").unwrap();
//! println!("{} A", r1.current);
//! ```
//!
//! ## Simulation Method
//!
//! Every tick is computed from the snapshot alone:
//!
//! 1. A logic pass decides which input ports and gate outputs are driven HIGH
//! 2. Connection points are snapped to an integer grid and become nodes;
//!    conducting elements become resistive edges
//! 3. Batteries, plus synthetic sources for driven digital lines, are injected
//!    with their internal resistance
//! 4. The graph is pruned to what connects ground and the primary source
//! 5. A near-zero path across the primary source is reported as a short
//! 6. Ax = z is solved by Gaussian elimination with partial pivoting
//! 7. A second logic pass samples the solved wire levels
//!
//! Failures never escape a tick; they come back as the status of a zeroed
//! [`ResultSet`].

pub mod components;
pub mod dsl;
pub mod engine;
pub mod error;
pub mod graph;
pub mod logic;
pub mod schematic;
pub mod solver;

// Re-export main types for convenience
pub use engine::{solve, Engine, EngineConfig};
pub use error::{Result, WirelabError};
pub use schematic::Schematic;
pub use solver::{ResultSet, TickStatus};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmSchematicSim;

/// Resistance floor for every edge, and the resistance of wires, ammeters and
/// closed switches (ohms)
pub const MIN_RESISTANCE: f64 = 1e-9;

/// Ground-to-positive path resistance at or below which the primary source is
/// shorted (ohms)
pub const SHORT_CIRCUIT_THRESHOLD: f64 = 1e-6;

/// Lowest wire level a gate input reads as HIGH (volts)
pub const LOGIC_HIGH_THRESHOLD: f64 = 2.5;

/// Level of a driven digital line (volts)
pub const LOGIC_VOLTAGE: f64 = 5.0;

/// Leakage resistance from every gate input to ground (ohms)
pub const GATE_INPUT_BLEED: f64 = 2e4;

/// Internal resistance of synthetic sources (ohms)
pub const SYNTHETIC_INTERNAL_RESISTANCE: f64 = 0.01;

/// Current above which an element or node counts as active (amperes)
pub const ACTIVE_CURRENT: f64 = 1e-4;
