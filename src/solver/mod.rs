//! MNA (Modified Nodal Analysis) solver.
//!
//! This module provides the numerical engine for the analog pass.
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a system of equations Ax = z where:
//! - x contains node voltages and source currents
//! - A is the conductance/coefficient matrix
//! - z is the source vector
//!
//! The matrix structure is:
//! ```text
//! [ G   B ] [ v ]   [ 0 ]
//! [ C   0 ] [ j ] = [ e ]
//! ```
//!
//! where:
//! - G is the conductance matrix built from every resistive edge
//! - B, C couple each source's positive and internal nodes to its current
//! - v is the vector of node voltages (ground excluded, fixed at 0 V)
//! - j is the vector of source currents
//! - e is the vector of source voltages
//!
//! Each source's internal resistance is an ordinary edge in G, so the ideal
//! part only needs the B/C coupling.

mod mna;
mod results;

pub use mna::{solve_graph, MnaMatrix, Solution};
pub use results::{write_results, ComponentReading, GateReading, ResultSet, TickStatus, WireReading};

/// Pivot magnitude below which the system is treated as singular.
pub const PIVOT_EPSILON: f64 = 1e-12;
