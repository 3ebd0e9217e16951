//! MNA matrix assembly and solving.

use crate::error::{Result, WirelabError};
use crate::graph::{NodeId, PrunedGraph};

/// MNA matrix system Ax = z.
#[derive(Debug)]
pub struct MnaMatrix {
    /// System matrix A (row-major)
    pub a: Vec<f64>,
    /// Source vector z
    pub z: Vec<f64>,
    /// Solution vector x
    pub x: Vec<f64>,
    /// Matrix dimension
    pub size: usize,
}

impl MnaMatrix {
    /// Create a zeroed system of the given dimension.
    pub fn new(size: usize) -> Self {
        Self {
            a: vec![0.0; size * size],
            z: vec![0.0; size],
            x: vec![0.0; size],
            size,
        }
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.a[row * self.size + col]
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] += value;
    }

    /// Stamp a conductance between two nodes.
    /// For a conductance G between nodes n1 and n2:
    ///   A[n1,n1] += G
    ///   A[n2,n2] += G
    ///   A[n1,n2] -= G
    ///   A[n2,n1] -= G
    /// `None` is ground and contributes nothing.
    pub fn stamp_conductance(&mut self, n1: Option<usize>, n2: Option<usize>, g: f64) {
        if let Some(i) = n1 {
            self.add(i, i, g);
        }
        if let Some(j) = n2 {
            self.add(j, j, g);
        }
        if let (Some(i), Some(j)) = (n1, n2) {
            self.add(i, j, -g);
            self.add(j, i, -g);
        }
    }

    /// Stamp a voltage source between two nodes with its current at index br.
    /// V[n+] - V[n-] = E
    pub fn stamp_voltage_source(
        &mut self,
        n_pos: Option<usize>,
        n_neg: Option<usize>,
        br: usize,
        voltage: f64,
    ) {
        if let Some(i) = n_pos {
            self.add(br, i, 1.0);
            self.add(i, br, 1.0);
        }
        if let Some(j) = n_neg {
            self.add(br, j, -1.0);
            self.add(j, br, -1.0);
        }
        self.z[br] = voltage;
    }

    /// Solve by Gaussian elimination with partial pivoting.
    ///
    /// Works on copies of A and z so the assembled system stays inspectable.
    /// Fails with [`WirelabError::SingularMatrix`] when a pivot falls below
    /// `pivot_epsilon`.
    pub fn solve(&mut self, pivot_epsilon: f64) -> Result<()> {
        let n = self.size;
        let mut m = self.a.clone();
        let mut rhs = self.z.clone();

        for k in 0..n {
            // Find pivot
            let mut max_val = m[k * n + k].abs();
            let mut max_row = k;
            for i in (k + 1)..n {
                let val = m[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val < pivot_epsilon {
                return Err(WirelabError::SingularMatrix { pivot: k });
            }

            // Swap rows if needed
            if max_row != k {
                for j in 0..n {
                    m.swap(k * n + j, max_row * n + j);
                }
                rhs.swap(k, max_row);
            }

            // Eliminate
            let pivot = m[k * n + k];
            for i in (k + 1)..n {
                let factor = m[i * n + k] / pivot;
                if factor == 0.0 {
                    continue;
                }
                m[i * n + k] = 0.0;
                for j in (k + 1)..n {
                    m[i * n + j] -= factor * m[k * n + j];
                }
                rhs[i] -= factor * rhs[k];
            }
        }

        // Back substitution
        for i in (0..n).rev() {
            let mut sum = rhs[i];
            for j in (i + 1)..n {
                sum -= m[i * n + j] * self.x[j];
            }
            self.x[i] = sum / m[i * n + i];
        }

        Ok(())
    }
}

/// Node voltages and source currents of a solved graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Voltage of every pruned node; index 0 is ground at 0 V
    pub voltages: Vec<f64>,
    /// Current through each pruned source, in source order
    pub source_currents: Vec<f64>,
}

impl Solution {
    /// Voltage at a pruned node.
    pub fn voltage(&self, node: NodeId) -> f64 {
        self.voltages.get(node.0).copied().unwrap_or(0.0)
    }
}

/// Matrix index of a pruned node; ground has none.
fn node_index(node: NodeId) -> Option<usize> {
    if node == PrunedGraph::GROUND {
        None
    } else {
        Some(node.0 - 1)
    }
}

/// Assemble and solve the MNA system of a pruned graph.
pub fn solve_graph(graph: &PrunedGraph, pivot_epsilon: f64) -> Result<Solution> {
    let unknown_nodes = graph.node_count.saturating_sub(1);
    let size = unknown_nodes + graph.sources.len();
    let mut matrix = MnaMatrix::new(size);

    for edge in &graph.edges {
        matrix.stamp_conductance(node_index(edge.a), node_index(edge.b), edge.conductance());
    }

    for (k, source) in graph.sources.iter().enumerate() {
        matrix.stamp_voltage_source(
            node_index(source.positive),
            node_index(source.internal),
            unknown_nodes + k,
            source.voltage,
        );
    }

    matrix.solve(pivot_epsilon)?;

    let mut voltages = Vec::with_capacity(graph.node_count);
    voltages.push(0.0);
    voltages.extend_from_slice(&matrix.x[..unknown_nodes]);

    Ok(Solution {
        voltages,
        source_currents: matrix.x[unknown_nodes..].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_voltage_divider() {
        // V1 = 10 V at node 0, R1 = 1k to node 1, R2 = 1k to ground
        let mut m = MnaMatrix::new(3);
        m.stamp_conductance(Some(0), Some(1), 1e-3);
        m.stamp_conductance(Some(1), None, 1e-3);
        m.stamp_voltage_source(Some(0), None, 2, 10.0);
        m.solve(1e-12).unwrap();

        assert_relative_eq!(m.x[0], 10.0, epsilon = 1e-9);
        assert_relative_eq!(m.x[1], 5.0, epsilon = 1e-9);
        // 5 mA flows out of the source's positive terminal
        assert_relative_eq!(m.x[2], -5e-3, epsilon = 1e-12);
    }

    #[test]
    fn test_pivoting_handles_zero_diagonal() {
        // The source row has a zero diagonal and needs a row swap
        let mut m = MnaMatrix::new(2);
        m.stamp_conductance(Some(0), None, 0.5);
        m.stamp_voltage_source(Some(0), None, 1, 4.0);
        assert_eq!(m.get(1, 1), 0.0);
        m.solve(1e-12).unwrap();
        assert_relative_eq!(m.x[0], 4.0, epsilon = 1e-12);
        assert_relative_eq!(m.x[1], -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_floating_node_is_singular() {
        let mut m = MnaMatrix::new(2);
        m.stamp_conductance(Some(0), None, 1.0);
        let err = m.solve(1e-12).unwrap_err();
        assert!(matches!(err, WirelabError::SingularMatrix { pivot: 1 }));
    }
}
