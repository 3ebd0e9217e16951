//! Wire segments.

use super::types::Point;

/// A straight wire segment between two world-space endpoints.
///
/// Wires meeting at the same snapped coordinate are electrically joined;
/// the engine derives this adjacency itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    /// Optional label for reports
    pub label: Option<String>,
    pub ends: [Point; 2],
}

impl Wire {
    /// Create a new unlabeled wire.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            label: None,
            ends: [a, b],
        }
    }

    /// Attach a label.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
