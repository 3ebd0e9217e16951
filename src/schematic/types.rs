//! Core types for schematic snapshots.

use std::fmt;

/// A world-space coordinate as supplied by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Integer identity of an electrical junction.
///
/// Two connection points are the same junction exactly when they snap to the
/// same key. Both the analog graph and the digital wire bus are keyed by this
/// type, so they always agree on which points touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub x: i64,
    pub y: i64,
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Snap a world-space point onto the integer grid.
///
/// `grid` is the world-space size of one grid cell; values that are not
/// finite and positive fall back to a unit grid.
pub fn snap(point: Point, grid: f64) -> NodeKey {
    let grid = if grid.is_finite() && grid > 0.0 { grid } else { 1.0 };
    NodeKey {
        x: (point.x / grid).round() as i64,
        y: (point.y / grid).round() as i64,
    }
}

/// Stable identity of a placed component: its index in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub usize);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Stable identity of a wire segment: its index in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireId(pub usize);

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_rounds_to_nearest_cell() {
        assert_eq!(snap(Point::new(19.6, -0.4), 1.0), NodeKey { x: 20, y: 0 });
        assert_eq!(snap(Point::new(24.0, 36.0), 10.0), NodeKey { x: 2, y: 4 });
    }

    #[test]
    fn test_snap_is_many_to_one() {
        let a = snap(Point::new(10.2, 10.0), 1.0);
        let b = snap(Point::new(9.8, 10.1), 1.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_snap_rejects_degenerate_grid() {
        assert_eq!(snap(Point::new(3.4, 2.6), 0.0), NodeKey { x: 3, y: 3 });
        assert_eq!(snap(Point::new(3.4, 2.6), f64::NAN), NodeKey { x: 3, y: 3 });
    }
}
