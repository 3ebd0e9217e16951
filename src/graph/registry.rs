//! Node registry: snapped coordinate to node index.

use std::collections::HashMap;
use std::fmt;

use crate::schematic::{snap, NodeKey, Point};

/// Index of a node in one tick's graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Assigns node indices to junctions.
///
/// Indices are handed out in registration order, so the same snapshot always
/// numbers its nodes the same way. Synthetic nodes (battery internals) have no
/// coordinate.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    grid: f64,
    index: HashMap<NodeKey, NodeId>,
    keys: Vec<Option<NodeKey>>,
}

impl NodeRegistry {
    /// Create an empty registry snapping on `grid`.
    pub fn new(grid: f64) -> Self {
        Self {
            grid,
            index: HashMap::new(),
            keys: Vec::new(),
        }
    }

    /// Register a world-space point, returning its node.
    pub fn register(&mut self, point: Point) -> NodeId {
        let key = snap(point, self.grid);
        if let Some(&node) = self.index.get(&key) {
            return node;
        }
        let node = NodeId(self.keys.len());
        self.keys.push(Some(key));
        self.index.insert(key, node);
        node
    }

    /// Look up the node of an already registered point.
    pub fn lookup(&self, point: Point) -> Option<NodeId> {
        self.index.get(&snap(point, self.grid)).copied()
    }

    /// Allocate a node with no coordinate.
    pub fn synthetic(&mut self) -> NodeId {
        let node = NodeId(self.keys.len());
        self.keys.push(None);
        node
    }

    /// Coordinate key of a node, `None` for synthetic nodes.
    pub fn key(&self, node: NodeId) -> Option<NodeKey> {
        self.keys.get(node.0).copied().flatten()
    }

    /// Total number of nodes, synthetic included.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no node has been registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
