//! Schematic snapshots.
//!
//! A [`Schematic`] is what the editor hands the engine each tick: the placed
//! components and the wire segments, both in world-space coordinates. The
//! engine only reads it; results come back as a separate
//! [`crate::ResultSet`] keyed by [`ComponentId`] and [`WireId`].

mod types;
mod validate;
mod wire;

pub use types::*;
pub use validate::validate_schematic;
pub use wire::Wire;

use crate::components::Component;
use crate::dsl::{ElementKind, SchematicAst};
use crate::error::{Result, WirelabError};

/// A snapshot of the editor's sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schematic {
    /// Placed components; the index is the [`ComponentId`]
    pub components: Vec<Component>,
    /// Wire segments; the index is the [`WireId`]
    pub wires: Vec<Wire>,
}

impl Schematic {
    /// Create an empty schematic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a component and return its identity.
    pub fn add(&mut self, component: impl Into<Component>) -> ComponentId {
        self.components.push(component.into());
        ComponentId(self.components.len() - 1)
    }

    /// Draw a wire and return its identity.
    pub fn add_wire(&mut self, wire: Wire) -> WireId {
        self.wires.push(wire);
        WireId(self.wires.len() - 1)
    }

    /// Draw an unlabeled wire between two points.
    pub fn wire(&mut self, a: Point, b: Point) -> WireId {
        self.add_wire(Wire::new(a, b))
    }

    /// Get a component by identity.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    /// Get a mutable component by identity.
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(id.0)
    }

    /// Find a component by name.
    pub fn find_component(&self, name: &str) -> Option<ComponentId> {
        self.components
            .iter()
            .position(|c| c.name() == name)
            .map(ComponentId)
    }

    /// Find a wire by label.
    pub fn find_wire(&self, label: &str) -> Option<WireId> {
        self.wires
            .iter()
            .position(|w| w.label.as_deref() == Some(label))
            .map(WireId)
    }

    /// Display name of a wire: its label, or its identity.
    pub fn wire_name(&self, id: WireId) -> String {
        self.wires
            .get(id.0)
            .and_then(|w| w.label.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Iterate components with their identities.
    pub fn iter_components(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.components
            .iter()
            .enumerate()
            .map(|(i, c)| (ComponentId(i), c))
    }

    /// Build a schematic from a parsed snapshot description.
    pub fn from_ast(ast: SchematicAst) -> Result<Self> {
        let mut schematic = Schematic::new();

        for def in ast.elements {
            match def.kind {
                ElementKind::Wire => {
                    let [a, b] = def.two_points()?;
                    let wire = Wire::new(a, b);
                    let wire = match def.name {
                        Some(name) => wire.labeled(name),
                        None => wire,
                    };
                    schematic.add_wire(wire);
                }
                _ => {
                    let component = def.into_component()?;
                    if schematic.find_component(component.name()).is_some() {
                        return Err(WirelabError::DuplicateComponent {
                            name: component.name().to_string(),
                        });
                    }
                    schematic.add(component);
                }
            }
        }

        Ok(schematic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Battery, Resistor};

    #[test]
    fn test_identities_are_indices() {
        let mut s = Schematic::new();
        let p = Point::new(0.0, 0.0);
        let q = Point::new(40.0, 0.0);
        let b = s.add(Battery::new("B1", p, q, 9.0));
        let r = s.add(Resistor::new("R1", p, q, 100.0));
        let w = s.add_wire(Wire::new(p, q).labeled("bus"));

        assert_eq!(b, ComponentId(0));
        assert_eq!(r, ComponentId(1));
        assert_eq!(s.find_component("R1"), Some(r));
        assert_eq!(s.find_wire("bus"), Some(w));
        assert_eq!(s.wire_name(w), "bus");
        assert_eq!(s.wire_name(WireId(7)), "W7");
    }

    #[test]
    fn test_from_ast_rejects_duplicate_names() {
        let ast = crate::dsl::parse("R R1 (0,0) (10,0) 1k\nR R1 (10,0) (20,0) 1k").unwrap();
        let err = Schematic::from_ast(ast).unwrap_err();
        assert!(matches!(err, WirelabError::DuplicateComponent { .. }));
    }
}
