//! Abstract Syntax Tree types for the schematic DSL.

use std::collections::HashMap;

use crate::components::{
    Ammeter, Battery, Component, GateKind, Ground, InputPort, InputPortKind, LightBulb, LogicGate,
    OutputPort, PowerUser, Resistor, SwitchKind, SwitchLike, Voltmeter,
};
use crate::error::{Result, WirelabError};
use crate::schematic::Point;

/// Complete AST representation of a parsed snapshot.
#[derive(Debug, Clone, Default)]
pub struct SchematicAst {
    /// Snapping grid requested by a `.grid` directive
    pub grid: Option<f64>,
    /// Elements in file order
    pub elements: Vec<ElementDef>,
}

/// One element line.
#[derive(Debug, Clone)]
pub struct ElementDef {
    pub kind: ElementKind,
    /// Component name, or optional wire label
    pub name: Option<String>,
    /// Connection points in terminal order
    pub points: Vec<Point>,
    /// Main value (resistance, voltage)
    pub value: Option<f64>,
    /// `key=value` parameters, keys lowercased
    pub params: HashMap<String, f64>,
    /// Source line number for error reporting
    pub line: usize,
}

/// Element kinds supported by the DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Battery,
    Resistor,
    LightBulb,
    PowerUser,
    Ammeter,
    Voltmeter,
    Switch,
    PushButton,
    Ground,
    /// Toggle source
    Toggle,
    /// Custom-component input port
    PortIn,
    PortOut,
    Gate(GateKind),
    Wire,
}

impl ElementKind {
    /// Parse an element kind from its keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let kind = match keyword.to_ascii_uppercase().as_str() {
            "BAT" | "BATTERY" => Self::Battery,
            "R" => Self::Resistor,
            "BULB" => Self::LightBulb,
            "LOAD" => Self::PowerUser,
            "AM" => Self::Ammeter,
            "VM" => Self::Voltmeter,
            "SW" => Self::Switch,
            "BTN" => Self::PushButton,
            "GND" => Self::Ground,
            "IN" => Self::Toggle,
            "PORTIN" => Self::PortIn,
            "OUT" => Self::PortOut,
            "WIRE" => Self::Wire,
            other => Self::Gate(GateKind::from_keyword(other)?),
        };
        Some(kind)
    }

    /// Number of connection points the element takes.
    pub fn point_count(self) -> usize {
        match self {
            Self::Ground | Self::Toggle | Self::PortIn | Self::PortOut => 1,
            Self::Gate(kind) => kind.input_count() + 1,
            _ => 2,
        }
    }

    /// Whether the element needs a main value.
    pub fn takes_value(self) -> bool {
        matches!(
            self,
            Self::Battery | Self::Resistor | Self::LightBulb | Self::PowerUser
        )
    }
}

impl ElementDef {
    fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| format!("{:?}", self.kind))
    }

    fn param(&self, key: &str) -> Option<f64> {
        self.params.get(key).copied()
    }

    fn flag(&self, key: &str) -> bool {
        self.param(key).map(|v| v != 0.0).unwrap_or(false)
    }

    fn required_value(&self) -> Result<f64> {
        self.value
            .ok_or_else(|| WirelabError::invalid_element(self.label(), self.line, "missing value"))
    }

    /// The two endpoints of a two-terminal element.
    pub fn two_points(&self) -> Result<[Point; 2]> {
        match self.points.as_slice() {
            [a, b] => Ok([*a, *b]),
            points => Err(WirelabError::invalid_element(
                self.label(),
                self.line,
                format!("expected 2 points, got {}", points.len()),
            )),
        }
    }

    /// Turn a non-wire element into a placed component.
    pub fn into_component(self) -> Result<Component> {
        let expected = self.kind.point_count();
        if self.points.len() != expected {
            return Err(WirelabError::invalid_element(
                self.label(),
                self.line,
                format!("expected {} points, got {}", expected, self.points.len()),
            ));
        }

        let name = self
            .name
            .clone()
            .ok_or_else(|| WirelabError::invalid_element(self.label(), self.line, "missing name"))?;
        let pts = &self.points;

        let component: Component = match self.kind {
            ElementKind::Battery => {
                let battery = Battery::new(name, pts[0], pts[1], self.required_value()?);
                match self.param("r") {
                    Some(r) => battery.with_internal_resistance(r).into(),
                    None => battery.into(),
                }
            }
            ElementKind::Resistor => Resistor::new(name, pts[0], pts[1], self.required_value()?).into(),
            ElementKind::LightBulb => {
                let rated = self.param("rated").unwrap_or(0.0);
                let bulb = LightBulb::new(name, pts[0], pts[1], self.required_value()?, rated);
                if self.flag("burnt") {
                    bulb.burnt_out().into()
                } else {
                    bulb.into()
                }
            }
            ElementKind::PowerUser => {
                let rated = self.param("rated").unwrap_or(0.0);
                PowerUser::new(name, pts[0], pts[1], self.required_value()?, rated).into()
            }
            ElementKind::Ammeter => Ammeter::new(name, pts[0], pts[1]).into(),
            ElementKind::Voltmeter => Voltmeter::new(name, pts[0], pts[1]).into(),
            ElementKind::Switch => {
                SwitchLike::new(name, SwitchKind::Switch, pts[0], pts[1], self.flag("closed")).into()
            }
            ElementKind::PushButton => {
                SwitchLike::new(name, SwitchKind::PushButton, pts[0], pts[1], self.flag("closed")).into()
            }
            ElementKind::Ground => Ground::new(name, pts[0]).into(),
            ElementKind::Toggle => {
                InputPort::new(name, InputPortKind::Toggle, pts[0], self.flag("active")).into()
            }
            ElementKind::PortIn => {
                InputPort::new(name, InputPortKind::Custom, pts[0], self.flag("active")).into()
            }
            ElementKind::PortOut => OutputPort::new(name, pts[0]).into(),
            ElementKind::Gate(kind) => {
                let Some((output, inputs)) = pts.split_last() else {
                    return Err(WirelabError::invalid_element(name, self.line, "gate has no points"));
                };
                LogicGate::new(name, kind, inputs.to_vec(), *output).into()
            }
            ElementKind::Wire => {
                return Err(WirelabError::invalid_element(
                    self.label(),
                    self.line,
                    "a wire is not a component",
                ))
            }
        };

        Ok(component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(ElementKind::from_keyword("bat"), Some(ElementKind::Battery));
        assert_eq!(ElementKind::from_keyword("NAND"), Some(ElementKind::Gate(GateKind::Nand)));
        assert_eq!(ElementKind::from_keyword("CAP"), None);
        assert_eq!(ElementKind::Gate(GateKind::Not).point_count(), 2);
        assert_eq!(ElementKind::Gate(GateKind::Xor).point_count(), 3);
    }
}
