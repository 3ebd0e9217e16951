//! Placed component kinds.
//!
//! This module provides models for every component the editor can place:
//! - Loads: Resistor, Light Bulb, Power User
//! - Meters: Ammeter, Voltmeter
//! - Sources and references: Battery, Ground
//! - Controls: Switch-like elements (switches, push buttons)
//! - Digital: Logic gates, input ports (toggle sources, custom inputs), output ports
//!
//! The set of kinds is closed; graph building and result writing match on
//! [`Component`] directly.

mod controls;
mod logic;
mod passive;
mod sources;

pub use controls::{SwitchKind, SwitchLike};
pub use logic::{GateKind, LogicGate};
pub use passive::{Ammeter, LightBulb, PowerUser, Resistor, Voltmeter};
pub use sources::{Battery, Ground, InputPort, InputPortKind, OutputPort};

use crate::schematic::Point;

/// A placed circuit component.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Resistor(Resistor),
    LightBulb(LightBulb),
    PowerUser(PowerUser),
    Ammeter(Ammeter),
    Voltmeter(Voltmeter),
    Battery(Battery),
    Ground(Ground),
    SwitchLike(SwitchLike),
    LogicGate(LogicGate),
    InputPort(InputPort),
    OutputPort(OutputPort),
}

impl Component {
    /// Get the component name.
    pub fn name(&self) -> &str {
        match self {
            Component::Resistor(r) => &r.name,
            Component::LightBulb(b) => &b.name,
            Component::PowerUser(p) => &p.name,
            Component::Ammeter(a) => &a.name,
            Component::Voltmeter(v) => &v.name,
            Component::Battery(b) => &b.name,
            Component::Ground(g) => &g.name,
            Component::SwitchLike(s) => &s.name,
            Component::LogicGate(g) => &g.name,
            Component::InputPort(p) => &p.name,
            Component::OutputPort(p) => &p.name,
        }
    }

    /// Short human-readable kind label.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Component::Resistor(_) => "resistor",
            Component::LightBulb(_) => "light bulb",
            Component::PowerUser(_) => "power user",
            Component::Ammeter(_) => "ammeter",
            Component::Voltmeter(_) => "voltmeter",
            Component::Battery(_) => "battery",
            Component::Ground(_) => "ground",
            Component::SwitchLike(s) => s.kind.label(),
            Component::LogicGate(g) => g.kind.label(),
            Component::InputPort(p) => p.kind.label(),
            Component::OutputPort(_) => "output port",
        }
    }

    /// World-space connection points, in terminal order.
    pub fn terminals(&self) -> Vec<Point> {
        match self {
            Component::Resistor(r) => r.terminals.to_vec(),
            Component::LightBulb(b) => b.terminals.to_vec(),
            Component::PowerUser(p) => p.terminals.to_vec(),
            Component::Ammeter(a) => a.terminals.to_vec(),
            Component::Voltmeter(v) => v.terminals.to_vec(),
            Component::Battery(b) => b.terminals.to_vec(),
            Component::Ground(g) => vec![g.point],
            Component::SwitchLike(s) => s.terminals.to_vec(),
            Component::LogicGate(g) => g.terminals(),
            Component::InputPort(p) => vec![p.point],
            Component::OutputPort(p) => vec![p.point],
        }
    }

    /// Number of connection points.
    pub fn terminal_count(&self) -> usize {
        match self {
            Component::Ground(_) | Component::InputPort(_) | Component::OutputPort(_) => 1,
            Component::LogicGate(g) => g.inputs.len() + 1,
            _ => 2,
        }
    }
}

macro_rules! impl_into_component {
    ($($kind:ident),* $(,)?) => {
        $(
            impl From<$kind> for Component {
                fn from(value: $kind) -> Self {
                    Component::$kind(value)
                }
            }
        )*
    };
}

impl_into_component!(
    Resistor, LightBulb, PowerUser, Ammeter, Voltmeter, Battery, Ground, SwitchLike, LogicGate,
    InputPort, OutputPort,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_counts_match_terminals() {
        let p = Point::new(0.0, 0.0);
        let q = Point::new(40.0, 0.0);
        let parts: Vec<Component> = vec![
            Resistor::new("R1", p, q, 100.0).into(),
            Ground::new("G1", p).into(),
            LogicGate::new("U1", GateKind::And, vec![p, q], Point::new(20.0, 20.0)).into(),
            LogicGate::new("U2", GateKind::Not, vec![p], q).into(),
        ];
        for part in &parts {
            assert_eq!(part.terminals().len(), part.terminal_count(), "{}", part.name());
        }
    }

    #[test]
    fn test_kind_labels() {
        let p = Point::new(0.0, 0.0);
        let sw: Component = SwitchLike::new("S1", SwitchKind::PushButton, p, p, false).into();
        assert_eq!(sw.kind_label(), "push button");
        let port: Component = InputPort::new("T1", InputPortKind::Toggle, p, true).into();
        assert_eq!(port.kind_label(), "toggle source");
    }
}
