//! Schematic validation.

use std::collections::HashSet;

use crate::components::Component;
use crate::error::{Result, WirelabError};

use super::Schematic;

/// Validate a schematic snapshot.
///
/// Checks:
/// - Component names are unique
/// - Resistances, voltages and rated powers are finite and non-negative
/// - Gates have the number of inputs their kind expects
/// - Every coordinate is finite
///
/// The engine itself tolerates all of these (values are floored and bad
/// elements simply fail to solve); validation is for hosts that want to
/// report problems up front.
pub fn validate_schematic(schematic: &Schematic) -> Result<()> {
    let mut names = HashSet::new();

    for component in &schematic.components {
        let name = component.name();
        if !names.insert(name) {
            return Err(WirelabError::DuplicateComponent {
                name: name.to_string(),
            });
        }

        if component.terminals().iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(WirelabError::invalid_parameter(
                name,
                "terminals",
                "coordinates must be finite",
            ));
        }

        match component {
            Component::Resistor(r) => non_negative(name, "resistance", r.resistance)?,
            Component::LightBulb(b) => {
                non_negative(name, "resistance", b.resistance)?;
                non_negative(name, "rated", b.rated_power)?;
            }
            Component::PowerUser(p) => {
                non_negative(name, "resistance", p.resistance)?;
                non_negative(name, "rated", p.rated_power)?;
            }
            Component::Battery(b) => {
                if !b.voltage.is_finite() {
                    return Err(WirelabError::invalid_parameter(name, "voltage", "must be finite"));
                }
                non_negative(name, "r", b.internal_resistance)?;
            }
            Component::LogicGate(g) => {
                if g.inputs.len() != g.kind.input_count() {
                    return Err(WirelabError::invalid_parameter(
                        name,
                        "inputs",
                        format!(
                            "{} expects {} inputs, got {}",
                            g.kind.label(),
                            g.kind.input_count(),
                            g.inputs.len()
                        ),
                    ));
                }
            }
            _ => {}
        }
    }

    for (i, wire) in schematic.wires.iter().enumerate() {
        if wire.ends.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(WirelabError::invalid_parameter(
                format!("W{}", i),
                "ends",
                "coordinates must be finite",
            ));
        }
    }

    Ok(())
}

fn non_negative(component: &str, param: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(WirelabError::invalid_parameter(
            component,
            param,
            format!("must be finite and non-negative, got {}", value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{GateKind, LogicGate, Resistor};
    use crate::schematic::Point;

    #[test]
    fn test_negative_resistance_rejected() {
        let mut s = Schematic::new();
        let p = Point::new(0.0, 0.0);
        s.add(Resistor::new("R1", p, p, -5.0));
        let err = validate_schematic(&s).unwrap_err();
        assert!(matches!(err, WirelabError::InvalidParameter { .. }));
    }

    #[test]
    fn test_gate_input_count_checked() {
        let mut s = Schematic::new();
        let p = Point::new(0.0, 0.0);
        s.add(LogicGate::new("U1", GateKind::And, vec![p], p));
        assert!(validate_schematic(&s).is_err());
    }

    #[test]
    fn test_valid_schematic_passes() {
        let mut s = Schematic::new();
        s.add(Resistor::new("R1", Point::new(0.0, 0.0), Point::new(1.0, 0.0), 10.0));
        s.wire(Point::new(1.0, 0.0), Point::new(2.0, 0.0));
        assert!(validate_schematic(&s).is_ok());
    }
}
