//! Resistive loads and meters: Resistor, Light Bulb, Power User, Ammeter, Voltmeter.

use crate::schematic::Point;

/// A fixed resistor.
#[derive(Debug, Clone, PartialEq)]
pub struct Resistor {
    pub name: String,
    pub terminals: [Point; 2],
    /// Resistance in ohms
    pub resistance: f64,
}

impl Resistor {
    /// Create a new resistor.
    pub fn new(name: impl Into<String>, a: Point, b: Point, resistance: f64) -> Self {
        Self {
            name: name.into(),
            terminals: [a, b],
            resistance,
        }
    }
}

/// A light bulb.
///
/// The filament is a plain resistance for the tick. Burn-out is decided by the
/// host from the reported `overloaded` flag; a burnt bulb is an open circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct LightBulb {
    pub name: String,
    pub terminals: [Point; 2],
    /// Filament resistance in ohms
    pub resistance: f64,
    /// Power at full brightness, in watts
    pub rated_power: f64,
    /// Whether the filament has burnt out
    pub burnt: bool,
}

impl LightBulb {
    /// Create a new, intact light bulb.
    pub fn new(name: impl Into<String>, a: Point, b: Point, resistance: f64, rated_power: f64) -> Self {
        Self {
            name: name.into(),
            terminals: [a, b],
            resistance,
            rated_power,
            burnt: false,
        }
    }

    /// Mark the filament as burnt out.
    pub fn burnt_out(mut self) -> Self {
        self.burnt = true;
        self
    }
}

/// A constant-power load (motor, heater, appliance).
///
/// The host supplies the resistance to use for this tick; the engine reports
/// back the resistance that would draw exactly `rated_power` at the solved
/// voltage so the host can feed it into the next tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUser {
    pub name: String,
    pub terminals: [Point; 2],
    /// Resistance used for this tick, in ohms
    pub resistance: f64,
    /// Power the load tries to draw, in watts
    pub rated_power: f64,
}

impl PowerUser {
    /// Create a new power user.
    pub fn new(name: impl Into<String>, a: Point, b: Point, resistance: f64, rated_power: f64) -> Self {
        Self {
            name: name.into(),
            terminals: [a, b],
            resistance,
            rated_power,
        }
    }

    /// Resistance drawing the rated power at `voltage`, if both are positive.
    pub fn constant_power_resistance(&self, voltage: f64) -> Option<f64> {
        if self.rated_power > 0.0 && voltage.abs() > 0.0 {
            Some(voltage * voltage / self.rated_power)
        } else {
            None
        }
    }
}

/// An ammeter. Modeled as a near-zero series resistance.
#[derive(Debug, Clone, PartialEq)]
pub struct Ammeter {
    pub name: String,
    pub terminals: [Point; 2],
}

impl Ammeter {
    /// Create a new ammeter.
    pub fn new(name: impl Into<String>, a: Point, b: Point) -> Self {
        Self {
            name: name.into(),
            terminals: [a, b],
        }
    }
}

/// A voltmeter. Contributes no edge; it reads the difference between its two
/// terminal nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Voltmeter {
    pub name: String,
    pub terminals: [Point; 2],
}

impl Voltmeter {
    /// Create a new voltmeter.
    pub fn new(name: impl Into<String>, a: Point, b: Point) -> Self {
        Self {
            name: name.into(),
            terminals: [a, b],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_power_resistance() {
        let p = Point::new(0.0, 0.0);
        let load = PowerUser::new("M1", p, p, 10.0, 4.0);
        // 4 W at 8 V => 16 ohm
        assert_eq!(load.constant_power_resistance(8.0), Some(16.0));
        assert_eq!(load.constant_power_resistance(0.0), None);
    }

    #[test]
    fn test_bulb_burn_out() {
        let p = Point::new(0.0, 0.0);
        let bulb = LightBulb::new("L1", p, p, 12.0, 3.0);
        assert!(!bulb.burnt);
        assert!(bulb.burnt_out().burnt);
    }
}
