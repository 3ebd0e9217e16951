//! Sources and reference points: Battery, Ground, input and output ports.

use crate::schematic::Point;

/// A battery.
///
/// Modeled as an ideal source in series with its internal resistance. The
/// terminals are `[negative, positive]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Battery {
    pub name: String,
    pub terminals: [Point; 2],
    /// Open-circuit voltage in volts
    pub voltage: f64,
    /// Internal series resistance in ohms
    pub internal_resistance: f64,
}

impl Battery {
    /// Default internal resistance in ohms.
    pub const DEFAULT_INTERNAL_RESISTANCE: f64 = 0.1;

    /// Create a new battery with the default internal resistance.
    pub fn new(name: impl Into<String>, negative: Point, positive: Point, voltage: f64) -> Self {
        Self {
            name: name.into(),
            terminals: [negative, positive],
            voltage,
            internal_resistance: Self::DEFAULT_INTERNAL_RESISTANCE,
        }
    }

    /// Set the internal resistance.
    pub fn with_internal_resistance(mut self, ohms: f64) -> Self {
        self.internal_resistance = ohms;
        self
    }

    /// Negative terminal.
    pub fn negative(&self) -> Point {
        self.terminals[0]
    }

    /// Positive terminal.
    pub fn positive(&self) -> Point {
        self.terminals[1]
    }
}

/// A ground symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Ground {
    pub name: String,
    pub point: Point,
}

impl Ground {
    /// Create a new ground symbol.
    pub fn new(name: impl Into<String>, point: Point) -> Self {
        Self {
            name: name.into(),
            point,
        }
    }
}

/// Origin of a digital input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPortKind {
    /// Toggleable logic source placed on the sheet
    #[default]
    Toggle,
    /// Input pin of an expanded custom component
    Custom,
}

impl InputPortKind {
    /// Short label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            InputPortKind::Toggle => "toggle source",
            InputPortKind::Custom => "input port",
        }
    }
}

/// A digital input: drives its point HIGH while active.
#[derive(Debug, Clone, PartialEq)]
pub struct InputPort {
    pub name: String,
    pub kind: InputPortKind,
    pub point: Point,
    pub active: bool,
}

impl InputPort {
    /// Create a new input port.
    pub fn new(name: impl Into<String>, kind: InputPortKind, point: Point, active: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            point,
            active,
        }
    }
}

/// An output pin of a custom component. Lights up when its line is driven.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPort {
    pub name: String,
    pub point: Point,
}

impl OutputPort {
    /// Create a new output port.
    pub fn new(name: impl Into<String>, point: Point) -> Self {
        Self {
            name: name.into(),
            point,
        }
    }
}
