//! Logic gates.

use crate::schematic::Point;

/// Boolean function of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    And,
    Or,
    Xor,
    Nand,
    Not,
}

impl GateKind {
    /// Parse a gate kind from a keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "XOR" => Some(Self::Xor),
            "NAND" => Some(Self::Nand),
            "NOT" | "INV" => Some(Self::Not),
            _ => None,
        }
    }

    /// Number of inputs the gate symbol has.
    pub fn input_count(self) -> usize {
        match self {
            GateKind::Not => 1,
            _ => 2,
        }
    }

    /// Apply the boolean function.
    ///
    /// Missing inputs read LOW. XOR is odd parity.
    pub fn evaluate(self, inputs: &[bool]) -> bool {
        let first = inputs.first().copied().unwrap_or(false);
        match self {
            GateKind::And => !inputs.is_empty() && inputs.iter().all(|&x| x),
            GateKind::Or => inputs.iter().any(|&x| x),
            GateKind::Xor => inputs.iter().filter(|&&x| x).count() % 2 == 1,
            GateKind::Nand => !(!inputs.is_empty() && inputs.iter().all(|&x| x)),
            GateKind::Not => !first,
        }
    }

    /// Short label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            GateKind::And => "AND gate",
            GateKind::Or => "OR gate",
            GateKind::Xor => "XOR gate",
            GateKind::Nand => "NAND gate",
            GateKind::Not => "NOT gate",
        }
    }
}

/// A logic gate with its input pins and single output pin.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicGate {
    pub name: String,
    pub kind: GateKind,
    pub inputs: Vec<Point>,
    pub output: Point,
}

impl LogicGate {
    /// Create a new logic gate.
    pub fn new(name: impl Into<String>, kind: GateKind, inputs: Vec<Point>, output: Point) -> Self {
        Self {
            name: name.into(),
            kind,
            inputs,
            output,
        }
    }

    /// Connection points: inputs first, then the output.
    pub fn terminals(&self) -> Vec<Point> {
        let mut points = self.inputs.clone();
        points.push(self.output);
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truth_tables() {
        let cases = [[false, false], [false, true], [true, false], [true, true]];
        let and: Vec<bool> = cases.iter().map(|c| GateKind::And.evaluate(c)).collect();
        let or: Vec<bool> = cases.iter().map(|c| GateKind::Or.evaluate(c)).collect();
        let xor: Vec<bool> = cases.iter().map(|c| GateKind::Xor.evaluate(c)).collect();
        let nand: Vec<bool> = cases.iter().map(|c| GateKind::Nand.evaluate(c)).collect();

        assert_eq!(and, [false, false, false, true]);
        assert_eq!(or, [false, true, true, true]);
        assert_eq!(xor, [false, true, true, false]);
        assert_eq!(nand, [true, true, true, false]);
        assert!(GateKind::Not.evaluate(&[false]));
        assert!(!GateKind::Not.evaluate(&[true]));
    }

    #[test]
    fn test_terminals_list_inputs_then_output() {
        let a = Point::new(0.0, 0.0);
        let out = Point::new(40.0, 10.0);
        let gate = LogicGate::new("U1", GateKind::Not, vec![a], out);
        assert_eq!(gate.terminals(), vec![a, out]);
    }
}
