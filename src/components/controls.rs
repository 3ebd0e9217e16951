//! Control components: switches and push buttons.

use crate::schematic::Point;

/// Flavor of a switch-like element. All flavors conduct the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchKind {
    /// Latching toggle switch
    #[default]
    Switch,
    /// Momentary push button
    PushButton,
}

impl SwitchKind {
    /// Short label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            SwitchKind::Switch => "switch",
            SwitchKind::PushButton => "push button",
        }
    }
}

/// A switch-like component.
///
/// Closed: a near-zero resistance edge.
/// Open: no edge at all.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchLike {
    pub name: String,
    pub kind: SwitchKind,
    pub terminals: [Point; 2],
    pub closed: bool,
}

impl SwitchLike {
    /// Create a new switch-like element.
    pub fn new(name: impl Into<String>, kind: SwitchKind, a: Point, b: Point, closed: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            terminals: [a, b],
            closed,
        }
    }

    /// Set the switch state.
    pub fn set_state(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// Toggle the switch state.
    pub fn toggle(&mut self) {
        self.closed = !self.closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let p = Point::new(0.0, 0.0);
        let mut sw = SwitchLike::new("S1", SwitchKind::Switch, p, p, false);
        sw.toggle();
        assert!(sw.closed);
        sw.set_state(false);
        assert!(!sw.closed);
    }
}
