//! WASM bindings for Wirelab Core.
//!
//! This module provides JavaScript-friendly bindings for browser-hosted
//! editors that tick the engine from their paint loop.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmSchematicSim } from 'wirelab_core';
//!
//! await init();
//!
//! const sim = new WasmSchematicSim(`
//!   BAT  B1 (0,40) (0,0) 9
//!   BULB L1 (0,0) (40,0) 12 rated=5
//!   WIRE    (40,0) (0,40)
//! `);
//!
//! function frame() {
//!   const shorted = sim.tick();
//!   lamp.glow = sim.component_lit("L1");
//!   requestAnimationFrame(frame);
//! }
//! ```

use wasm_bindgen::prelude::*;

use crate::dsl;
use crate::engine::{Engine, EngineConfig};
use crate::error::WirelabError;
use crate::schematic::{Schematic, WireId};
use crate::solver::{ComponentReading, ResultSet};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_error(err: WirelabError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-compatible schematic simulator.
///
/// Owns a snapshot parsed from the DSL, the engine and the last tick's
/// results.
#[wasm_bindgen]
pub struct WasmSchematicSim {
    schematic: Schematic,
    engine: Engine,
    results: ResultSet,
}

#[wasm_bindgen]
impl WasmSchematicSim {
    /// Create a new simulator from a schematic DSL string.
    #[wasm_bindgen(constructor)]
    pub fn new(schematic_dsl: &str) -> Result<WasmSchematicSim, JsValue> {
        Self::with_ground_substitution(schematic_dsl, false)
    }

    /// Create a new simulator, optionally letting an output port act as
    /// ground.
    #[wasm_bindgen]
    pub fn with_ground_substitution(
        schematic_dsl: &str,
        ground_substitution: bool,
    ) -> Result<WasmSchematicSim, JsValue> {
        let ast = dsl::parse(schematic_dsl).map_err(js_error)?;
        let grid = ast.grid.unwrap_or(1.0);
        let schematic = Schematic::from_ast(ast).map_err(js_error)?;
        crate::schematic::validate_schematic(&schematic).map_err(js_error)?;

        let config = EngineConfig::new()
            .with_grid(grid)
            .with_ground_substitution(ground_substitution);
        let results = ResultSet::empty(&schematic, Default::default());

        Ok(WasmSchematicSim {
            schematic,
            engine: Engine::new(config),
            results,
        })
    }

    /// Run one tick. Returns whether a short circuit was detected.
    #[wasm_bindgen]
    pub fn tick(&mut self) -> bool {
        self.results = self.engine.tick(&self.schematic);
        self.results.short_circuit
    }

    /// Flip a switch, push button or input port by name.
    ///
    /// Returns `false` if no such control exists.
    #[wasm_bindgen]
    pub fn toggle(&mut self, name: &str) -> bool {
        use crate::components::Component;

        let Some(id) = self.schematic.find_component(name) else {
            return false;
        };
        match self.schematic.component_mut(id) {
            Some(Component::SwitchLike(s)) => s.toggle(),
            Some(Component::InputPort(p)) => p.active = !p.active,
            _ => return false,
        }
        true
    }

    fn reading(&self, name: &str) -> Option<&ComponentReading> {
        self.results.component_by_name(&self.schematic, name)
    }

    /// Voltage across a named component, or `undefined`.
    #[wasm_bindgen]
    pub fn component_voltage(&self, name: &str) -> Option<f64> {
        self.reading(name).map(|r| r.voltage)
    }

    /// Current through a named component, or `undefined`.
    #[wasm_bindgen]
    pub fn component_current(&self, name: &str) -> Option<f64> {
        self.reading(name).map(|r| r.current)
    }

    /// Whether a named component is active (carrying current or driven).
    #[wasm_bindgen]
    pub fn component_active(&self, name: &str) -> bool {
        self.reading(name).map(|r| r.active).unwrap_or(false)
    }

    /// Whether a named light bulb is lit.
    #[wasm_bindgen]
    pub fn component_lit(&self, name: &str) -> bool {
        self.reading(name).map(|r| r.lit).unwrap_or(false)
    }

    /// Whether the wire at `index` carries a HIGH signal.
    #[wasm_bindgen]
    pub fn wire_powered(&self, index: usize) -> bool {
        self.results
            .wire(WireId(index))
            .map(|w| w.logic_powered)
            .unwrap_or(false)
    }

    /// Number of wires in the snapshot.
    #[wasm_bindgen(getter)]
    pub fn wire_count(&self) -> usize {
        self.schematic.wires.len()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
