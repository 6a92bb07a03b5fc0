//! WASM bindings for Petri Sketch.
//!
//! This module provides JavaScript-friendly bindings for sketching nets in
//! a browser, for example in a live editor that checks a sketch against a
//! reference net as the user types.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmNetSketch } from 'petri_sketch';
//!
//! await init();
//!
//! const sketch = new WasmNetSketch("model");
//! sketch.add_fragment("I -> {a__1 0.4} -> F");
//! sketch.add_fragment("I -> {a__2 0.6} -> F");
//!
//! const expected = new WasmNetSketch("expected");
//! expected.add_fragments(referenceText);
//! console.log(sketch.equals(expected));
//! ```

use wasm_bindgen::prelude::*;

use crate::compare;
use crate::error::SketchError;
use crate::session::Session;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(error: SketchError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// WASM-compatible sketching session.
///
/// Wraps a native [`Session`]; every fragment added extends the same net.
#[wasm_bindgen]
pub struct WasmNetSketch {
    session: Session,
}

#[wasm_bindgen]
impl WasmNetSketch {
    /// Start an empty net.
    #[wasm_bindgen(constructor)]
    pub fn new(label: &str) -> WasmNetSketch {
        WasmNetSketch {
            session: Session::new(label),
        }
    }

    /// Add one fragment. A failing fragment leaves the net unchanged.
    #[wasm_bindgen]
    pub fn add_fragment(&mut self, fragment: &str) -> Result<(), JsValue> {
        self.session.add_fragment(fragment).map(|_| ()).map_err(to_js)
    }

    /// Add every fragment line of `text`, skipping blank and `#` lines.
    #[wasm_bindgen]
    pub fn add_fragments(&mut self, text: &str) -> Result<(), JsValue> {
        self.session.add_fragments(text).map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn place_count(&self) -> usize {
        self.session.net().place_count()
    }

    #[wasm_bindgen(getter)]
    pub fn transition_count(&self) -> usize {
        self.session.net().transition_count()
    }

    #[wasm_bindgen(getter)]
    pub fn arc_count(&self) -> usize {
        self.session.net().arc_count()
    }

    /// Structural equality, tolerant of repeated transition labels.
    #[wasm_bindgen]
    pub fn equals(&self, other: &WasmNetSketch) -> Result<bool, JsValue> {
        compare::equal_with_dupes(
            self.session.net(),
            other.session.net(),
            self.session.identities(),
            other.session.identities(),
        )
        .map_err(to_js)
    }

    /// Human-readable listing of places, transitions and arcs.
    #[wasm_bindgen]
    pub fn describe(&self) -> String {
        self.session.net().to_string()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
