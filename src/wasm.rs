//! WASM bindings for VoltLab Core.
//!
//! Lets a browser-hosted schematic editor run the solver in-page.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { solve_netlist } from 'voltlab_core';
//!
//! await init();
//!
//! const report = solve_netlist(`
//!   voltage  V1 10
//!   resistor R1 100
//!   resistor R2 100
//!   wire V1.0 R1.0
//!   wire R1.1 R2.0
//!   wire R2.1 V1.1
//! `);
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::SubcircuitLibrary;
use crate::netlist;
use crate::solver;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Parse a netlist string, solve it, and return the formatted report.
///
/// Solve failures surface as JavaScript exceptions carrying the error
/// string verbatim; callers must not render partial results for them.
#[wasm_bindgen]
pub fn solve_netlist(source: &str) -> Result<String, JsValue> {
    let (components, wires) =
        netlist::parse(source).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let solution = solver::solve(&components, &wires, &SubcircuitLibrary::new())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(solution.to_string())
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
