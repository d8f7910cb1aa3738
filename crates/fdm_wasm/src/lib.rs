//! JavaScript bindings for `fdm_core`.
//!
//! Schemes cross the boundary as plain objects, e.g. `{ n: 2, m: 4, d: "c" }`
//! or `{ derivative: 2, accuracy: 4, direction: "central" }`.

mod payload;

pub use payload::{OperatorPayload, WeightPayload};

use anyhow::anyhow;
use fdm_core::{try_value, BigRational, Scheme};
use js_sys::Function;
use payload::{operator_payload, parse_boundary, weight_payload};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

fn parse_scheme(scheme: JsValue) -> Result<Scheme, JsValue> {
    if scheme.is_undefined() || scheme.is_null() {
        return Ok(Scheme::default());
    }
    from_value(scheme).map_err(|e| JsValue::from_str(&format!("Invalid scheme: {}", e)))
}

/// Exact weights of the narrowest stencil for `scheme`, one object per offset.
#[wasm_bindgen]
pub fn coefficients(scheme: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let scheme = parse_scheme(scheme)?;
    let weights = weight_payload(&scheme)
        .map_err(|e| JsValue::from_str(&format!("Coefficient solve failed: {:#}", e)))?;
    to_value(&weights).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// CSR arrays of the `grid_size × grid_size` operator on spacing `h`.
#[wasm_bindgen]
pub fn matrix(
    grid_size: u32,
    scheme: JsValue,
    h: f64,
    boundary: Option<String>,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let scheme = parse_scheme(scheme)?;
    let policy = parse_boundary(boundary.as_deref())
        .map_err(|e| JsValue::from_str(&format!("{}", e)))?;
    let operator = operator_payload(grid_size as usize, &scheme, h, policy)
        .map_err(|e| JsValue::from_str(&format!("Operator assembly failed: {:#}", e)))?;
    to_value(&operator).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Derivative of the JavaScript function `f` at `a`.
#[wasm_bindgen]
pub fn value(f: &Function, a: f64, scheme: JsValue, h: f64) -> Result<f64, JsValue> {
    console_error_panic_hook::set_once();
    let scheme = parse_scheme(scheme)?;
    let this = JsValue::NULL;
    let sample = |x: f64| -> anyhow::Result<f64> {
        let out = f
            .call1(&this, &JsValue::from_f64(x))
            .map_err(|err| anyhow!("function threw: {}", describe(&err)))?;
        out.as_f64()
            .ok_or_else(|| anyhow!("function returned a non-numeric value at {x}"))
    };
    try_value::<BigRational, f64, f64, _, _>(sample, a, &scheme, h)
        .map_err(|e| JsValue::from_str(&format!("Evaluation failed: {}", e)))
}

fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", err))
}
