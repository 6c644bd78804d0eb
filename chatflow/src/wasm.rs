//! WASM entry points for the flow editor.

use wasm_bindgen::prelude::*;

use crate::validate::{self, Diagnostic, ValidationResult};

/// Validate a chatflow JSON: parse + full validation.
/// Returns `{ valid, errors, warnings }`.
#[wasm_bindgen]
pub fn validate_chatflow(json: &str) -> JsValue {
    let result = validate_chatflow_inner(json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_chatflow_inner(json: &str) -> ValidationResult {
    match crate::model::parse(json) {
        Ok(flow) => validate::validate_chatflow(&flow),
        Err(e) => ValidationResult::rejected(e.to_string()),
    }
}

/// Validate one node JSON against a JSON array of the flow's node ids.
/// Returns `{ valid, errors, warnings }` for that node's config alone.
#[wasm_bindgen]
pub fn validate_chatflow_node(node_json: &str, node_ids_json: &str) -> JsValue {
    let result = validate_node_inner(node_json, node_ids_json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_node_inner(node_json: &str, node_ids_json: &str) -> ValidationResult {
    let node = match crate::model::parse_node(node_json) {
        Ok(n) => n,
        Err(e) => return ValidationResult::rejected(e.to_string()),
    };

    let ids = match serde_json::from_str::<Vec<String>>(node_ids_json) {
        Ok(ids) => ids,
        Err(e) => return ValidationResult::rejected(format!("Failed to parse node id list: {}", e)),
    };

    let diagnostics = validate::validate_node(&node, ids.iter().map(String::as_str));
    ValidationResult::from_diagnostics(&diagnostics)
}

/// Coded findings for a chatflow JSON, for editors that highlight nodes.
/// Returns `{ status: "ok", diagnostics }` or `{ status: "error", message }`.
#[wasm_bindgen]
pub fn chatflow_diagnostics(json: &str) -> JsValue {
    let result = diagnostics_inner(json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn diagnostics_inner(json: &str) -> DiagnosticsDto {
    match crate::model::parse(json) {
        Ok(flow) => DiagnosticsDto::Ok {
            diagnostics: validate::validate_diagnostics(&flow.nodes, &flow.edges),
        },
        Err(e) => DiagnosticsDto::Error {
            message: e.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(serde::Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum DiagnosticsDto {
    Ok { diagnostics: Vec<Diagnostic> },
    Error { message: String },
}
