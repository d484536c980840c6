//! Static API description served at `/docs` and `/openapi.json`.

use serde_json::{json, Value};

pub const DOCS_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Churn MLOps API</title></head>
<body>
<h1>Churn MLOps API</h1>
<ul>
  <li><code>GET /health</code> - liveness and model status</li>
  <li><code>GET /</code> - service description</li>
  <li><code>POST /predict</code> - body <code>{"features": {"tenure": 5, "monthly_charges": 70.5}}</code>, returns <code>{"churn_pred": 0}</code></li>
</ul>
<p>Machine-readable description: <a href="/openapi.json">/openapi.json</a></p>
</body>
</html>
"#;

fn json_content(schema: Value) -> Value {
    json!({ "application/json": { "schema": schema } })
}

fn error_response(description: &str) -> Value {
    let schema = json!({
        "type": "object",
        "properties": { "detail": { "type": "string" } },
        "required": ["detail"]
    });
    json!({ "description": description, "content": json_content(schema) })
}

fn health_operation() -> Value {
    let schema = json!({
        "type": "object",
        "properties": {
            "status": { "type": "string" },
            "model_loaded": { "type": "boolean" },
            "model_uri": { "type": "string", "nullable": true }
        }
    });
    json!({
        "summary": "Health",
        "responses": {
            "200": { "description": "Service is alive", "content": json_content(schema) }
        }
    })
}

fn root_operation() -> Value {
    let schema = json!({
        "type": "object",
        "properties": {
            "message": { "type": "string" },
            "docs": { "type": "string" }
        }
    });
    json!({
        "summary": "Root",
        "responses": {
            "200": { "description": "Service description", "content": json_content(schema) }
        }
    })
}

fn predict_operation() -> Value {
    let scalar = json!({
        "oneOf": [{ "type": "number" }, { "type": "string" }, { "type": "boolean" }]
    });
    let request = json!({
        "type": "object",
        "properties": {
            "features": { "type": "object", "additionalProperties": scalar }
        },
        "required": ["features"]
    });
    let response = json!({
        "type": "object",
        "properties": { "churn_pred": { "type": "integer" } }
    });
    json!({
        "summary": "Predict",
        "requestBody": { "required": true, "content": json_content(request) },
        "responses": {
            "200": { "description": "Predicted class", "content": json_content(response) },
            "400": error_response("Features rejected by the model"),
            "422": error_response("Malformed request body"),
            "500": error_response("Model not loaded or inference failure")
        }
    })
}

pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": { "title": "Churn MLOps API", "version": env!("CARGO_PKG_VERSION") },
        "paths": {
            "/": { "get": root_operation() },
            "/health": { "get": health_operation() },
            "/predict": { "post": predict_operation() }
        }
    })
}
