//! HTTP request handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Uri},
    response::{Html, IntoResponse},
    Json,
};
use ndarray::Array2;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::artifacts::Metadata;
use crate::training::ModelMetrics;
use crate::DECISION_THRESHOLD;

use super::error::{Result, ServerError};
use super::state::AppState;

const MODEL_NAME: &str = "logistic_regression";
const APP_JS: &str = include_str!("../../static/app.js");

// ============================================================================
// Prediction
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub win_probability: f64,
    pub prediction: u8,
    pub threshold: f64,
    pub metadata: PredictMetadata,
}

#[derive(Debug, Serialize)]
pub struct PredictMetadata {
    pub model: &'static str,
    pub metrics: ModelMetrics,
}

/// The body is parsed as JSON whatever the content type says.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PredictResponse>> {
    let payload = parse_payload(&body)?;
    let row = prepare_features(&payload, state.feature_order())?;

    let proba = state.pipeline.predict_proba(&row)?;
    let win_probability = proba
        .first()
        .copied()
        .ok_or_else(|| ServerError::Internal("Pipeline returned no probability".to_string()))?;
    let prediction = u8::from(win_probability >= DECISION_THRESHOLD);

    debug!(win_probability, prediction, "Prediction served");

    Ok(Json(PredictResponse {
        win_probability,
        prediction,
        threshold: DECISION_THRESHOLD,
        metadata: PredictMetadata {
            model: MODEL_NAME,
            metrics: state.metadata.test_metrics,
        },
    }))
}

/// Empty bodies and `null` count as an empty object.
fn parse_payload(body: &[u8]) -> Result<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| ServerError::BadRequest("Request body must be valid JSON.".to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(ServerError::BadRequest(
            "Request body must be a JSON object mapping feature names to values.".to_string(),
        )),
    }
}

/// Build a single-row matrix in canonical feature order.
pub fn prepare_features(payload: &Map<String, Value>, feature_order: &[String]) -> Result<Array2<f64>> {
    let missing: Vec<&str> = feature_order
        .iter()
        .map(String::as_str)
        .filter(|name| !payload.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(ServerError::BadRequest(format!(
            "Missing required features: {:?}",
            missing
        )));
    }

    let values = feature_order
        .iter()
        .map(|name| payload.get(name).and_then(coerce_numeric))
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| ServerError::BadRequest("All feature values must be numeric.".to_string()))?;

    Array2::from_shape_vec((1, feature_order.len()), values)
        .map_err(|e| ServerError::Internal(format!("Invalid feature row: {}", e)))
}

/// Numbers, booleans and numeric strings are accepted; non-finite values are not.
fn coerce_numeric(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    v.is_finite().then_some(v)
}

// ============================================================================
// Health / UI
// ============================================================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "features": state.feature_order(),
    }))
}

pub async fn serve_index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.index_html().to_string())
}

pub async fn serve_app_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript; charset=utf-8")], APP_JS)
}

pub async fn handle_404(uri: Uri) -> ServerError {
    ServerError::NotFound(uri.path().to_string())
}

pub async fn handle_405() -> ServerError {
    ServerError::MethodNotAllowed
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the index page once; the metadata never changes while serving.
pub fn render_index(metadata: &Metadata) -> String {
    let inputs: String = metadata
        .feature_order
        .iter()
        .map(|name| {
            let name = escape_html(name);
            format!(
                r#"<label class="field"><span>{name}</span><input type="number" step="any" name="{name}" required></label>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n            ");

    let list: String = metadata
        .feature_order
        .iter()
        .map(|name| format!("<li><code>{}</code></li>", escape_html(name)))
        .collect();

    let order_json = serde_json::to_string(&metadata.feature_order)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/");

    INDEX_TEMPLATE
        .replace("{{FEATURE_INPUTS}}", &inputs)
        .replace("{{FEATURE_LIST}}", &list)
        .replace("{{FEATURE_ORDER_JSON}}", &order_json)
        .replace("{{TARGET}}", &escape_html(&metadata.target))
        .replace("{{ACCURACY}}", &format!("{:.3}", metadata.test_metrics.accuracy))
        .replace("{{ROC_AUC}}", &format!("{:.3}", metadata.test_metrics.roc_auc))
}

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>LoL Win Predictor</title>
    <style>
        body { font-family: system-ui, sans-serif; background: #111827; color: #f3f4f6; margin: 0; }
        header { background: #1f2937; padding: 1rem 1.5rem; border-bottom: 1px solid #374151; }
        main { display: grid; grid-template-columns: 2fr 1fr; gap: 1.5rem; padding: 1.5rem; }
        section { background: #1f2937; border-radius: 8px; padding: 1.25rem; }
        .field { display: flex; justify-content: space-between; margin: 0.4rem 0; }
        .field input { width: 10rem; background: #374151; color: inherit; border: 0; border-radius: 4px; padding: 0.3rem; }
        button { background: #2563eb; color: white; border: 0; border-radius: 4px; padding: 0.5rem 1rem; margin-top: 0.75rem; cursor: pointer; }
        button.secondary { background: #4b5563; }
        .metric { font-size: 1.4rem; font-weight: bold; }
        .error { color: #f87171; }
    </style>
</head>
<body>
    <header><h1>League of Legends Win Predictor</h1></header>
    <main>
        <section>
            <h2>Match statistics</h2>
            <form id="predict-form">
            {{FEATURE_INPUTS}}
            <button type="submit">Predict outcome</button>
            <button type="button" id="prefill-btn" class="secondary">Random sample</button>
            </form>
        </section>
        <section>
            <h2>Result</h2>
            <p id="result-placeholder">Fill in the statistics and submit.</p>
            <div id="result-view" hidden>
                <div>Win probability: <span id="probability-text" class="metric"></span></div>
                <div>Prediction: <span id="prediction-text" class="metric"></span></div>
            </div>
            <p id="error-view" class="error" hidden></p>
            <h2>Model</h2>
            <p>Logistic Regression predicting <code>{{TARGET}}</code></p>
            <p>Validation accuracy: <span class="metric">{{ACCURACY}}</span></p>
            <p>Validation ROC-AUC: <span class="metric">{{ROC_AUC}}</span></p>
            <h3>Features</h3>
            <ul>{{FEATURE_LIST}}</ul>
        </section>
    </main>
    <script>window.__FEATURE_ORDER__ = {{FEATURE_ORDER_JSON}};</script>
    <script src="/static/app.js"></script>
</body>
</html>
"#;
