//! Transcript processing routes.
//!
//! The request body is validated by hand rather than with a typed extractor
//! so a malformed `input` comes back as a 400 with `{ "error": message }`
//! instead of an opaque rejection.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use braindump_core::{Error, ProcessOptions};
use braindump_extract::process_text;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/process", post(process))
        .route("/process/status", get(get_status))
}

async fn get_status() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "braindump",
    }))
}

async fn process(
    State(state): State<Arc<AppState>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return bad_request(Error::InvalidInput(format!("invalid JSON body: {rejection}")));
        }
    };

    let Some(input) = body.get("input").and_then(|v| v.as_str()) else {
        return bad_request(Error::InvalidInput("input must be a string".to_string()));
    };

    let mut options_value = body
        .get("options")
        .cloned()
        .unwrap_or_else(|| serde_json::json!({}));
    if let Some(map) = options_value.as_object_mut() {
        // The server default zone applies when the caller sends none.
        map.entry("timezone")
            .or_insert_with(|| serde_json::Value::String(state.config.default_timezone.clone()));
    }

    let options: ProcessOptions = match serde_json::from_value(options_value) {
        Ok(options) => options,
        Err(e) => return bad_request(Error::InvalidOptions(e.to_string())),
    };

    match process_text(input, &options, None).await {
        Ok(result) => (StatusCode::OK, Json(serde_json::json!(result))),
        // Every pipeline error is a request-shape failure.
        Err(e) => bad_request(e),
    }
}

fn bad_request(error: Error) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": error.to_string() })),
    )
}
