use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::state::AppState;

/// GET /health: 200 while the database answers.
pub async fn health(State(app): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let svc = app.service.clone();
    let result = tokio::task::spawn_blocking(move || svc.health()).await;
    match result {
        Ok(Ok(())) => (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))),
        Ok(Err(e)) => unhealthy(e.to_string()),
        Err(e) => unhealthy(format!("task join error: {e}")),
    }
}

fn unhealthy(message: String) -> (StatusCode, Json<serde_json::Value>) {
    tracing::warn!("health check failed: {message}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": { "code": "UNHEALTHY", "message": message }
        })),
    )
}
