use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::{blocking, pr_json};
use crate::error::{json_body, AppError};
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct CreatePullRequestBody {
    #[serde(default)]
    pub pull_request_id: String,
    #[serde(default)]
    pub pull_request_name: String,
    #[serde(default)]
    pub author_id: String,
}

/// POST /pullRequest/create: open a pull request and assign reviewers.
pub async fn create_pull_request(
    State(app): State<AppState>,
    payload: Result<Json<CreatePullRequestBody>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let body = json_body(payload)?;
    let svc = app.service.clone();
    let pr = blocking(move || {
        svc.create_pull_request(&body.pull_request_id, &body.pull_request_name, &body.author_id)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "pr": pr_json(&pr) })),
    ))
}

#[derive(serde::Deserialize)]
pub struct MergeBody {
    #[serde(default)]
    pub pull_request_id: String,
}

/// POST /pullRequest/merge: merge; repeating the call is a no-op.
pub async fn merge_pull_request(
    State(app): State<AppState>,
    payload: Result<Json<MergeBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let body = json_body(payload)?;
    let svc = app.service.clone();
    let pr = blocking(move || svc.merge_pull_request(&body.pull_request_id)).await?;
    Ok(Json(serde_json::json!({ "pr": pr_json(&pr) })))
}

#[derive(serde::Deserialize)]
pub struct ReassignBody {
    #[serde(default)]
    pub pull_request_id: String,
    #[serde(default)]
    pub old_user_id: String,
}

/// POST /pullRequest/reassign: swap one reviewer for a teammate.
pub async fn reassign_reviewer(
    State(app): State<AppState>,
    payload: Result<Json<ReassignBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let body = json_body(payload)?;
    let svc = app.service.clone();
    let outcome =
        blocking(move || svc.reassign_reviewer(&body.pull_request_id, &body.old_user_id)).await?;

    Ok(Json(serde_json::json!({
        "pr": pr_json(&outcome.pull_request),
        "replaced_by": outcome.replaced_by,
    })))
}
