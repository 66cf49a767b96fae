use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;

use super::{blocking, pr_short_json, user_json};
use crate::error::{json_body, query_params, AppError};
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct SetActiveBody {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub is_active: bool,
}

/// POST /users/setIsActive: toggle a user's active flag.
pub async fn set_is_active(
    State(app): State<AppState>,
    payload: Result<Json<SetActiveBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let body = json_body(payload)?;
    let svc = app.service.clone();
    let user = blocking(move || svc.set_user_active(&body.user_id, body.is_active)).await?;
    Ok(Json(serde_json::json!({ "user": user_json(&user) })))
}

#[derive(serde::Deserialize)]
pub struct ReviewsQuery {
    #[serde(default)]
    pub user_id: String,
}

/// GET /users/getReview?user_id=: pull requests the user is reviewing.
pub async fn get_review(
    State(app): State<AppState>,
    params: Result<Query<ReviewsQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let params = query_params(params)?;
    let svc = app.service.clone();
    let user_id = params.user_id.clone();
    let prs = blocking(move || svc.list_user_reviews(&user_id)).await?;

    let list: Vec<serde_json::Value> = prs.iter().map(pr_short_json).collect();
    Ok(Json(serde_json::json!({
        "user_id": params.user_id,
        "pull_requests": list,
    })))
}
