pub mod health;
pub mod pull_requests;
pub mod teams;
pub mod users;

use reviewer_core::types::{PullRequest, Team, User};

use crate::error::AppError;

/// Run a synchronous service call on the blocking pool.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> reviewer_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let value = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(value)
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

pub(crate) fn team_json(team: &Team) -> serde_json::Value {
    let members: Vec<serde_json::Value> = team
        .members
        .iter()
        .map(|m| {
            serde_json::json!({
                "user_id": m.id,
                "username": m.username,
                "is_active": m.is_active,
            })
        })
        .collect();
    serde_json::json!({
        "team_name": team.name,
        "members": members,
    })
}

pub(crate) fn user_json(user: &User) -> serde_json::Value {
    serde_json::json!({
        "user_id": user.id,
        "username": user.username,
        "team_name": user.team_name,
        "is_active": user.is_active,
    })
}

pub(crate) fn pr_json(pr: &PullRequest) -> serde_json::Value {
    let mut value = serde_json::json!({
        "pull_request_id": pr.id,
        "pull_request_name": pr.name,
        "author_id": pr.author_id,
        "status": pr.status,
        "assigned_reviewers": pr.assigned_reviewers,
        "createdAt": pr.created_at,
    });
    if let Some(merged_at) = pr.merged_at {
        value["mergedAt"] = serde_json::json!(merged_at);
    }
    value
}

pub(crate) fn pr_short_json(pr: &PullRequest) -> serde_json::Value {
    serde_json::json!({
        "pull_request_id": pr.id,
        "pull_request_name": pr.name,
        "author_id": pr.author_id,
        "status": pr.status,
    })
}
