use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use reviewer_core::types::Team;

use super::{blocking, team_json};
use crate::error::{json_body, query_params, AppError};
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct TeamMemberBody {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(serde::Deserialize)]
pub struct CreateTeamBody {
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub members: Vec<TeamMemberBody>,
}

impl CreateTeamBody {
    fn into_team(self) -> Team {
        self.members
            .into_iter()
            .fold(Team::new(self.team_name), |team, m| {
                team.with_member(m.user_id, m.username, m.is_active)
            })
    }
}

/// POST /team/add: create a team and upsert its members.
pub async fn create_team(
    State(app): State<AppState>,
    payload: Result<Json<CreateTeamBody>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let team = json_body(payload)?.into_team();
    let svc = app.service.clone();
    let created = blocking(move || svc.create_team(team)).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "team": team_json(&created) })),
    ))
}

#[derive(serde::Deserialize)]
pub struct TeamQuery {
    #[serde(default)]
    pub team_name: String,
}

/// GET /team/get?team_name=: team with its roster.
pub async fn get_team(
    State(app): State<AppState>,
    params: Result<Query<TeamQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let params = query_params(params)?;
    let svc = app.service.clone();
    let team = blocking(move || svc.get_team(&params.team_name)).await?;
    Ok(Json(team_json(&team)))
}
