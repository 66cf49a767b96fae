use axum::http::StatusCode;
use http_body_util::BodyExt;
use reviewer_core::assignment::AssignmentEngine;
use reviewer_core::store::RedbStore;
use reviewer_core::ReviewService;
use reviewer_server::state::AppState;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Router over a fresh database with a fixed-seed engine.
fn app(dir: &TempDir) -> axum::Router {
    let store = RedbStore::open(&dir.path().join("api.redb")).unwrap();
    let service = ReviewService::new(store, AssignmentEngine::seeded(17));
    reviewer_server::build_router(AppState::new(service))
}

async fn send(
    app: &axum::Router,
    req: axum::http::Request<axum::body::Body>,
) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    send(app, req).await
}

/// Send a POST request with a JSON body via `oneshot` and return (status, parsed JSON body).
async fn post_json(
    app: &axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, req).await
}

async fn add_backend(app: &axum::Router, extra: &[&str]) {
    let mut members = vec![
        serde_json::json!({ "user_id": "u1", "username": "Alice", "is_active": true }),
        serde_json::json!({ "user_id": "u2", "username": "Bob", "is_active": true }),
        serde_json::json!({ "user_id": "u3", "username": "Charlie", "is_active": true }),
    ];
    for id in extra {
        members.push(serde_json::json!({ "user_id": id, "username": id, "is_active": true }));
    }
    let (status, _) = post_json(
        app,
        "/team/add",
        serde_json::json!({ "team_name": "backend", "members": members }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

async fn create_pr(app: &axum::Router, id: &str, author: &str) -> (StatusCode, serde_json::Value) {
    post_json(
        app,
        "/pullRequest/create",
        serde_json::json!({
            "pull_request_id": id,
            "pull_request_name": format!("PR {id}"),
            "author_id": author,
        }),
    )
    .await
}

fn reviewers(json: &serde_json::Value) -> Vec<String> {
    json["pr"]["assigned_reviewers"]
        .as_array()
        .expect("assigned_reviewers array")
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Teams and users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_team_then_get_returns_roster() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    add_backend(&app, &[]).await;

    let (status, json) = get(&app, "/team/get?team_name=backend").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["team_name"], "backend");
    let members = json["members"].as_array().unwrap();
    assert_eq!(members.len(), 3);
    assert_eq!(members[0]["user_id"], "u1");
}

#[tokio::test]
async fn add_team_twice_is_team_exists() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    add_backend(&app, &[]).await;

    let (status, json) = post_json(
        &app,
        "/team/add",
        serde_json::json!({
            "team_name": "backend",
            "members": [{ "user_id": "u9", "username": "Zed", "is_active": true }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "TEAM_EXISTS");
}

#[tokio::test]
async fn add_team_without_members_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (status, json) = post_json(
        &app,
        "/team/add",
        serde_json::json!({ "team_name": "backend", "members": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/pullRequest/create")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, json) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn get_unknown_team_is_not_found() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (status, json) = get(&app, "/team/get?team_name=ghosts").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn get_team_without_name_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (status, _) = get(&app, "/team/get").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unparsable_query_is_json_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, json) = get(&app, "/team/get?team_name=a&team_name=b").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");

    let (status, json) = get(&app, "/users/getReview?user_id=u1&user_id=u2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn set_is_active_returns_user() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    add_backend(&app, &[]).await;

    let (status, json) = post_json(
        &app,
        "/users/setIsActive",
        serde_json::json!({ "user_id": "u2", "is_active": false }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["user_id"], "u2");
    assert_eq!(json["user"]["team_name"], "backend");
    assert_eq!(json["user"]["is_active"], false);
}

#[tokio::test]
async fn set_is_active_unknown_user_is_not_found() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (status, _) = post_json(
        &app,
        "/users/setIsActive",
        serde_json::json!({ "user_id": "ghost", "is_active": true }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Pull requests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_pr_assigns_two_reviewers() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    add_backend(&app, &[]).await;

    let (status, json) = create_pr(&app, "pr-1", "u1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["pr"]["status"], "OPEN");
    assert!(json["pr"].get("mergedAt").is_none());

    let mut assigned = reviewers(&json);
    assigned.sort();
    assert_eq!(assigned, vec!["u2", "u3"]);
}

#[tokio::test]
async fn create_pr_inactive_teammate_under_assigns() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    add_backend(&app, &[]).await;
    post_json(
        &app,
        "/users/setIsActive",
        serde_json::json!({ "user_id": "u3", "is_active": false }),
    )
    .await;

    let (status, json) = create_pr(&app, "pr-1", "u1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reviewers(&json), vec!["u2"]);
}

#[tokio::test]
async fn create_pr_duplicate_is_conflict() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    add_backend(&app, &[]).await;
    create_pr(&app, "pr-1", "u1").await;

    let (status, json) = create_pr(&app, "pr-1", "u2").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "PR_EXISTS");
}

#[tokio::test]
async fn create_pr_unknown_author_is_not_found() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (status, json) = create_pr(&app, "pr-1", "ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn create_pr_missing_field_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (status, json) = post_json(
        &app,
        "/pullRequest/create",
        serde_json::json!({ "pull_request_id": "pr-1", "author_id": "u1" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("pull_request_name"));
}

#[tokio::test]
async fn merge_twice_returns_same_timestamp() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    add_backend(&app, &[]).await;
    create_pr(&app, "pr-1", "u1").await;

    let body = serde_json::json!({ "pull_request_id": "pr-1" });
    let (status, first) = post_json(&app, "/pullRequest/merge", body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["pr"]["status"], "MERGED");
    assert!(first["pr"]["mergedAt"].is_string());

    let (status, second) = post_json(&app, "/pullRequest/merge", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["pr"]["status"], "MERGED");
    assert_eq!(second["pr"]["mergedAt"], first["pr"]["mergedAt"]);
}

#[tokio::test]
async fn merge_unknown_is_not_found() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (status, _) = post_json(
        &app,
        "/pullRequest/merge",
        serde_json::json!({ "pull_request_id": "pr-404" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reassign_replaces_reviewer_in_place() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    add_backend(&app, &["u4"]).await;
    let (_, created) = create_pr(&app, "pr-1", "u1").await;
    let before = reviewers(&created);
    let free = ["u2", "u3", "u4"]
        .into_iter()
        .find(|id| !before.iter().any(|r| r == id))
        .unwrap();

    let (status, json) = post_json(
        &app,
        "/pullRequest/reassign",
        serde_json::json!({ "pull_request_id": "pr-1", "old_user_id": before[0] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["replaced_by"], free);
    let after = reviewers(&json);
    assert_eq!(after[0], free);
    assert_eq!(after[1], before[1]);
}

#[tokio::test]
async fn reassign_with_exhausted_team_is_no_candidate() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    add_backend(&app, &[]).await;
    create_pr(&app, "pr-1", "u1").await;

    let (status, json) = post_json(
        &app,
        "/pullRequest/reassign",
        serde_json::json!({ "pull_request_id": "pr-1", "old_user_id": "u2" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "NO_CANDIDATE");
}

#[tokio::test]
async fn reassign_unassigned_is_not_assigned() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    add_backend(&app, &[]).await;
    create_pr(&app, "pr-1", "u1").await;

    let (status, json) = post_json(
        &app,
        "/pullRequest/reassign",
        serde_json::json!({ "pull_request_id": "pr-1", "old_user_id": "u1" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "NOT_ASSIGNED");
}

#[tokio::test]
async fn reassign_after_merge_is_pr_merged() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    add_backend(&app, &["u4"]).await;
    create_pr(&app, "pr-1", "u1").await;
    post_json(
        &app,
        "/pullRequest/merge",
        serde_json::json!({ "pull_request_id": "pr-1" }),
    )
    .await;

    let (status, json) = post_json(
        &app,
        "/pullRequest/reassign",
        serde_json::json!({ "pull_request_id": "pr-1", "old_user_id": "u2" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "PR_MERGED");
}

#[tokio::test]
async fn get_review_lists_pr_once() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    add_backend(&app, &[]).await;
    create_pr(&app, "pr-1", "u1").await;

    let (status, json) = get(&app, "/users/getReview?user_id=u2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user_id"], "u2");
    let prs = json["pull_requests"].as_array().unwrap();
    let hits = prs
        .iter()
        .filter(|p| p["pull_request_id"] == "pr-1")
        .count();
    assert_eq!(hits, 1);
    assert_eq!(prs[0]["status"], "OPEN");
}

#[tokio::test]
async fn get_review_for_unknown_user_is_empty() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (status, json) = get(&app, "/users/getReview?user_id=nobody").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["pull_requests"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn health_is_ok() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (status, json) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}
