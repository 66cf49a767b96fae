pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use reviewer_core::config::Config;
use reviewer_core::store::RedbStore;
use reviewer_core::ReviewService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Teams
        .route("/team/add", post(routes::teams::create_team))
        .route("/team/get", get(routes::teams::get_team))
        // Users
        .route("/users/setIsActive", post(routes::users::set_is_active))
        .route("/users/getReview", get(routes::users::get_review))
        // Pull requests
        .route(
            "/pullRequest/create",
            post(routes::pull_requests::create_pull_request),
        )
        .route(
            "/pullRequest/merge",
            post(routes::pull_requests::merge_pull_request),
        )
        .route(
            "/pullRequest/reassign",
            post(routes::pull_requests::reassign_reviewer),
        )
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Open the database named in `config` and wire the service to it.
pub fn app_state(config: &Config) -> anyhow::Result<AppState> {
    let store = RedbStore::open(&config.storage.path)?;
    let service = ReviewService::from_config(store, &config.assignment);
    Ok(AppState::new(service))
}

/// Start the API server on `config.http.port`.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", config.http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(config, listener).await
}

/// Start the API server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(config: Config, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(app_state(&config)?);

    tracing::info!(
        storage = %config.storage.path.display(),
        "reviewer API listening on http://localhost:{actual_port}"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("reviewer API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
