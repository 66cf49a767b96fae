use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reviewer_core::error::ReviewerError;

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
///
/// Body shape: `{"error": {"code": "...", "message": "..."}}`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(ReviewerError::InvalidInput(msg.into()).into())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        let Some(e) = self.0.downcast_ref::<ReviewerError>() else {
            return (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL");
        };
        let status = match e {
            ReviewerError::TeamNotFound(_)
            | ReviewerError::UserNotFound(_)
            | ReviewerError::PullRequestNotFound(_) => StatusCode::NOT_FOUND,
            ReviewerError::TeamExists(_) | ReviewerError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            ReviewerError::PullRequestExists(_)
            | ReviewerError::PrMerged(_)
            | ReviewerError::ReviewerNotAssigned { .. }
            | ReviewerError::NoReplacementAvailable(_) => StatusCode::CONFLICT,
            ReviewerError::Storage(_)
            | ReviewerError::Io(_)
            | ReviewerError::Yaml(_)
            | ReviewerError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, e.code())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {:#}", self.0);
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };
        let body = serde_json::json!({
            "error": { "code": code, "message": message }
        });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Unwrap a JSON body, turning extractor rejections into 400s.
pub fn json_body<T>(payload: Result<axum::Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(axum::Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!("rejected request body: {rejection}");
            Err(AppError::bad_request("invalid request body"))
        }
    }
}

/// Unwrap query parameters, turning extractor rejections into 400s.
pub fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    match params {
        Ok(Query(params)) => Ok(params),
        Err(rejection) => {
            tracing::debug!("rejected query string: {rejection}");
            Err(AppError::bad_request("invalid query string"))
        }
    }
}
