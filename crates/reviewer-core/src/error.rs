use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewerError {
    #[error("team not found: {0}")]
    TeamNotFound(String),

    #[error("team already exists: {0}")]
    TeamExists(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("pull request not found: {0}")]
    PullRequestNotFound(String),

    #[error("pull request already exists: {0}")]
    PullRequestExists(String),

    #[error("pull request already merged: {0}")]
    PrMerged(String),

    #[error("reviewer '{reviewer}' is not assigned to pull request '{pull_request}'")]
    ReviewerNotAssigned {
        pull_request: String,
        reviewer: String,
    },

    #[error("no active replacement candidate in team '{0}'")]
    NoReplacementAvailable(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ReviewerError {
    /// Machine-readable code surfaced to API callers.
    pub fn code(&self) -> &'static str {
        match self {
            ReviewerError::TeamNotFound(_)
            | ReviewerError::UserNotFound(_)
            | ReviewerError::PullRequestNotFound(_) => "NOT_FOUND",
            ReviewerError::TeamExists(_) => "TEAM_EXISTS",
            ReviewerError::PullRequestExists(_) => "PR_EXISTS",
            ReviewerError::PrMerged(_) => "PR_MERGED",
            ReviewerError::ReviewerNotAssigned { .. } => "NOT_ASSIGNED",
            ReviewerError::NoReplacementAvailable(_) => "NO_CANDIDATE",
            ReviewerError::InvalidInput(_) => "BAD_REQUEST",
            ReviewerError::Storage(_)
            | ReviewerError::Io(_)
            | ReviewerError::Yaml(_)
            | ReviewerError::Json(_) => "INTERNAL",
        }
    }
}

/// Wrap any backend error as `ReviewerError::Storage`.
pub(crate) fn storage<E: std::fmt::Display>(e: E) -> ReviewerError {
    ReviewerError::Storage(e.to_string())
}

pub type Result<T> = std::result::Result<T, ReviewerError>;
