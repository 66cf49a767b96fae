//! Pull request lifecycle: creation with initial reviewers, idempotent merge,
//! and one-slot reviewer reassignment.
//!
//! Every mutating operation runs as one `Store::write` closure, so the state
//! it decided on is the state it commits against.

use std::collections::HashSet;

use chrono::Utc;
use serde::Serialize;

use crate::assignment::{AssignmentEngine, Exclusions};
use crate::config::AssignmentConfig;
use crate::error::{Result, ReviewerError};
use crate::store::Store;
use crate::types::{PrStatus, PullRequest, Team, User};

pub const DEFAULT_REVIEWERS_PER_PR: usize = 2;

/// Outcome of a successful reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reassignment {
    pub pull_request: PullRequest,
    pub replaced_by: String,
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ReviewerError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

fn validate_team(team: &Team) -> Result<()> {
    require("team_name", &team.name)?;
    if team.members.is_empty() {
        return Err(ReviewerError::InvalidInput("members are required".into()));
    }
    let mut seen = HashSet::new();
    for (i, member) in team.members.iter().enumerate() {
        require(&format!("members[{i}].user_id"), &member.id)?;
        require(&format!("members[{i}].username"), &member.username)?;
        if !seen.insert(member.id.as_str()) {
            return Err(ReviewerError::InvalidInput(format!(
                "members[{i}].user_id '{}' is listed twice",
                member.id
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ReviewService
// ---------------------------------------------------------------------------

pub struct ReviewService<S> {
    store: S,
    engine: AssignmentEngine,
    reviewers_per_pr: usize,
}

impl<S: Store> ReviewService<S> {
    pub fn new(store: S, engine: AssignmentEngine) -> Self {
        Self {
            store,
            engine,
            reviewers_per_pr: DEFAULT_REVIEWERS_PER_PR,
        }
    }

    pub fn from_config(store: S, config: &AssignmentConfig) -> Self {
        Self::new(store, AssignmentEngine::new(config.seed))
            .with_reviewers_per_pr(config.reviewers_per_pr)
    }

    pub fn with_reviewers_per_pr(mut self, count: usize) -> Self {
        self.reviewers_per_pr = count;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Teams and users
    // -----------------------------------------------------------------------

    pub fn create_team(&self, team: Team) -> Result<Team> {
        validate_team(&team)?;
        let created = self.store.write(|tx| tx.create_team(&team))?;
        tracing::info!(
            team = %created.name,
            members = created.members.len(),
            "team created"
        );
        Ok(created)
    }

    pub fn get_team(&self, team_name: &str) -> Result<Team> {
        require("team_name", team_name)?;
        self.store.read(|tx| tx.get_team(team_name))
    }

    pub fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<User> {
        require("user_id", user_id)?;
        let user = self.store.write(|tx| tx.set_user_active(user_id, is_active))?;
        tracing::info!(user = %user.id, is_active, "user activity changed");
        Ok(user)
    }

    // -----------------------------------------------------------------------
    // Pull requests
    // -----------------------------------------------------------------------

    /// Open a pull request and assign up to `reviewers_per_pr` active
    /// teammates of the author.
    ///
    /// Duplicate ids are reported by the store as `PullRequestExists`.
    pub fn create_pull_request(
        &self,
        id: &str,
        name: &str,
        author_id: &str,
    ) -> Result<PullRequest> {
        require("pull_request_id", id)?;
        require("pull_request_name", name)?;
        require("author_id", author_id)?;

        let pr = self.store.write(|tx| {
            let author = tx.get_user(author_id)?;
            let members = tx.list_users_by_team(&author.team_name)?;

            let mut pr = PullRequest::open(id, name, author_id, Utc::now());
            pr.assigned_reviewers = self.engine.select_reviewers(
                &members,
                author_id,
                &Exclusions::new(),
                self.reviewers_per_pr,
            );
            if pr.assigned_reviewers.len() < self.reviewers_per_pr {
                tracing::warn!(
                    pr = id,
                    team = %author.team_name,
                    assigned = pr.assigned_reviewers.len(),
                    wanted = self.reviewers_per_pr,
                    "team too small to fully staff review"
                );
            }
            tx.create_pull_request(&pr)
        })?;

        tracing::info!(
            pr = %pr.id,
            author = %pr.author_id,
            reviewers = ?pr.assigned_reviewers,
            "pull request created"
        );
        Ok(pr)
    }

    pub fn get_pull_request(&self, pr_id: &str) -> Result<PullRequest> {
        require("pull_request_id", pr_id)?;
        self.store.read(|tx| tx.get_pull_request(pr_id))
    }

    /// Move the pull request to MERGED. Merging an already merged pull
    /// request returns it unchanged.
    pub fn merge_pull_request(&self, pr_id: &str) -> Result<PullRequest> {
        require("pull_request_id", pr_id)?;

        self.store.write(|tx| {
            let mut pr = tx.get_pull_request(pr_id)?;
            if pr.is_merged() {
                tracing::debug!(pr = pr_id, "already merged");
                return Ok(pr);
            }
            let now = Utc::now();
            pr.status = PrStatus::Merged;
            pr.merged_at = Some(now);
            let pr = tx.update_pull_request(&pr)?;
            tracing::info!(pr = pr_id, merged_at = %now, "pull request merged");
            Ok(pr)
        })
    }

    /// Replace `old_reviewer_id` with another active member of that
    /// reviewer's team, keeping the slot position.
    ///
    /// The replacement is never the author, the removed reviewer, or anyone
    /// already reviewing this pull request.
    pub fn reassign_reviewer(&self, pr_id: &str, old_reviewer_id: &str) -> Result<Reassignment> {
        require("pull_request_id", pr_id)?;
        require("old_user_id", old_reviewer_id)?;

        let outcome = self.store.write(|tx| {
            let mut pr = tx.get_pull_request(pr_id)?;
            if pr.is_merged() {
                return Err(ReviewerError::PrMerged(pr.id));
            }
            let slot = pr.reviewer_index(old_reviewer_id).ok_or_else(|| {
                ReviewerError::ReviewerNotAssigned {
                    pull_request: pr.id.clone(),
                    reviewer: old_reviewer_id.to_string(),
                }
            })?;

            let old_reviewer = tx.get_user(old_reviewer_id)?;
            let members = tx.list_users_by_team(&old_reviewer.team_name)?;

            let replacement = {
                let exclusions = Exclusions::new()
                    .with(&pr.author_id)
                    .with_all(pr.assigned_reviewers.iter().map(String::as_str));
                self.engine
                    .select_reviewers(&members, old_reviewer_id, &exclusions, 1)
                    .into_iter()
                    .next()
            };
            let Some(replacement) = replacement else {
                return Err(ReviewerError::NoReplacementAvailable(old_reviewer.team_name));
            };

            pr.assigned_reviewers[slot] = replacement.clone();
            let pr = tx.update_pull_request(&pr)?;
            Ok(Reassignment {
                pull_request: pr,
                replaced_by: replacement,
            })
        })?;

        tracing::info!(
            pr = pr_id,
            old = old_reviewer_id,
            new = %outcome.replaced_by,
            "reviewer reassigned"
        );
        Ok(outcome)
    }

    /// Pull requests `user_id` is assigned to review, newest first.
    pub fn list_user_reviews(&self, user_id: &str) -> Result<Vec<PullRequest>> {
        require("user_id", user_id)?;
        self.store.read(|tx| tx.list_pull_requests_by_reviewer(user_id))
    }

    pub fn health(&self) -> Result<()> {
        self.store.health()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
