//! Persistence contract for teams, users and pull requests.
//!
//! The service never talks to a backend directly. It asks the `Store` for a
//! read or write transaction and runs its logic inside the closure, so a
//! load-decide-persist sequence either commits as a whole or not at all.

mod db;

pub use db::RedbStore;

use crate::error::Result;
use crate::types::{PullRequest, Team, User};

/// Lookups available inside any transaction.
pub trait StoreRead {
    /// `UserNotFound` on a miss.
    fn get_user(&self, user_id: &str) -> Result<User>;

    /// Current roster of `team_name`, sorted by user id. `TeamNotFound` if the
    /// team does not exist.
    fn list_users_by_team(&self, team_name: &str) -> Result<Vec<User>>;

    /// `TeamNotFound` on a miss.
    fn get_team(&self, team_name: &str) -> Result<Team>;

    /// `PullRequestNotFound` on a miss.
    fn get_pull_request(&self, pr_id: &str) -> Result<PullRequest>;

    /// Every pull request with `user_id` among its assigned reviewers,
    /// newest first.
    fn list_pull_requests_by_reviewer(&self, user_id: &str) -> Result<Vec<PullRequest>>;
}

/// Mutations, only reachable through `Store::write`.
pub trait StoreWrite: StoreRead {
    /// Create the team and upsert its members. Existing users named in the
    /// roster move to this team. `TeamExists` if the name is taken.
    fn create_team(&mut self, team: &Team) -> Result<Team>;

    /// `UserNotFound` on a miss.
    fn set_user_active(&mut self, user_id: &str, is_active: bool) -> Result<User>;

    /// `PullRequestExists` if the id is taken.
    fn create_pull_request(&mut self, pr: &PullRequest) -> Result<PullRequest>;

    /// Replace the stored record, reviewer list included. `PullRequestNotFound`
    /// if there is nothing to replace.
    fn update_pull_request(&mut self, pr: &PullRequest) -> Result<PullRequest>;
}

pub trait Store: Send + Sync {
    /// Run `f` against a consistent snapshot.
    fn read<T>(&self, f: impl FnOnce(&dyn StoreRead) -> Result<T>) -> Result<T>;

    /// Run `f` inside a serializable write transaction. The transaction
    /// commits only if `f` returns `Ok`.
    fn write<T>(&self, f: impl FnOnce(&mut dyn StoreWrite) -> Result<T>) -> Result<T>;

    fn health(&self) -> Result<()>;
}
