//! redb-backed store.
//!
//! # Table design
//!
//! ```text
//! teams           team_name           -> JSON TeamRecord
//! users           user_id             -> JSON User
//! pull_requests   pr_id               -> JSON PullRequest (reviewers embedded)
//! reviewer_index  reviewer_id \0 pr_id -> ()
//! ```
//!
//! Reviewers live inside the pull request record, so the header and the
//! reviewer list are always replaced together. `reviewer_index` is kept in
//! step on every create/update; because the reviewer id is the key prefix,
//! a single range scan lists everything one user is reviewing.
//!
//! redb allows one write transaction at a time, which makes every
//! `Store::write` closure serializable with respect to the others.

use std::path::Path;

use redb::{Database, ReadTransaction, ReadableTable, TableDefinition, WriteTransaction};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{Store, StoreRead, StoreWrite};
use crate::error::{storage, Result, ReviewerError};
use crate::types::{PullRequest, Team, User};

// ---------------------------------------------------------------------------
// Table definitions
// ---------------------------------------------------------------------------

const TEAMS: TableDefinition<&str, &[u8]> = TableDefinition::new("teams");
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");
const PULL_REQUESTS: TableDefinition<&str, &[u8]> = TableDefinition::new("pull_requests");
const REVIEWER_INDEX: TableDefinition<&str, ()> = TableDefinition::new("reviewer_index");

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TeamRecord {
    name: String,
}

// ---------------------------------------------------------------------------
// Key helpers
// ---------------------------------------------------------------------------

fn index_key(reviewer_id: &str, pr_id: &str) -> String {
    format!("{reviewer_id}\0{pr_id}")
}

/// `[lower, upper)` covering every index key for `reviewer_id`.
fn index_bounds(reviewer_id: &str) -> (String, String) {
    (format!("{reviewer_id}\0"), format!("{reviewer_id}\u{1}"))
}

// ---------------------------------------------------------------------------
// Encoding helpers
// ---------------------------------------------------------------------------

fn get_json<T: DeserializeOwned>(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    key: &str,
) -> Result<Option<T>> {
    match table.get(key).map_err(storage)? {
        Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
        None => Ok(None),
    }
}

fn put_json<T: Serialize>(
    table: &mut redb::Table<'_, &'static str, &'static [u8]>,
    key: &str,
    value: &T,
) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    table.insert(key, bytes.as_slice()).map_err(storage)?;
    Ok(())
}

fn team_roster(
    users: &impl ReadableTable<&'static str, &'static [u8]>,
    team_name: &str,
) -> Result<Vec<User>> {
    let mut members = Vec::new();
    for entry in users.iter().map_err(storage)? {
        let (_, v) = entry.map_err(storage)?;
        let user: User = serde_json::from_slice(v.value())?;
        if user.team_name == team_name {
            members.push(user);
        }
    }
    members.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(members)
}

fn reviewing(
    index: &impl ReadableTable<&'static str, ()>,
    prs: &impl ReadableTable<&'static str, &'static [u8]>,
    reviewer_id: &str,
) -> Result<Vec<PullRequest>> {
    let (lower, upper) = index_bounds(reviewer_id);
    let mut result = Vec::new();
    for entry in index
        .range(lower.as_str()..upper.as_str())
        .map_err(storage)?
    {
        let (k, _) = entry.map_err(storage)?;
        let Some((_, pr_id)) = k.value().split_once('\0') else {
            continue;
        };
        if let Some(pr) = get_json::<PullRequest>(prs, pr_id)? {
            result.push(pr);
        }
    }
    result.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(result)
}

// ---------------------------------------------------------------------------
// RedbStore
// ---------------------------------------------------------------------------

pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create the database at `path`, creating every table up front
    /// so read transactions never see a missing table.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path).map_err(storage)?;
        let wt = db.begin_write().map_err(storage)?;
        wt.open_table(TEAMS).map_err(storage)?;
        wt.open_table(USERS).map_err(storage)?;
        wt.open_table(PULL_REQUESTS).map_err(storage)?;
        wt.open_table(REVIEWER_INDEX).map_err(storage)?;
        wt.commit().map_err(storage)?;
        tracing::debug!(path = %path.display(), "opened reviewer database");
        Ok(Self { db })
    }
}

impl Store for RedbStore {
    fn read<T>(&self, f: impl FnOnce(&dyn StoreRead) -> Result<T>) -> Result<T> {
        let txn = self.db.begin_read().map_err(storage)?;
        f(&RedbReader { txn: &txn })
    }

    fn write<T>(&self, f: impl FnOnce(&mut dyn StoreWrite) -> Result<T>) -> Result<T> {
        let txn = self.db.begin_write().map_err(storage)?;
        let out = {
            let mut writer = RedbWriter { txn: &txn };
            f(&mut writer)
        };
        match out {
            Ok(value) => {
                txn.commit().map_err(storage)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(abort) = txn.abort() {
                    tracing::warn!("failed to abort write transaction: {abort}");
                }
                Err(e)
            }
        }
    }

    fn health(&self) -> Result<()> {
        let txn = self.db.begin_read().map_err(storage)?;
        txn.open_table(TEAMS).map_err(storage)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Transaction views
// ---------------------------------------------------------------------------

struct RedbReader<'t> {
    txn: &'t ReadTransaction,
}

struct RedbWriter<'t> {
    txn: &'t WriteTransaction,
}

/// Both transaction kinds expose `open_table` with the same shape, so the
/// lookups are written once.
macro_rules! impl_store_read {
    ($ty:ty) => {
        impl StoreRead for $ty {
            fn get_user(&self, user_id: &str) -> Result<User> {
                let users = self.txn.open_table(USERS).map_err(storage)?;
                get_json(&users, user_id)?
                    .ok_or_else(|| ReviewerError::UserNotFound(user_id.to_string()))
            }

            fn list_users_by_team(&self, team_name: &str) -> Result<Vec<User>> {
                let teams = self.txn.open_table(TEAMS).map_err(storage)?;
                if get_json::<TeamRecord>(&teams, team_name)?.is_none() {
                    return Err(ReviewerError::TeamNotFound(team_name.to_string()));
                }
                let users = self.txn.open_table(USERS).map_err(storage)?;
                team_roster(&users, team_name)
            }

            fn get_team(&self, team_name: &str) -> Result<Team> {
                let teams = self.txn.open_table(TEAMS).map_err(storage)?;
                let record: TeamRecord = get_json(&teams, team_name)?
                    .ok_or_else(|| ReviewerError::TeamNotFound(team_name.to_string()))?;
                let users = self.txn.open_table(USERS).map_err(storage)?;
                Ok(Team {
                    members: team_roster(&users, &record.name)?,
                    name: record.name,
                })
            }

            fn get_pull_request(&self, pr_id: &str) -> Result<PullRequest> {
                let prs = self.txn.open_table(PULL_REQUESTS).map_err(storage)?;
                get_json(&prs, pr_id)?
                    .ok_or_else(|| ReviewerError::PullRequestNotFound(pr_id.to_string()))
            }

            fn list_pull_requests_by_reviewer(&self, user_id: &str) -> Result<Vec<PullRequest>> {
                let index = self.txn.open_table(REVIEWER_INDEX).map_err(storage)?;
                let prs = self.txn.open_table(PULL_REQUESTS).map_err(storage)?;
                reviewing(&index, &prs, user_id)
            }
        }
    };
}

impl_store_read!(RedbReader<'_>);
impl_store_read!(RedbWriter<'_>);

impl StoreWrite for RedbWriter<'_> {
    fn create_team(&mut self, team: &Team) -> Result<Team> {
        {
            let mut teams = self.txn.open_table(TEAMS).map_err(storage)?;
            if get_json::<TeamRecord>(&teams, &team.name)?.is_some() {
                return Err(ReviewerError::TeamExists(team.name.clone()));
            }
            let record = TeamRecord {
                name: team.name.clone(),
            };
            put_json(&mut teams, &team.name, &record)?;
        }
        {
            let mut users = self.txn.open_table(USERS).map_err(storage)?;
            for member in &team.members {
                let user = User {
                    team_name: team.name.clone(),
                    ..member.clone()
                };
                put_json(&mut users, &user.id, &user)?;
            }
        }
        self.get_team(&team.name)
    }

    fn set_user_active(&mut self, user_id: &str, is_active: bool) -> Result<User> {
        let mut users = self.txn.open_table(USERS).map_err(storage)?;
        let mut user: User = get_json(&users, user_id)?
            .ok_or_else(|| ReviewerError::UserNotFound(user_id.to_string()))?;
        user.is_active = is_active;
        put_json(&mut users, user_id, &user)?;
        Ok(user)
    }

    fn create_pull_request(&mut self, pr: &PullRequest) -> Result<PullRequest> {
        let mut prs = self.txn.open_table(PULL_REQUESTS).map_err(storage)?;
        if get_json::<PullRequest>(&prs, &pr.id)?.is_some() {
            return Err(ReviewerError::PullRequestExists(pr.id.clone()));
        }
        put_json(&mut prs, &pr.id, pr)?;

        let mut index = self.txn.open_table(REVIEWER_INDEX).map_err(storage)?;
        for reviewer in &pr.assigned_reviewers {
            index
                .insert(index_key(reviewer, &pr.id).as_str(), ())
                .map_err(storage)?;
        }
        Ok(pr.clone())
    }

    fn update_pull_request(&mut self, pr: &PullRequest) -> Result<PullRequest> {
        let mut prs = self.txn.open_table(PULL_REQUESTS).map_err(storage)?;
        let previous: PullRequest = get_json(&prs, &pr.id)?
            .ok_or_else(|| ReviewerError::PullRequestNotFound(pr.id.clone()))?;
        put_json(&mut prs, &pr.id, pr)?;

        let mut index = self.txn.open_table(REVIEWER_INDEX).map_err(storage)?;
        for reviewer in &previous.assigned_reviewers {
            index
                .remove(index_key(reviewer, &pr.id).as_str())
                .map_err(storage)?;
        }
        for reviewer in &pr.assigned_reviewers {
            index
                .insert(index_key(reviewer, &pr.id).as_str(), ())
                .map_err(storage)?;
        }
        Ok(pr.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
