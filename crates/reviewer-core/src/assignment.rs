//! Reviewer selection.
//!
//! The engine owns its random generator so that a service can be seeded
//! once at startup (or with a fixed seed in tests) instead of sharing a
//! process-global source. Selection is uniform and without replacement;
//! callers only ever see ids drawn from the filtered candidate pool.

use std::collections::HashSet;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::types::User;

// ---------------------------------------------------------------------------
// Candidate filtering
// ---------------------------------------------------------------------------

/// Users that must not be picked, beyond the anchor and inactive members.
#[derive(Debug, Clone, Default)]
pub struct Exclusions<'a> {
    ids: HashSet<&'a str>,
}

impl<'a> Exclusions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: &'a str) -> Self {
        self.ids.insert(id);
        self
    }

    pub fn with_all<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.ids.extend(ids);
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

/// Team members eligible to review on behalf of `anchor_id`.
///
/// Drops the anchor itself, inactive users and anything in `exclusions`.
/// Roster order is preserved.
pub fn candidate_pool<'u>(
    members: &'u [User],
    anchor_id: &str,
    exclusions: &Exclusions<'_>,
) -> Vec<&'u User> {
    members
        .iter()
        .filter(|u| u.id != anchor_id)
        .filter(|u| u.is_active)
        .filter(|u| !exclusions.contains(&u.id))
        .collect()
}

// ---------------------------------------------------------------------------
// AssignmentEngine
// ---------------------------------------------------------------------------

pub struct AssignmentEngine {
    rng: Mutex<StdRng>,
}

impl AssignmentEngine {
    /// Engine with a fixed seed. Same seed and same pool give the same picks.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Engine seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Pick up to `count` distinct reviewers from `members` for `anchor_id`.
    ///
    /// Returns fewer than `count` ids (possibly none) when the filtered pool
    /// is too small.
    pub fn select_reviewers(
        &self,
        members: &[User],
        anchor_id: &str,
        exclusions: &Exclusions<'_>,
        count: usize,
    ) -> Vec<String> {
        let pool = candidate_pool(members, anchor_id, exclusions);
        tracing::debug!(
            anchor = anchor_id,
            pool = pool.len(),
            count,
            "selecting reviewers"
        );
        self.pick(&pool, count)
    }

    /// Uniform choice without replacement from an already-filtered pool.
    pub fn pick(&self, pool: &[&User], count: usize) -> Vec<String> {
        if pool.is_empty() || count == 0 {
            return Vec::new();
        }
        // A poisoned lock still holds a usable generator.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        pool.choose_multiple(&mut *rng, count)
            .map(|u| u.id.clone())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
