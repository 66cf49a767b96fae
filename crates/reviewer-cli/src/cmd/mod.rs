pub mod pr;
pub mod serve;
pub mod team;
pub mod user;

use anyhow::Context;
use reviewer_core::config::Config;
use reviewer_core::store::RedbStore;
use reviewer_core::ReviewService;
use std::path::{Path, PathBuf};

/// Config file (or defaults) with command-line overrides applied.
pub fn resolve_config(
    path: Option<&Path>,
    db: Option<PathBuf>,
    seed: Option<u64>,
) -> anyhow::Result<Config> {
    let mut config = Config::load_or_default(path).with_context(|| match path {
        Some(p) => format!("failed to load config '{}'", p.display()),
        None => "failed to load default config".to_string(),
    })?;
    if let Some(db) = db {
        config.storage.path = db;
    }
    if seed.is_some() {
        config.assignment.seed = seed;
    }
    Ok(config)
}

pub fn open_service(config: &Config) -> anyhow::Result<ReviewService<RedbStore>> {
    let store = RedbStore::open(&config.storage.path).with_context(|| {
        format!(
            "failed to open database '{}'",
            config.storage.path.display()
        )
    })?;
    Ok(ReviewService::from_config(store, &config.assignment))
}
