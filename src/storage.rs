use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::AppResult;
use crate::model::{Category, Item, MilestoneRecord, UsageLog};

pub const ITEMS_KEY: &str = "items";
pub const USAGE_LOGS_KEY: &str = "usage_logs";
pub const CATEGORIES_KEY: &str = "categories";
pub const MILESTONES_KEY: &str = "milestones";

const ALL_KEYS: [&str; 4] = [ITEMS_KEY, USAGE_LOGS_KEY, CATEGORIES_KEY, MILESTONES_KEY];

/// File-backed key-value store for the four persisted collections.
///
/// Loads are tolerant: a missing or unreadable file yields an empty list and
/// never an error. Saves replace the whole collection atomically via a temp
/// file rename.
#[derive(Debug, Clone)]
pub struct Storage {
    base: PathBuf,
}

impl Storage {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let path = self.path_for(key);
        let raw = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_slice(&raw) {
            Ok(values) => values,
            Err(err) => {
                warn!(key, error = %err, "discarding unreadable collection");
                Vec::new()
            }
        }
    }

    async fn save<T: Serialize>(&self, key: &str, values: &[T]) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.base).await?;
        let bytes = serde_json::to_vec(values)?;
        let tmp = self.base.join(format!("{key}.json.tmp"));
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, self.path_for(key)).await?;
        Ok(())
    }

    pub async fn load_items(&self) -> Vec<Item> {
        self.load(ITEMS_KEY).await
    }

    pub async fn save_items(&self, items: &[Item]) -> AppResult<()> {
        self.save(ITEMS_KEY, items)
            .await
            .map_err(|err| err.with_context("collection", ITEMS_KEY))
    }

    pub async fn load_usage_logs(&self) -> Vec<UsageLog> {
        self.load(USAGE_LOGS_KEY).await
    }

    pub async fn save_usage_logs(&self, logs: &[UsageLog]) -> AppResult<()> {
        self.save(USAGE_LOGS_KEY, logs)
            .await
            .map_err(|err| err.with_context("collection", USAGE_LOGS_KEY))
    }

    pub async fn load_categories(&self) -> Vec<Category> {
        self.load(CATEGORIES_KEY).await
    }

    pub async fn save_categories(&self, categories: &[Category]) -> AppResult<()> {
        self.save(CATEGORIES_KEY, categories)
            .await
            .map_err(|err| err.with_context("collection", CATEGORIES_KEY))
    }

    pub async fn load_milestones(&self) -> Vec<MilestoneRecord> {
        self.load(MILESTONES_KEY).await
    }

    pub async fn save_milestones(&self, records: &[MilestoneRecord]) -> AppResult<()> {
        self.save(MILESTONES_KEY, records)
            .await
            .map_err(|err| err.with_context("collection", MILESTONES_KEY))
    }

    /// Removes every persisted collection; already-missing files are fine.
    pub async fn clear_all(&self) -> AppResult<()> {
        for key in ALL_KEYS {
            match tokio::fs::remove_file(self.path_for(key)).await {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(crate::error::AppError::from(err).with_context("collection", key))
                }
            }
        }
        Ok(())
    }
}
