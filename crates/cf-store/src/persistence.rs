//! # JSON Project Persistence
//!
//! Maps the full project list onto a single key of a `KeyValueStore`.
//! There is no schema version: the stored value is the bare JSON array.

use std::sync::Arc;

use async_trait::async_trait;
use cf_core::error::{AppError, Result};
use cf_core::models::Project;
use cf_core::traits::{KeyValueStore, ProjectPersistence};

/// Storage key used by every dashboard build so far.
pub const DEFAULT_STORAGE_KEY: &str = "videoProjects";

pub struct JsonProjectPersistence {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl JsonProjectPersistence {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { kv, key: key.into() }
    }

    pub fn with_default_key(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::new(kv, DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl ProjectPersistence for JsonProjectPersistence {
    async fn load(&self) -> Result<Option<Vec<Project>>> {
        let raw = self
            .kv
            .get(&self.key)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        match raw {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| AppError::PersistenceLoad(format!("key {:?}: {}", self.key, e))),
        }
    }

    async fn save(&self, projects: &[Project]) -> Result<()> {
        let raw = serde_json::to_string(projects).map_err(|e| AppError::Internal(e.to_string()))?;
        self.kv
            .set(&self.key, &raw)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_core::traits::MockKeyValueStore;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_absent_key_loads_none() {
        let mut kv = MockKeyValueStore::new();
        kv.expect_get()
            .with(eq(DEFAULT_STORAGE_KEY))
            .times(1)
            .returning(|_| Ok(None));

        let persistence = JsonProjectPersistence::with_default_key(Arc::new(kv));
        assert_eq!(persistence.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_json_is_load_error() {
        let mut kv = MockKeyValueStore::new();
        kv.expect_get().returning(|_| Ok(Some("{not json".to_string())));

        let persistence = JsonProjectPersistence::with_default_key(Arc::new(kv));
        assert!(matches!(persistence.load().await, Err(AppError::PersistenceLoad(_))));
    }

    #[tokio::test]
    async fn test_backend_failure_is_persistence_error() {
        let mut kv = MockKeyValueStore::new();
        kv.expect_get().returning(|_| Err(anyhow::anyhow!("disk on fire")));
        kv.expect_set().returning(|_, _| Err(anyhow::anyhow!("disk on fire")));

        let persistence = JsonProjectPersistence::new(Arc::new(kv), "custom");
        assert!(matches!(persistence.load().await, Err(AppError::Persistence(_))));
        assert!(matches!(persistence.save(&[]).await, Err(AppError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_save_writes_bare_array_under_key() {
        let mut kv = MockKeyValueStore::new();
        kv.expect_set()
            .withf(|key, value| key == "custom" && value == "[]")
            .times(1)
            .returning(|_, _| Ok(()));

        let persistence = JsonProjectPersistence::new(Arc::new(kv), "custom");
        persistence.save(&[]).await.unwrap();
    }
}
