//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Project, User};

/// Raw key-value storage, the equivalent of a browser profile's local storage.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when nothing was ever written under `key`.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    /// Replaces the whole value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Durable home of the full project list.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait ProjectPersistence: Send + Sync {
    /// `Ok(None)` when nothing is persisted yet.
    /// `Err(AppError::PersistenceLoad)` when something is persisted but unreadable.
    async fn load(&self) -> Result<Option<Vec<Project>>>;
    /// Writes the entire list, replacing what was there.
    async fn save(&self, projects: &[Project]) -> Result<()>;
}

/// Identity collaborator. Clipforge only consumes `current_user`.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait SessionProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;

    /// Any signed-in user counts.
    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<User>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<User>;
    async fn sign_in_with_google(&self) -> Result<User>;
    async fn sign_out(&self) -> Result<()>;
}
