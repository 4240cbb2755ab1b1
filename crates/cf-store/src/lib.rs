//! # cf-store
//!
//! The project store and its JSON persistence adapter.

pub mod persistence;
pub mod store;

pub use persistence::{JsonProjectPersistence, DEFAULT_STORAGE_KEY};
pub use store::ProjectStore;
