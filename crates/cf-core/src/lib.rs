//! clipforge/crates/cf-core/src/lib.rs
//!
//! The central domain types and interface definitions for Clipforge.

pub mod error;
pub mod format;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;
