//! # cf-app
//!
//! The orchestration layer the dashboard talks to.

pub mod share;
pub mod studio;

pub use share::{share_intent, SharePlatform, ShareIntent};
pub use studio::{Generation, Studio};
