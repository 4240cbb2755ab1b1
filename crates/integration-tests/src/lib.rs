//! Shared helpers for the cross-crate scenario tests under `tests/`.

use std::path::PathBuf;

pub const MIB: u64 = 1024 * 1024;

/// Fresh, not-yet-created directory under the system temp dir.
pub fn scratch_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cf-{tag}-{}", uuid::Uuid::new_v4()))
}
