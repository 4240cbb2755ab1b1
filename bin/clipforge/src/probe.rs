//! Builds a `VideoFile` from a path using only metadata and the extension.

use std::path::Path;

use anyhow::{bail, Context};
use cf_core::models::VideoFile;
use tokio::fs;

pub async fn probe(path: &Path) -> anyhow::Result<VideoFile> {
    let meta = fs::metadata(path)
        .await
        .with_context(|| format!("reading metadata of {}", path.display()))?;
    if !meta.is_file() {
        bail!("{} is not a file", path.display());
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?;
    let mime_type = mime_guess::from_path(path).first_or_octet_stream();

    Ok(VideoFile::new(name, meta.len(), mime_type.essence_str()))
}
