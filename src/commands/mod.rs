pub mod check;
pub mod generate;

use std::path::Path;

use anyhow::{Context, Result};
use metaform::BuildMeta;

/// Read and parse a build meta JSON file
pub fn load_build_meta(path: &Path) -> Result<BuildMeta> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read build meta {}", path.display()))?;
    BuildMeta::from_json(&content)
        .with_context(|| format!("failed to parse build meta {}", path.display()))
}
