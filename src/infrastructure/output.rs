//! Writing rendered templates to disk

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::info;

use crate::domain::entities::RenderedTemplate;
use crate::domain::value_objects::Flavor;
use crate::error::TransformResult;

/// One document written by [`write_templates`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenTemplate {
    pub flavor: Flavor,
    pub path: PathBuf,
    pub hash: String,
    pub bytes: usize,
}

/// Write `content` to `path` atomically.
///
/// The content goes to a temp file in the destination directory first and is
/// then renamed over `path`, so readers never see a half-written document.
pub fn write_atomic(path: &Path, content: &str) -> TransformResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write every template under `output_dir`, named after its flavor
pub fn write_templates(
    output_dir: &Path,
    templates: Vec<RenderedTemplate>,
) -> TransformResult<Vec<WrittenTemplate>> {
    let mut written = Vec::with_capacity(templates.len());
    for mut template in templates {
        let path = output_dir.join(template.file_name());
        write_atomic(&path, template.content())?;

        let hash = template.hash().to_string();
        info!(flavor = %template.flavor(), path = %path.display(), %hash, "wrote template");
        written.push(WrittenTemplate {
            flavor: template.flavor(),
            bytes: template.len(),
            path,
            hash,
        });
    }
    Ok(written)
}
