use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::BuildError;

const PAGE_FILE: &str = "index.html";

/// `<blog_dir>/<slug>/index.html`, relative to the site root.
pub fn post_page_path(blog_dir: &Path, slug: &str) -> PathBuf {
    blog_dir.join(slug).join(PAGE_FILE)
}

/// `<blog_dir>/index.html`, relative to the site root.
pub fn index_page_path(blog_dir: &Path) -> PathBuf {
    blog_dir.join(PAGE_FILE)
}

/// How many directories below the site root a page written at `relative` sits.
/// Templates climb this many levels to reach shared assets.
pub fn depth_of(relative: &Path) -> usize {
    relative
        .parent()
        .map(|dir| {
            dir.components()
                .filter(|c| matches!(c, std::path::Component::Normal(_)))
                .count()
        })
        .unwrap_or(0)
}

/// Writes `document` to `path`, creating missing parent directories and
/// replacing whatever was there. Not atomic.
pub async fn write_page(path: &Path, document: &str) -> Result<(), BuildError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .await
            .map_err(|source| BuildError::CreateDir { path: dir.to_path_buf(), source })?;
    }

    fs::write(path, document)
        .await
        .map_err(|source| BuildError::Write { path: path.to_path_buf(), source })?;
    debug!(path = %path.display(), bytes = document.len(), "wrote page");
    Ok(())
}
