use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::error::BuildError;
use crate::fingerprint::fingerprint;
use crate::index_patcher::{patch_landing_page, PatchOutcome};
use crate::markdown::render_markdown_to_html;
use crate::site_writer::{depth_of, index_page_path, post_page_path, write_page};
use crate::templates::{index_page, post_page};

#[derive(Debug)]
pub struct BuildReport {
    pub version: String,
    /// Every generated page, relative to the site root, in write order.
    pub pages: Vec<PathBuf>,
    pub landing: PatchOutcome,
}

/// Runs one full build against `root`: hash, posts, index, landing page.
/// Stops at the first error.
pub async fn build_site(root: &Path, config: &SiteConfig) -> Result<BuildReport, BuildError> {
    let version = fingerprint(root, &config.stylesheets).await?;
    info!(%version, "computed stylesheet version");

    let mut pages = Vec::with_capacity(config.posts.len() + 1);

    for post in &config.posts {
        let source = root.join(&post.source_path);
        let markdown = fs::read_to_string(&source)
            .await
            .map_err(|e| BuildError::Read { path: source.clone(), source: e })?;
        debug!(slug = %post.slug, source = %source.display(), "rendering post");

        let fragment = render_markdown_to_html(&markdown);
        let relative = post_page_path(&config.blog_dir, &post.slug);
        let html = post_page(config, post, &fragment, depth_of(&relative), &version);

        write_page(&root.join(&relative), &html).await?;
        info!("Built: /{}/", url_of(&relative));
        pages.push(relative);
    }

    let relative = index_page_path(&config.blog_dir);
    let html = index_page(config, &config.posts, depth_of(&relative), &version);
    write_page(&root.join(&relative), &html).await?;
    info!("Built: /{}/", url_of(&relative));
    pages.push(relative);

    let landing = patch_landing_page(
        &root.join(&config.landing_page),
        &config.landing_stylesheet,
        &version,
    )
    .await?;
    // NoMatch was already reported by the patcher.
    if let Some(line) = landing_summary(landing, &config.landing_page, &version) {
        info!("{}", line);
    }

    Ok(BuildReport { version, pages, landing })
}

fn landing_summary(landing: PatchOutcome, page: &Path, version: &str) -> Option<String> {
    let verb = match landing {
        PatchOutcome::Updated => "Updated",
        PatchOutcome::AlreadyCurrent => "Unchanged",
        PatchOutcome::NoMatch => return None,
    };
    Some(format!("{verb}: /{} (cache bust: {version})", page.display()))
}

/// Directory URL of a page, e.g. `blog/hello/index.html` -> `blog/hello`.
fn url_of(page: &Path) -> String {
    page.parent()
        .map(|dir| dir.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default()
}
