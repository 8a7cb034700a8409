use std::path::Path;

use regex::{NoExpand, Regex};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::BuildError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Updated,
    AlreadyCurrent,
    /// The stylesheet link was not found; the page was left untouched.
    NoMatch,
}

/// Points the first `href="<stylesheet>"` link in `html` (with or without a
/// `?v=` query) at `version`.
pub fn patch_stylesheet_version(
    html: &str,
    stylesheet: &str,
    version: &str,
) -> Result<(String, PatchOutcome), regex::Error> {
    let re = Regex::new(&format!(r#"href="{}(\?v=[^"]*)?""#, regex::escape(stylesheet)))?;

    let Some(found) = re.find(html) else {
        return Ok((html.to_string(), PatchOutcome::NoMatch));
    };

    let replacement = format!(r#"href="{stylesheet}?v={version}""#);
    if found.as_str() == replacement {
        return Ok((html.to_string(), PatchOutcome::AlreadyCurrent));
    }

    let patched = re.replace(html, NoExpand(&replacement)).into_owned();
    Ok((patched, PatchOutcome::Updated))
}

/// Rewrites the landing page in place. A page without the stylesheet link is
/// reported with a warning and left as is.
pub async fn patch_landing_page(
    path: &Path,
    stylesheet: &str,
    version: &str,
) -> Result<PatchOutcome, BuildError> {
    let html = fs::read_to_string(path)
        .await
        .map_err(|source| BuildError::Read { path: path.to_path_buf(), source })?;

    let (patched, outcome) = patch_stylesheet_version(&html, stylesheet, version)?;
    match outcome {
        PatchOutcome::Updated => {
            fs::write(path, patched)
                .await
                .map_err(|source| BuildError::Write { path: path.to_path_buf(), source })?;
        }
        PatchOutcome::AlreadyCurrent => {
            debug!(path = %path.display(), "landing page already carries the current version");
        }
        PatchOutcome::NoMatch => {
            warn!(
                path = %path.display(),
                stylesheet,
                "no stylesheet link found to version; landing page left unchanged"
            );
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn adds_version_to_bare_link() {
        let html = r#"<link rel="stylesheet" href="landing.css">"#;
        let (patched, outcome) = patch_stylesheet_version(html, "landing.css", "abcd1234").unwrap();
        assert_eq!(patched, r#"<link rel="stylesheet" href="landing.css?v=abcd1234">"#);
        assert_eq!(outcome, PatchOutcome::Updated);
    }

    #[test]
    fn replaces_existing_version_instead_of_appending() {
        for old in ["oldtoken", "0123abcd", ""] {
            let html = format!(r#"<link rel="stylesheet" href="landing.css?v={old}">"#);
            let (patched, outcome) = patch_stylesheet_version(&html, "landing.css", "abcd1234").unwrap();
            assert_eq!(patched, r#"<link rel="stylesheet" href="landing.css?v=abcd1234">"#);
            assert_eq!(outcome, PatchOutcome::Updated);
        }
    }

    #[test]
    fn only_first_occurrence_is_rewritten() {
        let html = r#"<link href="landing.css?v=1111"><link href="landing.css?v=2222">"#;
        let (patched, _) = patch_stylesheet_version(html, "landing.css", "abcd1234").unwrap();
        assert_eq!(patched, r#"<link href="landing.css?v=abcd1234"><link href="landing.css?v=2222">"#);
    }

    #[test]
    fn other_stylesheets_are_ignored() {
        let html = r#"<link href="blog.css?v=1111"><link href="xlanding.css"><link href="landingXcss">"#;
        let (patched, outcome) = patch_stylesheet_version(html, "landing.css", "abcd1234").unwrap();
        assert_eq!(patched, html);
        assert_eq!(outcome, PatchOutcome::NoMatch);
    }

    #[test]
    fn current_version_is_left_alone() {
        let html = r#"<link href="landing.css?v=abcd1234">"#;
        let (patched, outcome) = patch_stylesheet_version(html, "landing.css", "abcd1234").unwrap();
        assert_eq!(patched, html);
        assert_eq!(outcome, PatchOutcome::AlreadyCurrent);
    }

    #[tokio::test]
    async fn patches_file_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, "<head><link rel=\"stylesheet\" href=\"landing.css?v=deadbeef\"></head>\n").unwrap();

        let outcome = patch_landing_page(&path, "landing.css", "abcd1234").await.unwrap();
        assert_eq!(outcome, PatchOutcome::Updated);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "<head><link rel=\"stylesheet\" href=\"landing.css?v=abcd1234\"></head>\n"
        );
    }

    #[tokio::test]
    async fn unmatched_file_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.html");
        let original = "<head><link rel=\"stylesheet\" href=\"css/site.css\"></head>\n";
        std::fs::write(&path, original).unwrap();

        let outcome = patch_landing_page(&path, "landing.css", "abcd1234").await.unwrap();
        assert_eq!(outcome, PatchOutcome::NoMatch);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[tokio::test]
    async fn missing_landing_page_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = patch_landing_page(&dir.path().join("index.html"), "landing.css", "abcd1234")
            .await
            .unwrap_err();
        assert!(matches!(err, BuildError::Read { .. }));
    }
}
