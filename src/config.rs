use std::{
    collections::HashSet,
    path::{Component, Path, PathBuf},
};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::Post;

const SITE_TOML: &str = include_str!("../site.toml");

/// The static site table: branding, asset locations and the ordered post list.
#[derive(Deserialize, Debug, Clone)]
pub struct SiteConfig {
    pub name: String,
    pub repository: String,
    pub license: String,
    /// Logo images at the site root, linked from every page header.
    pub logo: String,
    pub wordmark: String,
    /// Relative to the site root; page depths are counted from its components.
    pub blog_dir: PathBuf,
    /// Hashed in this order for the cache-bust token.
    pub stylesheets: Vec<String>,
    /// Separately authored page whose landing stylesheet link gets re-versioned.
    pub landing_page: PathBuf,
    pub landing_stylesheet: String,
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl SiteConfig {
    /// The table compiled into the binary from `site.toml`.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml(SITE_TOML)
    }

    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stylesheets.is_empty() {
            return Err(ConfigError::NoStylesheets);
        }
        if !self.stylesheets.contains(&self.landing_stylesheet) {
            return Err(ConfigError::UnknownLandingStylesheet(
                self.landing_stylesheet.clone(),
            ));
        }
        if !is_plain_relative(&self.blog_dir) {
            return Err(ConfigError::InvalidBlogDir(self.blog_dir.clone()));
        }

        let mut seen = HashSet::new();
        for post in &self.posts {
            if !is_valid_slug(&post.slug) {
                return Err(ConfigError::InvalidSlug(post.slug.clone()));
            }
            if !seen.insert(post.slug.as_str()) {
                return Err(ConfigError::DuplicateSlug(post.slug.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
impl SiteConfig {
    pub fn for_tests(posts: Vec<Post>) -> Self {
        SiteConfig {
            name: "tygor".to_string(),
            repository: "https://github.com/broady/tygor".to_string(),
            license: "https://github.com/broady/tygor/blob/main/LICENSE".to_string(),
            logo: "tygor-tiger.svg".to_string(),
            wordmark: "tygor-text.svg".to_string(),
            blog_dir: PathBuf::from("blog"),
            stylesheets: vec!["landing.css".to_string(), "blog.css".to_string()],
            landing_page: PathBuf::from("index.html"),
            landing_stylesheet: "landing.css".to_string(),
            posts,
        }
    }
}

fn is_plain_relative(path: &Path) -> bool {
    path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_)))
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
name = "tygor"
repository = "https://example.com/repo"
license = "https://example.com/repo/LICENSE"
logo = "tygor-tiger.svg"
wordmark = "tygor-text.svg"
blog_dir = "blog"
stylesheets = ["landing.css", "blog.css"]
landing_page = "index.html"
landing_stylesheet = "landing.css"
"#;

    fn with_posts(posts: &str) -> String {
        format!("{MINIMAL}\n{posts}")
    }

    #[test]
    fn embedded_table_is_valid() {
        let config = SiteConfig::embedded().unwrap();
        assert_eq!(config.name, "tygor");
        assert!(!config.posts.is_empty());
        assert!(config.stylesheets.contains(&config.landing_stylesheet));
    }

    #[test]
    fn subline_is_optional() {
        let config = SiteConfig::from_toml(&with_posts(
            r#"
[[posts]]
slug = "hello-world"
title = "Hello World"
date = "2024-01-01"
source_path = "hello.md"
"#,
        ))
        .unwrap();
        assert_eq!(config.posts.len(), 1);
        assert_eq!(config.posts[0].subline, None);
        assert_eq!(config.posts[0].source_path, PathBuf::from("hello.md"));
    }

    #[test]
    fn rejects_duplicate_slugs() {
        let err = SiteConfig::from_toml(&with_posts(
            r#"
[[posts]]
slug = "a"
title = "A"
date = "Draft"
source_path = "a.md"

[[posts]]
slug = "a"
title = "Again"
date = "Draft"
source_path = "b.md"
"#,
        ))
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSlug(s) if s == "a"));
    }

    #[test]
    fn rejects_unsafe_slugs() {
        for slug in ["", "Hello", "a/b", "a b", "..", "caf\u{e9}"] {
            let err = SiteConfig::from_toml(&with_posts(&format!(
                "[[posts]]\nslug = {slug:?}\ntitle = \"T\"\ndate = \"D\"\nsource_path = \"x.md\"\n"
            )))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidSlug(_)), "{slug:?} accepted");
        }
    }

    #[test]
    fn landing_stylesheet_must_be_hashed() {
        let source = MINIMAL.replace(
            "landing_stylesheet = \"landing.css\"",
            "landing_stylesheet = \"other.css\"",
        );
        let err = SiteConfig::from_toml(&source).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownLandingStylesheet(_)));
    }

    #[test]
    fn blog_dir_must_stay_under_the_root() {
        for dir in ["", "/blog", "../blog", "blog/../other", "./blog"] {
            let source = MINIMAL.replace("blog_dir = \"blog\"", &format!("blog_dir = {dir:?}"));
            let err = SiteConfig::from_toml(&source).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidBlogDir(_)), "{dir:?} accepted");
        }

        let nested = MINIMAL.replace("blog_dir = \"blog\"", "blog_dir = \"site/blog\"");
        assert!(SiteConfig::from_toml(&nested).is_ok());
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        let err = SiteConfig::from_toml("name = \"tygor\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
