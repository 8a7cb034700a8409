use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse site config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no stylesheets configured")]
    NoStylesheets,

    #[error("landing stylesheet {0:?} is not one of the configured stylesheets")]
    UnknownLandingStylesheet(String),

    #[error("blog_dir {0:?} must be a relative path without '.' or '..' parts")]
    InvalidBlogDir(PathBuf),

    #[error("invalid slug {0:?}: use only lowercase letters, digits, '-' and '_'")]
    InvalidSlug(String),

    #[error("duplicate slug {0:?}")]
    DuplicateSlug(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid stylesheet link pattern: {0}")]
    Pattern(#[from] regex::Error),
}
