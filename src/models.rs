use std::path::PathBuf;

use serde::Deserialize;

/// One blog entry from the site table.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub subline: Option<String>,
    pub date: String,
    /// Markdown source, relative to the site root.
    pub source_path: PathBuf,
}
