//! Page shells for posts and the post listing.
//!
//! Everything here is a pure function of its inputs. Titles, sublines, dates
//! and fragments are authored content and go into the page unescaped.

use std::path::{Component, Path};

use crate::config::SiteConfig;
use crate::models::Post;

const LAYOUT_HTML: &str = include_str!("../templates/layout.html");
const HEADER_HTML: &str = include_str!("../templates/header.html");
const FOOTER_HTML: &str = include_str!("../templates/footer.html");

/// Relative path from a page `depth` levels below the site root back to it.
pub fn asset_prefix(depth: usize) -> String {
    if depth == 0 {
        return ".".to_string();
    }
    vec![".."; depth].join("/")
}

pub fn post_page(
    site: &SiteConfig,
    post: &Post,
    fragment: &str,
    depth: usize,
    version: &str,
) -> String {
    let content = format!(
        "<time class=\"post-date\">{}</time>\n      {}",
        post.date, fragment
    );
    let title = format!("{} - {}", post.title, site.name);
    render_page(site, &title, "blog-content", &content, depth, version)
}

pub fn index_page(site: &SiteConfig, posts: &[Post], depth: usize, version: &str) -> String {
    let blog_url = url_path(&site.blog_dir);

    let mut list_items = Vec::with_capacity(posts.len());
    for post in posts {
        let subline = match &post.subline {
            Some(subline) => format!("<span class=\"post-subline\">{subline}</span>"),
            None => String::new(),
        };
        list_items.push(format!(
            "<li>\n          <a href=\"/{}/{}/\">{}</a>\n          {}\n          <time class=\"post-date\">{}</time>\n        </li>",
            blog_url, post.slug, post.title, subline, post.date
        ));
    }

    let content = format!(
        "<h2 class=\"blog-index-heading\">Latest posts</h2>\n      <ul class=\"blog-list\">\n        {}\n      </ul>",
        list_items.join("\n        ")
    );
    let title = format!("Blog - {}", site.name);
    render_page(site, &title, "blog-content blog-index", &content, depth, version)
}

fn render_page(
    site: &SiteConfig,
    title: &str,
    main_class: &str,
    content: &str,
    depth: usize,
    version: &str,
) -> String {
    let prefix = asset_prefix(depth);

    let stylesheets = site
        .stylesheets
        .iter()
        .map(|sheet| format!("  <link rel=\"stylesheet\" href=\"{prefix}/{sheet}?v={version}\">"))
        .collect::<Vec<_>>()
        .join("\n");

    let header = fill(
        HEADER_HTML.trim_end(),
        &[
            ("prefix", prefix.as_str()),
            ("name", site.name.as_str()),
            ("logo", site.logo.as_str()),
            ("wordmark", site.wordmark.as_str()),
            ("repository", site.repository.as_str()),
        ],
    );
    let footer = fill(
        FOOTER_HTML.trim_end(),
        &[
            ("repository", site.repository.as_str()),
            ("license", site.license.as_str()),
        ],
    );

    fill(
        LAYOUT_HTML,
        &[
            ("title", title),
            ("stylesheets", stylesheets.as_str()),
            ("header", header.as_str()),
            ("main_class", main_class),
            ("content", content),
            ("footer", footer.as_str()),
        ],
    )
}

/// Replaces `{{ name }}` placeholders in one pass. Substituted values are not
/// scanned again, and unknown placeholders are kept as written.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };

        let key = after[..end].trim();
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(segment) => Some(segment.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
