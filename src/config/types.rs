//! Configuration type definitions.
//!
//! These mirror the sections of `blog.ini`. They are pure data - loading and
//! validation live in `load`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// The full blog configuration, one field per INI section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub site: SiteSection,
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub routes: RoutesSection,
    #[serde(default)]
    pub templates: TemplatesSection,
    pub render: RenderSection,
    pub author: AuthorSection,

    /// Directory the config file was loaded from. All relative paths resolve
    /// against it. Not part of the INI file itself.
    #[serde(skip)]
    pub root: PathBuf,
}

// =============================================================================
// Sections
// =============================================================================

/// `[site]` - identity of the blog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSection {
    pub title: String,
    pub description: String,
    /// Absolute base URL without a trailing slash, e.g. `https://example.com`
    pub base_url: String,
    /// Date the blog was created, `YYYY-MM-DD`
    pub date_created: String,
}

/// `[paths]` - filesystem layout relative to the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsSection {
    #[serde(default = "default_templates_dir")]
    pub templates: PathBuf,
    #[serde(default = "default_static_dir")]
    pub r#static: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output: PathBuf,
}

/// `[routes]` - URL path segments and JSON resource names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesSection {
    #[serde(default = "default_posts_segment")]
    pub posts: String,
    #[serde(default = "default_page_segment")]
    pub page: String,
    #[serde(default = "default_about_segment")]
    pub about: String,
    #[serde(default = "default_archive_segment")]
    pub archive: String,
    #[serde(default = "default_rss_segment")]
    pub rss: String,
    #[serde(default = "default_index_json")]
    pub index_json: String,
    #[serde(default = "default_about_json")]
    pub about_json: String,
    #[serde(default = "default_archive_json")]
    pub archive_json: String,
}

/// `[templates]` - template file names inside the templates directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesSection {
    #[serde(default = "default_index_template")]
    pub index: String,
    #[serde(default = "default_post_template")]
    pub post: String,
    #[serde(default = "default_about_template")]
    pub about: String,
    #[serde(default = "default_archive_template")]
    pub archive: String,
    #[serde(default = "default_not_found_template")]
    pub not_found: String,
    #[serde(default = "default_feed_style_template")]
    pub feed_style: String,
}

/// `[render]` - rendering parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSection {
    /// Posts shown per index page; also bounds the blog JSON-LD post list.
    pub posts_per_page: usize,
}

/// `[author]` - fields for the Person structured data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSection {
    pub name: String,
    pub description: String,
    pub email: String,
    pub image: String,
    pub job_title: String,
    pub telephone: String,
}

// =============================================================================
// Derived paths and validation
// =============================================================================

impl Settings {
    /// Directory holding all Tera templates.
    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(&self.paths.templates)
    }

    /// Directory holding post HTML files, inside the templates directory so
    /// posts render through Tera like any other template.
    pub fn posts_dir(&self) -> PathBuf {
        self.templates_dir().join(&self.routes.posts)
    }

    /// Directory of pass-through static files (robots.txt, css, images).
    pub fn static_dir(&self) -> PathBuf {
        self.root.join(&self.paths.r#static)
    }

    /// Directory the frozen site is written to.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.paths.output)
    }

    /// Canonical URL of the about page.
    pub fn about_url(&self) -> String {
        format!("{}/{}/", self.site.base_url, self.routes.about)
    }

    /// Canonical URL of the archive page.
    pub fn archive_url(&self) -> String {
        format!("{}/{}/", self.site.base_url, self.routes.archive)
    }

    /// Check invariants that the INI format cannot express. Called once at
    /// load so a bad config fails at boot, not at first use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.posts_per_page < 1 {
            return Err(ConfigError::Validation(
                "render.posts_per_page must be at least 1".to_string(),
            ));
        }
        if self.site.base_url.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.base_url must not end with a slash".to_string(),
            ));
        }
        if NaiveDate::parse_from_str(&self.site.date_created, "%Y-%m-%d").is_err() {
            return Err(ConfigError::Validation(format!(
                "site.date_created is not a YYYY-MM-DD date: {:?}",
                self.site.date_created
            )));
        }
        for (key, segment) in [
            ("routes.posts", &self.routes.posts),
            ("routes.page", &self.routes.page),
            ("routes.about", &self.routes.about),
            ("routes.archive", &self.routes.archive),
            ("routes.rss", &self.routes.rss),
        ] {
            if segment.is_empty() || segment.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a single non-empty path segment, got {segment:?}"
                )));
            }
        }
        Ok(())
    }

    /// Resolve the root against the directory of the config file.
    pub fn with_root(mut self, config_path: &Path) -> Self {
        self.root = config_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        self
    }
}

// =============================================================================
// Defaults
// =============================================================================

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            templates: default_templates_dir(),
            r#static: default_static_dir(),
            output: default_output_dir(),
        }
    }
}

impl Default for RoutesSection {
    fn default() -> Self {
        Self {
            posts: default_posts_segment(),
            page: default_page_segment(),
            about: default_about_segment(),
            archive: default_archive_segment(),
            rss: default_rss_segment(),
            index_json: default_index_json(),
            about_json: default_about_json(),
            archive_json: default_archive_json(),
        }
    }
}

impl Default for TemplatesSection {
    fn default() -> Self {
        Self {
            index: default_index_template(),
            post: default_post_template(),
            about: default_about_template(),
            archive: default_archive_template(),
            not_found: default_not_found_template(),
            feed_style: default_feed_style_template(),
        }
    }
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_posts_segment() -> String {
    "post".to_string()
}

fn default_page_segment() -> String {
    "page".to_string()
}

fn default_about_segment() -> String {
    "about".to_string()
}

fn default_archive_segment() -> String {
    "archive".to_string()
}

fn default_rss_segment() -> String {
    "rss".to_string()
}

fn default_index_json() -> String {
    "index.json".to_string()
}

fn default_about_json() -> String {
    "about.json".to_string()
}

fn default_archive_json() -> String {
    "archive.json".to_string()
}

fn default_index_template() -> String {
    "_index.html".to_string()
}

fn default_post_template() -> String {
    "_post.html".to_string()
}

fn default_about_template() -> String {
    "_about.html".to_string()
}

fn default_archive_template() -> String {
    "_archive.html".to_string()
}

fn default_not_found_template() -> String {
    "_404.html".to_string()
}

fn default_feed_style_template() -> String {
    "rss.xsl".to_string()
}
