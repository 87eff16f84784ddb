//! Posts: loading, metadata extraction, and the memoized store.
//!
//! A post is a plain HTML file in the posts directory (inside the templates
//! directory, so it renders through Tera like any other template). Its
//! metadata is mined from the rendered markup by `extract`.

pub mod extract;
mod store;

use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDateTime};

use crate::config::Settings;
pub use store::{PostSet, PostStore};

#[derive(thiserror::Error, Debug)]
pub enum PostError {
    #[error("failed to scan posts directory {path}: {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read post file metadata: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to render post template: {0}")]
    Template(#[from] tera::Error),
}

/// A single blog post, immutable once loaded.
#[derive(Debug)]
pub struct Post {
    /// URL-safe identifier, the filename stem
    pub slug: String,
    /// Site-absolute URL, e.g. `/post/crossing-the-alps/`
    pub full_url: String,
    /// Template name relative to the templates directory
    pub rel_path: String,
    /// Rendered HTML contents
    pub contents: String,
    pub title: String,
    pub description: String,
    /// Parsed from the markup, or load time if absent/malformed
    pub published: NaiveDateTime,
    /// Filesystem modification time
    pub modified: NaiveDateTime,
}

impl Post {
    /// Publish date in the display format posts embed in their markup.
    pub fn date_str(&self) -> String {
        self.published.format(extract::DATE_FORMAT).to_string()
    }
}

/// Scan the posts directory (non-recursively) and build every post.
///
/// Each `*.html` file is rendered through Tera with its own URL bound as
/// `post_url`, then mined for metadata. A post without an `<h3>` title is
/// excluded with a warning; a missing or malformed date falls back to the
/// current time.
pub fn load_posts(tera: &tera::Tera, settings: &Settings) -> Result<Vec<Post>, PostError> {
    let dir = settings.posts_dir();
    let entries = std::fs::read_dir(&dir).map_err(|source| PostError::Scan {
        path: dir.clone(),
        source,
    })?;

    let mut posts = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PostError::Scan {
            path: dir.clone(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }
        let (Some(slug), Some(file_name)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.file_name().and_then(|s| s.to_str()),
        ) else {
            continue;
        };

        let rel_path = format!("{}/{}", settings.routes.posts, file_name);
        let full_url = format!("/{}/{}/", settings.routes.posts, slug);

        let mut context = tera::Context::new();
        context.insert("post_url", &full_url);
        let contents = tera.render(&rel_path, &context)?;

        let meta = extract::extract(&contents);
        let Some(title) = meta.title else {
            tracing::warn!(post = %rel_path, "post has no <h3> title, excluding from the blog");
            continue;
        };
        let published = meta
            .published
            .unwrap_or_else(|| Local::now().naive_local());
        let modified: DateTime<Local> = entry.metadata()?.modified()?.into();

        posts.push(Post {
            slug: slug.to_string(),
            full_url,
            rel_path,
            contents,
            title,
            description: meta.description,
            published,
            modified: modified.naive_local(),
        });
    }

    Ok(posts)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::fs;

    use super::*;
    use crate::config::Settings;

    pub(crate) fn test_settings(root: &std::path::Path) -> Settings {
        let ini = root.join("blog.ini");
        fs::write(
            &ini,
            r#"
[site]
title = Test Blog
description = Test blog description
base_url = https://example.com
date_created = 2021-03-01

[render]
posts_per_page = 2

[author]
name = Chris
description = Blogger
email = chris@example.com
image = /static/portrait.jpg
job_title = Engineer
telephone = +1-555-0100
"#,
        )
        .expect("write test config");
        Settings::load(&ini).expect("test config should load")
    }

    pub(crate) fn write_post(root: &std::path::Path, slug: &str, date: &str, title: &str) {
        let posts_dir = root.join("templates/post");
        fs::create_dir_all(&posts_dir).expect("create posts dir");
        fs::write(
            posts_dir.join(format!("{slug}.html")),
            format!(
                "<!-- About {title} -->\n<h3>{title}</h3>\n<p id=\"date\">{date}</p>\n\
                 <p>Read more at <a href=\"{{{{ post_url | safe }}}}\">this post</a>.</p>"
            ),
        )
        .expect("write post");
    }

    fn tera_for(settings: &Settings) -> tera::Tera {
        let glob = settings.templates_dir().join("**/*.html");
        tera::Tera::new(&glob.to_string_lossy()).expect("tera should load")
    }

    #[test]
    fn test_load_posts_builds_metadata() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "alps", "Jan 02, 2021", "Crossing the Alps");
        let settings = test_settings(dir.path());
        let tera = tera_for(&settings);

        let posts = load_posts(&tera, &settings).unwrap();
        assert_eq!(posts.len(), 1);

        let post = &posts[0];
        assert_eq!(post.slug, "alps");
        assert_eq!(post.full_url, "/post/alps/");
        assert_eq!(post.title, "Crossing the Alps");
        assert_eq!(post.description, "About Crossing the Alps");
        assert_eq!(post.date_str(), "Jan 02, 2021");
        // The post body had access to its own URL while rendering
        assert!(post.contents.contains("href=\"/post/alps/\""));
    }

    #[test]
    fn test_post_without_title_is_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir = dir.path().join("templates/post");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(posts_dir.join("untitled.html"), "<p>No heading here</p>").unwrap();
        write_post(dir.path(), "titled", "Jan 02, 2021", "Titled");

        let settings = test_settings(dir.path());
        let tera = tera_for(&settings);
        let posts = load_posts(&tera, &settings).unwrap();

        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["titled"]);
    }

    #[test]
    fn test_malformed_date_falls_back_to_now() {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir = dir.path().join("templates/post");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(
            posts_dir.join("undated.html"),
            "<h3>Undated</h3><p id=\"date\">whenever</p>",
        )
        .unwrap();

        let settings = test_settings(dir.path());
        let tera = tera_for(&settings);
        let before = Local::now().naive_local();
        let posts = load_posts(&tera, &settings).unwrap();
        let after = Local::now().naive_local();

        assert_eq!(posts.len(), 1);
        assert!(posts[0].published >= before && posts[0].published <= after);
    }

    #[test]
    fn test_non_html_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "real", "Jan 02, 2021", "Real");
        let posts_dir = dir.path().join("templates/post");
        fs::write(posts_dir.join("notes.txt"), "not a post").unwrap();

        let settings = test_settings(dir.path());
        let tera = tera_for(&settings);
        let posts = load_posts(&tera, &settings).unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[test]
    fn test_missing_posts_directory_is_a_scan_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        let settings = test_settings(dir.path());
        let tera = tera::Tera::default();

        assert!(matches!(
            load_posts(&tera, &settings),
            Err(PostError::Scan { .. })
        ));
    }
}
