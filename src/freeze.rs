//! Static site freezing.
//!
//! `Freezer` walks the same URL space the dynamic server exposes and writes
//! each response body into the output directory, laid out so a plain file
//! server with directory index support serves identical pages.

use std::fs;
use std::io;
use std::path::Path;

use crate::config::Settings;
use crate::render::{RenderError, Renderer};
use crate::{paginate, posts::PostSet};

#[derive(thiserror::Error, Debug)]
pub enum FreezeError {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize structured data: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// What a freeze produced, for reporting.
pub struct FreezeSummary {
    /// HTML pages written, the 404 page included
    pub pages: usize,
    /// Non-HTML documents written (feed, stylesheet, sitemap, JSON)
    pub documents: usize,
    /// Static files copied
    pub static_files: usize,
}

/// Index page numbers for a blog of `post_count` posts.
pub fn index_pages(post_count: usize, page_size: usize) -> impl Iterator<Item = usize> {
    1..=paginate::page_count(post_count, page_size)
}

/// Slugs of every post, newest first.
pub fn post_slugs(posts: &PostSet) -> impl Iterator<Item = &str> {
    posts.iter().map(|post| post.slug.as_str())
}

pub struct Freezer<'a> {
    settings: &'a Settings,
    renderer: &'a Renderer,
}

impl<'a> Freezer<'a> {
    pub fn new(settings: &'a Settings, renderer: &'a Renderer) -> Self {
        Self { settings, renderer }
    }

    /// Freeze the whole site. The output directory is cleared first so stale
    /// pages from earlier builds cannot survive.
    pub fn build(&self) -> Result<FreezeSummary, FreezeError> {
        let out = self.settings.output_dir();
        match fs::remove_dir_all(&out) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => return Err(err.into()),
            _ => {}
        }
        fs::create_dir_all(&out)?;

        let posts = self.renderer.posts()?;
        let routes = &self.settings.routes;
        let mut summary = FreezeSummary {
            pages: 0,
            documents: 0,
            static_files: 0,
        };

        // Index pages. Page 1 doubles as the site root.
        write_file(&out.join("index.html"), self.renderer.render_latest(1)?)?;
        summary.pages += 1;
        for number in index_pages(posts.len(), self.settings.render.posts_per_page) {
            let path = out
                .join(&routes.page)
                .join(number.to_string())
                .join("index.html");
            write_file(&path, self.renderer.render_latest(number)?)?;
            summary.pages += 1;
        }

        for slug in post_slugs(&posts) {
            let path = out.join(&routes.posts).join(slug).join("index.html");
            write_file(&path, self.renderer.render_post(slug)?)?;
            summary.pages += 1;
        }

        write_file(
            &out.join(&routes.about).join("index.html"),
            self.renderer.render_about()?,
        )?;
        write_file(
            &out.join(&routes.archive).join("index.html"),
            self.renderer.render_archive()?,
        )?;
        // Served for any unmatched path by the static host.
        write_file(&out.join("404.html"), self.renderer.render_not_found()?)?;
        summary.pages += 3;

        write_file(
            &out.join(&routes.rss).join("index.html"),
            self.renderer.render_feed()?,
        )?;
        write_file(
            &out.join(&self.settings.templates.feed_style),
            self.renderer.render_feed_style()?,
        )?;
        write_file(&out.join("sitemap.xml"), self.renderer.render_sitemap()?)?;
        summary.documents += 3;

        for name in [&routes.index_json, &routes.about_json, &routes.archive_json] {
            let document = self.renderer.structured_data(name)?;
            write_file(&out.join(name), serde_json::to_string(&document)?)?;
            summary.documents += 1;
        }
        for slug in post_slugs(&posts) {
            let name = format!("{slug}.json");
            let document = self.renderer.structured_data(&name)?;
            write_file(&out.join(name), serde_json::to_string(&document)?)?;
            summary.documents += 1;
        }

        let static_dir = self.settings.static_dir();
        if static_dir.is_dir() {
            summary.static_files += copy_dir(&static_dir, &out.join("static"))?;
            // robots.txt is served from the site root.
            let robots = static_dir.join("robots.txt");
            if robots.is_file() {
                fs::copy(&robots, out.join("robots.txt"))?;
                summary.static_files += 1;
            }
        }

        Ok(summary)
    }
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), FreezeError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

fn copy_dir(from: &Path, to: &Path) -> Result<usize, FreezeError> {
    fs::create_dir_all(to)?;
    let mut copied = 0;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}
