//! Page rendering.
//!
//! `Renderer` owns the Tera instance, the memoized post store, and the
//! structured-data builders; everything that turns settings and posts into
//! response bodies goes through it. Render methods return `NotFound` for
//! unknown slugs and out-of-range page numbers so callers can serve the
//! 404 page without special-casing.

pub mod codeify;

use std::sync::Arc;

use serde::Serialize;
use tera::{Context, Tera};

use crate::config::Settings;
use crate::feed;
use crate::paginate;
use crate::posts::{self, Post, PostError, PostSet, PostStore};
use crate::structured::{StructuredData, StructuredDataError};

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// The requested page, post, or document does not exist.
    #[error("page not found")]
    NotFound,

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("failed to load posts: {0}")]
    Posts(#[from] PostError),

    #[error("failed to build structured data: {0}")]
    StructuredData(#[from] StructuredDataError),
}

/// A post as templates see it.
#[derive(Serialize)]
struct PostContext<'a> {
    slug: &'a str,
    title: &'a str,
    url: &'a str,
    date: String,
    description: &'a str,
    contents: &'a str,
}

impl<'a> From<&'a Arc<Post>> for PostContext<'a> {
    fn from(post: &'a Arc<Post>) -> Self {
        Self {
            slug: &post.slug,
            title: &post.title,
            url: &post.full_url,
            date: post.date_str(),
            description: &post.description,
            contents: &post.contents,
        }
    }
}

pub struct Renderer {
    settings: Arc<Settings>,
    tera: Tera,
    store: PostStore,
    data: StructuredData,
}

impl Renderer {
    /// Load every template under the templates directory and set up the
    /// `codeify` function. Fails if any template has a syntax error.
    pub fn new(settings: Arc<Settings>) -> Result<Self, RenderError> {
        let glob = settings.templates_dir().join("**/*.html");
        let mut tera = Tera::new(&glob.to_string_lossy())?;
        codeify::register(&mut tera);

        // The glob only picks up .html; the feed stylesheet is loaded by name.
        let feed_style = settings.templates_dir().join(&settings.templates.feed_style);
        if feed_style.is_file() {
            tera.add_template_file(&feed_style, Some(&settings.templates.feed_style))?;
        }

        Ok(Self {
            settings: Arc::clone(&settings),
            tera,
            store: PostStore::new(),
            data: StructuredData::new(settings),
        })
    }

    /// The post snapshot, loading it on first use.
    pub fn posts(&self) -> Result<Arc<PostSet>, RenderError> {
        let set = self
            .store
            .get_or_load(|| posts::load_posts(&self.tera, &self.settings))?;
        Ok(set)
    }

    /// Render one page of the newest-first index. Pages are 1-indexed;
    /// out-of-range numbers (including 0) are `NotFound`.
    pub fn render_latest(&self, number: usize) -> Result<String, RenderError> {
        let posts = self.posts()?;
        let per_page = self.settings.render.posts_per_page;
        let page = paginate::select(posts.as_slice(), per_page, number)
            .ok_or(RenderError::NotFound)?;

        // The canonical URL of an index page is its newest post's URL.
        let canonical = page
            .items
            .first()
            .map(|post| format!("{}{}", self.settings.site.base_url, post.full_url))
            .unwrap_or_else(|| format!("{}/", self.settings.site.base_url));

        let mut context = self.base_context();
        let items: Vec<PostContext> = page.items.iter().map(PostContext::from).collect();
        context.insert("posts", &items);
        context.insert("prev_page", &page.prev);
        context.insert("next_page", &page.next);
        context.insert("canonical_url", &canonical);
        context.insert("meta_description", &self.settings.site.description);
        context.insert(
            "struct_data_src",
            &format!("/{}", self.settings.routes.index_json),
        );

        Ok(self.tera.render(&self.settings.templates.index, &context)?)
    }

    /// Render a single post page by slug.
    pub fn render_post(&self, slug: &str) -> Result<String, RenderError> {
        let posts = self.posts()?;
        let post = posts.get(slug).ok_or(RenderError::NotFound)?;

        let mut context = self.base_context();
        context.insert("post", &PostContext::from(post));
        context.insert(
            "canonical_url",
            &format!("{}{}", self.settings.site.base_url, post.full_url),
        );
        context.insert("meta_description", &post.description);
        context.insert("struct_data_src", &format!("/{}.json", post.slug));

        // A missing post template is a not-found page, not an internal error.
        match self.tera.render(&self.settings.templates.post, &context) {
            Ok(html) => Ok(html),
            Err(err) => match err.kind {
                tera::ErrorKind::TemplateNotFound(_) => Err(RenderError::NotFound),
                _ => Err(err.into()),
            },
        }
    }

    pub fn render_about(&self) -> Result<String, RenderError> {
        let mut context = self.base_context();
        context.insert("canonical_url", &self.settings.about_url());
        context.insert("meta_description", &self.settings.author.description);
        context.insert(
            "struct_data_src",
            &format!("/{}", self.settings.routes.about_json),
        );

        Ok(self.tera.render(&self.settings.templates.about, &context)?)
    }

    /// Render the archive: every post, newest first, undivided.
    pub fn render_archive(&self) -> Result<String, RenderError> {
        let posts = self.posts()?;

        let mut context = self.base_context();
        let items: Vec<PostContext> = posts.iter().map(PostContext::from).collect();
        context.insert("posts", &items);
        context.insert("canonical_url", &self.settings.archive_url());
        context.insert("meta_description", &self.settings.site.description);
        context.insert(
            "struct_data_src",
            &format!("/{}", self.settings.routes.archive_json),
        );

        Ok(self.tera.render(&self.settings.templates.archive, &context)?)
    }

    pub fn render_not_found(&self) -> Result<String, RenderError> {
        let context = self.base_context();
        Ok(self
            .tera
            .render(&self.settings.templates.not_found, &context)?)
    }

    /// The RSS feed document.
    pub fn render_feed(&self) -> Result<String, RenderError> {
        let posts = self.posts()?;
        Ok(feed::feed_xml(&self.settings, posts.as_slice()))
    }

    /// The XSL stylesheet the feed references, rendered as a template so it
    /// can share site variables.
    pub fn render_feed_style(&self) -> Result<String, RenderError> {
        let context = self.base_context();
        match self
            .tera
            .render(&self.settings.templates.feed_style, &context)
        {
            Ok(xsl) => Ok(xsl),
            Err(err) => match err.kind {
                tera::ErrorKind::TemplateNotFound(_) => Err(RenderError::NotFound),
                _ => Err(err.into()),
            },
        }
    }

    pub fn render_sitemap(&self) -> Result<String, RenderError> {
        let posts = self.posts()?;
        Ok(feed::sitemap_xml(&self.settings, posts.as_slice()))
    }

    /// Resolve a structured-data document by its URL name: the configured
    /// index/about/archive documents, or `{slug}.json` for a known post.
    pub fn structured_data(&self, name: &str) -> Result<serde_json::Value, RenderError> {
        let routes = &self.settings.routes;

        if name == routes.index_json {
            let posts = self.posts()?;
            return Ok(self.data.blog(posts.as_slice(), true)?);
        }
        if name == routes.about_json {
            return Ok(self.data.author());
        }
        if name == routes.archive_json {
            let posts = self.posts()?;
            return Ok(self.data.blog(posts.as_slice(), false)?);
        }

        let slug = name.strip_suffix(".json").ok_or(RenderError::NotFound)?;
        let posts = self.posts()?;
        let post = posts.get(slug).ok_or(RenderError::NotFound)?;
        Ok(self.data.article(&post))
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.settings.site);
        context.insert("routes", &self.settings.routes);
        context
    }
}
