//! schema.org structured data for SEO.
//!
//! Every page references a JSON-LD document describing it; these builders
//! shape posts and settings into those documents. They are computed on
//! demand and never persisted.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::config::Settings;
use crate::posts::Post;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Date format used in structured-data fields.
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(thiserror::Error, Debug)]
pub enum StructuredDataError {
    /// A blog document with a main entity needs at least one post to point at.
    #[error("cannot build a main entity from an empty post list")]
    EmptyPostList,
}

/// Builds structured-data documents from the blog settings.
pub struct StructuredData {
    settings: Arc<Settings>,
}

impl StructuredData {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// The blog author as a schema.org Person.
    pub fn author(&self) -> Value {
        let author = &self.settings.author;
        json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "Person",
            "description": author.description,
            "email": author.email,
            "image": author.image,
            "jobTitle": author.job_title,
            "name": author.name,
            "telephone": author.telephone,
            "url": self.settings.about_url(),
        })
    }

    /// A single post as a schema.org BlogPosting.
    pub fn article(&self, post: &Post) -> Value {
        json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "BlogPosting",
            "articleBody": post.contents.replace('\n', "\\n"),
            "author": self.author(),
            "dateCreated": post.published.format(DATE_FORMAT).to_string(),
            "dateModified": post.modified.format(DATE_FORMAT).to_string(),
            "datePublished": post.published.format(DATE_FORMAT).to_string(),
            "description": post.description,
            "headline": post.title,
            "name": post.title,
            "url": format!("{}{}", self.settings.site.base_url, post.full_url),
        })
    }

    /// The whole blog, embedding up to `posts_per_page` newest articles.
    ///
    /// `main_entity` distinguishes the index page (which declares its first
    /// post as the main entity) from the archive page (which does not).
    pub fn blog(
        &self,
        posts: &[Arc<Post>],
        main_entity: bool,
    ) -> Result<Value, StructuredDataError> {
        if main_entity && posts.is_empty() {
            return Err(StructuredDataError::EmptyPostList);
        }

        let modified = posts
            .first()
            .map(|post| post.modified.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| self.settings.site.date_created.clone());

        let articles: Vec<Value> = posts
            .iter()
            .take(self.settings.render.posts_per_page)
            .map(|post| self.article(post))
            .collect();

        let mut blog = json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "Blog",
            "author": self.author(),
            "blogPost": articles,
            "dateCreated": self.settings.site.date_created,
            "dateModified": modified,
            "description": self.settings.site.description,
            "name": self.settings.site.title,
            "url": format!("{}/", self.settings.site.base_url),
        });

        if main_entity {
            let main = thing(&blog["blogPost"][0]);
            blog["mainEntity"] = main;
        }

        Ok(blog)
    }
}

/// Reduce an article document to a plain schema.org Thing reference.
fn thing(article: &Value) -> Value {
    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "Thing",
        "description": article["description"],
        "name": article["name"],
        "url": article["url"],
    })
}
