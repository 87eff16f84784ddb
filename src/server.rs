//! The dynamic HTTP server.
//!
//! Routes are built from the configured URL segments, so renaming `post` to
//! `essay` in `blog.ini` moves every route with it. Handlers delegate to the
//! renderer; any failure other than a clean `NotFound` is logged and served
//! as the 404 page so internal errors never leak into responses.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use tower_http::services::ServeDir;

use crate::config::Settings;
use crate::render::{RenderError, Renderer};

/// Shared state: settings plus the renderer built from them.
pub struct App {
    pub settings: Arc<Settings>,
    pub renderer: Renderer,
}

/// Build the router from the configured route segments.
pub fn router(app: Arc<App>) -> Router {
    let routes = &app.settings.routes;

    Router::new()
        .route("/", get(index))
        .route(&format!("/{}/{{number}}", routes.page), get(page))
        .route(&format!("/{}/{{number}}/", routes.page), get(page))
        .route(&format!("/{}/{{slug}}/", routes.posts), get(post))
        .route(&format!("/{}/", routes.about), get(about))
        .route(&format!("/{}/", routes.archive), get(archive))
        .route(&format!("/{}/", routes.rss), get(rss_feed))
        .route(&format!("/{}", app.settings.templates.feed_style), get(feed_style))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
        .nest_service("/static", ServeDir::new(app.settings.static_dir()))
        .fallback(fallback)
        .with_state(app)
}

// =============================================================================
// Handlers
// =============================================================================

async fn index(State(app): State<Arc<App>>) -> Response {
    html_page(&app, app.renderer.render_latest(1))
}

async fn page(State(app): State<Arc<App>>, Path(number): Path<String>) -> Response {
    // Non-numeric page numbers take the not-found path, like page 0 does.
    match number.parse::<usize>() {
        Ok(number) => html_page(&app, app.renderer.render_latest(number)),
        Err(_) => not_found(&app),
    }
}

async fn post(State(app): State<Arc<App>>, Path(slug): Path<String>) -> Response {
    html_page(&app, app.renderer.render_post(&slug))
}

async fn about(State(app): State<Arc<App>>) -> Response {
    html_page(&app, app.renderer.render_about())
}

async fn archive(State(app): State<Arc<App>>) -> Response {
    html_page(&app, app.renderer.render_archive())
}

async fn rss_feed(State(app): State<Arc<App>>) -> Response {
    xml_page(&app, app.renderer.render_feed())
}

async fn feed_style(State(app): State<Arc<App>>) -> Response {
    xml_page(&app, app.renderer.render_feed_style())
}

async fn sitemap(State(app): State<Arc<App>>) -> Response {
    xml_page(&app, app.renderer.render_sitemap())
}

/// robots.txt is a static file but lives at the site root, outside /static.
async fn robots(State(app): State<Arc<App>>) -> Response {
    match tokio::fs::read_to_string(app.settings.static_dir().join("robots.txt")).await {
        Ok(body) => ([(header::CONTENT_TYPE, "text/plain")], body).into_response(),
        Err(_) => not_found(&app),
    }
}

/// Anything unrouted is either a structured-data document or a 404.
async fn fallback(State(app): State<Arc<App>>, uri: axum::http::Uri) -> Response {
    if let Some(name) = document_name(&app.settings.routes, uri.path()) {
        return match app.renderer.structured_data(name) {
            Ok(document) => Json(document).into_response(),
            Err(err) => render_failure(&app, err),
        };
    }
    not_found(&app)
}

/// The structured-data document a root-level path refers to, if any: one of
/// the configured blog/about/archive names (whatever they are called), or
/// `{slug}.json` for per-post documents.
fn document_name<'a>(routes: &crate::config::RoutesSection, path: &'a str) -> Option<&'a str> {
    let name = path.trim_start_matches('/');
    if name.is_empty() || name.contains('/') {
        return None;
    }
    if name == routes.index_json || name == routes.about_json || name == routes.archive_json {
        return Some(name);
    }
    name.ends_with(".json").then_some(name)
}

// =============================================================================
// Response helpers
// =============================================================================

fn html_page(app: &App, result: Result<String, RenderError>) -> Response {
    match result {
        Ok(html) => Html(html).into_response(),
        Err(err) => render_failure(app, err),
    }
}

fn xml_page(app: &App, result: Result<String, RenderError>) -> Response {
    match result {
        Ok(xml) => ([(header::CONTENT_TYPE, "application/xml")], xml).into_response(),
        Err(err) => render_failure(app, err),
    }
}

fn render_failure(app: &App, err: RenderError) -> Response {
    if !matches!(err, RenderError::NotFound) {
        tracing::error!(error = %err, "failed to render page");
    }
    not_found(app)
}

fn not_found(app: &App) -> Response {
    match app.renderer.render_not_found() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to render the 404 page");
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path as FsPath;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::config::RoutesSection;
    use crate::posts::tests::{test_settings, write_post};
    use crate::render::Renderer;

    fn test_router(root: &FsPath) -> Router {
        let templates = root.join("templates");
        fs::create_dir_all(templates.join("post")).unwrap();
        fs::write(
            templates.join("_index.html"),
            "{% for post in posts %}<h2>{{ post.title }}</h2>{% endfor %}",
        )
        .unwrap();
        fs::write(templates.join("_post.html"), "{{ post.contents | safe }}").unwrap();
        fs::write(templates.join("_about.html"), "About").unwrap();
        fs::write(templates.join("_archive.html"), "Archive").unwrap();
        fs::write(templates.join("_404.html"), "<h1>Page not found</h1>").unwrap();

        write_post(root, "january", "Jan 01, 2021", "January Post");
        write_post(root, "mid-january", "Jan 15, 2021", "Mid January Post");
        write_post(root, "february", "Feb 01, 2021", "February Post");

        let settings = Arc::new(test_settings(root));
        let renderer = Renderer::new(Arc::clone(&settings)).unwrap();
        router(Arc::new(App { settings, renderer }))
    }

    async fn get_status(router: &Router, path: &str) -> StatusCode {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        router.clone().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_page_route_with_and_without_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(dir.path());

        assert_eq!(get_status(&router, "/page/2").await, StatusCode::OK);
        assert_eq!(get_status(&router, "/page/2/").await, StatusCode::OK);
        assert_eq!(get_status(&router, "/page/3").await, StatusCode::NOT_FOUND);
        assert_eq!(get_status(&router, "/page/0").await, StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(&router, "/page/soon").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_html_and_document_routes() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(dir.path());

        assert_eq!(get_status(&router, "/").await, StatusCode::OK);
        assert_eq!(get_status(&router, "/post/january/").await, StatusCode::OK);
        assert_eq!(get_status(&router, "/about/").await, StatusCode::OK);
        assert_eq!(get_status(&router, "/archive/").await, StatusCode::OK);
        assert_eq!(get_status(&router, "/sitemap.xml").await, StatusCode::OK);
        assert_eq!(get_status(&router, "/index.json").await, StatusCode::OK);
        assert_eq!(get_status(&router, "/january.json").await, StatusCode::OK);
        assert_eq!(
            get_status(&router, "/no-such-page/").await,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(&router, "/missing.json").await,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_document_name_honors_configured_names() {
        let routes = RoutesSection {
            index_json: "blog-data".to_string(),
            ..RoutesSection::default()
        };

        // Configured names work without any extension convention
        assert_eq!(document_name(&routes, "/blog-data"), Some("blog-data"));
        assert_eq!(document_name(&routes, "/about.json"), Some("about.json"));
        // Per-post documents stay on the {slug}.json convention
        assert_eq!(document_name(&routes, "/a-slug.json"), Some("a-slug.json"));
        assert_eq!(document_name(&routes, "/nested/a.json"), None);
        assert_eq!(document_name(&routes, "/not-a-document"), None);
        assert_eq!(document_name(&routes, "/"), None);
    }
}
