//! RSS feed and sitemap generation.
//!
//! The feed is assembled with the `rss` crate; the sitemap is small enough
//! to write by hand. Both work from the already-loaded post snapshot, never
//! the filesystem.

use std::sync::Arc;

use chrono::{NaiveDateTime, TimeZone, Utc};
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder};

use crate::config::Settings;
use crate::posts::Post;

/// XML namespace for sitemaps.
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Build the RSS channel for the newest-first post list.
///
/// The channel's last build date is the modification time of the most
/// recent post, when there is one.
pub fn channel(settings: &Settings, posts: &[Arc<Post>]) -> rss::Channel {
    let items: Vec<rss::Item> = posts.iter().map(|post| post_to_item(settings, post)).collect();

    ChannelBuilder::default()
        .title(&settings.site.title)
        .link(format!("{}/", settings.site.base_url))
        .description(&settings.site.description)
        .last_build_date(posts.first().map(|post| rfc2822(post.modified)))
        .items(items)
        .build()
}

/// The feed as served: XML declaration, stylesheet reference, channel.
pub fn feed_xml(settings: &Settings, posts: &[Arc<Post>]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <?xml-stylesheet type=\"text/xsl\" href=\"/{}\"?>\n{}",
        settings.templates.feed_style,
        channel(settings, posts)
    )
}

/// Generate sitemap XML listing the about page and every post with its
/// last-modified date.
pub fn sitemap_xml(settings: &Settings, posts: &[Arc<Post>]) -> String {
    let mut xml = String::with_capacity(1024);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<urlset xmlns=\"{SITEMAP_NS}\">\n"));

    push_url(&mut xml, &settings.about_url(), None);
    for post in posts {
        let loc = format!("{}{}", settings.site.base_url, post.full_url);
        let lastmod = post.modified.format("%Y-%m-%d").to_string();
        push_url(&mut xml, &loc, Some(&lastmod));
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, lastmod: Option<&str>) {
    xml.push_str("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(loc)));
    if let Some(lastmod) = lastmod {
        xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
    }
    xml.push_str("  </url>\n");
}

fn post_to_item(settings: &Settings, post: &Post) -> rss::Item {
    let link = format!("{}{}", settings.site.base_url, post.full_url);
    ItemBuilder::default()
        .title(post.title.clone())
        .link(Some(link.clone()))
        .guid(GuidBuilder::default().permalink(true).value(link).build())
        .description(post.description.clone())
        .pub_date(rfc2822(post.published))
        .build()
}

/// Format a naive timestamp as RFC 2822, treating it as UTC.
fn rfc2822(time: NaiveDateTime) -> String {
    Utc.from_utc_datetime(&time).to_rfc2822()
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
