//! Post metadata extraction.
//!
//! Posts are plain HTML fragments; their metadata lives in the markup by
//! convention rather than in front matter:
//! - the publish date is the text of the element with `id="date"`,
//!   formatted like `Jan 02, 2021`
//! - the title is the text of the first `<h3>`
//! - the meta description is the first HTML comment

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Display and parse format for publish dates embedded in post markup.
pub const DATE_FORMAT: &str = "%b %d, %Y";

/// Metadata mined from rendered post HTML. `None` fields mean the
/// convention was not found in the markup; the caller decides the policy
/// (fallback for dates, exclusion for titles).
#[derive(Debug, Default)]
pub struct ExtractedMeta {
    pub published: Option<NaiveDateTime>,
    pub title: Option<String>,
    pub description: String,
}

/// Parse post HTML and pull out the conventional metadata fields.
pub fn extract(html: &str) -> ExtractedMeta {
    let Ok(dom) = tl::parse(html, tl::ParserOptions::default()) else {
        return ExtractedMeta::default();
    };
    let parser = dom.parser();

    let mut meta = ExtractedMeta::default();
    let mut description = None;

    for node in dom.nodes() {
        match node {
            tl::Node::Tag(tag) => {
                if meta.published.is_none()
                    && tag.attributes().id().map(|id| id.as_utf8_str()) == Some("date".into())
                {
                    meta.published = parse_post_date(tag.inner_text(parser).as_ref());
                }
                if meta.title.is_none() && tag.name().as_utf8_str().eq_ignore_ascii_case("h3") {
                    let text = tag.inner_text(parser).trim().to_string();
                    if !text.is_empty() {
                        meta.title = Some(text);
                    }
                }
            }
            tl::Node::Comment(bytes) => {
                if description.is_none() {
                    description = Some(comment_text(&bytes.as_utf8_str()));
                }
            }
            tl::Node::Raw(_) => {}
        }
    }

    meta.description = description.unwrap_or_default();
    meta
}

/// Parse a date string in the conventional post format. Malformed text is a
/// `None`, never an error; the loader substitutes the current time.
fn parse_post_date(text: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Strip comment delimiters from a raw comment node.
fn comment_text(raw: &str) -> String {
    raw.trim()
        .trim_start_matches("<!--")
        .trim_end_matches("-->")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = r#"
        <!-- A trip through the Alps -->
        <h3>Crossing the Alps</h3>
        <p id="date">Jan 02, 2021</p>
        <p>It started to snow.</p>
    "#;

    #[test]
    fn test_extract_full_post() {
        let meta = extract(POST);
        assert_eq!(meta.title.as_deref(), Some("Crossing the Alps"));
        assert_eq!(meta.description, "A trip through the Alps");
        let published = meta.published.expect("date should parse");
        assert_eq!(published.format("%Y-%m-%d").to_string(), "2021-01-02");
    }

    #[test]
    fn test_malformed_date_is_none() {
        let meta = extract(r#"<h3>Title</h3><p id="date">sometime in winter</p>"#);
        assert!(meta.published.is_none());
        assert_eq!(meta.title.as_deref(), Some("Title"));
    }

    #[test]
    fn test_missing_date_marker_is_none() {
        let meta = extract("<h3>Title</h3><p>No date here.</p>");
        assert!(meta.published.is_none());
    }

    #[test]
    fn test_missing_title_is_none() {
        let meta = extract(r#"<p id="date">Jan 02, 2021</p>"#);
        assert!(meta.title.is_none());
    }

    #[test]
    fn test_first_h3_wins() {
        let meta = extract("<h3>First</h3><h3>Second</h3>");
        assert_eq!(meta.title.as_deref(), Some("First"));
    }

    #[test]
    fn test_missing_comment_gives_empty_description() {
        let meta = extract("<h3>Title</h3>");
        assert_eq!(meta.description, "");
    }

    #[test]
    fn test_first_comment_wins() {
        let meta = extract("<!-- first --><h3>Title</h3><!-- second -->");
        assert_eq!(meta.description, "first");
    }

    #[test]
    fn test_date_text_is_trimmed() {
        let meta = extract("<h3>Title</h3><span id=\"date\">\n  Feb 01, 2021  </span>");
        let published = meta.published.expect("date should parse");
        assert_eq!(published.format("%Y-%m-%d").to_string(), "2021-02-01");
    }
}
