//! The `codeify` template function.
//!
//! Blog posts hand code snippets to `codeify` instead of escaping and
//! highlighting by hand. A snippet with an internal line break is a block:
//! syntax-highlighted (autumnus, tree-sitter based) and wrapped in `<pre>`.
//! Anything else is inline: HTML-escaped, never highlighted.

use std::collections::HashMap;

use autumnus::{HtmlLinkedBuilder, formatter::Formatter, languages::Language};

/// Register `codeify` on a Tera instance. Templates call it with named
/// arguments: `codeify(code="...", lang="py")`.
pub fn register(tera: &mut tera::Tera) {
    tera.register_function("codeify", codeify_fn);
}

fn codeify_fn(args: &HashMap<String, tera::Value>) -> tera::Result<tera::Value> {
    let code = args
        .get("code")
        .and_then(|value| value.as_str())
        .ok_or_else(|| tera::Error::msg("codeify requires a `code` string argument"))?;
    let lang = args.get("lang").and_then(|value| value.as_str());

    Ok(tera::Value::String(codeify(code, lang)))
}

/// Format a code snippet for embedding in a page. Pure function of its
/// inputs; leading and trailing whitespace is stripped either way.
pub fn codeify(code: &str, lang: Option<&str>) -> String {
    let code = code.trim();
    if code.contains('\n') {
        highlight_block(code, lang.unwrap_or(""))
    } else {
        format!("<code>{}</code>", tera::escape_html(code))
    }
}

/// Highlight a code block, falling back to an escaped plain block when the
/// language is unknown or the highlighter fails.
fn highlight_block(code: &str, language: &str) -> String {
    let lang = Language::guess(language, code);

    if matches!(lang, Language::PlainText)
        && !language.is_empty()
        && language != "plaintext"
        && language != "text"
    {
        return plain_block(code);
    }

    match HtmlLinkedBuilder::new().source(code).lang(lang).build() {
        Ok(formatter) => {
            let mut output: Vec<u8> = Vec::new();
            if formatter.format(&mut output).is_ok() {
                String::from_utf8(output).unwrap_or_else(|_| plain_block(code))
            } else {
                plain_block(code)
            }
        }
        Err(_) => plain_block(code),
    }
}

fn plain_block(code: &str) -> String {
    format!(
        "<pre><code class=\"code-block\">{}</code></pre>",
        tera::escape_html(code)
    )
}
