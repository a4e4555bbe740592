//! Markdown-to-HTML rendering for exported drafts.
//!
//! A deliberately small, line-oriented renderer: each line is classified by
//! its prefix (first match wins) and emitted as a single HTML element.
//! Consecutive list items are wrapped in one `<ul>`. Ordered-list syntax
//! (`1. …`) renders as a plain paragraph — a fixed quirk of the exporter
//! that downstream documents rely on, not a bug.
//!
//! All functions are pure; file writing lives with the pipeline step.

use std::sync::LazyLock;

use regex::Regex;

static ORDERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+").expect("valid regex"));

/// Escape the five HTML-reserved characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Convert a Markdown body to an HTML fragment, line by line.
pub fn markdown_to_html(md: &str) -> String {
    let mut html_lines: Vec<String> = Vec::new();

    for line in md.lines() {
        if let Some(rest) = line.strip_prefix("# ") {
            html_lines.push(format!("<h1>{}</h1>", escape_html(rest.trim())));
        } else if let Some(rest) = line.strip_prefix("## ") {
            html_lines.push(format!("<h2>{}</h2>", escape_html(rest.trim())));
        } else if let Some(rest) = line.strip_prefix("> ") {
            html_lines.push(format!("<blockquote>{}</blockquote>", escape_html(rest.trim())));
        } else if let Some(rest) = line.strip_prefix("- ") {
            html_lines.push(format!("<li>{}</li>", escape_html(rest.trim())));
        } else if ORDERED_RE.is_match(line) {
            html_lines.push(format!("<p>{}</p>", escape_html(line.trim())));
        } else if line.trim().is_empty() {
            html_lines.push("<br/>".to_string());
        } else {
            html_lines.push(format!("<p>{}</p>", escape_html(line.trim())));
        }
    }

    wrap_list_items(html_lines).join("\n")
}

/// Wrap each contiguous run of `<li>` lines in a single `<ul>…</ul>`.
fn wrap_list_items(html_lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(html_lines.len());
    let mut in_ul = false;

    for line in html_lines {
        if line.starts_with("<li>") {
            if !in_ul {
                out.push("<ul>".to_string());
                in_ul = true;
            }
            out.push(line);
        } else {
            if in_ul {
                out.push("</ul>".to_string());
                in_ul = false;
            }
            out.push(line);
        }
    }

    if in_ul {
        out.push("</ul>".to_string());
    }
    out
}

/// Render a complete standalone HTML5 document for a draft.
pub fn render_document(title: &str, content_md: &str) -> String {
    let body = markdown_to_html(content_md);
    tracing::debug!(body_len = body.len(), "rendered markdown body");
    format!(
        "<!doctype html>\n\
         <html lang=\"ko\">\n\
         <head>\n\
         \x20\x20<meta charset=\"utf-8\"/>\n\
         \x20\x20<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>\n\
         \x20\x20<title>{}</title>\n\
         </head>\n\
         <body>\n\
         {}\n\
         </body>\n\
         </html>\n",
        escape_html(title),
        body
    )
}
