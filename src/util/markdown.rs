//! Markdown rendering for assistant replies and stored conversations.
//!
//! Assistant text is model output and may be steered by whatever it was
//! shown, so raw HTML blocks and inline tags are dropped and link and image
//! destinations are limited to `http`, `https`, `mailto` and relative URLs.
//! Anything else is rewritten to `#` before the HTML reaches `inner_html`.

#[cfg(test)]
#[path = "markdown_test.rs"]
mod markdown_test;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

const ALLOWED_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Render `markdown` to HTML with tables, strikethrough, and task lists.
pub fn render_markdown_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options).filter_map(|event| match event {
        Event::Html(_) | Event::InlineHtml(_) => None,
        Event::Start(Tag::Link { link_type, dest_url, title, id }) => {
            Some(Event::Start(Tag::Link { link_type, dest_url: safe_destination(dest_url), title, id }))
        }
        Event::Start(Tag::Image { link_type, dest_url, title, id }) => {
            Some(Event::Start(Tag::Image { link_type, dest_url: safe_destination(dest_url), title, id }))
        }
        other => Some(other),
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Keep relative URLs and allowed schemes; everything else becomes `#`.
fn safe_destination(dest: CowStr<'_>) -> CowStr<'_> {
    // Browsers ignore whitespace and control characters inside a scheme.
    let compact: String = dest.chars().filter(|c| !c.is_ascii_whitespace() && !c.is_control()).collect();
    let scheme = compact
        .find(|c: char| matches!(c, ':' | '/' | '?' | '#'))
        .filter(|&at| compact[at..].starts_with(':'))
        .map(|at| compact[..at].to_ascii_lowercase());
    match scheme {
        Some(scheme) if !ALLOWED_SCHEMES.contains(&scheme.as_str()) => {
            log::warn!("dropping markdown link with scheme {scheme:?}");
            CowStr::Borrowed("#")
        }
        _ => dest,
    }
}
