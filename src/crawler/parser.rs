//! HTML parser for extracting visible text and links
//!
//! This module handles parsing fetched markup to extract:
//! - Human-readable text (scripts, styles and other non-rendered content dropped)
//! - Links to follow (from <a> tags), resolved against the page URL

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("link selector is valid"));

/// Elements whose text never renders
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that separate their text from neighbouring text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p",
    "pre", "section", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "ul",
];

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Visible text with whitespace collapsed to single spaces
    pub text: String,

    /// Followable links (absolute http/https URLs without a fragment)
    pub links: Vec<Url>,
}

/// Parses HTML content and extracts visible text and links
///
/// # Link Extraction Rules
///
/// Every `<a href>` is resolved against `base_url`. A link is kept only if the
/// resolved URL uses `http` or `https` and carries no `#fragment`, which also
/// drops `javascript:`, `mailto:` and `tel:` targets. Repeats are kept; the
/// visited set handles them.
///
/// # Example
///
/// ```
/// use contact_crawler::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><body><p>Mail info@example.com</p><a href="/about">About</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.text, "Mail info@example.com About");
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/about");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        text: extract_text(&document),
        links: extract_links(&document, base_url),
    }
}

/// Collects the human-readable text of the document
fn extract_text(document: &Html) -> String {
    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if HIDDEN_ELEMENTS.contains(&name) {
                continue;
            }

            let is_block = BLOCK_ELEMENTS.contains(&name);
            if is_block {
                out.push(' ');
            }
            collect_text(child_element, out);
            if is_block {
                out.push(' ');
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

/// Extracts all followable links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    document
        .select(&LINK_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    let followable = matches!(absolute_url.scheme(), "http" | "https")
        && absolute_url.fragment().is_none();

    followable.then_some(absolute_url)
}
