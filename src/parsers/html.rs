use crate::error::ExtractionError;
use crate::parsers::{Extraction, PageSnapshot};
use crate::results::{ExtractedRecord, Tag};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text never shows up in rendered text
const HIDDEN_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "template", "noscript"];

/// Elements rendered as their own block, so their text is set apart from neighbours
const BLOCK_ELEMENTS: [&str; 33] = [
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul", "caption",
];

/// Extracts records, anchor links and image sources from a rendered page
pub fn extract(snapshot: &PageSnapshot) -> Result<Extraction, ExtractionError> {
    let doc = Html::parse_document(&snapshot.html);
    let base = document_base(&doc, &snapshot.url)?;

    let mut extraction = Extraction::default();

    // All records of one tag kind before the next kind
    for tag in Tag::ALL {
        let selector = selector(tag.as_str())?;
        for element in doc.select(&selector) {
            let content = inner_text(&element);
            let href = match tag {
                Tag::A => element.value().attr("href").map(|raw| resolve_attr(raw, &base)),
                _ => None,
            };

            if content.is_empty() && href.is_none() {
                continue;
            }

            if let Some(href) = &href {
                extraction.links.push(href.clone());
            }
            extraction.records.push(ExtractedRecord { tag, content, href });
        }
    }

    let img_selector = selector("img")?;
    extraction.images = doc
        .select(&img_selector)
        .filter_map(|img| img.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(|src| resolve_attr(src, &base))
        .collect();

    ::log::debug!(
        "Extracted {} records, {} links, {} images from {}",
        extraction.records.len(),
        extraction.links.len(),
        extraction.images.len(),
        snapshot.url
    );

    Ok(extraction)
}

fn selector(css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Base URL for relative references: the first `<base href>`, else the page URL
fn document_base(doc: &Html, page_url: &Url) -> Result<Url, ExtractionError> {
    let base_selector = selector("base[href]")?;
    let base = doc
        .select(&base_selector)
        .next()
        .and_then(|base| base.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone());
    Ok(base)
}

/// Resolve a URL attribute the way the DOM reflects it; unparsable values come back verbatim
fn resolve_attr(raw: &str, base: &Url) -> String {
    match base.join(raw.trim()) {
        Ok(url) => url.to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Visible text of an element, whitespace collapsed and trimmed
pub(crate) fn inner_text(element: &ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: &ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child.value().name();
        if HIDDEN_TEXT_ELEMENTS.contains(&name) {
            continue;
        }
        if name == "br" {
            out.push(' ');
            continue;
        }

        let block = BLOCK_ELEMENTS.contains(&name);
        if block {
            out.push(' ');
        }
        collect_text(&child, out);
        if block {
            out.push(' ');
        }
    }
}
