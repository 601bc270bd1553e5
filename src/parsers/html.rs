use scraper::{Html, Selector};
use std::sync::LazyLock;

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector is valid"));

/// Collects the raw `href` of every anchor in the document, in document order
pub fn parse_links(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let links: Vec<String> = doc
        .select(&LINK_SELECTOR)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.to_string())
        .collect();

    ::log::debug!("HTML parser found {} links", links.len());
    if !links.is_empty() {
        ::log::trace!(
            "First few links: {:?}",
            links.iter().take(5).collect::<Vec<_>>()
        );
    }

    links
}

/// All text of the document concatenated as-is, for page-wide regex scans
pub fn page_text(doc: &Html) -> String {
    doc.root_element().text().collect()
}
