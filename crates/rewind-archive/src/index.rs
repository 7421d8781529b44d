use std::sync::LazyLock;

use scraper::{Html, Selector};
use thiserror::Error;

static LISTING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("pre").expect("listing selector is valid css"));
static LISTING_ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("pre a").expect("anchor selector is valid css"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("document has no <pre> listing block")]
    MissingListing,
}

/// Extracts subdirectory names from an autoindex-style HTML page, in document order.
pub fn parse_directory_index(html: &str) -> Result<Vec<String>, IndexError> {
    let document = Html::parse_document(html);
    if document.select(&LISTING).next().is_none() {
        return Err(IndexError::MissingListing);
    }

    let entries = document
        .select(&LISTING_ANCHORS)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(child_entry_name)
        .map(str::to_string)
        .collect();
    Ok(entries)
}

fn child_entry_name(href: &str) -> Option<&str> {
    let name = href.trim().strip_suffix('/')?;
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    // absolute links, query links and nested paths are not direct children
    if name.contains(['/', '?', '#', ':']) {
        return None;
    }
    Some(name)
}
