use crate::resolver::resolve;
use indexmap::IndexSet;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

static HREF_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href], link[href], script[href]").expect("static href selector")
});

static SRC_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[src], img[src]").expect("static src selector"));

/// The HTML element a reference was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReferenceKind {
    #[serde(rename = "a")]
    Anchor,
    #[serde(rename = "link")]
    Link,
    #[serde(rename = "script")]
    Script,
    #[serde(rename = "img")]
    Image,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 4] = [
        ReferenceKind::Anchor,
        ReferenceKind::Link,
        ReferenceKind::Script,
        ReferenceKind::Image,
    ];

    /// Lowercase element name, as written in the exported `Tag` column.
    pub fn tag(&self) -> &'static str {
        match self {
            ReferenceKind::Anchor => "a",
            ReferenceKind::Link => "link",
            ReferenceKind::Script => "script",
            ReferenceKind::Image => "img",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "a" => Some(ReferenceKind::Anchor),
            "link" => Some(ReferenceKind::Link),
            "script" => Some(ReferenceKind::Script),
            "img" => Some(ReferenceKind::Image),
            _ => None,
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A resolved outbound reference from one page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub url: String,
    pub kind: ReferenceKind,
}

impl Reference {
    pub fn new(url: impl Into<String>, kind: ReferenceKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }
}

/// Extract every distinct `(target, kind)` pair from a page body.
///
/// `href` is read from `<a>`, `<link>` and `<script>`; `src` from `<script>`
/// and `<img>`. All `href` references come first, then all `src` ones, each
/// in document order. A pair seen twice keeps its first position.
pub fn extract(page_url: &str, body: &str) -> IndexSet<Reference> {
    let document = Html::parse_document(body);

    let mut references = IndexSet::new();

    let hrefs = document
        .select(&HREF_SELECTOR)
        .filter_map(|element| attribute_reference(element, "href"));
    let srcs = document
        .select(&SRC_SELECTOR)
        .filter_map(|element| attribute_reference(element, "src"));

    for (raw, kind) in hrefs.chain(srcs) {
        let (index, added) = references.insert_full(Reference::new(resolve(page_url, raw), kind));
        if added {
            debug!("Found {} reference: {}", kind, references[index].url);
        }
    }

    references
}

fn attribute_reference<'a>(element: ElementRef<'a>, attr: &str) -> Option<(&'a str, ReferenceKind)> {
    let kind = ReferenceKind::from_tag(element.value().name())?;
    let value = element.value().attr(attr)?;
    Some((value, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(references: &IndexSet<Reference>) -> Vec<(&str, &str)> {
        references
            .iter()
            .map(|r| (r.url.as_str(), r.kind.tag()))
            .collect()
    }

    #[test]
    fn test_duplicate_anchor_collapses() {
        let html = r#"<html><body>
            <a href="/p">one</a>
            <img src="i.png">
            <a href="/p">two</a>
            <a href="/p">three</a>
        </body></html>"#;

        let references = extract("https://x/", html);
        assert_eq!(
            pairs(&references),
            vec![("https://x/p", "a"), ("https://x/i.png", "img")]
        );
    }

    #[test]
    fn test_repeated_reference_keeps_first_position() {
        let html = r#"<a href="/p">1</a><a href="/q">2</a><a href="/p">3</a><a href="/r">4</a>"#;

        let references = extract("https://x/", html);
        assert_eq!(
            pairs(&references),
            vec![("https://x/p", "a"), ("https://x/q", "a"), ("https://x/r", "a")]
        );
    }

    #[test]
    fn test_same_target_different_kinds_are_distinct() {
        let html = r#"<a href="/app.js">source</a><script src="/app.js"></script>"#;

        let references = extract("https://x/", html);
        assert_eq!(
            pairs(&references),
            vec![("https://x/app.js", "a"), ("https://x/app.js", "script")]
        );
    }

    #[test]
    fn test_script_href_and_src_both_examined() {
        let html = r#"<script href="/a.js" src="/b.js"></script>"#;

        let references = extract("https://x/", html);
        assert_eq!(
            pairs(&references),
            vec![("https://x/a.js", "script"), ("https://x/b.js", "script")]
        );
    }

    #[test]
    fn test_link_stylesheet() {
        let html = r#"<head><link rel="stylesheet" href="css/site.css"></head>"#;

        let references = extract("https://x/blog/post", html);
        assert_eq!(pairs(&references), vec![("https://x/blog/css/site.css", "link")]);
    }

    #[test]
    fn test_elements_without_attribute_skipped() {
        let html = r#"<a name="top">anchor</a><img alt="no src"><script>var x;</script><link rel="x">"#;

        assert!(extract("https://x/", html).is_empty());
    }

    #[test]
    fn test_unrelated_attributes_ignored() {
        let html = r#"<img href="/not-src.png"><a src="/not-href">x</a><iframe src="/frame"></iframe>"#;

        assert!(extract("https://x/", html).is_empty());
    }

    #[test]
    fn test_malformed_html_tolerated() {
        let html = r#"<html><body><div><a href="/unclosed"><p>text<img src="/pic.jpg""#;

        let references = extract("https://x/", html);
        assert!(references.contains(&Reference::new("https://x/unclosed", ReferenceKind::Anchor)));
    }

    #[test]
    fn test_empty_href_resolves_to_page() {
        let html = r#"<a href="">self</a>"#;

        let references = extract("https://x/page", html);
        assert_eq!(pairs(&references), vec![("https://x/page", "a")]);
    }

    #[test]
    fn test_hrefs_before_srcs() {
        let html = r#"<img src="/first.png"><a href="/second">x</a>"#;

        let references = extract("https://x/", html);
        assert_eq!(
            pairs(&references),
            vec![("https://x/second", "a"), ("https://x/first.png", "img")]
        );
    }

    #[test]
    fn test_reference_kind_tags_round_trip() {
        for kind in ReferenceKind::ALL {
            assert_eq!(ReferenceKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ReferenceKind::from_tag("IMG"), Some(ReferenceKind::Image));
        assert_eq!(ReferenceKind::from_tag("iframe"), None);
    }

    #[test]
    fn test_reference_kind_serializes_as_tag() {
        let json = serde_json::to_string(&ReferenceKind::Image).unwrap();
        assert_eq!(json, "\"img\"");
    }
}
