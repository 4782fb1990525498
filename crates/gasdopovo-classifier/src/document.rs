//! Document query capability
//!
//! The classifier only needs to find elements by selector, read their text and
//! test for presence. These traits keep the rule logic independent of the
//! HTML library; [`ScraperDocument`] is the implementation backed by
//! `scraper`/html5ever.

use gasdopovo_core::{Error, Result};
use scraper::{ElementRef, Html, Selector};

/// A parsed, queryable HTML document
pub trait DocumentQuery: Sized {
    /// Compiled selector type
    type Selector;

    /// Element handle borrowed from the document
    type Element<'a>: ElementQuery<Selector = Self::Selector>
    where
        Self: 'a;

    /// Parse a document
    ///
    /// Must not fail. Input that cannot be interpreted yields a document in
    /// which every query comes back empty.
    fn parse(html: &str) -> Self;

    /// Compile a CSS selector
    fn compile(css: &str) -> Result<Self::Selector>;

    /// The element all document-wide queries start from
    fn root(&self) -> Self::Element<'_>;
}

/// Queries scoped to one element's descendants
pub trait ElementQuery: Copy {
    /// Compiled selector type
    type Selector;

    /// First descendant matching `selector`, in document order
    fn find_first(&self, selector: &Self::Selector) -> Option<Self>;

    /// All descendants matching `selector`, in document order
    fn find_all(&self, selector: &Self::Selector) -> Vec<Self>;

    /// All descendant text concatenated, trimmed
    fn text(&self) -> String;

    /// Whether any descendant matches `selector`
    fn exists(&self, selector: &Self::Selector) -> bool {
        self.find_first(selector).is_some()
    }
}

/// Document backed by the `scraper` crate
///
/// html5ever recovers from any input, so parsing never fails; an empty or
/// garbage document simply has an empty body.
pub struct ScraperDocument {
    html: Html,
}

impl DocumentQuery for ScraperDocument {
    type Selector = Selector;
    type Element<'a> = ScraperElement<'a> where Self: 'a;

    fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    fn compile(css: &str) -> Result<Selector> {
        Selector::parse(css)
            .map_err(|e| Error::config(format!("invalid selector '{}': {}", css, e)))
    }

    fn root(&self) -> ScraperElement<'_> {
        ScraperElement(self.html.root_element())
    }
}

/// Element handle into a [`ScraperDocument`]
#[derive(Debug, Clone, Copy)]
pub struct ScraperElement<'a>(ElementRef<'a>);

impl<'a> ElementQuery for ScraperElement<'a> {
    type Selector = Selector;

    fn find_first(&self, selector: &Selector) -> Option<Self> {
        self.0.select(selector).next().map(ScraperElement)
    }

    fn find_all(&self, selector: &Selector) -> Vec<Self> {
        self.0.select(selector).map(ScraperElement).collect()
    }

    fn text(&self) -> String {
        self.0.text().collect::<String>().trim().to_string()
    }
}

/// Reduce every whitespace run to a single space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a data label: trim, drop one trailing colon, trim again
pub fn normalize_label(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed.strip_suffix(':').unwrap_or(trimmed).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sel(css: &str) -> Selector {
        ScraperDocument::compile(css).unwrap()
    }

    #[test]
    fn test_find_and_text() {
        let doc = ScraperDocument::parse(
            r#"<div class="a"> first <b>bold</b> </div><div class="a">second</div>"#,
        );
        let root = doc.root();

        let first = root.find_first(&sel(".a")).unwrap();
        assert_eq!(first.text(), "first bold");

        let all = root.find_all(&sel(".a"));
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].text(), "second");
    }

    #[test]
    fn test_scoped_queries() {
        let doc = ScraperDocument::parse(
            r#"<section id="one"><span class="x">1</span></section>
               <section id="two"></section>"#,
        );
        let root = doc.root();
        let sections = root.find_all(&sel("section"));

        assert!(sections[0].exists(&sel(".x")));
        assert!(!sections[1].exists(&sel(".x")));
        assert!(sections[1].find_first(&sel(".x")).is_none());
    }

    #[test]
    fn test_garbage_input_is_empty_document() {
        for input in ["", "<<<>>>", "\u{0}\u{1}", "<div class=", "</html></body>"] {
            let doc = ScraperDocument::parse(input);
            assert!(doc.root().find_all(&sel("div")).is_empty(), "input: {:?}", input);
        }
    }

    #[test]
    fn test_invalid_selector_is_config_error() {
        let err = ScraperDocument::compile("..broken[").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  X \n\t  Y  "), "X Y");
        assert_eq!(collapse_whitespace("\u{a0}A\u{a0}\u{a0}B"), "A B");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Status: "), "Status");
        assert_eq!(normalize_label("Status :"), "Status");
        assert_eq!(normalize_label("Hora: 10:30"), "Hora: 10:30");
        assert_eq!(normalize_label(":"), "");
    }

    proptest! {
        #[test]
        fn prop_collapsed_text_has_no_whitespace_runs(text in "\\PC{0,64}") {
            let collapsed = collapse_whitespace(&text);
            prop_assert!(!collapsed.contains("  "));
            prop_assert_eq!(collapsed.trim(), collapsed.as_str());
            prop_assert_eq!(collapse_whitespace(&collapsed), collapsed.clone());
        }
    }
}
