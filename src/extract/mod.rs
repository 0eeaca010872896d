//! Extraction module: turns one fetched page into an extraction record
//!
//! Two complementary extractors run on every page:
//! - Selector extraction pulls text from elements matched by CSS selectors
//! - Pattern extraction runs regular expressions over the full page text
//!
//! Both are configured once through an [`ExtractionPlan`], which is shared by
//! every fetch task of a crawl.

mod defaults;
mod pattern;
mod plan;
mod record;
mod selector;

pub use defaults::{DEFAULT_PATTERNS, DEFAULT_SELECTORS};
pub use pattern::{PatternError, PatternSet};
pub use plan::ExtractionPlan;
pub use record::{ExtractionRecord, FieldValue};
pub use selector::{extract_selectors, SelectorGroup};

use scraper::{ElementRef, Html, Node};

/// Elements whose boundaries end a run of text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "caption", "dd", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "option", "p", "pre", "section", "table",
    "tbody", "td", "tfoot", "th", "thead", "title", "tr", "ul",
];

/// Returns the text content of a whole document
///
/// Text nodes are concatenated as they appear, so a match split by inline
/// markup (`contato@<strong>acme</strong>.com.br`) reads as one string. A
/// newline is inserted at block element boundaries so that adjacent cells
/// (`<td>a@b.com</td><td>Next</td>`) do not run together.
pub fn page_text(document: &Html) -> String {
    let mut text = String::new();
    collect_text(document.root_element(), &mut text);
    text
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    let block = BLOCK_ELEMENTS.contains(&child.value().name());
                    if block {
                        break_line(out);
                    }
                    collect_text(child, out);
                    if block {
                        break_line(out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn break_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_text_joins_inline_markup() {
        let document = Html::parse_document(
            "<html><body><p>Contato: contato@<strong>acme</strong>.com.br</p></body></html>",
        );
        assert_eq!(page_text(&document).trim(), "Contato: contato@acme.com.br");
    }

    #[test]
    fn test_page_text_breaks_between_cells() {
        let document = Html::parse_document(
            "<html><body><table><tr><td>a@b.com</td><td>Next</td></tr></table></body></html>",
        );
        assert_eq!(page_text(&document).trim(), "a@b.com\nNext");
    }

    #[test]
    fn test_page_text_keeps_source_whitespace() {
        let document = Html::parse_document("<p>Call <a href=\"tel:1\">555</a> 0100</p>");
        assert_eq!(page_text(&document).trim(), "Call 555 0100");
    }

    #[test]
    fn test_page_text_empty_document() {
        let document = Html::parse_document("");
        assert_eq!(page_text(&document), "");
    }
}
