use indexmap::IndexMap;
use scraper::{ElementRef, Html, Selector};

/// A field filled from an ordered list of CSS selectors
///
/// All selectors in the group contribute: the field's values are the text of
/// every element matched by the first selector, then every element matched by
/// the second, and so on.
#[derive(Debug, Clone)]
pub struct SelectorGroup {
    field: String,
    selectors: Vec<Selector>,
}

impl SelectorGroup {
    /// Parses a selector group, skipping selectors that do not parse
    pub fn parse<S: AsRef<str>>(field: impl Into<String>, selectors: &[S]) -> Self {
        let field = field.into();
        let selectors = selectors
            .iter()
            .filter_map(|raw| match Selector::parse(raw.as_ref()) {
                Ok(selector) => Some(selector),
                Err(e) => {
                    tracing::warn!(
                        "Skipping invalid selector '{}' for field '{}': {:?}",
                        raw.as_ref(),
                        field,
                        e
                    );
                    None
                }
            })
            .collect();

        Self { field, selectors }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Number of usable selectors in the group
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Collects the text of every element matched by any selector
    pub fn extract(&self, document: &Html) -> Vec<String> {
        self.selectors
            .iter()
            .flat_map(|selector| document.select(selector))
            .filter_map(element_text)
            .collect()
    }
}

/// Applies every group to a document
///
/// A field with no matched text is absent from the result.
pub fn extract_selectors(document: &Html, groups: &[SelectorGroup]) -> IndexMap<String, Vec<String>> {
    let mut results = IndexMap::new();

    for group in groups {
        let values = group.extract(document);
        if !values.is_empty() {
            results.insert(group.field.clone(), values);
        }
    }

    results
}

/// Returns an element's trimmed text
///
/// Each text node is trimmed and the pieces concatenated. Elements without
/// text fall back to their `content` attribute, which is where `<meta>` tags
/// keep their value.
fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text: String = element.text().map(str::trim).collect();
    if !text.is_empty() {
        return Some(text);
    }

    element
        .value()
        .attr("content")
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}
