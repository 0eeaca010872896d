use crate::config::ExtractionConfig;
use crate::extract::{
    extract_selectors, page_text, ExtractionRecord, PatternSet, SelectorGroup, DEFAULT_PATTERNS,
    DEFAULT_SELECTORS,
};
use crate::ConfigError;
use indexmap::IndexMap;
use scraper::Html;

/// Compiled patterns and parsed selector groups for one crawl
///
/// The plan is built once from configuration and then shared read-only by
/// every fetch task.
#[derive(Debug, Clone)]
pub struct ExtractionPlan {
    patterns: PatternSet,
    selectors: Vec<SelectorGroup>,
}

impl ExtractionPlan {
    /// Creates a plan from already-built parts
    pub fn new(patterns: PatternSet, selectors: Vec<SelectorGroup>) -> Self {
        Self {
            patterns,
            selectors,
        }
    }

    /// Builds the plan from configuration
    ///
    /// Built-in patterns and selector groups come first; user entries with the
    /// same name replace them. Fails if no pattern is configured at all. A
    /// pattern that is configured but does not compile is not an error here:
    /// it is logged and simply never matches.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        let mut patterns: Vec<(String, String)> = Vec::new();
        if config.default_patterns {
            patterns.extend(
                DEFAULT_PATTERNS
                    .iter()
                    .map(|(name, regex)| (name.to_string(), regex.to_string())),
            );
        }
        patterns.extend(
            config
                .pattern
                .iter()
                .map(|entry| (entry.name.clone(), entry.regex.clone())),
        );

        if patterns.is_empty() {
            return Err(ConfigError::Validation(
                "at least one extraction pattern is required".to_string(),
            ));
        }

        let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
        if config.default_selectors {
            for (field, selectors) in DEFAULT_SELECTORS {
                groups.insert(
                    field.to_string(),
                    selectors.iter().map(|s| s.to_string()).collect(),
                );
            }
        }
        for entry in &config.selector {
            groups.insert(entry.field.clone(), entry.selectors.clone());
        }

        let selectors = groups
            .into_iter()
            .map(|(field, selectors)| SelectorGroup::parse(field, selectors.as_slice()))
            .collect();

        Ok(Self::new(PatternSet::compile(patterns), selectors))
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    pub fn selectors(&self) -> &[SelectorGroup] {
        &self.selectors
    }

    /// Extracts a record from one page's HTML
    ///
    /// Selector fields are filled first; a pattern with the same name as a
    /// selector field replaces it.
    pub fn extract(&self, url: &str, html: &str) -> ExtractionRecord {
        let document = Html::parse_document(html);
        self.extract_document(url, &document)
    }

    /// Extracts a record from an already-parsed page
    pub fn extract_document(&self, url: &str, document: &Html) -> ExtractionRecord {
        let mut record = ExtractionRecord::new(url);

        for (field, values) in extract_selectors(document, &self.selectors) {
            record.insert(field, values);
        }

        let text = page_text(document);
        for (name, matches) in self.patterns.extract(&text) {
            record.insert(name, matches.into_iter().collect::<Vec<_>>());
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PatternEntry, SelectorEntry};
    use crate::extract::FieldValue;

    fn config() -> ExtractionConfig {
        ExtractionConfig {
            default_patterns: false,
            default_selectors: false,
            pattern: vec![PatternEntry {
                name: "emails".to_string(),
                regex: r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}".to_string(),
            }],
            selector: vec![],
        }
    }

    #[test]
    fn test_defaults_included() {
        let mut cfg = config();
        cfg.default_patterns = true;
        cfg.default_selectors = true;
        let plan = ExtractionPlan::from_config(&cfg).unwrap();

        assert_eq!(
            plan.patterns().names().collect::<Vec<_>>(),
            vec!["emails", "phones", "websites"]
        );
        let fields: Vec<&str> = plan.selectors().iter().map(|g| g.field()).collect();
        assert_eq!(fields, vec!["title", "description", "content"]);
    }

    #[test]
    fn test_user_pattern_overrides_default() {
        let mut cfg = config();
        cfg.default_patterns = true;
        cfg.pattern[0].regex = r"\w+@corp\.com".to_string();
        let plan = ExtractionPlan::from_config(&cfg).unwrap();

        let record = plan.extract("https://a.com/", "<p>x@corp.com y@other.com</p>");
        assert_eq!(
            record.get("emails"),
            Some(&FieldValue::Multi(vec!["x@corp.com".to_string()]))
        );
    }

    #[test]
    fn test_zero_patterns_fails() {
        let mut cfg = config();
        cfg.pattern.clear();
        assert!(matches!(
            ExtractionPlan::from_config(&cfg),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_extract_combines_selectors_and_patterns() {
        let mut cfg = config();
        cfg.selector.push(SelectorEntry {
            field: "heading".to_string(),
            selectors: vec!["h1".to_string(), "h2".to_string()],
        });
        let plan = ExtractionPlan::from_config(&cfg).unwrap();

        let record = plan.extract(
            "https://a.com/",
            "<html><body><h1>One</h1><h2>Two</h2><p>contact: a@b.com and a@b.com</p></body></html>",
        );

        assert_eq!(record.url, "https://a.com/");
        assert_eq!(
            record.get("heading"),
            Some(&FieldValue::Multi(vec!["One".to_string(), "Two".to_string()]))
        );
        assert_eq!(
            record.get("emails"),
            Some(&FieldValue::Multi(vec!["a@b.com".to_string()]))
        );
    }

    #[test]
    fn test_email_split_by_inline_markup() {
        let plan = ExtractionPlan::from_config(&config()).unwrap();
        let record = plan.extract(
            "https://a.com.br/",
            "<p>Contato: contato@<strong>acme</strong>.com.br</p>",
        );
        assert_eq!(
            record.get("emails"),
            Some(&FieldValue::Multi(vec!["contato@acme.com.br".to_string()]))
        );
    }

    #[test]
    fn test_page_without_matches_has_no_fields() {
        let plan = ExtractionPlan::from_config(&config()).unwrap();
        let record = plan.extract("https://a.com/", "<p>nothing here</p>");
        assert!(!record.has_fields());
        assert!(record.get("emails").is_none());
    }
}
