//! Pattern extraction over full page text
//!
//! Patterns are compiled once when the set is built. A pattern that fails to
//! compile is logged and dropped: it never produces matches, and the other
//! patterns in the set are unaffected.

use indexmap::{IndexMap, IndexSet};
use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// A pattern that could not be compiled
#[derive(Debug, Error)]
#[error("Failed to compile pattern '{name}': {source}")]
pub struct PatternError {
    pub name: String,
    #[source]
    pub source: regex::Error,
}

#[derive(Debug, Clone)]
struct NamedPattern {
    name: String,
    regex: Regex,
}

/// An ordered set of compiled, case-insensitive patterns
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<NamedPattern>,
    rejected: Vec<String>,
}

impl PatternSet {
    /// Compiles `(name, regex)` pairs into a pattern set
    ///
    /// Names are unique keys: a later entry with the same name replaces the
    /// earlier regex but keeps the earlier position.
    ///
    /// # Examples
    ///
    /// ```
    /// use pattern_scrape::extract::PatternSet;
    ///
    /// let set = PatternSet::compile([("ids", r"ID-\d+"), ("bad", "(["), ("ids", r"id-\d{2}")]);
    /// assert_eq!(set.names().collect::<Vec<_>>(), vec!["ids"]);
    /// assert_eq!(set.rejected(), ["bad".to_string()]);
    /// ```
    pub fn compile<I, N, R>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, R)>,
        N: Into<String>,
        R: Into<String>,
    {
        let mut by_name: IndexMap<String, String> = IndexMap::new();
        for (name, regex) in entries {
            by_name.insert(name.into(), regex.into());
        }

        let mut set = Self::default();
        for (name, source) in by_name {
            match RegexBuilder::new(&source).case_insensitive(true).build() {
                Ok(regex) => set.patterns.push(NamedPattern { name, regex }),
                Err(source) => {
                    let error = PatternError {
                        name: name.clone(),
                        source,
                    };
                    tracing::error!("{}", error);
                    set.rejected.push(name);
                }
            }
        }

        set
    }

    /// Number of usable patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Names of usable patterns, in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.name.as_str())
    }

    /// Names of patterns that failed to compile
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// Applies every pattern to `text`
    ///
    /// Each pattern yields its distinct matches in first-seen order. When a
    /// pattern has a capture group, the first group is collected instead of
    /// the whole match. Patterns with no match are absent from the result.
    pub fn extract(&self, text: &str) -> IndexMap<String, IndexSet<String>> {
        let mut results = IndexMap::new();

        for pattern in &self.patterns {
            let matches = find_all(&pattern.regex, text);
            if !matches.is_empty() {
                results.insert(pattern.name.clone(), matches);
            }
        }

        results
    }
}

/// Collects the distinct non-empty matches of a regex
fn find_all(regex: &Regex, text: &str) -> IndexSet<String> {
    if regex.captures_len() > 1 {
        regex
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        regex
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect()
    }
}
