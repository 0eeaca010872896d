/// Built-in patterns, applied unless `default-patterns = false`
pub const DEFAULT_PATTERNS: &[(&str, &str)] = &[
    ("emails", r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"),
    (
        "phones",
        r"(?:\+55|0)?(?:\s|-)?(?:\d{2})(?:\s|-)?(?:9\s?)?\d{4}(?:\s|-)?\d{4}",
    ),
    (
        "websites",
        r"https?://(?:www\.)?[a-zA-Z0-9-]+\.[a-zA-Z]{2,}(?:/[^\s]*)?",
    ),
];

/// Built-in selector groups, applied unless `default-selectors = false`
pub const DEFAULT_SELECTORS: &[(&str, &[&str])] = &[
    ("title", &["h1", ".title", ".post-title"]),
    (
        "description",
        &["meta[name=\"description\"]", ".description", ".summary"],
    ),
    ("content", &["article", ".content", ".post-content", "main"]),
];
