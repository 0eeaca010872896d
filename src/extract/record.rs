use indexmap::IndexMap;

/// Timestamp format stamped on every record
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single extracted value
///
/// Pattern and selector results are `Multi`; the aggregator explodes them
/// into one row per value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    Multi(Vec<String>),
}

impl FieldValue {
    /// Returns the values held by this field
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Scalar(value) => vec![value.as_str()],
            Self::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi(_))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multi(values)
    }
}

/// Everything extracted from one page
///
/// A field absent from `fields` had zero matches on that page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRecord {
    pub url: String,
    pub timestamp: String,
    pub fields: IndexMap<String, FieldValue>,
}

impl ExtractionRecord {
    /// Creates an empty record stamped with the current local time
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            fields: IndexMap::new(),
        }
    }

    /// Sets a field, replacing any previous value under the same name
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Returns true if any field was extracted
    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }
}
