//! Search index model.
//!
//! The index is a JSON array of entries embedded into the page at build time.
//! Loading is lenient: a missing or non-string field reads as an empty string
//! and an element that is not an object becomes an empty entry, so one bad
//! record never takes the whole index down.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Index loading errors.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The payload is not valid JSON or not an array.
    #[error("invalid search index: {0}")]
    Json(#[from] serde_json::Error),
}

/// One indexable unit of documentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Display title, primary match target.
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,

    /// Free-text secondary match target. Not displayed.
    #[serde(default, deserialize_with = "lenient_string")]
    pub keywords: String,

    /// Section label, tertiary match target.
    #[serde(default, deserialize_with = "lenient_string")]
    pub section: String,

    /// Navigation target. Opaque to the search core.
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
}

impl Entry {
    /// Create an entry from its four fields.
    pub fn new(
        title: impl Into<String>,
        keywords: impl Into<String>,
        section: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            keywords: keywords.into(),
            section: section.into(),
            url: url.into(),
        }
    }

    /// Build an entry from an arbitrary JSON value.
    fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// Ordered, read-only collection of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchIndex {
    entries: Vec<Entry>,
}

impl<'de> Deserialize<'de> for SearchIndex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<Value>::deserialize(deserializer)?;
        Ok(Self {
            entries: raw.into_iter().map(Entry::from_value).collect(),
        })
    }
}

impl SearchIndex {
    /// Create an index from entries, keeping their order.
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Parse an index from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, IndexError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the index to compact JSON.
    pub fn to_json(&self) -> Result<String, IndexError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize the index to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, IndexError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// All entries in index order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Entry>> for SearchIndex {
    fn from(entries: Vec<Entry>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_from_json() {
        let json = r#"[
            {"title": "Install", "keywords": "setup", "section": "Guide", "url": "guide.html#install"},
            {"title": "Usage", "keywords": "run", "section": "Guide", "url": "guide.html#usage"}
        ]"#;

        let index = SearchIndex::from_json(json).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.entries()[0].title, "Install");
        assert_eq!(index.entries()[1].url, "guide.html#usage");
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let json = r#"[{"title": "Only Title"}]"#;
        let index = SearchIndex::from_json(json).unwrap();

        let entry = &index.entries()[0];
        assert_eq!(entry.title, "Only Title");
        assert_eq!(entry.keywords, "");
        assert_eq!(entry.section, "");
        assert_eq!(entry.url, "");
    }

    #[test]
    fn test_non_string_fields_become_empty() {
        let json = r#"[{"title": 42, "keywords": null, "section": ["a"], "url": "x.html"}]"#;
        let index = SearchIndex::from_json(json).unwrap();

        let entry = &index.entries()[0];
        assert_eq!(entry.title, "");
        assert_eq!(entry.keywords, "");
        assert_eq!(entry.section, "");
        assert_eq!(entry.url, "x.html");
    }

    #[test]
    fn test_non_object_element_keeps_position() {
        let json = r#"[17, {"title": "Second"}]"#;
        let index = SearchIndex::from_json(json).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.entries()[0], Entry::default());
        assert_eq!(index.entries()[1].title, "Second");
    }

    #[test]
    fn test_not_an_array() {
        let result = SearchIndex::from_json(r#"{"title": "x"}"#);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("invalid search index")
        );
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let index = SearchIndex::new(vec![Entry::new("A", "b", "C", "d.html")]);
        let json = index.to_json().unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"title\":\"A\""));
        assert_eq!(SearchIndex::from_json(&json).unwrap(), index);
    }
}
