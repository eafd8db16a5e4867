//! Business record and question/answer transcript.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::catalog::Catalog;

/// Errors raised when reading or writing record entries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// Key is not part of the catalog
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Imported answers must be a flat JSON object
    #[error("Expected a JSON object of answers")]
    NotAnObject,

    /// Imported answers must be strings or numbers
    #[error("Answer for {0} must be a string or number")]
    InvalidValue(String),
}

/// Answers keyed by catalog field.
///
/// Always holds exactly the catalog's key set, in catalog order.
/// Unanswered fields hold the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessRecord {
    entries: Vec<(&'static str, String)>,
}

impl BusinessRecord {
    /// An all-empty record for a catalog.
    pub fn empty(catalog: &Catalog) -> Self {
        Self {
            entries: catalog.iter().map(|f| (f.key, String::new())).collect(),
        }
    }

    /// Import answers from a flat JSON object.
    ///
    /// Missing keys stay empty; numbers are stored as their textual form.
    pub fn from_json(catalog: &Catalog, value: &serde_json::Value) -> Result<Self, RecordError> {
        let object = value.as_object().ok_or(RecordError::NotAnObject)?;
        let mut record = Self::empty(catalog);

        for (key, value) in object {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                _ => return Err(RecordError::InvalidValue(key.clone())),
            };
            record.set(key, text)?;
        }

        Ok(record)
    }

    /// Answer for a key, if the key exists.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Answer for a key, empty when unknown or unanswered.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Overwrite one answer.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), RecordError> {
        let slot = self
            .entries
            .iter_mut()
            .find(|(k, _)| *k == key)
            .ok_or_else(|| RecordError::UnknownField(key.to_string()))?;
        slot.1 = value.into();
        Ok(())
    }

    /// Iterate `(key, answer)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True only for a record built from an empty key set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every answer is blank.
    pub fn is_blank(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_empty())
    }

    /// Whether every field has a non-blank answer.
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(|(_, v)| !v.trim().is_empty())
    }

    /// Flat JSON object keyed by field.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
                .collect(),
        )
    }
}

impl Serialize for BusinessRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One question and the answer given to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    /// Field the answer was written to
    pub key: &'static str,
    /// Question text as asked
    pub question: String,
    /// Answer as given
    pub answer: String,
}

/// Ordered question/answer history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    entries: Vec<Exchange>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a transcript from a record, one entry per catalog field.
    pub fn rebuild(catalog: &Catalog, record: &BusinessRecord) -> Self {
        Self {
            entries: catalog
                .iter()
                .map(|field| Exchange {
                    key: field.key,
                    question: field.prompt.to_string(),
                    answer: record.value(field.key).to_string(),
                })
                .collect(),
        }
    }

    /// Append an exchange.
    pub fn push(&mut self, exchange: Exchange) {
        self.entries.push(exchange);
    }

    /// Remove every exchange.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of exchanges.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been answered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exchanges in order.
    pub fn entries(&self) -> &[Exchange] {
        &self.entries
    }

    /// Most recent answer recorded for a field.
    pub fn answer_for(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| e.answer.as_str())
    }

    /// Most recent exchange.
    pub fn last(&self) -> Option<&Exchange> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_has_catalog_keys() {
        let catalog = Catalog::marketing();
        let record = BusinessRecord::empty(&catalog);

        assert_eq!(record.len(), catalog.len());
        assert!(record.is_blank());
        assert!(!record.is_complete());
        let keys: Vec<_> = record.iter().map(|(k, _)| k).collect();
        let expected: Vec<_> = catalog.iter().map(|f| f.key).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_set_unknown_field() {
        let catalog = Catalog::marketing();
        let mut record = BusinessRecord::empty(&catalog);

        assert_eq!(
            record.set("favouriteColour", "blue"),
            Err(RecordError::UnknownField("favouriteColour".to_string()))
        );
        assert_eq!(record.len(), catalog.len());
    }

    #[test]
    fn test_serializes_flat_in_catalog_order() {
        let catalog = Catalog::marketing();
        let mut record = BusinessRecord::empty(&catalog);
        record.set("name", "Acme").unwrap();
        record.set("budget", "500").unwrap();

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.starts_with(r#"{"name":"Acme","industry":"""#));
        assert!(json.contains(r#""budget":"500""#));
        assert_eq!(serde_json::to_value(&record).unwrap(), record.to_json());
    }

    #[test]
    fn test_from_json_accepts_numbers() {
        let catalog = Catalog::marketing();
        let value = serde_json::json!({ "name": "Test Spa", "budget": 2000 });
        let record = BusinessRecord::from_json(&catalog, &value).unwrap();

        assert_eq!(record.value("name"), "Test Spa");
        assert_eq!(record.value("budget"), "2000");
        assert_eq!(record.value("industry"), "");
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        let catalog = Catalog::marketing();

        assert_eq!(
            BusinessRecord::from_json(&catalog, &serde_json::json!(["name"])),
            Err(RecordError::NotAnObject)
        );
        assert_eq!(
            BusinessRecord::from_json(&catalog, &serde_json::json!({ "name": true })),
            Err(RecordError::InvalidValue("name".to_string()))
        );
        assert_eq!(
            BusinessRecord::from_json(&catalog, &serde_json::json!({ "nickname": "x" })),
            Err(RecordError::UnknownField("nickname".to_string()))
        );
    }

    #[test]
    fn test_rebuild_transcript_covers_catalog() {
        let catalog = Catalog::marketing();
        let mut record = BusinessRecord::empty(&catalog);
        record.set("location", "Denver, CO").unwrap();

        let transcript = Transcript::rebuild(&catalog, &record);
        assert_eq!(transcript.len(), catalog.len());
        assert_eq!(transcript.answer_for("location"), Some("Denver, CO"));
        assert_eq!(transcript.answer_for("name"), Some(""));
        assert_eq!(
            transcript.entries()[3].question,
            "Where is your business located?"
        );
    }
}
