use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Anything that can be placed on a timeline.
pub trait Timestamped {
    /// Microseconds since the Unix epoch, if the item carries a timestamp.
    fn timestamp_micros(&self) -> Option<u64>;
}

/// A document as handed over by the data-fetch layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    /// Microseconds since the Unix epoch
    #[serde(default)]
    pub timestamp: Option<u64>,
    /// Render payload; opaque to this crate
    #[serde(flatten)]
    pub payload: serde_json::Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, timestamp: Option<u64>) -> Self {
        Self {
            id: id.into(),
            timestamp,
            payload: serde_json::Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// `content` payload field as text, when present.
    pub fn content(&self) -> Option<&str> {
        self.payload.get("content").and_then(Value::as_str)
    }
}

impl Timestamped for Document {
    fn timestamp_micros(&self) -> Option<u64> {
        self.timestamp
    }
}

impl<T: Timestamped> Timestamped for &T {
    fn timestamp_micros(&self) -> Option<u64> {
        (**self).timestamp_micros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_keeps_unknown_fields_as_payload() {
        let doc: Document = serde_json::from_value(json!({
            "id": "doc-1",
            "timestamp": 1_609_581_600_000_000u64,
            "content": "hello",
            "author": "@suzy.bxyz",
        }))
        .unwrap();

        assert_eq!(doc.id, "doc-1");
        assert_eq!(doc.timestamp, Some(1_609_581_600_000_000));
        assert_eq!(doc.content(), Some("hello"));
        assert_eq!(doc.payload["author"], json!("@suzy.bxyz"));
    }

    #[test]
    fn test_document_without_timestamp() {
        let doc: Document = serde_json::from_value(json!({ "id": "doc-2" })).unwrap();
        assert_eq!(doc.timestamp_micros(), None);
        assert!(doc.payload.is_empty());
    }
}
