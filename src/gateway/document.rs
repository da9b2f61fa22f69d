//! Document coordinates and payloads

use crate::error::{GatewayError, Result};
use crate::network::document_path;
use serde::Serialize;

/// Index, type and id of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef<'a> {
    pub index: &'a str,
    pub doc_type: &'a str,
    pub id: &'a str,
}

impl<'a> DocumentRef<'a> {
    /// All three coordinates must be non-empty
    pub fn new(index: &'a str, doc_type: &'a str, id: &'a str) -> Result<Self> {
        for (name, value) in [("index", index), ("type", doc_type), ("id", id)] {
            if value.is_empty() {
                return Err(GatewayError::Config(format!("document {} must not be empty", name)));
            }
        }
        Ok(Self { index, doc_type, id })
    }

    pub fn path(&self) -> String {
        document_path([self.index, self.doc_type, self.id])
    }
}

/// Document body handed to save
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// JSON text sent as is
    Json(String),
    Value(serde_json::Value),
}

impl Payload {
    /// Serialize any value into a payload
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Payload::Value(serde_json::to_value(value)?))
    }

    pub fn into_body(self) -> Result<String> {
        match self {
            Payload::Json(text) => Ok(text),
            Payload::Value(value) => Ok(serde_json::to_string(&value)?),
        }
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Json(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Json(text.to_string())
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde::Serializer;

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot encode"))
        }
    }

    #[test]
    fn test_document_ref_requires_coordinates() {
        assert!(DocumentRef::new("logs", "event", "42").is_ok());
        for (index, doc_type, id) in [("", "event", "1"), ("logs", "", "1"), ("logs", "event", "")] {
            let err = DocumentRef::new(index, doc_type, id).unwrap_err();
            assert!(matches!(err, GatewayError::Config(_)));
        }
    }

    #[test]
    fn test_document_path() {
        let doc = DocumentRef::new("logs", "event", "a/b").unwrap();
        assert_eq!(doc.path(), "/logs/event/a%2Fb");
    }

    #[test]
    fn test_unencodable_payload() {
        let err = Payload::from_serialize(&Unencodable).unwrap_err();
        assert!(matches!(err, GatewayError::Encoding(_)));
    }
}
