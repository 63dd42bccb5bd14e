//! The resource contract shared by the gateway and the client.
//!
//! A [`Resource`] names a collection, its record type, and the subset of
//! fields a caller may write. Both sides are generic over it, so books and
//! categories share one gateway and one client implementation.

use std::fmt;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Backend-assigned identifier. Numeric on the wire, opaque to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(u64);

impl ResourceId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for ResourceId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Raised when a path segment is not a valid identifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("'{raw}' is not a numeric identifier")]
pub struct InvalidId {
    pub raw: String,
}

impl FromStr for ResourceId {
    type Err = InvalidId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        // u64::from_str accepts a leading '+', which the backend does not.
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidId {
                raw: raw.to_string(),
            });
        }
        raw.parse::<u64>().map(Self).map_err(|_| InvalidId {
            raw: raw.to_string(),
        })
    }
}

/// A request body that does not carry the fields a resource needs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("`{field}` is required")]
    Missing { field: &'static str },

    #[error("`{field}` must be a non-empty string")]
    NotText { field: &'static str },
}

/// A list-structured collection exposed over uniform CRUD endpoints.
pub trait Resource: Send + Sync + 'static {
    /// Singular noun used in messages, e.g. `book`.
    const NAME: &'static str;
    /// Collection path segment, locally and on the backend, e.g. `books`.
    const COLLECTION: &'static str;

    /// The full record as the backend returns it.
    type Record: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static;
    /// The caller-writable fields sent on create and update.
    type Fields: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static;

    /// Check an untrusted JSON body and normalize it into [`Self::Fields`].
    fn validate(body: &Value) -> Result<Self::Fields, FieldError>;

    fn id_of(record: &Self::Record) -> ResourceId;
}

/// Read a required, non-blank string field from a JSON object.
pub fn required_text(body: &Value, field: &'static str) -> Result<String, FieldError> {
    let object = body.as_object().ok_or(FieldError::NotAnObject)?;
    match object.get(field) {
        None | Some(Value::Null) => Err(FieldError::Missing { field }),
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Some(_) => Err(FieldError::NotText { field }),
    }
}

/// Read an optional string field; blank strings count as absent.
pub fn optional_text(body: &Value, field: &'static str) -> Result<Option<String>, FieldError> {
    let object = body.as_object().ok_or(FieldError::NotAnObject)?;
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.trim().to_string())),
        Some(_) => Err(FieldError::NotText { field }),
    }
}

/// Collection bodies come either wrapped as `{ "data": [...] }` or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListBody<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListBody::Wrapped { data } => data,
            ListBody::Bare(items) => items,
        }
    }
}

/// Item bodies come either wrapped as `{ "data": {...} }` or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ItemBody<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> ItemBody<T> {
    pub fn into_item(self) -> T {
        match self {
            ItemBody::Wrapped { data } => data,
            ItemBody::Bare(item) => item,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_ids_parse() {
        assert_eq!("42".parse::<ResourceId>(), Ok(ResourceId::new(42)));
        assert_eq!(ResourceId::new(7).to_string(), "7");
    }

    #[test]
    fn non_numeric_ids_are_rejected() {
        for raw in ["", "abc", "12a", "-3", "+3", "1.5", " 4"] {
            assert!(raw.parse::<ResourceId>().is_err(), "{raw:?} should fail");
        }
        let overflow = "99999999999999999999999";
        assert!(overflow.parse::<ResourceId>().is_err());
    }

    #[test]
    fn required_text_trims_and_rejects_blank() {
        let body = json!({"title": "  Dune ", "author": "   ", "year": 1965});
        assert_eq!(required_text(&body, "title"), Ok("Dune".to_string()));
        assert_eq!(
            required_text(&body, "author"),
            Err(FieldError::NotText { field: "author" })
        );
        assert_eq!(
            required_text(&body, "year"),
            Err(FieldError::NotText { field: "year" })
        );
        assert_eq!(
            required_text(&body, "isbn"),
            Err(FieldError::Missing { field: "isbn" })
        );
        assert_eq!(
            required_text(&json!(["Dune"]), "title"),
            Err(FieldError::NotAnObject)
        );
    }

    #[test]
    fn optional_text_treats_blank_as_absent() {
        let body = json!({"category": " ", "shelf": null, "tag": 3});
        assert_eq!(optional_text(&body, "category"), Ok(None));
        assert_eq!(optional_text(&body, "shelf"), Ok(None));
        assert_eq!(optional_text(&body, "missing"), Ok(None));
        assert_eq!(
            optional_text(&body, "tag"),
            Err(FieldError::NotText { field: "tag" })
        );
    }

    #[test]
    fn list_body_accepts_both_shapes() {
        let wrapped: ListBody<u32> = serde_json::from_value(json!({"data": [1, 2]})).unwrap();
        assert_eq!(wrapped.into_items(), vec![1, 2]);

        let bare: ListBody<u32> = serde_json::from_value(json!([3])).unwrap();
        assert_eq!(bare.into_items(), vec![3]);
    }
}
