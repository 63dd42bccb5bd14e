use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resource::{optional_text, required_text, FieldError, Resource, ResourceId};

/// A catalogued book as the backend stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Assigned by the backend, never reused
    pub id: ResourceId,
    pub title: String,
    pub author: String,
    /// Free-text label; older records have none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Writable fields of a book, sent on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl BookFields {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Marker type binding books to the generic gateway and client.
pub struct Books;

impl Resource for Books {
    const NAME: &'static str = "book";
    const COLLECTION: &'static str = "books";

    type Record = Book;
    type Fields = BookFields;

    fn validate(body: &Value) -> Result<BookFields, FieldError> {
        Ok(BookFields {
            title: required_text(body, "title")?,
            author: required_text(body, "author")?,
            category: optional_text(body, "category")?,
        })
    }

    fn id_of(record: &Book) -> ResourceId {
        record.id
    }
}
