use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resource::{required_text, FieldError, Resource, ResourceId};

/// A category label. Books reference categories by free text only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: ResourceId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFields {
    pub name: String,
}

impl CategoryFields {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

pub struct Categories;

impl Resource for Categories {
    const NAME: &'static str = "category";
    const COLLECTION: &'static str = "categories";

    type Record = Category;
    type Fields = CategoryFields;

    fn validate(body: &Value) -> Result<CategoryFields, FieldError> {
        Ok(CategoryFields {
            name: required_text(body, "name")?,
        })
    }

    fn id_of(record: &Category) -> ResourceId {
        record.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn name_is_required() {
        assert_eq!(
            Categories::validate(&json!({})),
            Err(FieldError::Missing { field: "name" })
        );
        assert_eq!(
            Categories::validate(&json!({"name": " Sci-Fi "})),
            Ok(CategoryFields::new("Sci-Fi"))
        );
    }
}
