//! OpenAPI path fragments for a CRUD resource.

use bookshelf_http::error::allow_header;
use serde_json::{json, Value};

use super::{COLLECTION_METHODS, ITEM_METHODS};
use crate::resource::Resource;

/// How the backend shapes a collection listing, relayed as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    /// `{ "data": [...] }`
    Wrapped,
    /// `[...]`
    Bare,
}

impl ListShape {
    fn response<R: Resource>(self, record: &Value) -> Value {
        let items = json!({ "type": "array", "items": record });
        match self {
            ListShape::Wrapped => json_response(
                &format!("{} wrapped as {{ data: [...] }}", R::COLLECTION),
                json!({
                    "type": "object",
                    "properties": { "data": items }
                }),
            ),
            ListShape::Bare => json_response(&format!("{} as a bare array", R::COLLECTION), items),
        }
    }
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": schema }
        }
    })
}

/// Paths for `/` and `/{id}` relative to the module mount point, referring
/// to `record_schema` and `fields_schema` in `#/components/schemas`.
pub fn crud_paths<R: Resource>(
    record_schema: &str,
    fields_schema: &str,
    list_shape: ListShape,
) -> Value {
    let tag = R::COLLECTION;
    let record = json!({ "$ref": format!("#/components/schemas/{record_schema}") });
    let fields = json!({ "$ref": format!("#/components/schemas/{fields_schema}") });
    let id_param = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": format!("Numeric {} identifier", R::NAME),
        "schema": { "type": "integer", "format": "int64", "minimum": 0 }
    });
    let request_body = json!({
        "required": true,
        "content": { "application/json": { "schema": fields } }
    });

    json!({
        "/": {
            "get": {
                "summary": format!("List {}", R::COLLECTION),
                "tags": [tag],
                "responses": {
                    "200": list_shape.response::<R>(&record),
                    "405": error_response(&format!("Only {} are allowed", allow_header(COLLECTION_METHODS))),
                    "500": error_response("Backend unreachable or returned an unreadable body")
                }
            },
            "post": {
                "summary": format!("Create a {}", R::NAME),
                "tags": [tag],
                "requestBody": request_body,
                "responses": {
                    "201": json_response(&format!("Created {}", R::NAME), record.clone()),
                    "400": error_response("Invalid request body"),
                    "500": error_response("Backend unreachable or returned an unreadable body")
                }
            }
        },
        "/{id}": {
            "get": {
                "summary": format!("Fetch a {}", R::NAME),
                "tags": [tag],
                "parameters": [id_param],
                "responses": {
                    "200": json_response(&format!("The {}", R::NAME), record.clone()),
                    "400": error_response("Invalid identifier"),
                    "404": error_response("Backend status mirrored")
                }
            },
            "put": {
                "summary": format!("Update a {}", R::NAME),
                "tags": [tag],
                "parameters": [id_param],
                "requestBody": request_body,
                "responses": {
                    "200": json_response(&format!("Updated {}", R::NAME), record),
                    "400": error_response("Invalid identifier or body"),
                    "405": error_response(&format!("Only {} are allowed", allow_header(ITEM_METHODS))),
                    "404": error_response("Backend status mirrored")
                }
            },
            "delete": {
                "summary": format!("Delete a {}", R::NAME),
                "tags": [tag],
                "parameters": [id_param],
                "responses": {
                    "200": {
                        "description": "Backend acknowledgement, passed through",
                        "content": { "application/json": { "schema": {} } }
                    },
                    "400": error_response("Invalid identifier"),
                    "404": error_response("Backend status mirrored")
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::Books;
    use crate::modules::categories::models::Categories;

    #[test]
    fn item_paths_take_numeric_id() {
        let paths = crud_paths::<Categories>("Category", "CategoryFields", ListShape::Bare);
        assert_eq!(
            paths["/{id}"]["put"]["parameters"][0]["schema"]["type"],
            "integer"
        );
        assert_eq!(
            paths["/"]["post"]["requestBody"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/CategoryFields"
        );
        assert_eq!(paths["/"]["get"]["tags"][0], "categories");
    }

    #[test]
    fn listing_schema_follows_backend_shape() {
        let listing = |paths: &Value| {
            paths["/"]["get"]["responses"]["200"]["content"]["application/json"]["schema"].clone()
        };

        let categories = crud_paths::<Categories>("Category", "CategoryFields", ListShape::Bare);
        assert_eq!(listing(&categories)["type"], "array");
        assert_eq!(
            listing(&categories)["items"]["$ref"],
            "#/components/schemas/Category"
        );

        let books = crud_paths::<Books>("Book", "BookFields", ListShape::Wrapped);
        assert_eq!(listing(&books)["type"], "object");
        assert_eq!(
            listing(&books)["properties"]["data"]["items"]["$ref"],
            "#/components/schemas/Book"
        );
    }
}
