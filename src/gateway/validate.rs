//! Checks that run before anything is sent to the backend.

use axum::body::Bytes;
use axum::extract::{rejection::PathRejection, Path};
use bookshelf_http::AppError;
use serde_json::Value;

use crate::resource::{Resource, ResourceId};

/// Parse the `{id}` path segment of an item route.
pub fn parse_id<R: Resource>(raw: &str) -> Result<ResourceId, AppError> {
    raw.parse()
        .map_err(|_| AppError::validation(format!("invalid {} id", R::NAME)))
}

/// Like [`parse_id`], but also folds axum's own path rejections (such as a
/// segment that does not decode to UTF-8) into the same validation error.
pub fn path_id<R: Resource>(
    path: Result<Path<String>, PathRejection>,
) -> Result<ResourceId, AppError> {
    match path {
        Ok(Path(raw)) => parse_id::<R>(&raw),
        Err(rejection) => {
            tracing::debug!(resource = R::NAME, %rejection, "unreadable id segment");
            Err(AppError::validation(format!("invalid {} id", R::NAME)))
        }
    }
}

/// Parse and normalize a create/update body.
pub fn parse_fields<R: Resource>(body: &Bytes) -> Result<R::Fields, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::validation("request body is required"));
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| AppError::validation("request body must be valid JSON"))?;
    R::validate(&value).map_err(|e| AppError::validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::{BookFields, Books};
    use crate::modules::categories::models::Categories;

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation { message } => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn id_errors_name_the_resource() {
        assert_eq!(message(parse_id::<Books>("abc").unwrap_err()), "invalid book id");
        assert_eq!(
            message(parse_id::<Categories>("1e3").unwrap_err()),
            "invalid category id"
        );
        assert_eq!(parse_id::<Books>("12").unwrap(), ResourceId::new(12));
    }

    #[test]
    fn empty_and_malformed_bodies_are_rejected() {
        let err = parse_fields::<Books>(&Bytes::from_static(b"  ")).unwrap_err();
        assert_eq!(message(err), "request body is required");

        let err = parse_fields::<Books>(&Bytes::from_static(b"{title:")).unwrap_err();
        assert_eq!(message(err), "request body must be valid JSON");

        let err = parse_fields::<Books>(&Bytes::from_static(br#"{"title":"Dune"}"#)).unwrap_err();
        assert_eq!(message(err), "`author` is required");
    }

    #[test]
    fn valid_body_is_normalized() {
        let body = Bytes::from_static(br#"{"title":"Dune ","author":"Herbert","category":"SF"}"#);
        assert_eq!(
            parse_fields::<Books>(&body).unwrap(),
            BookFields::new("Dune", "Herbert").with_category("SF")
        );
    }
}
