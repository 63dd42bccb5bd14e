//! Generic CRUD gateway in front of the backend.
//!
//! Every request walks the same path: method check (axum routing plus a
//! JSON 405 fallback), identifier check, body check, then exactly one
//! forwarding attempt whose outcome is mirrored back to the caller.

pub mod openapi;
pub mod upstream;
pub mod validate;

use std::marker::PhantomData;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bookshelf_http::AppError;
use serde::de::IgnoredAny;
use serde_json::Value;

use crate::resource::{Resource, ResourceId};
use upstream::{Upstream, UpstreamReply};
use validate::{parse_fields, path_id};

/// Methods served on `/api/<collection>`
pub const COLLECTION_METHODS: &[Method] = &[Method::GET, Method::POST];
/// Methods served on `/api/<collection>/{id}`
pub const ITEM_METHODS: &[Method] = &[Method::GET, Method::PUT, Method::DELETE];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    List,
    Fetch,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Used when the backend fails without a readable message.
    fn default_message<R: Resource>(self) -> String {
        match self {
            Operation::List => format!("failed to list {}", R::COLLECTION),
            Operation::Fetch => format!("failed to fetch {}", R::NAME),
            Operation::Create => format!("failed to create {}", R::NAME),
            Operation::Update => format!("failed to update {}", R::NAME),
            Operation::Delete => format!("failed to delete {}", R::NAME),
        }
    }
}

/// Stateless per request; holds only the shared upstream handle.
pub struct ResourceGateway<R> {
    upstream: Upstream,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceGateway<R> {
    fn clone(&self) -> Self {
        Self {
            upstream: self.upstream.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceGateway<R> {
    pub fn new(upstream: Upstream) -> Self {
        Self {
            upstream,
            _resource: PhantomData,
        }
    }

    /// Collection and item routes, relative to the module mount point.
    pub fn routes(self) -> Router {
        Router::new()
            .route(
                "/",
                get(list::<R>)
                    .post(create::<R>)
                    .fallback(|method: Method| async move {
                        AppError::method_not_allowed(method, COLLECTION_METHODS)
                    }),
            )
            .route(
                "/{id}",
                get(fetch::<R>)
                    .put(update::<R>)
                    .delete(remove::<R>)
                    .fallback(|method: Method| async move {
                        AppError::method_not_allowed(method, ITEM_METHODS)
                    }),
            )
            .with_state(self)
    }

    async fn forward(
        &self,
        operation: Operation,
        method: Method,
        id: Option<ResourceId>,
        body: Option<Value>,
    ) -> Result<Response, AppError> {
        let id = id.map(|id| id.to_string());
        let mut segments = vec![R::COLLECTION];
        if let Some(id) = id.as_deref() {
            segments.push(id);
        }

        let reply = self
            .upstream
            .send(method, &segments, body.as_ref())
            .await?;
        relay::<R>(operation, reply)
    }
}

/// Turn a backend reply into the local response.
fn relay<R: Resource>(operation: Operation, reply: UpstreamReply) -> Result<Response, AppError> {
    let UpstreamReply { status, body } = reply;

    if !status.is_success() {
        let message =
            backend_message(&body).unwrap_or_else(|| operation.default_message::<R>());
        tracing::warn!(
            resource = R::COLLECTION,
            operation = ?operation,
            status = status.as_u16(),
            "backend rejected request"
        );
        return Err(AppError::upstream(status, message));
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        // 204 may not carry a body; anything else gets an empty JSON object.
        if status == StatusCode::NO_CONTENT {
            return Ok(status.into_response());
        }
        return Ok((status, Json(serde_json::json!({}))).into_response());
    }

    // Checked for well-formedness only; the bytes go out as received.
    serde_json::from_slice::<IgnoredAny>(&body).with_context(|| {
        format!(
            "backend returned a non-JSON body for {:?} on {}",
            operation,
            R::COLLECTION
        )
    })?;
    Ok((
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response())
}

/// The `message` of a backend error body, if there is one.
fn backend_message(body: &Bytes) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

async fn list<R: Resource>(
    State(gateway): State<ResourceGateway<R>>,
) -> Result<Response, AppError> {
    gateway
        .forward(Operation::List, Method::GET, None, None)
        .await
}

async fn fetch<R: Resource>(
    State(gateway): State<ResourceGateway<R>>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let id = path_id::<R>(raw_id)?;
    gateway
        .forward(Operation::Fetch, Method::GET, Some(id), None)
        .await
}

async fn create<R: Resource>(
    State(gateway): State<ResourceGateway<R>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let fields = parse_fields::<R>(&body)?;
    let body = serde_json::to_value(&fields).context("failed to encode request fields")?;
    gateway
        .forward(Operation::Create, Method::POST, None, Some(body))
        .await
}

async fn update<R: Resource>(
    State(gateway): State<ResourceGateway<R>>,
    raw_id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Response, AppError> {
    let id = path_id::<R>(raw_id)?;
    let fields = parse_fields::<R>(&body)?;
    let body = serde_json::to_value(&fields).context("failed to encode request fields")?;
    gateway
        .forward(Operation::Update, Method::PUT, Some(id), Some(body))
        .await
}

async fn remove<R: Resource>(
    State(gateway): State<ResourceGateway<R>>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let id = path_id::<R>(raw_id)?;
    gateway
        .forward(Operation::Delete, Method::DELETE, Some(id), None)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::Books;

    fn reply(status: u16, body: &'static str) -> UpstreamReply {
        UpstreamReply {
            status: StatusCode::from_u16(status).unwrap(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[test]
    fn backend_message_is_passed_through() {
        let err = relay::<Books>(Operation::Update, reply(404, r#"{"message":"Book not found"}"#))
            .unwrap_err();
        match err {
            AppError::Upstream { status, message } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(message, "Book not found");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_backend_message_uses_operation_default() {
        for (operation, expected) in [
            (Operation::List, "failed to list books"),
            (Operation::Fetch, "failed to fetch book"),
            (Operation::Delete, "failed to delete book"),
        ] {
            let err = relay::<Books>(operation, reply(502, "<html>bad gateway</html>")).unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
            assert!(err.to_string().ends_with(expected), "{err}");
        }
    }

    #[test]
    fn non_json_success_is_internal() {
        let err = relay::<Books>(Operation::List, reply(200, "<html>")).unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn empty_success_bodies() {
        let response = relay::<Books>(Operation::Delete, reply(204, "")).unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = relay::<Books>(Operation::Delete, reply(200, "")).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn success_body_is_relayed_byte_for_byte() {
        let raw = r#"{"title":"T","id":7,"isbn":97801234567890123456789,"price":1.10}"#;
        let response = relay::<Books>(Operation::Fetch, reply(200, raw)).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], raw.as_bytes());
    }
}
