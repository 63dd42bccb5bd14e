//! Typed client for the gateway's resource endpoints.
//!
//! One method per operation, one round trip per call. Failures are logged
//! and returned as [`RequestError`]; nothing is retried or cached here.

mod error;
mod shelf;

pub use error::RequestError;
pub use shelf::Shelf;

use std::marker::PhantomData;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::modules::books::models::Books;
use crate::modules::categories::models::Categories;
use crate::resource::{ItemBody, ListBody, Resource, ResourceId};
use crate::utils::join_url;

pub type BooksClient = ResourceClient<Books>;
pub type CategoriesClient = ResourceClient<Categories>;

/// Client for one resource collection behind the gateway.
pub struct ResourceClient<R> {
    http: reqwest::Client,
    collection_url: String,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            collection_url: self.collection_url.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R> std::fmt::Debug for ResourceClient<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("collection_url", &self.collection_url)
            .finish()
    }
}

impl<R: Resource> ResourceClient<R> {
    /// Client for `<gateway_url>/api/<collection>`.
    ///
    /// # Errors
    ///
    /// Fails only if the TLS backend cannot be initialised.
    pub fn new(gateway_url: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().use_rustls_tls().build()?;
        Ok(Self::with_client(http, gateway_url))
    }

    pub fn with_client(http: reqwest::Client, gateway_url: &str) -> Self {
        Self {
            http,
            collection_url: join_url(gateway_url, &["api", R::COLLECTION]),
            _resource: PhantomData,
        }
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn item_url(&self, id: ResourceId) -> String {
        join_url(&self.collection_url, &[&id.to_string()])
    }

    /// GET the collection. Accepts `{ "data": [...] }` or a bare array.
    pub async fn list(&self) -> Result<Vec<R::Record>, RequestError> {
        let action = format!("list {}", R::COLLECTION);
        let request = self.http.get(&self.collection_url);
        let body = self.execute(&action, request).await?;
        decode::<ListBody<R::Record>>(&action, &body).map(ListBody::into_items)
    }

    /// GET one record. Any non-success status is an error, not just 404.
    pub async fn get(&self, id: ResourceId) -> Result<R::Record, RequestError> {
        let action = format!("fetch {} {}", R::NAME, id);
        let request = self.http.get(self.item_url(id));
        let body = self.execute(&action, request).await?;
        decode::<ItemBody<R::Record>>(&action, &body).map(ItemBody::into_item)
    }

    /// POST the writable fields; returns the record with its assigned id.
    pub async fn create(&self, fields: &R::Fields) -> Result<R::Record, RequestError> {
        let action = format!("create {}", R::NAME);
        let request = self.http.post(&self.collection_url).json(fields);
        let body = self.execute(&action, request).await?;
        decode::<ItemBody<R::Record>>(&action, &body).map(ItemBody::into_item)
    }

    /// PUT the writable fields; returns the updated record.
    pub async fn update(
        &self,
        id: ResourceId,
        fields: &R::Fields,
    ) -> Result<R::Record, RequestError> {
        let action = format!("update {} {}", R::NAME, id);
        let request = self.http.put(self.item_url(id)).json(fields);
        let body = self.execute(&action, request).await?;
        decode::<ItemBody<R::Record>>(&action, &body).map(ItemBody::into_item)
    }

    /// DELETE one record; returns the acknowledgement body, `Null` if empty.
    pub async fn delete(&self, id: ResourceId) -> Result<Value, RequestError> {
        let action = format!("delete {} {}", R::NAME, id);
        let request = self.http.request(Method::DELETE, self.item_url(id));
        let body = self.execute(&action, request).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        decode::<Value>(&action, &body)
    }

    async fn execute(
        &self,
        action: &str,
        request: RequestBuilder,
    ) -> Result<Vec<u8>, RequestError> {
        let transport = |source: reqwest::Error| {
            logged(RequestError::Transport {
                action: action.to_string(),
                source,
            })
        };

        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;

        if !status.is_success() {
            let message = gateway_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            return Err(logged(RequestError::Status {
                action: action.to_string(),
                status,
                message,
            }));
        }

        tracing::debug!(action, status = status.as_u16(), "gateway request succeeded");
        Ok(body.to_vec())
    }
}

fn logged(err: RequestError) -> RequestError {
    tracing::error!(error = %err, "gateway request failed");
    err
}

fn decode<T: DeserializeOwned>(action: &str, body: &[u8]) -> Result<T, RequestError> {
    serde_json::from_slice(body).map_err(|source| {
        logged(RequestError::Decode {
            action: action.to_string(),
            source,
        })
    })
}

/// The `message` of the gateway's error envelope, if readable.
fn gateway_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
