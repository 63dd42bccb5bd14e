//! Forwarding to the backend system of record.

use std::time::Duration;

use anyhow::Context;
use axum::body::Bytes;
use axum::http::{Method, StatusCode};
use bookshelf_kernel::settings::BackendSettings;

use crate::utils::join_url;

/// What the backend answered, before any interpretation.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Handle to the backend origin. Cheap to clone; the connection pool is shared.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: reqwest::Client,
    origin: String,
}

impl Upstream {
    pub fn from_settings(settings: &BackendSettings) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout_ms) = settings.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder
            .build()
            .context("failed to build upstream HTTP client")?;

        Ok(Self::with_client(client, &settings.origin))
    }

    pub fn with_client(client: reqwest::Client, origin: &str) -> Self {
        Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    /// Send one request to `<origin>/<segments...>`. Exactly one attempt.
    ///
    /// Any status, success or not, is returned as a reply; only transport
    /// failures are errors.
    pub async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&serde_json::Value>,
    ) -> anyhow::Result<UpstreamReply> {
        let url = join_url(&self.origin, segments);
        tracing::debug!(%method, %url, "forwarding to backend");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("{method} {url} failed"))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .with_context(|| format!("failed to read body of {method} {url}"))?;

        tracing::debug!(%method, %url, status = status.as_u16(), "backend replied");
        Ok(UpstreamReply { status, body })
    }
}
