// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP removal adapter for the remote service.
//!
//! Each removal is a single `DELETE {base_url}/{id}` with a bearer token.
//! The adapter never retries; pacing and retry policy belong to the scheduler.

use std::time::Duration;

use async_trait::async_trait;
use purgeline_config::model::RemoteConfig;
use purgeline_core::{
    AdapterType, HealthStatus, PluginAdapter, PurgeError, RemovalAdapter, RemovalOutcome,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

/// Body returned by the v2 delete endpoint: `{"data": {"deleted": true}}`.
#[derive(Debug, Deserialize)]
struct DeleteResponse {
    data: DeleteData,
}

#[derive(Debug, Deserialize)]
struct DeleteData {
    deleted: bool,
}

/// Removes items through the remote service's delete endpoint.
#[derive(Debug, Clone)]
pub struct HttpRemover {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemover {
    pub fn new(config: &RemoteConfig) -> Result<Self, PurgeError> {
        let token = config
            .bearer_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                PurgeError::Config(
                    "remote bearer token not set. Set remote.bearer_token in config or PURGELINE_REMOTE_BEARER_TOKEN.".into(),
                )
            })?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| PurgeError::Config(format!("invalid bearer token header value: {e}")))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PurgeError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, id: &str) -> String {
        format!("{}/{id}", self.base_url)
    }
}

#[async_trait]
impl PluginAdapter for HttpRemover {
    fn name(&self) -> &str {
        "http-remover"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Removal
    }

    async fn health_check(&self) -> Result<HealthStatus, PurgeError> {
        // Any request would count against the remote rate limit.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl RemovalAdapter for HttpRemover {
    async fn remove(&self, id: &str) -> Result<RemovalOutcome, PurgeError> {
        let response = self
            .client
            .delete(self.url_for(id))
            .send()
            .await
            .map_err(|e| PurgeError::Removal {
                id: id.to_string(),
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(id, status = %status, "removal response received");

        if status == StatusCode::NOT_FOUND {
            return Ok(RemovalOutcome::AlreadyGone);
        }

        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(PurgeError::removal(id, format!("remote returned {status}: {body}")));
        }

        // An empty or unfamiliar success body is taken at its status code.
        match serde_json::from_str::<DeleteResponse>(&body) {
            Ok(DeleteResponse {
                data: DeleteData { deleted: false },
            }) => Err(PurgeError::removal(id, "remote reported deleted=false")),
            _ => Ok(RemovalOutcome::Removed),
        }
    }
}
