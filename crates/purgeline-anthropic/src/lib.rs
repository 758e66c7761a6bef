// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude audit provider for Purgeline.
//!
//! This crate implements [`AuditProvider`] on top of the Anthropic Messages
//! API. The provider only transports text: schema validation of the reply is
//! done by the audit store.

pub mod client;
pub mod types;

use async_trait::async_trait;
use purgeline_audit::{build_audit_prompt, AUDIT_SYSTEM_PROMPT};
use purgeline_config::PurgelineConfig;
use purgeline_core::{AdapterType, AuditProvider, HealthStatus, PluginAdapter, PurgeError, Record};
use tracing::{debug, info, warn};

use crate::client::AnthropicClient;
use crate::types::{ApiMessage, MessageRequest};

/// Audit provider backed by a Claude model.
///
/// API key resolution order: config -> `ANTHROPIC_API_KEY` env var -> error.
pub struct AnthropicAuditProvider {
    client: AnthropicClient,
    model: String,
    max_tokens: u32,
}

impl AnthropicAuditProvider {
    pub fn new(config: &PurgelineConfig) -> Result<Self, PurgeError> {
        let api_key = resolve_api_key(&config.anthropic.api_key)?;
        let mut client = AnthropicClient::new(&api_key, &config.anthropic.api_version)?;
        if let Some(url) = &config.anthropic.base_url {
            client = client.with_base_url(url.clone());
        }

        info!(model = config.audit.model, "Anthropic audit provider initialized");
        Ok(Self::with_client(
            client,
            config.audit.model.clone(),
            config.audit.max_tokens,
        ))
    }

    /// Creates a provider around an existing client.
    pub fn with_client(client: AnthropicClient, model: String, max_tokens: u32) -> Self {
        Self {
            client,
            model,
            max_tokens,
        }
    }

    fn to_message_request(&self, batch: &[Record]) -> MessageRequest {
        MessageRequest {
            model: self.model.clone(),
            messages: vec![ApiMessage::user(build_audit_prompt(batch))],
            system: Some(AUDIT_SYSTEM_PROMPT.to_string()),
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl PluginAdapter for AnthropicAuditProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Audit
    }

    async fn health_check(&self) -> Result<HealthStatus, PurgeError> {
        // Probing the API would spend tokens; a constructed client is enough.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl AuditProvider for AnthropicAuditProvider {
    async fn classify(&self, batch: &[Record]) -> Result<String, PurgeError> {
        let request = self.to_message_request(batch);
        debug!(batch = batch.len(), model = %self.model, "sending audit batch");

        let response = self.client.complete_message(&request).await?;
        if response.stop_reason.as_deref() == Some("max_tokens") {
            warn!(
                output_tokens = response.usage.output_tokens,
                "audit reply hit max_tokens; trailing entries may be lost"
            );
        }
        Ok(response.text())
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Result<String, PurgeError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
        PurgeError::Config(
            "Anthropic API key not found. Set anthropic.api_key in config or ANTHROPIC_API_KEY environment variable.".into(),
        )
    })
}
