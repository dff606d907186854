//! Model discovery for the `/v1/models` endpoint.
//!
//! Lists what the upstream provider offers alongside the client-facing aliases
//! from the config, in the OpenAI list shape clients expect.

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::providers::AuthStyle;
use serde::{Deserialize, Serialize};

/// An Anthropic model from `/v1/models`.
#[derive(Debug, Deserialize)]
pub struct UpstreamModel {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// The response from an Anthropic `/v1/models` endpoint.
#[derive(Debug, Deserialize)]
pub struct UpstreamModelsResponse {
    pub data: Vec<UpstreamModel>,
}

/// One entry of the list we serve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelEntry {
    pub id: String,
    pub object: &'static str,
    pub owned_by: String,
}

/// Fetch the model ids available from the configured upstream provider.
///
/// # Errors
/// Returns `BridgeError::Upstream` if the request fails or the upstream answers
/// with an error status, and `BridgeError::Http` if the body cannot be read or parsed.
pub async fn fetch_upstream_models(
    config: &BridgeConfig,
    client: &reqwest::Client,
) -> Result<Vec<String>> {
    let api_key = config.resolve_api_key()?;
    let base_url = config.effective_base_url()?;
    let url = format!("{base_url}/v1/models");

    let request = client
        .get(&url)
        .header("anthropic-version", &config.provider.anthropic_version);
    let request = match config.auth_style() {
        AuthStyle::XApiKey => request.header("x-api-key", api_key),
        AuthStyle::Bearer => request.bearer_auth(api_key),
    };

    let response = request
        .send()
        .await
        .map_err(|e| BridgeError::upstream(format!("Failed to fetch models: {e}")))?;

    let status = response.status().as_u16();
    if status >= 400 {
        let body = response.text().await.unwrap_or_default();
        return Err(BridgeError::upstream(format!(
            "Upstream returned status {status} when fetching models: {body}"
        )));
    }

    let parsed: UpstreamModelsResponse = response.json().await?;

    Ok(parsed.data.into_iter().map(|m| m.id).collect())
}

/// Configured aliases first (sorted), then upstream ids not already listed.
#[must_use]
pub fn merge_model_list(config: &BridgeConfig, upstream: &[String]) -> Vec<ModelEntry> {
    let mut aliases: Vec<&String> = config.models.keys().collect();
    aliases.sort();

    let mut ids: Vec<String> = aliases.into_iter().cloned().collect();
    for id in upstream {
        if !ids.contains(id) {
            ids.push(id.clone());
        }
    }

    ids.into_iter()
        .map(|id| ModelEntry {
            id,
            object: "model",
            owned_by: config.provider.name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use std::collections::HashMap;

    #[test]
    fn test_merge_model_list_dedupes() {
        let config = BridgeConfig {
            port: 0,
            provider: ProviderConfig {
                name: "anthropic".to_string(),
                base_url: None,
                api_key_env: "ANTHROPIC_API_KEY".to_string(),
                anthropic_version: "2023-06-01".to_string(),
                auth: None,
            },
            models: HashMap::from([
                ("gpt-4o".to_string(), "claude-sonnet-4-20250514".to_string()),
                ("claude-sonnet-4-20250514".to_string(), "claude-sonnet-4-20250514".to_string()),
            ]),
            default_model: None,
        };

        let upstream = vec![
            "claude-sonnet-4-20250514".to_string(),
            "claude-3-5-haiku-20241022".to_string(),
        ];
        let ids: Vec<String> = merge_model_list(&config, &upstream)
            .into_iter()
            .map(|m| m.id)
            .collect();

        assert_eq!(
            ids,
            [
                "claude-sonnet-4-20250514",
                "gpt-4o",
                "claude-3-5-haiku-20241022"
            ]
        );
    }
}
