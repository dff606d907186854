use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::logging::{LogLevel, SharedLogger};
use crate::providers::AuthStyle;
use crate::translate::anthropic_types::{
    ErrorResponse, MessagesRequest, MessagesResponse, StreamEvent,
};
use crate::translate::ids::IdGenerator;
use crate::translate::request::responses_to_anthropic;
use crate::translate::response::{anthropic_error_to_responses, anthropic_to_responses};
use crate::translate::responses_types::{ResponseObject, ResponsesErrorResponse, ResponsesRequest};
use crate::translate::sse::{format_event, format_sse};
use crate::translate::streaming::StreamTranslator;

use bytes::Bytes;
use eventsource_stream::Eventsource;
use futures::stream::{self, Stream};
use futures::StreamExt;
use std::pin::Pin;

/// Outcome of proxying a non-streaming request
pub enum ProxyResult {
    Success(ResponseObject),
    Error(ResponsesErrorResponse, u16),
}

/// Outcome of proxying a streaming request: framed SSE blocks ready to write
pub type SseStream =
    Pin<Box<dyn Stream<Item = std::result::Result<String, std::io::Error>> + Send>>;

/// Translate the client request and apply the configured model mapping.
pub fn build_upstream_request(req: &ResponsesRequest, config: &BridgeConfig) -> MessagesRequest {
    let mut upstream = responses_to_anthropic(req);
    if let Some(model) = config.resolve_model(req.model.as_deref()) {
        upstream.model = model;
    }
    upstream
}

/// Model name reported back to the client: whatever it asked for.
fn client_model(req: &ResponsesRequest, upstream: &MessagesRequest) -> String {
    req.model.clone().unwrap_or_else(|| upstream.model.clone())
}

async fn send_upstream(
    upstream: &MessagesRequest,
    config: &BridgeConfig,
    client: &reqwest::Client,
) -> Result<reqwest::Response> {
    let api_key = config.resolve_api_key()?;
    let base_url = config.effective_base_url()?;
    let url = format!("{base_url}/v1/messages");

    let request = client
        .post(&url)
        .header("anthropic-version", &config.provider.anthropic_version)
        .header("Content-Type", "application/json")
        .json(upstream);
    let request = match config.auth_style() {
        AuthStyle::XApiKey => request.header("x-api-key", api_key),
        AuthStyle::Bearer => request.bearer_auth(api_key),
    };

    request
        .send()
        .await
        .map_err(|e| BridgeError::upstream(format!("Request to {url} failed: {e}")))
}

fn upstream_error(status: u16, body: &str) -> ResponsesErrorResponse {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => anthropic_error_to_responses(&err),
        Err(_) => ResponsesErrorResponse::api_error(format!(
            "Upstream returned status {}: {}",
            status,
            truncate(body, 500)
        )),
    }
}

/// Forward a non-streaming Responses request through the configured provider.
pub async fn proxy_non_streaming(
    req: &ResponsesRequest,
    config: &BridgeConfig,
    client: &reqwest::Client,
    logger: &SharedLogger,
) -> Result<ProxyResult> {
    let upstream = build_upstream_request(req, config);

    logger.info(
        "proxy",
        format!("POST /v1/messages model={} messages={}", upstream.model, upstream.messages.len()),
    );

    let response = send_upstream(&upstream, config, client).await?;

    let status = response.status().as_u16();
    let body = response.text().await?;

    logger.debug(
        "proxy",
        format!("Response status={} body_len={}", status, body.len()),
    );

    if status >= 400 {
        let err = upstream_error(status, &body);
        logger.warn("proxy", format!("Upstream error ({status}): {}", err.error.message));
        return Ok(ProxyResult::Error(err, status));
    }

    let upstream_resp: MessagesResponse = serde_json::from_str(&body).map_err(|e| {
        BridgeError::translation(format!(
            "Failed to parse upstream response: {}. Body: {}",
            e,
            truncate(&body, 300)
        ))
    })?;

    let mut ids = IdGenerator::new();
    let resp = anthropic_to_responses(&upstream_resp, &client_model(req, &upstream), req, &mut ids);

    logger.log_with_context(
        LogLevel::Info,
        "proxy",
        "Completed",
        serde_json::json!({
            "response_id": resp.id,
            "status": resp.status,
            "usage": resp.usage,
        }),
    );

    Ok(ProxyResult::Success(resp))
}

/// Forward a streaming Responses request, returning a stream of framed Responses SSE events.
pub async fn proxy_streaming(
    req: &ResponsesRequest,
    config: &BridgeConfig,
    client: &reqwest::Client,
    logger: &SharedLogger,
) -> Result<SseStream> {
    let mut upstream = build_upstream_request(req, config);
    upstream.stream = true;

    logger.info(
        "proxy",
        format!("POST /v1/messages model={} (streaming)", upstream.model),
    );

    let response = send_upstream(&upstream, config, client).await?;
    let status = response.status().as_u16();

    if status >= 400 {
        let body = response.text().await.unwrap_or_default();
        logger.warn(
            "proxy",
            format!("Streaming error status={}: {}", status, truncate(&body, 300)),
        );

        let err = upstream_error(status, &body);
        let data = serde_json::json!({
            "type": "error",
            "sequence_number": 0,
            "code": err.error.code,
            "message": err.error.message,
            "param": err.error.param,
        });
        let block = format_sse("error", &data.to_string());

        return Ok(Box::pin(stream::once(async move {
            Ok::<_, std::io::Error>(block)
        })));
    }

    let translator = StreamTranslator::new(&client_model(req, &upstream), req);
    let event_stream = sse_translate_stream(response.bytes_stream(), translator, logger.clone());

    Ok(Box::pin(event_stream))
}

/// Parse an Anthropic SSE byte stream and translate its events into Responses SSE blocks.
fn sse_translate_stream(
    byte_stream: impl Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Send + 'static,
    mut translator: StreamTranslator,
    logger: SharedLogger,
) -> impl Stream<Item = std::result::Result<String, std::io::Error>> + Send + 'static {
    async_stream::stream! {
        let events = byte_stream.eventsource();
        tokio::pin!(events);

        while let Some(next) = events.next().await {
            let sse_event = match next {
                Ok(e) => e,
                Err(e) => {
                    logger.error("stream", format!("Upstream stream error: {e}"));
                    break;
                }
            };

            let event: StreamEvent = match serde_json::from_str(&sse_event.data) {
                Ok(ev) => ev,
                Err(e) => {
                    logger.debug("stream", format!("Skipping unparseable event: {e}"));
                    continue;
                }
            };

            if let StreamEvent::Error { ref error } = event {
                logger.warn("stream", format!("Upstream sent error event: {}", error.message));
            }

            for out in translator.process_event(&event) {
                yield Ok(format_event(&out));
            }

            if translator.state().is_completed() {
                break;
            }
        }

        if translator.state().is_completed() {
            logger.info(
                "stream",
                format!("Stream completed response_id={}", translator.state().response_id()),
            );
        } else {
            // No message_stop: the client never gets response.completed
            logger.warn(
                "stream",
                format!("Upstream ended early response_id={}", translator.state().response_id()),
            );
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use std::collections::HashMap;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "h");
        assert_eq!(truncate("short", 100), "short");
    }

    #[test]
    fn test_upstream_error_falls_back_to_raw_body() {
        let err = upstream_error(502, "<html>bad gateway</html>");
        assert_eq!(err.error.error_type, "api_error");
        assert!(err.error.message.contains("502"));

        let err = upstream_error(
            429,
            r#"{"type":"error","error":{"type":"rate_limit_error","message":"slow down"}}"#,
        );
        assert_eq!(err.error.error_type, "rate_limit_error");
        assert_eq!(err.error.message, "slow down");
    }

    #[test]
    fn test_build_upstream_request_applies_alias() {
        let config = BridgeConfig {
            port: 0,
            provider: ProviderConfig {
                name: "anthropic".to_string(),
                base_url: None,
                api_key_env: "ANTHROPIC_API_KEY".to_string(),
                anthropic_version: "2023-06-01".to_string(),
                auth: None,
            },
            models: HashMap::from([("gpt-4o".to_string(), "claude-sonnet-4-20250514".to_string())]),
            default_model: None,
        };
        let req = ResponsesRequest {
            model: Some("gpt-4o".to_string()),
            ..Default::default()
        };

        let upstream = build_upstream_request(&req, &config);
        assert_eq!(upstream.model, "claude-sonnet-4-20250514");
        assert_eq!(client_model(&req, &upstream), "gpt-4o");
    }
}
