use super::anthropic_types::{ErrorResponse, MessagesResponse, ResponseContentBlock};
use super::ids::IdGenerator;
use super::responses_types::{
    IncompleteDetails, InputTokensDetails, ItemStatus, OutputContent, OutputItem,
    OutputTokensDetails, ReasoningSummary, RequestEcho, ResponseObject, ResponseStatus,
    ResponseUsage, ResponsesErrorResponse, ResponsesRequest, TextConfig, TextFormat,
};

/// Translate an Anthropic Messages response into a Responses API response object.
/// Pure apart from id generation and the creation timestamp; `model` is the
/// name the client originally asked for.
pub fn anthropic_to_responses(
    resp: &MessagesResponse,
    model: &str,
    original: &ResponsesRequest,
    ids: &mut IdGenerator,
) -> ResponseObject {
    let id = ids.response_id();

    let mut output = Vec::new();
    let mut message_content = Vec::new();
    let mut reasoning_text: Option<&str> = None;

    for block in &resp.content {
        match block {
            ResponseContentBlock::Text { text } => {
                message_content.push(OutputContent::text(text.clone()));
            }
            ResponseContentBlock::Thinking { thinking, .. } => {
                // Only one reasoning text is reported; a later block replaces an earlier one
                reasoning_text = Some(thinking.as_str());
            }
            ResponseContentBlock::ToolUse { id, name, input } => {
                output.push(OutputItem::FunctionCall {
                    id: ids.function_call_id(),
                    call_id: id.clone(),
                    name: name.clone(),
                    arguments: tool_arguments(input),
                    status: ItemStatus::Completed,
                });
            }
            ResponseContentBlock::Unsupported => {}
        }
    }

    // Every response carries a message item unless it is tool calls only
    if !message_content.is_empty() || output.is_empty() {
        output.insert(
            0,
            OutputItem::Message {
                id: ids.message_id(),
                status: ItemStatus::Completed,
                role: "assistant".to_string(),
                content: message_content,
            },
        );
    }

    let (status, incomplete_details) = match resp.stop_reason.as_deref() {
        Some("max_tokens") => (
            ResponseStatus::Incomplete,
            Some(IncompleteDetails {
                reason: "max_output_tokens".to_string(),
            }),
        ),
        _ => (ResponseStatus::Completed, None),
    };

    let reasoning_text = reasoning_text.filter(|t| !t.is_empty());

    let usage = ResponseUsage {
        input_tokens: resp.usage.input_tokens,
        input_tokens_details: Some(InputTokensDetails {
            cached_tokens: resp.usage.cache_read_input_tokens.unwrap_or(0),
        }),
        output_tokens: resp.usage.output_tokens,
        output_tokens_details: Some(OutputTokensDetails {
            reasoning_tokens: reasoning_text.map_or(0, estimate_tokens),
        }),
        total_tokens: resp.usage.input_tokens + resp.usage.output_tokens,
    };

    let reasoning = reasoning_text.map(|_| ReasoningSummary {
        effort: original
            .reasoning
            .as_ref()
            .and_then(|r| r.effort.clone())
            .unwrap_or_else(|| "medium".to_string()),
        summary: None,
    });

    ResponseObject {
        id,
        object: "response".to_string(),
        created_at: unix_now(),
        status,
        model: model.to_string(),
        output,
        echo: Some(echo_request(original)),
        text: Some(TextConfig {
            format: TextFormat {
                format_type: "text".to_string(),
            },
        }),
        usage: Some(usage),
        reasoning,
        incomplete_details,
    }
}

/// Request parameters echoed on every response envelope, with API defaults
/// filled in for anything the client left out.
pub fn echo_request(original: &ResponsesRequest) -> RequestEcho {
    RequestEcho {
        parallel_tool_calls: true,
        tool_choice: original.tool_choice.clone().unwrap_or_default(),
        tools: original.tools.clone().unwrap_or_default(),
        temperature: original.temperature.unwrap_or(1.0),
        top_p: original.top_p.unwrap_or(1.0),
        truncation: original
            .truncation
            .clone()
            .unwrap_or_else(|| "disabled".to_string()),
        metadata: original.metadata.clone().unwrap_or_default(),
        instructions: original.instructions.clone().filter(|s| !s.is_empty()),
        previous_response_id: original
            .previous_response_id
            .clone()
            .filter(|s| !s.is_empty()),
    }
}

/// Rough token count for text we have no usage figure for (about 4 chars per token).
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}

pub(crate) fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn tool_arguments(input: &serde_json::Value) -> String {
    if input.is_null() {
        return "{}".to_string();
    }
    serde_json::to_string(input).unwrap_or_else(|_| "{}".to_string())
}

/// Translate an Anthropic error into a Responses API error body
pub fn anthropic_error_to_responses(err: &ErrorResponse) -> ResponsesErrorResponse {
    let error_type = match err.error.error_type.as_str() {
        "invalid_request_error" | "not_found_error" | "request_too_large" => {
            "invalid_request_error"
        }
        "authentication_error" | "permission_error" => "authentication_error",
        "rate_limit_error" => "rate_limit_error",
        "overloaded_error" => "server_error",
        _ => "api_error",
    };

    let mut mapped = ResponsesErrorResponse::new(error_type, &err.error.message);
    mapped.error.code = Some(err.error.error_type.clone());
    mapped
}
