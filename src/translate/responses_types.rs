//! Type definitions for the [OpenAI Responses API](https://platform.openai.com/docs/api-reference/responses).
//!
//! These types represent the request clients send us, the response object we
//! send back, and the incremental `response.*` events of a streamed response.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Request types (what the client sends TO us)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponsesRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<ResponsesInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub tools: Option<Vec<ResponsesTool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ResponsesToolChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<String>,
    // Catch-all for fields we accept but do not translate
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// `input` is either a bare prompt or a list of items. Items that do not
/// decode are dropped one by one instead of failing the whole request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponsesInput {
    Text(String),
    Items(Vec<InputItem>),
}

impl<'de> Deserialize<'de> for ResponsesInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::Items(decode_each(items)),
            _ => Self::Items(Vec::new()),
        })
    }
}

/// Decode each element on its own, keeping the ones that fit `T`.
pub(crate) fn decode_each<T: DeserializeOwned>(values: Vec<Value>) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect()
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => Some(decode_each(values)),
        _ => None,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    Message {
        #[serde(default)]
        role: InputRole,
        content: InputContent,
    },
    /// A tool call the model made on an earlier turn.
    FunctionCall {
        call_id: String,
        name: String,
        #[serde(default)]
        arguments: String,
    },
    FunctionCallOutput {
        call_id: String,
        #[serde(default)]
        output: Value,
    },
    /// `reasoning`, `item_reference`, built-in tool calls, ...
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputRole {
    #[default]
    User,
    Assistant,
    System,
    Developer,
    /// `tool`, `critic`, ... are sent upstream as the user.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum InputContent {
    Text(String),
    Parts(Vec<InputContentPart>),
}

impl<'de> Deserialize<'de> for InputContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => Self::Text(text),
            Value::Array(parts) => Self::Parts(decode_each(parts)),
            _ => Self::Parts(Vec::new()),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputContentPart {
    InputText {
        text: String,
    },
    Text {
        text: String,
    },
    OutputText {
        text: String,
    },
    InputImage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_url: Option<ImageUrlRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    /// `input_file`, `input_audio`, `refusal`, ...
    #[serde(other)]
    Unsupported,
}

/// Some clients send `image_url` as a bare string, others as `{"url": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageUrlRef {
    Plain(String),
    Object { url: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsesTool {
    #[serde(rename = "type", default)]
    pub tool_type: String, // "function", "web_search", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponsesToolChoice {
    Mode(String), // "auto", "none", "required"
    Named(NamedToolChoice),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedToolChoice {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub choice_type: Option<String>, // "function"
    pub name: String,
}

impl Default for ResponsesToolChoice {
    fn default() -> Self {
        ResponsesToolChoice::Mode("auto".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReasoningConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<String>, // "low", "medium", "high"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,
}

// ---------------------------------------------------------------------------
// Response types (what we send BACK to the client)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseObject {
    pub id: String,
    pub object: String, // "response"
    pub created_at: i64,
    pub status: ResponseStatus,
    pub model: String,
    pub output: Vec<OutputItem>,
    #[serde(flatten)]
    pub echo: Option<RequestEcho>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<ResponseUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incomplete_details: Option<IncompleteDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    InProgress,
    Completed,
    Incomplete,
}

/// Request parameters repeated back on every response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEcho {
    pub parallel_tool_calls: bool,
    pub tool_choice: ResponsesToolChoice,
    pub tools: Vec<ResponsesTool>,
    pub temperature: f64,
    pub top_p: f64,
    pub truncation: String,
    pub metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    pub format: TextFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextFormat {
    #[serde(rename = "type")]
    pub format_type: String, // "text"
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        id: String,
        status: ItemStatus,
        role: String, // "assistant"
        content: Vec<OutputContent>,
    },
    FunctionCall {
        id: String,
        call_id: String,
        name: String,
        arguments: String,
        status: ItemStatus,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputContent {
    OutputText {
        text: String,
        annotations: Vec<Value>,
    },
}

impl OutputContent {
    pub fn text(text: impl Into<String>) -> Self {
        OutputContent::OutputText {
            text: text.into(),
            annotations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseUsage {
    pub input_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens_details: Option<InputTokensDetails>,
    pub output_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens_details: Option<OutputTokensDetails>,
    pub total_tokens: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTokensDetails {
    pub cached_tokens: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTokensDetails {
    pub reasoning_tokens: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningSummary {
    pub effort: String,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncompleteDetails {
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Streaming event types (SSE events we send back to the client)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResponsesStreamEvent {
    #[serde(rename = "response.created")]
    Created {
        sequence_number: u64,
        response: ResponseObject,
    },
    #[serde(rename = "response.in_progress")]
    InProgress {
        sequence_number: u64,
        response: ResponseObject,
    },
    #[serde(rename = "response.output_item.added")]
    OutputItemAdded {
        sequence_number: u64,
        output_index: usize,
        item: OutputItem,
    },
    #[serde(rename = "response.content_part.added")]
    ContentPartAdded {
        sequence_number: u64,
        item_id: Option<String>,
        output_index: usize,
        content_index: usize,
        part: OutputContent,
    },
    #[serde(rename = "response.output_text.delta")]
    OutputTextDelta {
        sequence_number: u64,
        item_id: Option<String>,
        output_index: usize,
        content_index: usize,
        delta: String,
    },
    #[serde(rename = "response.reasoning.delta")]
    ReasoningDelta {
        sequence_number: u64,
        item_id: Option<String>,
        delta: String,
    },
    #[serde(rename = "response.function_call_arguments.delta")]
    FunctionCallArgumentsDelta {
        sequence_number: u64,
        item_id: String,
        output_index: usize,
        delta: String,
    },
    #[serde(rename = "response.output_text.done")]
    OutputTextDone {
        sequence_number: u64,
        item_id: Option<String>,
        output_index: usize,
        content_index: usize,
        text: String,
    },
    #[serde(rename = "response.function_call_arguments.done")]
    FunctionCallArgumentsDone {
        sequence_number: u64,
        item_id: String,
        output_index: usize,
        name: String,
        call_id: String,
        arguments: String,
    },
    #[serde(rename = "response.output_item.done")]
    OutputItemDone {
        sequence_number: u64,
        output_index: usize,
        item: OutputItem,
    },
    #[serde(rename = "response.completed")]
    Completed {
        sequence_number: u64,
        response: ResponseObject,
    },
}

impl ResponsesStreamEvent {
    pub fn event_name(&self) -> &'static str {
        match self {
            ResponsesStreamEvent::Created { .. } => "response.created",
            ResponsesStreamEvent::InProgress { .. } => "response.in_progress",
            ResponsesStreamEvent::OutputItemAdded { .. } => "response.output_item.added",
            ResponsesStreamEvent::ContentPartAdded { .. } => "response.content_part.added",
            ResponsesStreamEvent::OutputTextDelta { .. } => "response.output_text.delta",
            ResponsesStreamEvent::ReasoningDelta { .. } => "response.reasoning.delta",
            ResponsesStreamEvent::FunctionCallArgumentsDelta { .. } => {
                "response.function_call_arguments.delta"
            }
            ResponsesStreamEvent::OutputTextDone { .. } => "response.output_text.done",
            ResponsesStreamEvent::FunctionCallArgumentsDone { .. } => {
                "response.function_call_arguments.done"
            }
            ResponsesStreamEvent::OutputItemDone { .. } => "response.output_item.done",
            ResponsesStreamEvent::Completed { .. } => "response.completed",
        }
    }

    pub fn sequence_number(&self) -> u64 {
        match self {
            ResponsesStreamEvent::Created { sequence_number, .. }
            | ResponsesStreamEvent::InProgress { sequence_number, .. }
            | ResponsesStreamEvent::OutputItemAdded { sequence_number, .. }
            | ResponsesStreamEvent::ContentPartAdded { sequence_number, .. }
            | ResponsesStreamEvent::OutputTextDelta { sequence_number, .. }
            | ResponsesStreamEvent::ReasoningDelta { sequence_number, .. }
            | ResponsesStreamEvent::FunctionCallArgumentsDelta { sequence_number, .. }
            | ResponsesStreamEvent::OutputTextDone { sequence_number, .. }
            | ResponsesStreamEvent::FunctionCallArgumentsDone { sequence_number, .. }
            | ResponsesStreamEvent::OutputItemDone { sequence_number, .. }
            | ResponsesStreamEvent::Completed { sequence_number, .. } => *sequence_number,
        }
    }
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesErrorResponse {
    pub error: ResponsesError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub param: Option<String>,
    pub code: Option<String>,
}

impl ResponsesErrorResponse {
    pub fn new(error_type: &str, message: impl Into<String>) -> Self {
        Self {
            error: ResponsesError {
                message: message.into(),
                error_type: error_type.to_string(),
                param: None,
                code: None,
            },
        }
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new("invalid_request_error", msg)
    }

    pub fn api_error(msg: impl Into<String>) -> Self {
        Self::new("api_error", msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_string_input() {
        let req: ResponsesRequest =
            serde_json::from_str(r#"{"model":"m","input":"hello"}"#).unwrap();
        assert!(matches!(req.input, Some(ResponsesInput::Text(ref s)) if s == "hello"));
    }

    #[test]
    fn test_decode_mixed_items_keeps_unknown_as_unsupported() {
        let req: ResponsesRequest = serde_json::from_value(serde_json::json!({
            "input": [
                {"type": "message", "role": "user", "content": [
                    {"type": "input_text", "text": "hi"},
                    {"type": "input_file", "file_id": "f1"}
                ]},
                {"type": "reasoning", "id": "rs_1", "summary": []},
                {"type": "function_call_output", "call_id": "call_1", "output": "42"}
            ]
        }))
        .unwrap();

        let Some(ResponsesInput::Items(items)) = req.input else {
            panic!("expected items");
        };
        assert_eq!(items.len(), 3);
        assert!(matches!(items[1], InputItem::Unsupported));
        if let InputItem::Message {
            content: InputContent::Parts(parts),
            ..
        } = &items[0]
        {
            assert!(matches!(parts[1], InputContentPart::Unsupported));
        } else {
            panic!("expected message item");
        }
    }

    #[test]
    fn test_decode_tolerates_odd_elements() {
        let req: ResponsesRequest = serde_json::from_str(
            r#"{"input":[{"type":"message","role":"tool","content":"hi"},{"type":"message","role":"user","content":"ok"}]}"#,
        )
        .unwrap();
        let Some(ResponsesInput::Items(items)) = req.input else {
            panic!("expected items");
        };
        assert!(matches!(
            items[0],
            InputItem::Message {
                role: InputRole::Other,
                ..
            }
        ));

        let req: ResponsesRequest =
            serde_json::from_str(r#"{"input":"x","tools":[{"name":"no_type"}]}"#).unwrap();
        assert_eq!(req.tools.unwrap()[0].tool_type, "");

        let req: ResponsesRequest = serde_json::from_str(
            r#"{"input":[{"type":"message","role":"user","content":[{"type":"input_text"}]}]}"#,
        )
        .unwrap();
        let Some(ResponsesInput::Items(items)) = req.input else {
            panic!("expected items");
        };
        assert!(matches!(
            &items[0],
            InputItem::Message { content: InputContent::Parts(parts), .. } if parts.is_empty()
        ));

        let req: ResponsesRequest =
            serde_json::from_str(r#"{"input":[{"role":"user","content":"hi"}]}"#).unwrap();
        assert!(matches!(req.input, Some(ResponsesInput::Items(ref items)) if items.is_empty()));
    }

    #[test]
    fn test_tool_choice_shapes() {
        let mode: ResponsesToolChoice = serde_json::from_str(r#""required""#).unwrap();
        assert_eq!(mode, ResponsesToolChoice::Mode("required".to_string()));

        let named: ResponsesToolChoice =
            serde_json::from_str(r#"{"type":"function","name":"lookup"}"#).unwrap();
        assert!(matches!(named, ResponsesToolChoice::Named(ref n) if n.name == "lookup"));

        let other: ResponsesToolChoice =
            serde_json::from_str(r#"{"type":"web_search_preview"}"#).unwrap();
        assert!(matches!(other, ResponsesToolChoice::Other(_)));
    }

    #[test]
    fn test_event_type_tag_serialized() {
        let event = ResponsesStreamEvent::ReasoningDelta {
            sequence_number: 3,
            item_id: None,
            delta: "hmm".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "response.reasoning.delta");
        assert_eq!(json["sequence_number"], 3);
        assert!(json["item_id"].is_null());
        assert_eq!(event.event_name(), "response.reasoning.delta");
    }
}
