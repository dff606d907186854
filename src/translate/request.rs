//! Translate Responses API requests into Anthropic Messages API requests.
//!
//! System and developer messages are lifted into the `system` prompt, tool
//! outputs become `tool_result` blocks, and thinking is switched on for
//! reasoning-capable models. Anything we don't understand is dropped rather
//! than rejected.

use serde_json::Value;

use super::anthropic_types::{
    ContentBlock, ImageSource, Message, MessageContent, MessagesRequest, Role, Thinking, Tool,
    ToolChoice, ToolResultContent,
};
use super::responses_types::{
    decode_each, ImageUrlRef, InputContent, InputContentPart, InputItem, InputRole, ResponsesInput,
    ResponsesRequest, ResponsesTool, ResponsesToolChoice,
};

/// Model used when the request names none.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// `max_tokens` used when the request has no `max_output_tokens`.
pub const DEFAULT_MAX_TOKENS: u64 = 4096;

const SYSTEM_SEPARATOR: &str = "\n\n";

/// Translate a Responses API request into an Anthropic Messages request.
/// Pure function: unknown input is skipped, missing fields fall back to defaults.
pub fn responses_to_anthropic(req: &ResponsesRequest) -> MessagesRequest {
    let model = req
        .model
        .clone()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let mut system = req.instructions.clone().filter(|s| !s.is_empty());
    let mut messages = Vec::new();

    match &req.input {
        Some(ResponsesInput::Text(text)) => messages.push(Message {
            role: Role::User,
            content: MessageContent::Text(text.clone()),
        }),
        Some(ResponsesInput::Items(items)) => {
            for item in items {
                translate_item(item, &mut system, &mut messages);
            }
        }
        None => {}
    }

    let tools = req
        .tools
        .as_ref()
        .filter(|tools| !tools.is_empty())
        .map(|tools| tools.iter().filter_map(translate_tool).collect());

    let tool_choice = req.tool_choice.as_ref().and_then(translate_tool_choice);

    let thinking = thinking_budget(&model, req).map(|budget_tokens| Thinking::Enabled {
        budget_tokens,
    });

    MessagesRequest {
        model,
        messages,
        max_tokens: req
            .max_output_tokens
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_TOKENS),
        stream: req.stream.unwrap_or(false),
        system,
        temperature: req.temperature,
        top_p: req.top_p,
        tools,
        tool_choice,
        thinking,
    }
}

fn translate_item(item: &InputItem, system: &mut Option<String>, messages: &mut Vec<Message>) {
    match item {
        InputItem::Message {
            role: InputRole::System | InputRole::Developer,
            content,
        } => {
            let text = system_text(content);
            if text.is_empty() {
                return;
            }
            *system = Some(match system.take() {
                Some(existing) => format!("{existing}{SYSTEM_SEPARATOR}{text}"),
                None => text,
            });
        }
        InputItem::Message { role, content } => {
            let role = if *role == InputRole::Assistant {
                Role::Assistant
            } else {
                Role::User
            };
            messages.push(Message {
                role,
                content: translate_content(content),
            });
        }
        InputItem::FunctionCall {
            call_id,
            name,
            arguments,
        } => {
            let input = serde_json::from_str(arguments)
                .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
            messages.push(Message {
                role: Role::Assistant,
                content: MessageContent::Blocks(vec![ContentBlock::ToolUse {
                    id: call_id.clone(),
                    name: name.clone(),
                    input,
                }]),
            });
        }
        InputItem::FunctionCallOutput { call_id, output } => {
            messages.push(Message {
                role: Role::User,
                content: MessageContent::Blocks(vec![ContentBlock::ToolResult {
                    tool_use_id: call_id.clone(),
                    content: tool_output_content(output),
                }]),
            });
        }
        // Not representable upstream
        InputItem::Unsupported => {}
    }
}

/// Text of a system/developer message; multiple text parts are joined by newlines.
fn system_text(content: &InputContent) -> String {
    match content {
        InputContent::Text(text) => text.clone(),
        InputContent::Parts(parts) => parts
            .iter()
            .filter_map(|part| match part {
                InputContentPart::InputText { text } | InputContentPart::Text { text } => {
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn translate_content(content: &InputContent) -> MessageContent {
    match content {
        InputContent::Text(text) => MessageContent::Text(text.clone()),
        InputContent::Parts(parts) => {
            collapse_blocks(parts.iter().filter_map(translate_part).collect())
        }
    }
}

fn translate_part(part: &InputContentPart) -> Option<ContentBlock> {
    match part {
        InputContentPart::InputText { text }
        | InputContentPart::Text { text }
        | InputContentPart::OutputText { text } => Some(ContentBlock::Text { text: text.clone() }),
        InputContentPart::InputImage { image_url, url } => {
            let image_url = match image_url {
                Some(ImageUrlRef::Plain(u)) | Some(ImageUrlRef::Object { url: u }) => u.as_str(),
                None => url.as_deref().unwrap_or(""),
            };
            image_source(image_url).map(|source| ContentBlock::Image { source })
        }
        // input_file, input_audio, ... have no Messages equivalent
        InputContentPart::Unsupported => None,
    }
}

/// `data:<mime>;base64,<payload>` becomes an inline image; any other
/// non-empty URL is passed by reference. Malformed data URIs are dropped.
fn image_source(url: &str) -> Option<ImageSource> {
    if url.is_empty() {
        return None;
    }

    match url.strip_prefix("data:") {
        Some(rest) => {
            let (media_type, data) = rest.split_once(";base64,")?;
            if media_type.is_empty() || media_type.contains(';') || data.is_empty() {
                return None;
            }
            Some(ImageSource::Base64 {
                media_type: media_type.to_string(),
                data: data.to_string(),
            })
        }
        None => Some(ImageSource::Url {
            url: url.to_string(),
        }),
    }
}

/// A lone text block is sent as a bare string.
fn collapse_blocks(blocks: Vec<ContentBlock>) -> MessageContent {
    if let [ContentBlock::Text { text }] = blocks.as_slice() {
        return MessageContent::Text(text.clone());
    }
    MessageContent::Blocks(blocks)
}

fn tool_output_content(output: &Value) -> Option<ToolResultContent> {
    match output {
        Value::Null => None,
        Value::String(text) => Some(ToolResultContent::Text(text.clone())),
        Value::Array(values) => {
            // Output given as content parts; unparseable parts are skipped
            let parts: Vec<InputContentPart> = decode_each(values.clone());
            Some(ToolResultContent::Blocks(
                parts.iter().filter_map(translate_part).collect(),
            ))
        }
        other => Some(ToolResultContent::Text(other.to_string())),
    }
}

fn translate_tool(tool: &ResponsesTool) -> Option<Tool> {
    // Built-in tools (web_search, file_search, ...) are not forwarded
    if tool.tool_type != "function" {
        return None;
    }

    Some(Tool {
        name: tool.name.clone().unwrap_or_default(),
        description: tool.description.clone().unwrap_or_default(),
        input_schema: tool
            .parameters
            .clone()
            .unwrap_or_else(|| serde_json::json!({ "type": "object" })),
    })
}

fn translate_tool_choice(tc: &ResponsesToolChoice) -> Option<ToolChoice> {
    match tc {
        ResponsesToolChoice::Mode(mode) => match mode.as_str() {
            "auto" => Some(ToolChoice::Auto),
            "none" => Some(ToolChoice::None),
            "required" => Some(ToolChoice::Any),
            _ => None,
        },
        ResponsesToolChoice::Named(named) if !named.name.is_empty() => Some(ToolChoice::Tool {
            name: named.name.clone(),
        }),
        // Shapes with no Messages equivalent are left out entirely
        ResponsesToolChoice::Named(_) | ResponsesToolChoice::Other(_) => None,
    }
}

/// Thinking budget for the request, or `None` when thinking stays off.
fn thinking_budget(model: &str, req: &ResponsesRequest) -> Option<u64> {
    if !is_thinking_model(model) && req.reasoning.is_none() {
        return None;
    }

    let effort = req.reasoning.as_ref().and_then(|r| r.effort.as_deref());
    Some(budget_for_effort(effort))
}

pub fn budget_for_effort(effort: Option<&str>) -> u64 {
    match effort {
        Some("high") => 20_000,
        Some("low") => 5_000,
        _ => 10_000,
    }
}

/// Models named `*thinking*` or `gemini-N` with N >= 3 reason by default.
pub fn is_thinking_model(model: &str) -> bool {
    let model = model.to_lowercase();
    if model.contains("thinking") {
        return true;
    }

    model
        .match_indices("gemini-")
        .map(|(pos, pat)| &model[pos + pat.len()..])
        .map(|rest| {
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            &rest[..end]
        })
        .find(|digits| !digits.is_empty())
        // Only overflow can fail here, and such a version is certainly >= 3
        .is_some_and(|digits| digits.parse::<u64>().map_or(true, |major| major >= 3))
}
