//! Demonstrate using the translation layer without a server.
//!
//! Usage:
//!   `cargo run --example translate_only`

use responses_bridge::translate::anthropic_types::{MessagesResponse, StreamEvent};
use responses_bridge::translate::ids::IdGenerator;
use responses_bridge::translate::request::responses_to_anthropic;
use responses_bridge::translate::response::anthropic_to_responses;
use responses_bridge::translate::responses_types::ResponsesRequest;
use responses_bridge::translate::sse::format_event;
use responses_bridge::translate::streaming::StreamTranslator;
use serde_json::json;

fn main() -> Result<(), serde_json::Error> {
    // A Responses API request, as a client would send it
    let req: ResponsesRequest = serde_json::from_value(json!({
        "model": "claude-sonnet-4-20250514",
        "instructions": "You are a geography expert. Be concise.",
        "input": [
            {"type": "message", "role": "user", "content": "What is the capital of France?"},
            {"type": "message", "role": "assistant", "content": [
                {"type": "output_text", "text": "The capital of France is Paris."}
            ]},
            {"type": "message", "role": "user", "content": [
                {"type": "input_text", "text": "And Germany?"}
            ]}
        ],
        "tools": [{
            "type": "function",
            "name": "lookup_capital",
            "description": "Look up the capital of a country",
            "parameters": {
                "type": "object",
                "properties": {"country": {"type": "string"}},
                "required": ["country"]
            }
        }],
        "reasoning": {"effort": "low"},
        "stream": true
    }))?;

    let upstream_req = responses_to_anthropic(&req);

    println!("=== Translated Request (Messages format) ===");
    println!("{}", serde_json::to_string_pretty(&upstream_req)?);
    println!();

    // A Messages reply, as the provider would send it
    let upstream_resp: MessagesResponse = serde_json::from_value(json!({
        "id": "msg_demo",
        "type": "message",
        "role": "assistant",
        "model": "claude-sonnet-4-20250514",
        "content": [
            {"type": "thinking", "thinking": "Germany's capital is well known.", "signature": "sig"},
            {"type": "text", "text": "The capital of Germany is Berlin."}
        ],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 42, "output_tokens": 12}
    }))?;

    let mut ids = IdGenerator::new();
    let resp = anthropic_to_responses(&upstream_resp, "claude-sonnet-4-20250514", &req, &mut ids);

    println!("=== Translated Response (Responses format) ===");
    println!("{}", serde_json::to_string_pretty(&resp)?);
    println!();

    // The same reply, streamed
    let upstream_events = [
        json!({"type": "message_start", "message": {
            "id": "msg_demo", "type": "message", "role": "assistant", "content": [],
            "model": "claude-sonnet-4-20250514",
            "usage": {"input_tokens": 42, "output_tokens": 1}
        }}),
        json!({"type": "content_block_start", "index": 0,
            "content_block": {"type": "thinking", "thinking": ""}}),
        json!({"type": "content_block_delta", "index": 0,
            "delta": {"type": "thinking_delta", "thinking": "Germany's capital is well known."}}),
        json!({"type": "content_block_stop", "index": 0}),
        json!({"type": "content_block_start", "index": 1,
            "content_block": {"type": "text", "text": ""}}),
        json!({"type": "content_block_delta", "index": 1,
            "delta": {"type": "text_delta", "text": "The capital of Germany "}}),
        json!({"type": "content_block_delta", "index": 1,
            "delta": {"type": "text_delta", "text": "is Berlin."}}),
        json!({"type": "content_block_stop", "index": 1}),
        json!({"type": "message_delta", "delta": {"stop_reason": "end_turn"},
            "usage": {"output_tokens": 12}}),
        json!({"type": "message_stop"}),
    ];

    let mut translator = StreamTranslator::new("claude-sonnet-4-20250514", &req);

    println!("=== Streaming Translation (Responses SSE) ===");
    for raw in upstream_events {
        let event: StreamEvent = serde_json::from_value(raw)?;
        for out in translator.process_event(&event) {
            print!("{}", format_event(&out));
        }
    }

    Ok(())
}
