//! Server-sent event framing for outbound Responses API events.

use super::responses_types::ResponsesStreamEvent;

/// Frame one event as `event: <type>\ndata: <json>\n\n`.
pub fn format_event(event: &ResponsesStreamEvent) -> String {
    format_sse(event.event_name(), &event_data(event))
}

/// JSON payload of an event's `data:` line.
pub fn event_data(event: &ResponsesStreamEvent) -> String {
    // Every event type is plain data; serialization has no failure path here
    serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string())
}

/// Frame an already-serialized payload under the given event name.
pub fn format_sse(event_name: &str, data: &str) -> String {
    format!("event: {event_name}\ndata: {data}\n\n")
}
