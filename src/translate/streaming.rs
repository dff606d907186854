//! State machine for translating Anthropic streaming events into Responses API SSE events.
//!
//! The [`StreamTranslator`] processes Anthropic stream events one at a time,
//! tracking which content block is open and which output items exist, and
//! emits the corresponding `response.*` events (`response.created`,
//! `response.output_text.delta`, ...). Nothing is buffered: each upstream
//! event produces its outbound events immediately.

use std::mem;

use super::anthropic_types::{Delta, ResponseContentBlock, StreamEvent, Usage};
use super::ids::IdGenerator;
use super::response::{echo_request, unix_now};
use super::responses_types::{
    ItemStatus, OutputContent, OutputItem, RequestEcho, ResponseObject, ResponseStatus,
    ResponseUsage, ResponsesRequest, ResponsesStreamEvent,
};

/// A `tool_use` block being streamed as a `function_call` item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCallAccumulator {
    pub id: String,
    pub call_id: String,
    pub name: String,
    pub arguments: String,
    pub output_index: usize,
}

/// The content block currently open upstream. Only a `tool_use` block
/// carries an accumulator, so a half-built call can't outlive its block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OpenBlock {
    #[default]
    Idle,
    Text,
    Thinking,
    ToolUse(FunctionCallAccumulator),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MessageItem {
    id: String,
    output_index: usize,
}

/// Per-connection streaming state. Never shared between streams.
#[derive(Debug)]
pub struct StreamState {
    ids: IdGenerator,
    response_id: String,
    created_at: i64,
    sequence_number: u64,
    item_count: usize,
    content_count: usize,
    current_item_id: Option<String>,
    block: OpenBlock,
    message_item: Option<MessageItem>,
    usage: Usage,
    completed: bool,
}

impl StreamState {
    pub fn new() -> Self {
        Self::with_ids(IdGenerator::new(), unix_now())
    }

    /// State with an explicit id source and creation time.
    pub fn with_ids(mut ids: IdGenerator, created_at: i64) -> Self {
        Self {
            response_id: ids.response_id(),
            ids,
            created_at,
            sequence_number: 0,
            item_count: 0,
            content_count: 0,
            current_item_id: None,
            block: OpenBlock::Idle,
            message_item: None,
            usage: Usage::default(),
            completed: false,
        }
    }

    pub fn response_id(&self) -> &str {
        &self.response_id
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Sequence number the next emitted event will get.
    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn open_block(&self) -> &OpenBlock {
        &self.block
    }

    pub fn has_emitted_message_item(&self) -> bool {
        self.message_item.is_some()
    }

    pub fn message_item_id(&self) -> Option<&str> {
        self.message_item.as_ref().map(|m| m.id.as_str())
    }

    /// Whether `response.completed` has been emitted.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    fn next_sequence(&mut self) -> u64 {
        let n = self.sequence_number;
        self.sequence_number += 1;
        n
    }

    fn open_item(&mut self, id: &str) -> usize {
        let index = self.item_count;
        self.item_count += 1;
        self.current_item_id = Some(id.to_string());
        index
    }

    fn current_item_index(&self) -> usize {
        self.item_count.saturating_sub(1)
    }

    fn current_content_index(&self) -> usize {
        self.content_count.saturating_sub(1)
    }

    /// Where text events go: the message item, or the latest item if a text
    /// delta shows up without its block start.
    fn text_target(&self) -> (Option<String>, usize) {
        match &self.message_item {
            Some(item) => (Some(item.id.clone()), item.output_index),
            None => (None, self.current_item_index()),
        }
    }
}

impl Default for StreamState {
    fn default() -> Self {
        Self::new()
    }
}

/// Translates one Anthropic event stream into Responses API events.
///
/// Usage:
///   let mut translator = StreamTranslator::new("gpt-4o", &original_request);
///   for event in anthropic_events {
///       for out in translator.process_event(&event) {
///           // frame with `sse::format_event` and send
///       }
///   }
#[derive(Debug)]
pub struct StreamTranslator {
    model: String,
    echo: RequestEcho,
    state: StreamState,
}

impl StreamTranslator {
    pub fn new(model: &str, original: &ResponsesRequest) -> Self {
        Self::with_state(model, original, StreamState::new())
    }

    pub fn with_state(model: &str, original: &ResponsesRequest, state: StreamState) -> Self {
        Self {
            model: model.to_string(),
            echo: echo_request(original),
            state,
        }
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    /// Process a single upstream event, returning zero or more outbound events.
    pub fn process_event(&mut self, event: &StreamEvent) -> Vec<ResponsesStreamEvent> {
        if self.state.completed {
            return Vec::new();
        }

        match event {
            StreamEvent::MessageStart { message } => {
                self.state.usage.input_tokens = message.usage.input_tokens;
                self.state.usage.output_tokens = message.usage.output_tokens;
                self.on_message_start()
            }
            StreamEvent::ContentBlockStart { content_block, .. } => {
                self.on_block_start(content_block)
            }
            StreamEvent::ContentBlockDelta { delta, .. } => self.on_block_delta(delta),
            StreamEvent::ContentBlockStop { .. } => self.on_block_stop(),
            StreamEvent::MessageDelta { usage, .. } => {
                // Remembered for message_stop; nothing to emit yet
                if let Some(usage) = usage {
                    if let Some(input) = usage.input_tokens {
                        self.state.usage.input_tokens = input;
                    }
                    self.state.usage.output_tokens = usage.output_tokens;
                }
                Vec::new()
            }
            StreamEvent::MessageStop { message } => {
                let usage = message
                    .as_ref()
                    .and_then(|m| m.usage)
                    .unwrap_or(self.state.usage);
                self.on_message_stop(usage)
            }
            StreamEvent::Ping | StreamEvent::Error { .. } | StreamEvent::Unknown => Vec::new(),
        }
    }

    fn on_message_start(&mut self) -> Vec<ResponsesStreamEvent> {
        vec![
            ResponsesStreamEvent::Created {
                sequence_number: self.state.next_sequence(),
                response: self.envelope(ResponseStatus::InProgress, None),
            },
            ResponsesStreamEvent::InProgress {
                sequence_number: self.state.next_sequence(),
                response: self.envelope(ResponseStatus::InProgress, None),
            },
        ]
    }

    fn on_block_start(&mut self, block: &ResponseContentBlock) -> Vec<ResponsesStreamEvent> {
        let mut events = Vec::new();

        match block {
            ResponseContentBlock::Text { .. } => {
                if self.state.message_item.is_none() {
                    let id = self.state.ids.message_id();
                    let output_index = self.state.open_item(&id);
                    self.state.message_item = Some(MessageItem {
                        id: id.clone(),
                        output_index,
                    });

                    events.push(ResponsesStreamEvent::OutputItemAdded {
                        sequence_number: self.state.next_sequence(),
                        output_index,
                        item: OutputItem::Message {
                            id,
                            status: ItemStatus::InProgress,
                            role: "assistant".to_string(),
                            content: Vec::new(),
                        },
                    });
                }

                let content_index = self.state.content_count;
                self.state.content_count += 1;
                let (item_id, output_index) = self.state.text_target();

                events.push(ResponsesStreamEvent::ContentPartAdded {
                    sequence_number: self.state.next_sequence(),
                    item_id,
                    output_index,
                    content_index,
                    part: OutputContent::text(""),
                });
                self.state.block = OpenBlock::Text;
            }
            ResponseContentBlock::Thinking { .. } => {
                // Reasoning deltas go out without a part-added event
                self.state.block = OpenBlock::Thinking;
            }
            ResponseContentBlock::ToolUse { id, name, .. } => {
                let fc_id = self.state.ids.function_call_id();
                let output_index = self.state.open_item(&fc_id);
                self.state.block = OpenBlock::ToolUse(FunctionCallAccumulator {
                    id: fc_id.clone(),
                    call_id: id.clone(),
                    name: name.clone(),
                    arguments: String::new(),
                    output_index,
                });

                events.push(ResponsesStreamEvent::OutputItemAdded {
                    sequence_number: self.state.next_sequence(),
                    output_index,
                    item: OutputItem::FunctionCall {
                        id: fc_id,
                        call_id: id.clone(),
                        name: name.clone(),
                        arguments: String::new(),
                        status: ItemStatus::InProgress,
                    },
                });
            }
            ResponseContentBlock::Unsupported => {
                self.state.block = OpenBlock::Idle;
            }
        }

        events
    }

    fn on_block_delta(&mut self, delta: &Delta) -> Vec<ResponsesStreamEvent> {
        match delta {
            Delta::TextDelta { text } => {
                let (item_id, output_index) = self.state.text_target();
                vec![ResponsesStreamEvent::OutputTextDelta {
                    sequence_number: self.state.next_sequence(),
                    item_id,
                    output_index,
                    content_index: self.state.current_content_index(),
                    delta: text.clone(),
                }]
            }
            Delta::ThinkingDelta { thinking } => vec![ResponsesStreamEvent::ReasoningDelta {
                sequence_number: self.state.next_sequence(),
                item_id: self.state.current_item_id.clone(),
                delta: thinking.clone(),
            }],
            Delta::InputJsonDelta { partial_json } => {
                let OpenBlock::ToolUse(call) = &mut self.state.block else {
                    // No function call open to attach the fragment to
                    return Vec::new();
                };
                call.arguments.push_str(partial_json);
                let item_id = call.id.clone();
                let output_index = call.output_index;

                vec![ResponsesStreamEvent::FunctionCallArgumentsDelta {
                    sequence_number: self.state.next_sequence(),
                    item_id,
                    output_index,
                    delta: partial_json.clone(),
                }]
            }
            Delta::Unsupported => Vec::new(),
        }
    }

    fn on_block_stop(&mut self) -> Vec<ResponsesStreamEvent> {
        match mem::take(&mut self.state.block) {
            OpenBlock::Text => {
                let (item_id, output_index) = self.state.text_target();
                vec![ResponsesStreamEvent::OutputTextDone {
                    sequence_number: self.state.next_sequence(),
                    item_id,
                    output_index,
                    content_index: self.state.current_content_index(),
                    // Accumulated text is not tracked
                    text: String::new(),
                }]
            }
            OpenBlock::ToolUse(call) => vec![
                ResponsesStreamEvent::FunctionCallArgumentsDone {
                    sequence_number: self.state.next_sequence(),
                    item_id: call.id.clone(),
                    output_index: call.output_index,
                    name: call.name.clone(),
                    call_id: call.call_id.clone(),
                    arguments: call.arguments.clone(),
                },
                ResponsesStreamEvent::OutputItemDone {
                    sequence_number: self.state.next_sequence(),
                    output_index: call.output_index,
                    item: OutputItem::FunctionCall {
                        id: call.id,
                        call_id: call.call_id,
                        name: call.name,
                        arguments: call.arguments,
                        status: ItemStatus::Completed,
                    },
                },
            ],
            OpenBlock::Idle | OpenBlock::Thinking => Vec::new(),
        }
    }

    fn on_message_stop(&mut self, usage: Usage) -> Vec<ResponsesStreamEvent> {
        let mut events = Vec::new();

        if let Some(item) = self.state.message_item.clone() {
            events.push(ResponsesStreamEvent::OutputItemDone {
                sequence_number: self.state.next_sequence(),
                output_index: item.output_index,
                item: OutputItem::Message {
                    id: item.id,
                    status: ItemStatus::Completed,
                    role: "assistant".to_string(),
                    // Content was already streamed part by part
                    content: Vec::new(),
                },
            });
        }

        let usage = ResponseUsage {
            input_tokens: usage.input_tokens,
            input_tokens_details: None,
            output_tokens: usage.output_tokens,
            output_tokens_details: None,
            total_tokens: usage.input_tokens + usage.output_tokens,
        };

        events.push(ResponsesStreamEvent::Completed {
            sequence_number: self.state.next_sequence(),
            response: self.envelope(ResponseStatus::Completed, Some(usage)),
        });
        self.state.completed = true;

        events
    }

    fn envelope(&self, status: ResponseStatus, usage: Option<ResponseUsage>) -> ResponseObject {
        ResponseObject {
            id: self.state.response_id.clone(),
            object: "response".to_string(),
            created_at: self.state.created_at,
            status,
            model: self.model.clone(),
            output: Vec::new(),
            echo: Some(self.echo.clone()),
            text: None,
            usage,
            reasoning: None,
            incomplete_details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::anthropic_types::{MessageStopBody, MessagesResponse};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn translator() -> StreamTranslator {
        let state = StreamState::with_ids(
            IdGenerator::from_rng(StdRng::seed_from_u64(1)),
            1_700_000_000,
        );
        StreamTranslator::with_state("test-model", &ResponsesRequest::default(), state)
    }

    fn message_start() -> StreamEvent {
        StreamEvent::MessageStart {
            message: MessagesResponse::default(),
        }
    }

    fn block_start(block: ResponseContentBlock) -> StreamEvent {
        StreamEvent::ContentBlockStart {
            index: 0,
            content_block: block,
        }
    }

    fn text_start() -> StreamEvent {
        block_start(ResponseContentBlock::Text {
            text: String::new(),
        })
    }

    fn tool_start(id: &str, name: &str) -> StreamEvent {
        block_start(ResponseContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input: serde_json::json!({}),
        })
    }

    fn delta(delta: Delta) -> StreamEvent {
        StreamEvent::ContentBlockDelta { index: 0, delta }
    }

    fn text_delta(text: &str) -> StreamEvent {
        delta(Delta::TextDelta {
            text: text.to_string(),
        })
    }

    fn json_delta(partial: &str) -> StreamEvent {
        delta(Delta::InputJsonDelta {
            partial_json: partial.to_string(),
        })
    }

    fn block_stop() -> StreamEvent {
        StreamEvent::ContentBlockStop { index: 0 }
    }

    fn message_stop(input: u64, output: u64) -> StreamEvent {
        StreamEvent::MessageStop {
            message: Some(MessageStopBody {
                usage: Some(Usage {
                    input_tokens: input,
                    output_tokens: output,
                    ..Default::default()
                }),
            }),
        }
    }

    fn run(translator: &mut StreamTranslator, events: &[StreamEvent]) -> Vec<ResponsesStreamEvent> {
        events
            .iter()
            .flat_map(|e| translator.process_event(e))
            .collect()
    }

    fn names(events: &[ResponsesStreamEvent]) -> Vec<&'static str> {
        events.iter().map(ResponsesStreamEvent::event_name).collect()
    }

    #[test]
    fn test_simple_text_stream() {
        let mut translator = translator();

        let events = translator.process_event(&message_start());
        assert_eq!(names(&events), ["response.created", "response.in_progress"]);

        assert!(!translator.state().has_emitted_message_item());
        let events = translator.process_event(&text_start());
        assert!(translator.state().has_emitted_message_item());
        assert_eq!(
            names(&events),
            ["response.output_item.added", "response.content_part.added"]
        );

        let events = translator.process_event(&text_delta("Hi"));
        assert_eq!(events.len(), 1);
        if let ResponsesStreamEvent::OutputTextDelta {
            item_id,
            output_index,
            content_index,
            delta,
            ..
        } = &events[0]
        {
            assert_eq!(item_id.as_deref(), translator.state().message_item_id());
            assert_eq!(*output_index, 0);
            assert_eq!(*content_index, 0);
            assert_eq!(delta, "Hi");
        } else {
            panic!("Expected output_text.delta");
        }

        let events = translator.process_event(&block_stop());
        assert_eq!(names(&events), ["response.output_text.done"]);
        assert_eq!(translator.state().open_block(), &OpenBlock::Idle);

        let events = translator.process_event(&message_stop(5, 2));
        assert_eq!(
            names(&events),
            ["response.output_item.done", "response.completed"]
        );

        let ResponsesStreamEvent::Completed {
            sequence_number,
            response,
        } = &events[1]
        else {
            panic!("Expected response.completed");
        };
        assert_eq!(*sequence_number, 7);
        assert_eq!(response.status, ResponseStatus::Completed);
        let usage = response.usage.unwrap();
        assert_eq!(usage.input_tokens, 5);
        assert_eq!(usage.output_tokens, 2);
        assert_eq!(usage.total_tokens, 7);
        assert!(translator.state().is_completed());
    }

    #[test]
    fn test_sequence_numbers_are_gapless_from_zero() {
        let mut translator = translator();
        let events = run(
            &mut translator,
            &[
                message_start(),
                block_start(ResponseContentBlock::Thinking {
                    thinking: String::new(),
                    signature: None,
                }),
                delta(Delta::ThinkingDelta {
                    thinking: "let me see".to_string(),
                }),
                block_stop(),
                text_start(),
                text_delta("a"),
                text_delta("b"),
                block_stop(),
                tool_start("toolu_1", "lookup"),
                json_delta("{}"),
                block_stop(),
                StreamEvent::Ping,
                message_stop(1, 1),
            ],
        );

        let numbers: Vec<u64> = events.iter().map(ResponsesStreamEvent::sequence_number).collect();
        let expected: Vec<u64> = (0..events.len() as u64).collect();
        assert_eq!(numbers, expected);
        assert_eq!(translator.state().sequence_number(), events.len() as u64);
    }

    #[test]
    fn test_thinking_has_no_part_added() {
        let mut translator = translator();
        translator.process_event(&message_start());

        let events = translator.process_event(&block_start(ResponseContentBlock::Thinking {
            thinking: String::new(),
            signature: None,
        }));
        assert!(events.is_empty());
        assert_eq!(translator.state().open_block(), &OpenBlock::Thinking);

        let events = translator.process_event(&delta(Delta::ThinkingDelta {
            thinking: "hmm".to_string(),
        }));
        assert_eq!(names(&events), ["response.reasoning.delta"]);
        // No item has been opened yet
        assert!(matches!(
            &events[0],
            ResponsesStreamEvent::ReasoningDelta { item_id: None, delta, .. } if delta == "hmm"
        ));

        assert!(translator.process_event(&block_stop()).is_empty());
    }

    #[test]
    fn test_tool_call_stream() {
        let mut translator = translator();
        translator.process_event(&message_start());

        let events = translator.process_event(&tool_start("toolu_abc", "search"));
        assert_eq!(names(&events), ["response.output_item.added"]);
        let fc_id = match translator.state().open_block() {
            OpenBlock::ToolUse(call) => {
                assert_eq!(call.call_id, "toolu_abc");
                assert_eq!(call.output_index, 0);
                call.id.clone()
            }
            other => panic!("Expected open tool_use block, got {other:?}"),
        };
        assert!(fc_id.starts_with("fc_"));

        run(&mut translator, &[json_delta("{\"q\""), json_delta(":\"rust\"}")]);

        let events = translator.process_event(&block_stop());
        assert_eq!(
            names(&events),
            [
                "response.function_call_arguments.done",
                "response.output_item.done"
            ]
        );
        if let ResponsesStreamEvent::FunctionCallArgumentsDone {
            item_id,
            call_id,
            name,
            arguments,
            ..
        } = &events[0]
        {
            assert_eq!(item_id, &fc_id);
            assert_eq!(call_id, "toolu_abc");
            assert_eq!(name, "search");
            assert_eq!(arguments, "{\"q\":\"rust\"}");
        } else {
            panic!("Expected function_call_arguments.done");
        }
        assert_eq!(translator.state().open_block(), &OpenBlock::Idle);

        // Tool-only stream: no message item to close
        let events = translator.process_event(&message_stop(3, 4));
        assert_eq!(names(&events), ["response.completed"]);
    }

    #[test]
    fn test_tool_call_without_arguments() {
        let mut translator = translator();
        let events = run(
            &mut translator,
            &[message_start(), tool_start("toolu_1", "ping"), block_stop()],
        );

        let done = events.last().unwrap();
        assert!(matches!(
            done,
            ResponsesStreamEvent::OutputItemDone {
                item: OutputItem::FunctionCall { arguments, status: ItemStatus::Completed, .. },
                ..
            } if arguments.is_empty()
        ));
    }

    #[test]
    fn test_json_delta_without_open_call_is_ignored() {
        let mut translator = translator();
        translator.process_event(&message_start());
        let before = translator.state().sequence_number();

        assert!(translator.process_event(&json_delta("{}")).is_empty());
        translator.process_event(&text_start());
        let after_text = translator.state().sequence_number();
        assert!(translator.process_event(&json_delta("{}")).is_empty());

        assert_eq!(before + 2, after_text);
        assert_eq!(translator.state().sequence_number(), after_text);
    }

    #[test]
    fn test_message_item_opened_once() {
        let mut translator = translator();
        let events = run(
            &mut translator,
            &[
                message_start(),
                text_start(),
                text_delta("one"),
                block_stop(),
                tool_start("toolu_1", "lookup"),
                block_stop(),
                text_start(),
                text_delta("two"),
                block_stop(),
                message_stop(0, 0),
            ],
        );

        let added: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                ResponsesStreamEvent::OutputItemAdded { output_index, item, .. } => {
                    Some((*output_index, item.clone()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(added.len(), 2);
        assert!(matches!(added[0], (0, OutputItem::Message { .. })));
        assert!(matches!(added[1], (1, OutputItem::FunctionCall { .. })));

        // Second text block reuses the message item with the next content index
        let second_part = events
            .iter()
            .filter_map(|e| match e {
                ResponsesStreamEvent::ContentPartAdded {
                    output_index,
                    content_index,
                    ..
                } => Some((*output_index, *content_index)),
                _ => None,
            })
            .last();
        assert_eq!(second_part, Some((0, 1)));

        let message_done = events
            .iter()
            .rev()
            .find(|e| e.event_name() == "response.output_item.done")
            .unwrap();
        assert!(matches!(
            message_done,
            ResponsesStreamEvent::OutputItemDone {
                output_index: 0,
                item: OutputItem::Message { content, status: ItemStatus::Completed, .. },
                ..
            } if content.is_empty()
        ));
    }

    #[test]
    fn test_usage_falls_back_to_message_start_and_delta() {
        let mut translator = translator();
        let mut start = MessagesResponse::default();
        start.usage.input_tokens = 12;

        let events = run(
            &mut translator,
            &[
                StreamEvent::MessageStart { message: start },
                StreamEvent::MessageDelta {
                    delta: Default::default(),
                    usage: Some(crate::translate::anthropic_types::DeltaUsage {
                        input_tokens: None,
                        output_tokens: 9,
                    }),
                },
                StreamEvent::MessageStop { message: None },
            ],
        );

        let Some(ResponsesStreamEvent::Completed { response, .. }) = events.last() else {
            panic!("Expected response.completed");
        };
        let usage = response.usage.unwrap();
        assert_eq!(usage.input_tokens, 12);
        assert_eq!(usage.output_tokens, 9);
        assert_eq!(usage.total_tokens, 21);
    }

    #[test]
    fn test_unknown_events_change_nothing() {
        let mut translator = translator();
        translator.process_event(&message_start());
        let seq = translator.state().sequence_number();

        for event in [
            StreamEvent::Unknown,
            StreamEvent::Ping,
            delta(Delta::Unsupported),
            block_start(ResponseContentBlock::Unsupported),
        ] {
            assert!(translator.process_event(&event).is_empty());
        }
        assert_eq!(translator.state().sequence_number(), seq);
        assert_eq!(translator.state().open_block(), &OpenBlock::Idle);
    }

    #[test]
    fn test_created_envelope_echoes_request() {
        let original: ResponsesRequest = serde_json::from_value(serde_json::json!({
            "model": "gpt-4o",
            "input": "hi",
            "temperature": 0.5,
            "instructions": "Be brief"
        }))
        .unwrap();
        let state = StreamState::with_ids(IdGenerator::from_rng(StdRng::seed_from_u64(2)), 42);
        let response_id = state.response_id().to_string();
        let mut translator = StreamTranslator::with_state("gpt-4o", &original, state);

        let events = translator.process_event(&message_start());
        let json = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(json["type"], "response.created");
        assert_eq!(json["sequence_number"], 0);
        assert_eq!(json["response"]["id"], response_id.as_str());
        assert_eq!(json["response"]["created_at"], 42);
        assert_eq!(json["response"]["status"], "in_progress");
        assert_eq!(json["response"]["model"], "gpt-4o");
        assert_eq!(json["response"]["output"], serde_json::json!([]));
        assert_eq!(json["response"]["temperature"], 0.5);
        assert_eq!(json["response"]["top_p"], 1.0);
        assert_eq!(json["response"]["tool_choice"], "auto");
        assert_eq!(json["response"]["instructions"], "Be brief");
    }

    #[test]
    fn test_events_after_completion_are_dropped() {
        let mut translator = translator();
        run(&mut translator, &[message_start(), message_stop(1, 1)]);
        assert!(translator.process_event(&message_start()).is_empty());
        assert!(translator.process_event(&text_start()).is_empty());
    }
}
