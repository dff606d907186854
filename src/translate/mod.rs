//! API translation between the Responses and Anthropic Messages formats.
//!
//! The core of the bridge: converts requests, responses, and streaming events
//! between the two API formats. All translation functions are pure (no I/O);
//! the only incidental inputs are the injected [`ids::IdGenerator`] and the clock.

pub mod anthropic_types;
pub mod ids;
pub mod request;
pub mod response;
pub mod responses_types;
pub mod sse;
pub mod streaming;
