//! Identifier generation for response objects and output items.
//!
//! Ids are a type prefix followed by random bytes rendered as lowercase hex.
//! The byte source is injected so tests can produce deterministic ids.

use std::fmt;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

pub const RESPONSE_ID_PREFIX: &str = "resp_";
pub const MESSAGE_ID_PREFIX: &str = "msg_";
pub const FUNCTION_CALL_ID_PREFIX: &str = "fc_";

const RESPONSE_ID_BYTES: usize = 12;
const ITEM_ID_BYTES: usize = 8;

pub struct IdGenerator {
    rng: Box<dyn RngCore + Send>,
}

impl IdGenerator {
    /// Generator backed by an OS-seeded RNG.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn from_rng<R: RngCore + Send + 'static>(rng: R) -> Self {
        Self { rng: Box::new(rng) }
    }

    /// `resp_` + 12 random bytes.
    pub fn response_id(&mut self) -> String {
        self.generate(RESPONSE_ID_PREFIX, RESPONSE_ID_BYTES)
    }

    /// `msg_` + 8 random bytes.
    pub fn message_id(&mut self) -> String {
        self.generate(MESSAGE_ID_PREFIX, ITEM_ID_BYTES)
    }

    /// `fc_` + 8 random bytes.
    pub fn function_call_id(&mut self) -> String {
        self.generate(FUNCTION_CALL_ID_PREFIX, ITEM_ID_BYTES)
    }

    fn generate(&mut self, prefix: &str, len: usize) -> String {
        let mut bytes = vec![0u8; len];
        self.rng.fill_bytes(&mut bytes);

        format!("{prefix}{}", hex::encode(bytes))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_lower_hex(s: &str) -> bool {
        s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    #[test]
    fn test_id_shapes() {
        let mut ids = IdGenerator::new();

        let resp = ids.response_id();
        let suffix = resp.strip_prefix("resp_").unwrap();
        assert_eq!(suffix.len(), 24);
        assert!(is_lower_hex(suffix));

        let msg = ids.message_id();
        let suffix = msg.strip_prefix("msg_").unwrap();
        assert_eq!(suffix.len(), 16);
        assert!(is_lower_hex(suffix));

        let fc = ids.function_call_id();
        let suffix = fc.strip_prefix("fc_").unwrap();
        assert_eq!(suffix.len(), 16);
        assert!(is_lower_hex(suffix));
    }

    #[test]
    fn test_seeded_generators_agree() {
        let mut a = IdGenerator::from_rng(StdRng::seed_from_u64(42));
        let mut b = IdGenerator::from_rng(StdRng::seed_from_u64(42));
        assert_eq!(a.response_id(), b.response_id());
        assert_eq!(a.function_call_id(), b.function_call_id());
    }

    #[test]
    fn test_fresh_ids_differ() {
        let mut ids = IdGenerator::new();
        assert_ne!(ids.message_id(), ids.message_id());
    }

    #[test]
    fn test_zero_source_gives_zero_hex() {
        let mut ids = IdGenerator::from_rng(rand::rngs::mock::StepRng::new(0, 0));
        assert_eq!(ids.function_call_id(), "fc_0000000000000000");
    }

    #[test]
    fn test_bytes_render_in_order() {
        let rng = rand::rngs::mock::StepRng::new(0x0123_4567_89ab_cdef, 0);
        let mut ids = IdGenerator::from_rng(rng);
        assert_eq!(ids.message_id(), "msg_efcdab8967452301");
    }
}
