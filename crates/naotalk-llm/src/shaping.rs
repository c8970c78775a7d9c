//! Reply shaping for spoken output
//!
//! Raw model output is not fit for a robot's voice: it may carry chat
//! template control tokens and run on for paragraphs. Shaping strips the
//! tokens, caps the reply at two sentences, and guarantees a non-empty
//! line ending in a period.

use regex::Regex;
use std::sync::LazyLock;

/// Spoken when the model produced nothing usable
pub const EMPTY_REPLY_FALLBACK: &str = "I'm not sure how to respond to that.";

/// Spoken when the inference pipeline itself failed
pub const PIPELINE_FAULT_FALLBACK: &str = "I'm having trouble thinking right now.";

/// Chat-template control tokens that leak into generated text
static CONTROL_TOKENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\|im_(?:start|end)\|>").unwrap());

/// Shape a raw model reply into a speakable line.
///
/// Strips `<|im_start|>`/`<|im_end|>` tokens, keeps at most the first
/// two sentences re-joined with ". ", and appends a terminal period.
/// An effectively empty reply becomes [`EMPTY_REPLY_FALLBACK`].
pub fn shape_reply(raw: &str) -> String {
    let cleaned = CONTROL_TOKENS.replace_all(raw, "");
    let cleaned = cleaned.trim();

    let sentences: Vec<&str> = cleaned
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    match sentences.len() {
        0 => EMPTY_REPLY_FALLBACK.to_string(),
        1 => format!("{}.", sentences[0]),
        _ => format!("{}. {}.", sentences[0], sentences[1]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_tokens_are_stripped() {
        let shaped = shape_reply("<|im_start|>Hello there<|im_end|>");
        assert_eq!(shaped, "Hello there.");
    }

    #[test]
    fn test_reply_capped_at_two_sentences() {
        let shaped = shape_reply("First thing. Second thing. Third thing. Fourth.");
        assert_eq!(shaped, "First thing. Second thing.");
    }

    #[test]
    fn test_single_sentence_gains_terminal_period() {
        assert_eq!(shape_reply("Robots are fun"), "Robots are fun.");
        assert_eq!(shape_reply("Robots are fun."), "Robots are fun.");
    }

    #[test]
    fn test_empty_reply_uses_fallback() {
        assert_eq!(shape_reply(""), EMPTY_REPLY_FALLBACK);
        assert_eq!(shape_reply("   "), EMPTY_REPLY_FALLBACK);
        assert_eq!(shape_reply("<|im_end|>"), EMPTY_REPLY_FALLBACK);
        assert_eq!(shape_reply(". . ."), EMPTY_REPLY_FALLBACK);
    }

    #[test]
    fn test_whitespace_around_sentences_is_trimmed() {
        let shaped = shape_reply("  I like music .   It is relaxing .  ");
        assert_eq!(shaped, "I like music. It is relaxing.");
    }
}
