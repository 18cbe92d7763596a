//! Separation of a `<think>...</think>` reasoning block from the answer.
//!
//! [`split`] is a pure function of the whole text received so far. It is
//! re-run from scratch on every token instead of keeping incremental parser
//! state; model output is small enough that the rescan is negligible.

/// Opening reasoning marker
pub const THINK_OPEN: &str = "<think>";
/// Closing reasoning marker
pub const THINK_CLOSE: &str = "</think>";

/// Result of splitting accumulated model output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// Text inside the reasoning block, trimmed; empty when no complete block
    pub reasoning: &'a str,
    /// Text after the reasoning block (trimmed), or the whole input verbatim
    pub answer: &'a str,
}

/// Split `text` into reasoning and answer.
///
/// Uses the first occurrence of each marker. When both are present with the
/// opening marker first, the reasoning is the trimmed text between them and
/// the answer is the trimmed text after the closing marker. Otherwise
/// (either marker missing, or closing before opening) the reasoning is empty
/// and the answer is `text` unchanged, which is also what a partial stream
/// shows until its closing marker arrives.
pub fn split(text: &str) -> Split<'_> {
    if let (Some(open), Some(close)) = (text.find(THINK_OPEN), text.find(THINK_CLOSE)) {
        let inner_start = open + THINK_OPEN.len();
        if inner_start <= close {
            return Split {
                reasoning: text[inner_start..close].trim(),
                answer: text[close + THINK_CLOSE.len()..].trim(),
            };
        }
    }

    Split {
        reasoning: "",
        answer: text,
    }
}
