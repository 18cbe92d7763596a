//! /history command - show the conversation so far

use super::CommandResult;
use crate::utils::truncate_chars;
use mull_agent::Turn;

/// Longest preview shown per turn
const PREVIEW_CHARS: usize = 72;

pub struct HistoryCommand;

impl HistoryCommand {
    pub fn execute(history: &[Turn]) -> CommandResult {
        CommandResult::Message(render(history))
    }
}

fn render(history: &[Turn]) -> String {
    if history.is_empty() {
        return "No messages yet".to_string();
    }

    let mut output = String::new();
    for (i, turn) in history.iter().enumerate() {
        let preview = truncate_chars(&turn.content().replace('\n', " "), PREVIEW_CHARS);
        let thought = if turn.has_reasoning() { " (reasoned)" } else { "" };
        output.push_str(&format!("{:>3}. {}{}: {}\n", i + 1, turn.role(), thought, preview));
    }
    output.truncate(output.trim_end().len());
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history() {
        assert_eq!(render(&[]), "No messages yet");
    }

    #[test]
    fn test_render_turns() {
        let turns = vec![
            Turn::user("Hello\nthere"),
            Turn::assistant("Hi!", "greeting"),
        ];
        assert_eq!(
            render(&turns),
            "  1. user: Hello there\n  2. assistant (reasoned): Hi!"
        );
    }

    #[test]
    fn test_long_content_is_truncated() {
        let turns = vec![Turn::user("x".repeat(200))];
        let text = render(&turns);
        assert!(text.ends_with("..."));
        assert!(text.chars().count() < 100);
    }
}
