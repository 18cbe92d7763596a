//! Slash commands for interactive mode

mod history;
mod model;

pub use history::HistoryCommand;
pub use model::ModelCommand;

use mull_agent::Turn;

/// Result of executing a slash command
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Change the model
    ChangeModel(String),
    /// Show a message to the user (not sent to the model)
    Message(String),
    /// Exit the application
    Exit,
    /// Unknown command
    Unknown(String),
}

/// Parse and execute a slash command.
///
/// Returns `None` when `input` is not a command and should be submitted
/// as a user turn.
pub fn execute_command(
    input: &str,
    history: &[Turn],
    current_model: &str,
    available_models: &[String],
) -> Option<CommandResult> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.splitn(2, ' ');
    let command = parts.next().unwrap_or("").to_lowercase();
    let args = parts.next().map(str::trim).unwrap_or("");

    Some(match command.as_str() {
        "help" | "h" | "?" => CommandResult::Message(help_message()),

        "quit" | "exit" | "q" => CommandResult::Exit,

        "model" | "m" => ModelCommand::execute(args, current_model, available_models),

        "history" => HistoryCommand::execute(history),

        _ => CommandResult::Unknown(command),
    })
}

fn help_message() -> String {
    r#"Available commands:
  /help, /h, /?        Show this help message
  /model, /m [name]    List models or switch to a model
  /history             Show the conversation so far
  /quit, /exit, /q     Exit mull

Examples:
  /model               List available models
  /model qwen          Switch to first model matching "qwen"

Press Ctrl-C while a reply is streaming to abort it."#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> Option<CommandResult> {
        let models = vec!["deepseek-r1:1.5b".to_string(), "qwen2.5:7b".to_string()];
        execute_command(input, &[], "deepseek-r1:1.5b", &models)
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(run("hello"), None);
        assert_eq!(run("what is 1/2?"), None);
    }

    #[test]
    fn test_quit_aliases() {
        for input in ["/quit", "/exit", "/q", "  /QUIT  "] {
            assert_eq!(run(input), Some(CommandResult::Exit), "{}", input);
        }
    }

    #[test]
    fn test_help_lists_commands() {
        match run("/help") {
            Some(CommandResult::Message(text)) => {
                assert!(text.contains("/model"));
                assert!(text.contains("/history"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_model_switch() {
        assert_eq!(
            run("/model qwen"),
            Some(CommandResult::ChangeModel("qwen2.5:7b".into()))
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(run("/frobnicate"), Some(CommandResult::Unknown("frobnicate".into())));
    }
}
