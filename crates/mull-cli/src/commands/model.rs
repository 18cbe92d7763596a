//! /model command - list and switch models

use super::CommandResult;
use mull_ai::models::find_model;

pub struct ModelCommand;

impl ModelCommand {
    /// Execute /model command - lists models if no args, or switches to the matching model
    pub fn execute(args: &str, current_model: &str, available_models: &[String]) -> CommandResult {
        if args.is_empty() {
            return CommandResult::Message(list_models(current_model, available_models));
        }

        match find_model(args, available_models) {
            Some(model) => CommandResult::ChangeModel(model.to_string()),
            None => CommandResult::Message(format!(
                "No model found matching '{}'\nUse /model to list available models",
                args
            )),
        }
    }

    /// List models as text (for --list-models)
    pub fn list(current_model: &str, available_models: &[String]) -> String {
        list_models(current_model, available_models)
    }
}

/// Render the model list, marking the current one
fn list_models(current: &str, models: &[String]) -> String {
    let mut output = String::from("Available models:\n");
    for model in models {
        let marker = if model == current { " *" } else { "" };
        output.push_str(&format!("  {}{}\n", model, marker));
    }
    output.push_str("\nSwitch with: /model <name>");
    output
}
