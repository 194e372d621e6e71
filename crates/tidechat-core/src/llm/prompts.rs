//! System prompts, keyed on the selected model id.
//!
//! Reasoning models get the bare prompt; other chat models get the extended
//! variant. Keeping the selection here lets per-model prompt tuning happen
//! without touching the pipeline.

const REGULAR_PROMPT: &str =
    "You are a friendly assistant! Keep your responses concise and helpful.";

const EXTENDED_PROMPT: &str = "You are a friendly assistant! Keep your responses concise and \
     helpful. When the user shares a file, refer to it by name where that \
     helps clarity.";

/// System prompt for the given selected model id.
pub fn system_prompt(selected_model: &str) -> String {
    if selected_model == "chat-model-reasoning" {
        REGULAR_PROMPT.to_string()
    } else {
        EXTENDED_PROMPT.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasoning_model_gets_bare_prompt() {
        assert_eq!(system_prompt("chat-model-reasoning"), REGULAR_PROMPT);
    }

    #[test]
    fn test_other_models_get_extended_prompt() {
        assert_eq!(system_prompt("chat-model"), EXTENDED_PROMPT);
        assert_eq!(system_prompt("anything-else"), EXTENDED_PROMPT);
    }
}
