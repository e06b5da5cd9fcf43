//! Prompt assembly.

use crate::types::{AssembledPrompt, ChatMessage, ChatMessageRole, PromptTurn};

/// Builds the ordered turn list sent to a provider.
///
/// Assembly is pure and total: template context first (as a system turn),
/// then the history in order, then the new user message.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptAssembler;

impl PromptAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(
        &self,
        message: &str,
        history: &[ChatMessage],
        template_content: Option<&str>,
    ) -> AssembledPrompt {
        let mut turns = Vec::with_capacity(history.len() + 2);

        // An empty template still counts as applied, it just adds nothing.
        if let Some(content) = template_content.filter(|c| !c.is_empty()) {
            turns.push(PromptTurn::new(ChatMessageRole::System, content));
        }

        turns.extend(history.iter().map(PromptTurn::from));
        turns.push(PromptTurn::new(ChatMessageRole::User, message));

        AssembledPrompt {
            turns,
            template_applied: template_content.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(prompt: &AssembledPrompt) -> Vec<ChatMessageRole> {
        prompt.turns.iter().map(|t| t.role).collect()
    }

    #[test]
    fn test_message_only() {
        let prompt = PromptAssembler::new().assemble("Hello", &[], None);
        assert_eq!(prompt.turns, vec![PromptTurn::new(ChatMessageRole::User, "Hello")]);
        assert!(!prompt.template_applied);
        assert_eq!(prompt.system_context(), None);
    }

    #[test]
    fn test_template_history_and_message_order() {
        let history = vec![
            ChatMessage::user("Hi").unwrap(),
            ChatMessage::assistant("Hello!").unwrap(),
        ];
        let prompt =
            PromptAssembler::new().assemble("Summarize", &history, Some("You are terse."));

        assert_eq!(
            roles(&prompt),
            vec![
                ChatMessageRole::System,
                ChatMessageRole::User,
                ChatMessageRole::Assistant,
                ChatMessageRole::User,
            ]
        );
        assert_eq!(prompt.system_context(), Some("You are terse."));
        assert_eq!(prompt.turns[1].content, "Hi");
        assert_eq!(prompt.turns[2].content, "Hello!");
        assert_eq!(prompt.final_turn().map(|t| t.content.as_str()), Some("Summarize"));
        assert!(prompt.template_applied);
    }

    #[test]
    fn test_empty_template_adds_no_turn() {
        let prompt = PromptAssembler::new().assemble("Hello", &[], Some(""));
        assert_eq!(prompt.turns.len(), 1);
        assert!(prompt.template_applied);
    }

    #[test]
    fn test_history_system_turns_are_kept_in_place() {
        let history = vec![
            ChatMessage::user("a").unwrap(),
            ChatMessage::system("b").unwrap(),
        ];
        let prompt = PromptAssembler::new().assemble("c", &history, None);
        assert_eq!(
            roles(&prompt),
            vec![
                ChatMessageRole::User,
                ChatMessageRole::System,
                ChatMessageRole::User,
            ]
        );
        assert_eq!(prompt.system_context(), None);
    }
}
