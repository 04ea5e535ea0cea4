//! Conversation context window and prompt rendering.
//!
//! The model has no memory of its own, so each turn replays the tail of the
//! stored conversation as plain text ahead of the new message.

use parley_types::chat::ChatMessage;

/// Number of most recent messages replayed to the model.
pub const CONTEXT_WINDOW_SIZE: usize = 6;

/// The most recent messages of a history, oldest first.
#[derive(Debug, Clone, Copy)]
pub struct ContextWindow<'a> {
    messages: &'a [ChatMessage],
}

impl<'a> ContextWindow<'a> {
    /// Take the last `size` messages of `history` (all of it if shorter).
    pub fn latest(history: &'a [ChatMessage], size: usize) -> Self {
        let start = history.len().saturating_sub(size);
        Self {
            messages: &history[start..],
        }
    }

    pub fn messages(&self) -> &'a [ChatMessage] {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// One `Speaker: content` line per message, newline-joined.
    pub fn render(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role.speaker(), m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Full prompt for the model: the rendered window followed by the new
    /// user message and an open assistant turn.
    pub fn prompt(&self, message: &str) -> String {
        format!(
            "Previous conversation:\n{}\n\nUser: {message}\nAssistant:",
            self.render()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(n: usize) -> Vec<ChatMessage> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    ChatMessage::user(format!("q{i}"), 1)
                } else {
                    ChatMessage::assistant(format!("a{i}"), 1)
                }
            })
            .collect()
    }

    #[test]
    fn test_window_is_whole_history_when_short() {
        let h = history(4);
        let window = ContextWindow::latest(&h, CONTEXT_WINDOW_SIZE);
        assert_eq!(window.len(), 4);
        assert_eq!(window.messages(), &h[..]);
    }

    #[test]
    fn test_window_keeps_last_six_oldest_first() {
        let h = history(9);
        let window = ContextWindow::latest(&h, CONTEXT_WINDOW_SIZE);
        assert_eq!(window.len(), 6);
        assert_eq!(window.messages()[0].content, "a3");
        assert_eq!(window.messages()[5].content, "q8");
    }

    #[test]
    fn test_empty_history() {
        let window = ContextWindow::latest(&[], CONTEXT_WINDOW_SIZE);
        assert!(window.is_empty());
        assert_eq!(window.render(), "");
    }

    #[test]
    fn test_render_and_prompt() {
        let h = vec![
            ChatMessage::user("hello", 1),
            ChatMessage::assistant("hi there", 2),
            ChatMessage::user("how are you?", 3),
        ];
        let window = ContextWindow::latest(&h, CONTEXT_WINDOW_SIZE);
        assert_eq!(
            window.render(),
            "User: hello\nAssistant: hi there\nUser: how are you?"
        );
        assert_eq!(
            window.prompt("how are you?"),
            "Previous conversation:\nUser: hello\nAssistant: hi there\nUser: how are you?\n\nUser: how are you?\nAssistant:"
        );
    }
}
