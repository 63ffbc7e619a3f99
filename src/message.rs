use serde::{Deserialize, Serialize};

/// A single turn in a conversation, containing a role and text content.
///
/// Messages are the unit of conversational memory carried inside
/// [`ConversationState`](crate::state::ConversationState). Each message has a
/// role (`"human"` for the end user, `"assistant"` for the engine) and text
/// content. The message log is append-only: turns are never reordered or
/// deleted, only appended, until the terminal node resets the whole state.
///
/// # Examples
///
/// ```
/// use confab::message::Message;
///
/// let question = Message::human("Can you book a room for Friday?");
/// let reply = Message::assistant("Sure - which time works for you?");
///
/// assert!(question.has_role(Message::HUMAN));
/// assert!(reply.has_role(Message::ASSISTANT));
/// ```
///
/// # Serialization
///
/// Messages implement `Serialize` and `Deserialize` and round-trip exactly:
/// ```
/// use confab::message::Message;
///
/// let msg = Message::human("test");
/// let json = serde_json::to_string(&msg).unwrap();
/// let parsed: Message = serde_json::from_str(&json).unwrap();
/// assert_eq!(msg, parsed);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender (`"human"` or `"assistant"`).
    ///
    /// Use the constants on [`Message`] for standardized values.
    pub role: String,
    /// The text content of the message.
    pub content: String,
}

impl Message {
    /// End-user input message role.
    pub const HUMAN: &'static str = "human";
    /// Engine response message role.
    pub const ASSISTANT: &'static str = "assistant";

    /// Creates a new message with the specified role and content.
    #[must_use]
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    /// Creates a human (end-user) message with the specified content.
    ///
    /// # Examples
    /// ```
    /// use confab::message::Message;
    ///
    /// let msg = Message::human("Schedule a meeting with Dana");
    /// assert_eq!(msg.role, "human");
    /// ```
    #[must_use]
    pub fn human(content: &str) -> Self {
        Self::new(Self::HUMAN, content)
    }

    /// Creates an assistant message with the specified content.
    ///
    /// # Examples
    /// ```
    /// use confab::message::Message;
    ///
    /// let msg = Message::assistant("Done - invite sent.");
    /// assert_eq!(msg.role, "assistant");
    /// ```
    #[must_use]
    pub fn assistant(content: &str) -> Self {
        Self::new(Self::ASSISTANT, content)
    }

    /// Returns true if this message has the specified role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Verifies that a Message can be constructed and its fields are set correctly.
    fn test_message_construction() {
        let msg = Message::new("human", "hello");
        assert_eq!(msg.role, "human");
        assert_eq!(msg.content, "hello");
    }

    #[test]
    /// Tests convenience constructors for the two conversation roles.
    fn test_convenience_constructors() {
        let human_msg = Message::human("Hello");
        assert_eq!(human_msg.role, Message::HUMAN);
        assert_eq!(human_msg.content, "Hello");

        let assistant_msg = Message::assistant("Hi there!");
        assert_eq!(assistant_msg.role, Message::ASSISTANT);
        assert_eq!(assistant_msg.content, "Hi there!");
    }

    #[test]
    /// Tests role checking methods.
    fn test_role_checking() {
        let human_msg = Message::human("Hello");
        assert!(human_msg.has_role(Message::HUMAN));
        assert!(!human_msg.has_role(Message::ASSISTANT));

        let assistant_msg = Message::assistant("Hi");
        assert!(assistant_msg.has_role(Message::ASSISTANT));
        assert!(!assistant_msg.has_role(Message::HUMAN));
    }

    #[test]
    /// Tests serialization and deserialization round-trip.
    fn test_serialization() {
        let original = Message::human("Test message");
        let json = serde_json::to_string(&original).expect("serialization failed");
        let deserialized: Message = serde_json::from_str(&json).expect("deserialization failed");

        assert_eq!(original, deserialized);
        assert_eq!(deserialized.role, "human");
        assert_eq!(deserialized.content, "Test message");
    }
}
