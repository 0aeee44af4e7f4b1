use reelkit_llm::Usage;

/// Events emitted by the assistant during one turn.
///
/// A frontend consumes these to update its chat panel. The events form a
/// protocol:
///
/// ```text
/// UserMessage
/// (ToolCallStart ToolCallDone)*   ← tool rounds
/// AssistantMessage?               ← final utterance (absent on tool-only turns)
/// TurnComplete
/// ```
#[derive(Debug, Clone)]
pub enum AssistantEvent {
    /// The user's message was recorded in conversation history.
    UserMessage { content: String },

    /// A tool call is about to execute.
    ToolCallStart { id: String, name: String },

    /// A tool finished; `content` is the result string fed back to the model.
    ToolCallDone { id: String, content: String },

    /// A final assistant utterance was appended to history.
    AssistantMessage { content: String },

    /// The entire turn is complete (no more tool rounds).
    TurnComplete { usage: Usage },

    /// The turn failed; a fallback assistant message has been appended.
    Error { error: String },
}
