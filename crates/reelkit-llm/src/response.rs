use serde::{Deserialize, Serialize};

use crate::request::ToolCallPart;

/// Why the model stopped producing output for this round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The model produced a final utterance.
    EndTurn,
    /// The model wants tools executed before it can continue.
    ToolUse,
    MaxTokens,
    Other(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Usage {
    /// Fold another round's usage into a running total.
    pub fn absorb(&mut self, other: &Usage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// The collected result of a single completion call.
#[derive(Debug, Clone)]
pub struct TurnResponse {
    /// Assistant text, possibly empty on a tool-only round.
    pub text: String,
    /// Tool invocations requested by the model, in the order returned.
    pub tool_calls: Vec<ToolCallPart>,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

impl TurnResponse {
    /// True when the model is waiting on tool results before it can finish.
    pub fn wants_tools(&self) -> bool {
        self.stop_reason == StopReason::ToolUse && !self.tool_calls.is_empty()
    }
}
