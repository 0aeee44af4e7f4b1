pub mod describe;
pub mod error;
pub mod model;
pub mod request;
pub mod response;

pub use describe::Describe;
pub use error::Error;
pub use model::{ConversationBackend, ConversationModel};
pub use request::{
    AssistantPart, CompletionOptions, CompletionRequest, Message, Property, RequestBuilder, Schema,
    ToolCallPart, ToolChoice, ToolDefinition, ToolResultPart, request,
};
pub use response::{StopReason, TurnResponse, Usage};
