pub mod assistant;
pub mod context;
pub mod event;
pub mod gateway;
pub mod notify;
pub mod registry;
pub mod session;
pub mod tool;
pub mod tools;

mod prompt;

#[cfg(test)]
mod testutil;

pub use assistant::{Assistant, MAX_TOOL_ROUNDS, TurnStream};
pub use context::BubbleContext;
pub use event::AssistantEvent;
pub use gateway::{GatewayError, ProjectGateway, ProjectId, SaveOutcome};
pub use notify::{Notifier, UiEvent};
pub use registry::ToolRegistry;
pub use session::SessionHandle;
pub use tool::{Tool, ToolError};
