use std::future::Future;
use std::pin::Pin;

use reelkit_llm::{Describe, ToolDefinition};
use serde::de::DeserializeOwned;

use crate::gateway::GatewayError;

/// Why a tool handler failed. Converted to an error-content result string at
/// the registry boundary — never allowed to abort the rest of a batch.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(#[source] serde_json::Error),

    #[error(transparent)]
    Wizard(#[from] reelkit_wizard::WizardError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("{0}")]
    Failed(String),
}

/// A callable tool with typed input.
///
/// The `Input` type must implement [`Describe`] (for schema generation) and
/// `DeserializeOwned` (for parsing the model's JSON arguments). The handler
/// returns a human-readable outcome string that goes back to the model as
/// the tool result.
///
/// Tools must be `Clone` so the erasure layer can clone them before calling
/// `async fn call` — this avoids the borrow-across-await problem without
/// requiring manual `Box::pin`.
pub trait Tool: Clone + Send + Sync + 'static {
    type Input: Describe + DeserializeOwned + Send;

    fn name(&self) -> &str;
    fn description(&self) -> &str;

    fn call(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = Result<String, ToolError>> + Send;
}

/// Object-safe, type-erased wrapper around a [`Tool`], so the registry can
/// hold a flat table of heterogeneous tools.
pub(crate) trait ErasedTool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    /// Parse arguments and execute. Argument parse failures surface as
    /// `ToolError::InvalidArguments`, not panics.
    fn call_erased(
        &self,
        arguments: &serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send>>;
}

impl<T: Tool> ErasedTool for T {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: T::Input::describe(),
        }
    }

    fn call_erased(
        &self,
        arguments: &serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send>> {
        let parsed: Result<T::Input, _> =
            serde_json::from_value(arguments.clone()).map_err(ToolError::InvalidArguments);

        // Clone self so the future is 'static.
        let this = self.clone();
        Box::pin(async move {
            let input = parsed?;
            this.call(input).await
        })
    }
}
