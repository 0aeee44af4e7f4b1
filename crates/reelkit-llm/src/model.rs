use async_trait::async_trait;

use crate::error::Error;
use crate::request::CompletionRequest;
use crate::response::TurnResponse;

/// A concrete, type-erased conversation model handle.
///
/// Wraps a [`ConversationBackend`] so callers never need generics.
pub struct ConversationModel {
    inner: Box<dyn ConversationBackend>,
}

impl ConversationModel {
    /// Wrap any backend implementation into a model.
    pub fn new(backend: impl ConversationBackend + 'static) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    /// The model identifier (e.g. `"claude-sonnet-4-5"`).
    pub fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    /// The provider name this model belongs to.
    pub fn provider(&self) -> &str {
        self.inner.provider()
    }

    /// Run one completion call. At most one attempt — retry policy, if any,
    /// belongs to the caller.
    pub async fn complete(
        &self,
        request: impl Into<CompletionRequest> + Send,
    ) -> Result<TurnResponse, Error> {
        self.inner.complete(request.into()).await
    }
}

/// Trait that backend crates implement for a specific model endpoint.
#[async_trait]
pub trait ConversationBackend: Send + Sync {
    fn model_id(&self) -> &str;
    fn provider(&self) -> &str;
    async fn complete(&self, request: CompletionRequest) -> Result<TurnResponse, Error>;
}
