use async_trait::async_trait;
use wards_models::{ChatMessage, ReasoningReply, ToolSpec};

use crate::error::AgentError;

/// The external reasoning service, injected into every component that
/// needs it. Treated as an untrusted, possibly slow or failing black box;
/// callers must degrade gracefully on any error. Mockable for testing.
#[async_trait]
pub trait ReasoningClient: Send + Sync {
    /// Send the accumulated conversation plus the tool manifest and get
    /// back either a finish signal or a batch of tool-call requests.
    async fn complete(
        &self,
        conversation: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ReasoningReply, AgentError>;
}
