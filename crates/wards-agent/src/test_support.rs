//! Scripted reasoning doubles for exercising the decision loop without a
//! live reasoning service.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use wards_models::{ChatMessage, ReasoningReply, ToolCallRequest, ToolSpec};

use crate::error::AgentError;
use crate::reasoning::ReasoningClient;

/// A reasoning client that replays a scripted sequence of replies and
/// records every conversation it was shown. Once the script is exhausted
/// it fails every call.
#[derive(Default)]
pub struct ScriptedReasoning {
    replies: Mutex<VecDeque<Result<ReasoningReply, AgentError>>>,
    conversations: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedReasoning {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_finish(&self, content: &str) {
        self.push(Ok(ReasoningReply::Finish {
            content: content.to_string(),
        }));
    }

    pub fn push_tool_call(&self, name: &str, arguments: Value) {
        self.push(Ok(ReasoningReply::ToolCalls {
            calls: vec![ToolCallRequest {
                name: name.to_string(),
                arguments,
            }],
        }));
    }

    pub fn push_failure(&self, message: &str) {
        self.push(Err(AgentError::Cli(message.to_string())));
    }

    pub fn push(&self, reply: Result<ReasoningReply, AgentError>) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
    }

    /// Conversations observed so far, one per `complete` call.
    pub fn conversations(&self) -> Vec<Vec<ChatMessage>> {
        self.conversations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl ReasoningClient for ScriptedReasoning {
    async fn complete(
        &self,
        conversation: &[ChatMessage],
        _tools: &[ToolSpec],
    ) -> Result<ReasoningReply, AgentError> {
        self.conversations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(conversation.to_vec());
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Cli("script exhausted".to_string())))
    }
}

/// A reasoning client that never answers within any timeout. Pair with
/// `tokio::time::pause` to test timeout handling instantly.
pub struct SilentReasoning;

#[async_trait]
impl ReasoningClient for SilentReasoning {
    async fn complete(
        &self,
        _conversation: &[ChatMessage],
        _tools: &[ToolSpec],
    ) -> Result<ReasoningReply, AgentError> {
        tokio::time::sleep(Duration::from_secs(86_400)).await;
        Err(AgentError::Cli("unreachable".to_string()))
    }
}
