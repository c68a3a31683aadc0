use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};
use wards_models::{ChatMessage, ChatRole, ReasoningReply, ToolSpec};

use crate::error::AgentError;
use crate::parser::parse_reply;
use crate::reasoning::ReasoningClient;

/// Reply protocol appended to the system prompt for CLI transports.
const REPLY_PROTOCOL: &str = "You MUST respond with ONLY a JSON object, either \
{\"type\": \"finish\", \"content\": \"<your decision and reasoning>\"} when you are done, or \
{\"type\": \"tool_calls\", \"calls\": [{\"name\": \"<tool name>\", \"arguments\": {...}}]} \
to request tool executions. Tool results arrive as `tool` entries in the conversation.";

/// Configuration for one reasoning CLI invocation.
#[derive(Debug, Clone)]
pub struct CliReasoningConfig {
    pub model: String,
    pub timeout: Duration,
}

impl Default for CliReasoningConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-5-haiku-latest".to_string(),
            timeout: Duration::from_secs(45),
        }
    }
}

/// A reasoning client that shells out to the `claude` CLI, one invocation
/// per round. The conversation and tool manifest are serialized into the
/// user prompt since the CLI is stateless across calls.
pub struct CliReasoning {
    config: CliReasoningConfig,
}

impl CliReasoning {
    pub fn new(config: CliReasoningConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ReasoningClient for CliReasoning {
    async fn complete(
        &self,
        conversation: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ReasoningReply, AgentError> {
        let system_prompt = render_system_prompt(conversation);
        let user_prompt = render_user_prompt(conversation, tools)?;
        let raw = invoke_cli(&system_prompt, &user_prompt, &self.config).await?;
        parse_reply(&raw)
    }
}

fn render_system_prompt(conversation: &[ChatMessage]) -> String {
    let instructions: Vec<&str> = conversation
        .iter()
        .filter(|m| m.role == ChatRole::System)
        .map(|m| m.content.as_str())
        .collect();
    format!("{}\n\n{}", instructions.join("\n\n"), REPLY_PROTOCOL)
}

fn render_user_prompt(
    conversation: &[ChatMessage],
    tools: &[ToolSpec],
) -> Result<String, AgentError> {
    let non_system: Vec<&ChatMessage> = conversation
        .iter()
        .filter(|m| m.role != ChatRole::System)
        .collect();
    let payload = serde_json::json!({
        "conversation": non_system,
        "tools": tools,
    });
    Ok(serde_json::to_string_pretty(&payload)?)
}

async fn invoke_cli(
    system_prompt: &str,
    user_prompt: &str,
    config: &CliReasoningConfig,
) -> Result<String, AgentError> {
    debug!(model = %config.model, "Invoking reasoning CLI");

    let result = tokio::time::timeout(config.timeout, async {
        Command::new("claude")
            .args([
                "-p",
                user_prompt,
                "--system-prompt",
                system_prompt,
                "--model",
                &config.model,
                "--output-format",
                "text",
            ])
            .output()
            .await
    })
    .await
    .map_err(|_| AgentError::Timeout(config.timeout.as_secs()))?
    .map_err(|e| AgentError::Cli(format!("failed to spawn claude: {e}")))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        warn!(status = %result.status, stderr = %stderr, "Reasoning CLI failed");
        return Err(AgentError::Cli(format!(
            "claude exited {}: {}",
            result.status, stderr
        )));
    }

    let stdout = String::from_utf8_lossy(&result.stdout).to_string();
    if stdout.trim().is_empty() {
        return Err(AgentError::Cli("empty reasoning response".to_string()));
    }

    Ok(stdout)
}

/// Check if the `claude` CLI is available on the system.
pub async fn check_cli_available() -> bool {
    match Command::new("claude").arg("--version").output().await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}
