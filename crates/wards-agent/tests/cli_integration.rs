//! Integration tests that invoke the real reasoning CLI.
//!
//! These tests are `#[ignore]` by default — they require:
//! - The `claude` CLI installed and on PATH
//! - Valid Anthropic credentials configured
//!
//! Run explicitly with:
//! ```bash
//! cargo test -p wards-agent --test cli_integration -- --ignored
//! ```

use std::time::Duration;

use wards_agent::{check_cli_available, CliReasoning, CliReasoningConfig, ReasoningClient};
use wards_models::{ChatMessage, ReasoningReply};

/// Verify the reasoning CLI is installed and responds to --version.
#[tokio::test]
#[ignore]
async fn cli_is_available() {
    assert!(
        check_cli_available().await,
        "claude CLI not found on PATH — install it from https://docs.anthropic.com/en/docs/claude-code"
    );
}

/// One full round trip through `CliReasoning::complete` with no tools.
///
/// This catches breaking changes in the CLI's output format (new wrapping,
/// changed response structure, etc.) that would otherwise only surface in
/// production.
#[tokio::test]
#[ignore]
async fn cli_round_trip_yields_a_finish_reply() {
    if !check_cli_available().await {
        eprintln!("Skipping: claude CLI not available");
        return;
    }

    let client = CliReasoning::new(CliReasoningConfig {
        model: "claude-3-5-haiku-latest".to_string(),
        timeout: Duration::from_secs(30),
    });

    let conversation = vec![
        ChatMessage::system(
            "You are a test agent. You have no tools. Finish immediately with the content \"ok\".",
        ),
        ChatMessage::user("ping"),
    ];

    let reply = client
        .complete(&conversation, &[])
        .await
        .expect("reasoning CLI invocation failed");

    match reply {
        ReasoningReply::Finish { content } => {
            assert!(!content.trim().is_empty(), "finish content was empty");
        }
        ReasoningReply::ToolCalls { calls } => {
            panic!("expected a finish reply with no tools advertised, got tool calls: {calls:?}");
        }
    }
}

/// Verify that a non-zero CLI exit is surfaced as an error, not swallowed.
#[tokio::test]
#[ignore]
async fn cli_reports_errors_for_invalid_model() {
    if !check_cli_available().await {
        eprintln!("Skipping: claude CLI not available");
        return;
    }

    let client = CliReasoning::new(CliReasoningConfig {
        model: "nonexistent-model-12345".to_string(),
        timeout: Duration::from_secs(15),
    });

    let conversation = vec![
        ChatMessage::system("You are a test."),
        ChatMessage::user("hello"),
    ];

    let result = client.complete(&conversation, &[]).await;

    assert!(
        result.is_err(),
        "Expected error for invalid model, got: {:?}",
        result.unwrap()
    );
}
