use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::inventory::{CustomerSegment, InventoryItem};

/// Role of a conversation entry sent to the reasoning service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
}

/// One ordered entry of the request-scoped conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Name of the tool that produced this entry, for `Tool` entries.
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
            name: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            name: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            name: None,
        }
    }

    pub fn tool(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Tool,
            content: content.into(),
            name: Some(name.into()),
        }
    }
}

/// A capability advertised to the reasoning service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON-schema-like contract for the arguments payload.
    pub parameters: serde_json::Value,
}

/// A tool invocation requested by the reasoning service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRequest {
    pub name: String,
    pub arguments: serde_json::Value,
}

/// What the reasoning service answered for one round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReasoningReply {
    /// Natural-language finish signal; the loop extracts a decision from it.
    Finish { content: String },
    /// Requested tool invocations to run before the next round.
    ToolCalls { calls: Vec<ToolCallRequest> },
}

/// Terminal output of the decision loop. Always produced, even when every
/// reasoning round fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentDecision {
    pub should_send_campaign: bool,
    pub reasoning: String,
    /// At most 3 items to feature in the campaign.
    pub recommended_items: Vec<InventoryItem>,
    pub recommended_segment: CustomerSegment,
    pub estimated_revenue: Decimal,
    pub message_template: String,
    pub optimal_send_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn roundtrip_chat_message() {
        let message = ChatMessage::tool("analyse_waste_risk", r#"{"ok":true}"#);
        let json = serde_json::to_string(&message).unwrap();
        let deserialized: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(message, deserialized);
        assert_eq!(deserialized.role, ChatRole::Tool);
    }

    #[test]
    fn reasoning_reply_is_tagged() {
        let finish = ReasoningReply::Finish {
            content: "Campaign recommended".to_string(),
        };
        let json = serde_json::to_string(&finish).unwrap();
        assert!(json.contains("\"type\":\"finish\""));

        let calls = ReasoningReply::ToolCalls {
            calls: vec![ToolCallRequest {
                name: "select_target_customers".to_string(),
                arguments: serde_json::json!({"maxCustomers": 10}),
            }],
        };
        let json = serde_json::to_string(&calls).unwrap();
        let deserialized: ReasoningReply = serde_json::from_str(&json).unwrap();
        assert_eq!(calls, deserialized);
    }

    #[test]
    fn roundtrip_agent_decision() {
        let decision = AgentDecision {
            should_send_campaign: true,
            reasoning: "High fish stock on a quiet Monday".to_string(),
            recommended_items: vec![],
            recommended_segment: CustomerSegment::Regulars,
            estimated_revenue: dec!(65),
            message_template: String::new(),
            optimal_send_time: "16:30".to_string(),
        };

        let json = serde_json::to_string(&decision).unwrap();
        let deserialized: AgentDecision = serde_json::from_str(&json).unwrap();
        assert_eq!(decision, deserialized);
    }
}
