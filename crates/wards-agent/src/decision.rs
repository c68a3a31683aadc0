use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};
use wards_models::{
    AgentConfig, AgentDecision, ChatMessage, Customer, CustomerSegment, HistoricalSummary,
    InventoryItem, ReasoningReply,
};

use crate::prompts;
use crate::reasoning::ReasoningClient;
use crate::tools;

/// Optional structured overrides the reasoning service may embed in its
/// finish content. Anything missing falls back to the loop defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecisionOverrides {
    should_send_campaign: Option<bool>,
    recommended_segment: Option<CustomerSegment>,
    estimated_revenue: Option<Decimal>,
    message_template: Option<String>,
    optimal_send_time: Option<String>,
}

/// Drives the bounded tool-calling loop against the reasoning service.
///
/// `decide` never fails: every external error is absorbed and the loop
/// falls through to a conservative default decision.
pub struct DecisionAgent {
    client: Arc<dyn ReasoningClient>,
    config: AgentConfig,
}

impl DecisionAgent {
    pub fn new(client: Arc<dyn ReasoningClient>, config: AgentConfig) -> Self {
        Self { client, config }
    }

    pub async fn decide(
        &self,
        items: &[InventoryItem],
        history: &[HistoricalSummary],
        customers: &[Customer],
        now: DateTime<Utc>,
    ) -> AgentDecision {
        let started = Instant::now();
        let deadline = Duration::from_secs(self.config.deadline_seconds);
        let call_timeout = Duration::from_secs(self.config.call_timeout_seconds);
        let manifest = tools::agent_tools();

        let mut conversation = vec![
            ChatMessage::system(prompts::decision_system_prompt()),
            ChatMessage::user(prompts::decision_user_context(
                items, history, customers, now,
            )),
        ];

        for round in 0..self.config.max_rounds {
            if started.elapsed() >= deadline {
                warn!(round, "Decision deadline exhausted, using fallback");
                return fallback_decision(items);
            }

            let reply = match tokio::time::timeout(
                call_timeout,
                self.client.complete(&conversation, &manifest),
            )
            .await
            {
                Ok(Ok(reply)) => reply,
                Ok(Err(e)) => {
                    warn!(round, error = %e, "Reasoning round failed, retrying");
                    continue;
                }
                Err(_) => {
                    warn!(
                        round,
                        timeout_seconds = self.config.call_timeout_seconds,
                        "Reasoning round timed out, retrying"
                    );
                    continue;
                }
            };

            match reply {
                ReasoningReply::Finish { content } => {
                    info!(round, "Reasoning service finished");
                    return finish_decision(items, &content);
                }
                ReasoningReply::ToolCalls { calls } => {
                    debug!(round, count = calls.len(), "Executing tool calls");
                    conversation.push(ChatMessage::assistant(
                        serde_json::to_string(&calls).unwrap_or_default(),
                    ));
                    for call in calls {
                        let result = tools::dispatch_tool(&call.name, call.arguments);
                        conversation.push(ChatMessage::tool(call.name, result.to_string()));
                    }
                }
            }
        }

        warn!(
            max_rounds = self.config.max_rounds,
            "No finish signal within round budget, using fallback"
        );
        fallback_decision(items)
    }
}

fn finish_decision(items: &[InventoryItem], content: &str) -> AgentDecision {
    let overrides = crate::parser::extract_json(content)
        .ok()
        .and_then(|json| serde_json::from_str::<DecisionOverrides>(&json).ok())
        .unwrap_or_default();

    let reasoning = if content.trim().is_empty() {
        "Campaign recommended".to_string()
    } else {
        content.trim().to_string()
    };

    AgentDecision {
        should_send_campaign: overrides.should_send_campaign.unwrap_or(true),
        reasoning,
        recommended_items: items.iter().take(3).cloned().collect(),
        recommended_segment: overrides
            .recommended_segment
            .unwrap_or(CustomerSegment::Regulars),
        estimated_revenue: overrides.estimated_revenue.unwrap_or(Decimal::from(65)),
        message_template: overrides.message_template.unwrap_or_default(),
        optimal_send_time: overrides
            .optimal_send_time
            .unwrap_or_else(|| "16:30".to_string()),
    }
}

fn fallback_decision(items: &[InventoryItem]) -> AgentDecision {
    AgentDecision {
        should_send_campaign: true,
        reasoning: "Default: campaign recommended based on inventory levels".to_string(),
        recommended_items: items.iter().take(3).cloned().collect(),
        recommended_segment: CustomerSegment::Regulars,
        estimated_revenue: Decimal::from(50),
        message_template: String::new(),
        optimal_send_time: "16:30".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;
    use wards_models::FoodCategory;

    fn item(name: &str) -> InventoryItem {
        InventoryItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            quantity: dec!(4),
            unit: "kg".to_string(),
            cost_per_unit: dec!(12),
            selling_price: Some(dec!(28)),
            category: FoodCategory::Pesce,
            expires_at: None,
        }
    }

    #[test]
    fn finish_defaults_when_content_is_prose() {
        let items = vec![item("Branzino"), item("Burrata"), item("Orata"), item("Pane")];
        let decision = finish_decision(&items, "Send a campaign for the fish tonight.");
        assert!(decision.should_send_campaign);
        assert_eq!(decision.reasoning, "Send a campaign for the fish tonight.");
        assert_eq!(decision.recommended_items.len(), 3);
        assert_eq!(decision.recommended_segment, CustomerSegment::Regulars);
        assert_eq!(decision.estimated_revenue, dec!(65));
        assert_eq!(decision.optimal_send_time, "16:30");
    }

    #[test]
    fn finish_honours_embedded_overrides() {
        let items = vec![item("Branzino")];
        let content = r#"{"shouldSendCampaign": false, "recommendedSegment": "vip", "estimatedRevenue": "120", "optimalSendTime": "17:00"}"#;
        let decision = finish_decision(&items, content);
        assert!(!decision.should_send_campaign);
        assert_eq!(decision.recommended_segment, CustomerSegment::Vip);
        assert_eq!(decision.estimated_revenue, dec!(120));
        assert_eq!(decision.optimal_send_time, "17:00");
    }

    #[test]
    fn empty_finish_content_gets_default_reasoning() {
        let decision = finish_decision(&[], "   ");
        assert_eq!(decision.reasoning, "Campaign recommended");
        assert!(decision.recommended_items.is_empty());
    }

    #[test]
    fn fallback_is_conservative() {
        let items = vec![item("Branzino")];
        let decision = fallback_decision(&items);
        assert!(decision.should_send_campaign);
        assert_eq!(
            decision.reasoning,
            "Default: campaign recommended based on inventory levels"
        );
        assert_eq!(decision.estimated_revenue, dec!(50));
        assert_eq!(decision.recommended_items.len(), 1);
    }
}
