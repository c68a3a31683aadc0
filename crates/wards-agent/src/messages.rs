use rust_decimal::Decimal;
use tracing::warn;
use wards_models::{ChatMessage, ReasoningReply, WastePrediction};

use crate::prompts;
use crate::reasoning::ReasoningClient;

/// Returned when no prediction clears the campaign threshold.
pub const NO_CAMPAIGN_NEEDED: &str =
    "Nessun articolo ad alto rischio oggi — nessuna campagna necessaria.";

/// Returned when the reasoning service fails or replies with nothing.
pub const MESSAGE_GENERATION_FAILED: &str = "Errore nella generazione del messaggio.";

/// Inputs for one-shot campaign message generation, outside the decision
/// loop.
pub struct CampaignMessageInput<'a> {
    pub predictions: &'a [WastePrediction],
    pub restaurant_name: &'a str,
    pub valid_until: &'a str,
}

/// Generate an Italian campaign message template for the highest-risk
/// items. Degrades to fixed sentences instead of erroring: no qualifying
/// items skips the reasoning call entirely, and a failed call yields a
/// fixed failure sentence.
pub async fn generate_campaign_message(
    client: &dyn ReasoningClient,
    input: CampaignMessageInput<'_>,
) -> String {
    let threshold = Decimal::new(6, 1);
    let featured: Vec<&WastePrediction> = input
        .predictions
        .iter()
        .filter(|p| p.waste_probability > threshold)
        .take(3)
        .collect();

    if featured.is_empty() {
        return NO_CAMPAIGN_NEEDED.to_string();
    }

    let item_lines: Vec<String> = featured
        .iter()
        .map(|p| {
            format!(
                "- {} ({} {}, {}% off, potential loss €{:.2})",
                p.item_name, p.quantity, p.unit, p.recommended_discount, p.potential_loss
            )
        })
        .collect();

    let conversation = vec![
        ChatMessage::system(prompts::message_system_prompt()),
        ChatMessage::user(prompts::message_user_prompt(
            &item_lines,
            input.restaurant_name,
            input.valid_until,
        )),
    ];

    match client.complete(&conversation, &[]).await {
        Ok(ReasoningReply::Finish { content }) if !content.trim().is_empty() => {
            content.trim().to_string()
        }
        Ok(other) => {
            warn!(reply = ?other, "Unexpected reply to message generation");
            MESSAGE_GENERATION_FAILED.to_string()
        }
        Err(e) => {
            warn!(error = %e, "Message generation failed");
            MESSAGE_GENERATION_FAILED.to_string()
        }
    }
}
