use chrono::{DateTime, Utc};
use wards_models::{Customer, HistoricalSummary, InventoryItem};

/// System prompt for the campaign decision loop.
pub fn decision_system_prompt() -> String {
    "You are an intelligent anti-waste management agent for restaurants. \
Your job is to analyse the current inventory and decide whether to send a promotional \
campaign to recover food at risk of being wasted.

Follow this process:
1. Analyse the waste risk of today's inventory items
2. Identify which items need an immediate promotion
3. Select the customers most likely to respond
4. Generate a campaign message for the selected items
5. Decide the optimal send time for the campaign

Always respond with a structured decision using the available tools."
        .to_string()
}

/// User-turn context for the first round of the decision loop. Inventory
/// and history are truncated so the prompt stays bounded.
pub fn decision_user_context(
    items: &[InventoryItem],
    history: &[HistoricalSummary],
    customers: &[Customer],
    now: DateTime<Utc>,
) -> String {
    let inventory: Vec<&InventoryItem> = items.iter().take(10).collect();
    let summaries: Vec<&HistoricalSummary> = history.iter().take(5).collect();
    let opted_in = customers.iter().filter(|c| c.opted_in).count();

    format!(
        "Current date and time: {}\n\nToday's inventory:\n{}\n\nRecent sales history:\n{}\n\nCustomers opted in to campaigns: {}\n\nDecide whether to send an anti-waste campaign today and with what parameters.",
        now.format("%d/%m/%Y, %H:%M:%S"),
        serde_json::to_string(&inventory).unwrap_or_default(),
        serde_json::to_string(&summaries).unwrap_or_default(),
        opted_in,
    )
}

/// System prompt for WhatsApp campaign message generation.
pub fn message_system_prompt() -> String {
    "You write WhatsApp messages for an Italian restaurant's anti-waste offers. \
Style rules: warm and friendly tone, in Italian, maximum 200 words, one or two emoji, \
address the customer by first name, always state the offer expiry time. \
Never mention waste or leftovers; present the offer as tonight's special."
        .to_string()
}

/// User-turn prompt for message generation. The `{name}` placeholder is
/// kept literal so one generated template serves every recipient.
pub fn message_user_prompt(
    item_lines: &[String],
    restaurant_name: &str,
    valid_until: &str,
) -> String {
    format!(
        "Restaurant: {restaurant_name}\nTonight's discounted items:\n{}\nOffer valid until {valid_until}.\n\nWrite one message template using the literal placeholder {{name}} for the customer's first name.",
        item_lines.join("\n"),
    )
}
