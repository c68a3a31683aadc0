use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;
use wards_models::{Customer, FoodCategory, ToolSpec};

pub const ANALYSE_WASTE_RISK: &str = "analyse_waste_risk";
pub const SELECT_TARGET_CUSTOMERS: &str = "select_target_customers";
pub const GENERATE_WHATSAPP_MESSAGE: &str = "generate_whatsapp_message";

/// The tool manifest advertised to the reasoning service on every round.
pub fn agent_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: ANALYSE_WASTE_RISK.to_string(),
            description: "Analyse inventory items and identify which ones are at highest risk of waste tonight".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "items": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "id": {"type": "string"},
                                "name": {"type": "string"},
                                "quantity": {"type": "number"},
                                "unit": {"type": "string"},
                                "expiresAt": {"type": "string"},
                                "category": {"type": "string"},
                                "historicalSellRate": {"type": "number"}
                            },
                            "required": ["id", "name"]
                        }
                    },
                    "dayOfWeek": {
                        "type": "string",
                        "description": "Italian day name in lowercase, e.g. sabato"
                    }
                },
                "required": ["items", "dayOfWeek"]
            }),
        },
        ToolSpec {
            name: SELECT_TARGET_CUSTOMERS.to_string(),
            description: "Select the best customers to target for a specific waste item campaign".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "wasteItems": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "category": {"type": "string"},
                                "name": {"type": "string"}
                            },
                            "required": ["name", "category"]
                        }
                    },
                    "customers": {
                        "type": "array",
                        "items": {"type": "object"}
                    },
                    "maxCustomers": {
                        "type": "integer",
                        "description": "Maximum number of customers to select, default 50"
                    }
                },
                "required": ["wasteItems", "customers"]
            }),
        },
        ToolSpec {
            name: GENERATE_WHATSAPP_MESSAGE.to_string(),
            description: "Generate a personalised Italian WhatsApp flash-sale message for a customer".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "customerName": {"type": "string"},
                    "items": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": {"type": "string"},
                                "originalPrice": {"type": "number"},
                                "discountedPrice": {"type": "number"},
                                "quantity": {"type": "number"},
                                "unit": {"type": "string"}
                            },
                            "required": ["name", "originalPrice", "discountedPrice", "quantity", "unit"]
                        }
                    },
                    "restaurantName": {"type": "string"},
                    "validUntil": {
                        "type": "string",
                        "description": "Offer expiry time, default 19:30"
                    }
                },
                "required": ["customerName", "items", "restaurantName"]
            }),
        },
    ]
}

/// Execute one tool call. Never fails: unknown names and malformed
/// arguments become `{"error": ...}` payloads fed back to the reasoning
/// service so the loop can recover.
pub fn dispatch_tool(name: &str, arguments: Value) -> Value {
    let result = match name {
        ANALYSE_WASTE_RISK => analyse_waste_risk(arguments),
        SELECT_TARGET_CUSTOMERS => select_target_customers(arguments),
        GENERATE_WHATSAPP_MESSAGE => generate_whatsapp_message(arguments),
        other => {
            warn!(tool = %other, "Unknown tool requested");
            return json!({"error": format!("Unknown tool: {other}")});
        }
    };
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(tool = %name, error = %e, "Tool execution failed");
            json!({"error": e})
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RiskArgs {
    items: Vec<RiskItem>,
    day_of_week: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RiskItem {
    id: String,
    name: String,
    historical_sell_rate: Option<f64>,
}

fn analyse_waste_risk(arguments: Value) -> Result<Value, String> {
    let args: RiskArgs = serde_json::from_value(arguments).map_err(|e| e.to_string())?;

    // Weekend dinner service moves more stock, so the score is damped.
    let day = args.day_of_week.to_lowercase();
    let weekend_multiplier = if day == "sabato" || day == "domenica" {
        0.7
    } else {
        1.0
    };

    let scored: Vec<Value> = args
        .items
        .iter()
        .map(|item| {
            let rate = item.historical_sell_rate.unwrap_or(0.5);
            let risk_score = (rate * weekend_multiplier).min(1.0);
            let recommendation = match item.historical_sell_rate {
                Some(rate) if rate > 0.7 => "high_risk",
                _ => "medium_risk",
            };
            json!({
                "id": item.id,
                "name": item.name,
                "riskScore": round2(risk_score),
                "recommendation": recommendation,
            })
        })
        .collect();

    Ok(Value::Array(scored))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectArgs {
    waste_items: Vec<WasteItemRef>,
    customers: Vec<Customer>,
    max_customers: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WasteItemRef {
    #[allow(dead_code)]
    name: String,
    category: FoodCategory,
}

fn select_target_customers(arguments: Value) -> Result<Value, String> {
    let args: SelectArgs = serde_json::from_value(arguments).map_err(|e| e.to_string())?;
    let max = args.max_customers.unwrap_or(50);

    let wanted: Vec<FoodCategory> = args.waste_items.iter().map(|i| i.category).collect();

    let mut selected: Vec<&Customer> = args
        .customers
        .iter()
        .filter(|c| c.preferred_categories.iter().any(|cat| wanted.contains(cat)))
        .collect();
    selected.sort_by(|a, b| b.visit_count.cmp(&a.visit_count));
    selected.truncate(max);

    let count = selected.len();
    let average_visit_count = if selected.is_empty() {
        0.0
    } else {
        let total: u32 = selected.iter().map(|c| c.visit_count).sum();
        round2(f64::from(total) / count as f64)
    };

    Ok(json!({
        "selectedCustomers": selected,
        "count": count,
        "averageVisitCount": average_visit_count,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageArgs {
    customer_name: String,
    items: Vec<OfferItem>,
    restaurant_name: String,
    valid_until: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfferItem {
    name: String,
    original_price: Decimal,
    discounted_price: Decimal,
    quantity: Decimal,
    unit: String,
}

fn generate_whatsapp_message(arguments: Value) -> Result<Value, String> {
    let args: MessageArgs = serde_json::from_value(arguments).map_err(|e| e.to_string())?;

    // Only the first item is featured in the template.
    let item = args.items.first().ok_or("no items to feature")?;
    if item.original_price <= Decimal::ZERO {
        return Err(format!("invalid original price for {}", item.name));
    }

    let valid_until = args.valid_until.as_deref().unwrap_or("19:30");
    let saving = item.original_price - item.discounted_price;
    let saving_pct = ((saving / item.original_price) * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0);

    let message = format!(
        "Ciao {}! 🍽️ Stasera a {} abbiamo {} che non vogliamo sprecare.\n\n→ {}: €{:.2} invece di €{:.2} (-{}%)\n⏳ Solo {} {} disponibili, offerta fino alle {}\n\nRispondi per prenotare!",
        args.customer_name,
        args.restaurant_name,
        item.name,
        item.name,
        item.discounted_price
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        item.original_price
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        saving_pct,
        item.quantity.normalize(),
        item.unit,
        valid_until,
    );

    let character_count = message.chars().count();
    Ok(json!({
        "message": message,
        "characterCount": character_count,
    }))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
