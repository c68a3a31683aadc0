use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;
use wards_models::{
    CampaignRecommendation, CategoryWaste, CustomerSegment, InventoryAnalysis, InventoryItem,
    RiskLevel, Urgency, WastePrediction,
};

use crate::rates::{featured_recovery_rate, target_recovery_rate};

const MAX_TOP_CATEGORIES: usize = 5;
const MAX_FEATURED_ITEMS: usize = 3;

/// The recommendation engine: pure function from predictions plus the
/// inventory they were derived from to an aggregated campaign
/// recommendation. The current hour is an explicit input.
pub struct InventoryAnalyzer;

impl InventoryAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(
        &self,
        items: &[InventoryItem],
        predictions: &[WastePrediction],
        hour: u32,
    ) -> InventoryAnalysis {
        let high: Vec<WastePrediction> = filter_by_risk(predictions, RiskLevel::High);
        let medium: Vec<WastePrediction> = filter_by_risk(predictions, RiskLevel::Medium);
        let low: Vec<WastePrediction> = filter_by_risk(predictions, RiskLevel::Low);

        let total_loss: Decimal = predictions.iter().map(|p| p.potential_loss).sum();

        let weighted = Decimal::from(high.len() * 30 + medium.len() * 10)
            + Decimal::from(2) * total_loss;
        let risk_score = round_dp(weighted / Decimal::from(predictions.len().max(1)), 0)
            .min(Decimal::ONE_HUNDRED)
            .to_u8()
            .unwrap_or(100);

        let top_categories = top_categories(items, predictions);
        let campaign = build_campaign(&high, &medium, total_loss, hour);

        debug!(
            risk_score,
            high = high.len(),
            medium = medium.len(),
            urgency = %campaign.urgency,
            "Inventory analysis complete"
        );

        InventoryAnalysis {
            risk_score,
            high_risk_items: high,
            medium_risk_items: medium,
            low_risk_items: low,
            total_potential_loss: round_dp(total_loss, 2),
            recommended_campaign_value: round_dp(total_loss * target_recovery_rate(), 2),
            top_categories,
            campaign,
        }
    }
}

impl Default for InventoryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn filter_by_risk(predictions: &[WastePrediction], level: RiskLevel) -> Vec<WastePrediction> {
    predictions
        .iter()
        .filter(|p| p.risk_level == level)
        .cloned()
        .collect()
}

/// Group potential loss by the category of the underlying item, descending
/// by value, keeping the top 5. Predictions with no matching item are
/// skipped.
fn top_categories(items: &[InventoryItem], predictions: &[WastePrediction]) -> Vec<CategoryWaste> {
    let mut by_category: BTreeMap<_, (Decimal, u32)> = BTreeMap::new();
    for prediction in predictions {
        let Some(item) = items.iter().find(|i| i.id == prediction.item_id) else {
            continue;
        };
        let entry = by_category
            .entry(item.category)
            .or_insert((Decimal::ZERO, 0));
        entry.0 += prediction.potential_loss;
        entry.1 += 1;
    }

    let mut categories: Vec<CategoryWaste> = by_category
        .into_iter()
        .map(|(category, (waste_value, count))| CategoryWaste {
            category,
            waste_value,
            count,
        })
        .collect();
    categories.sort_by(|a, b| b.waste_value.cmp(&a.waste_value));
    categories.truncate(MAX_TOP_CATEGORIES);
    categories
}

fn build_campaign(
    high: &[WastePrediction],
    medium: &[WastePrediction],
    total_loss: Decimal,
    hour: u32,
) -> CampaignRecommendation {
    // Ordered precedence: first match wins.
    let urgency = if high.len() >= 3 || total_loss > Decimal::from(80) {
        Urgency::Immediate
    } else if !high.is_empty() || total_loss > Decimal::from(40) {
        Urgency::Scheduled
    } else if medium.len() >= 2 {
        Urgency::Optional
    } else {
        Urgency::None
    };

    let target_segment = if total_loss > Decimal::ONE_HUNDRED {
        CustomerSegment::All
    } else if high.len() > 2 {
        CustomerSegment::Regulars
    } else {
        CustomerSegment::Vip
    };

    let recommended_send_time = if hour < 15 {
        "15:30"
    } else if hour < 16 {
        "16:00"
    } else if hour < 17 {
        "16:30"
    } else {
        "17:00"
    };

    let items_to_feature: Vec<WastePrediction> = high
        .iter()
        .chain(medium.iter())
        .take(MAX_FEATURED_ITEMS)
        .cloned()
        .collect();

    let estimated_recovery: Decimal = items_to_feature
        .iter()
        .map(|p| p.potential_loss * featured_recovery_rate())
        .sum();

    CampaignRecommendation {
        should_send: urgency != Urgency::None,
        urgency,
        target_segment,
        estimated_recovery: round_dp(estimated_recovery, 2),
        recommended_send_time: recommended_send_time.to_string(),
        items_to_feature,
        reasoning: build_reasoning(high, medium, total_loss, urgency),
    }
}

fn build_reasoning(
    high: &[WastePrediction],
    medium: &[WastePrediction],
    total_loss: Decimal,
    urgency: Urgency,
) -> String {
    if urgency == Urgency::None {
        return "No significant waste risk detected today.".to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    if !high.is_empty() {
        let names: Vec<&str> = high.iter().map(|p| p.item_name.as_str()).collect();
        parts.push(format!(
            "{} high-risk item(s): {}",
            high.len(),
            names.join(", ")
        ));
    }
    if !medium.is_empty() {
        parts.push(format!("{} medium-risk item(s)", medium.len()));
    }
    parts.push(format!("€{total_loss:.2} total potential loss"));
    parts.push(format!("Urgency: {urgency}"));

    parts.join(". ")
}

fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
