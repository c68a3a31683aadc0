use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::inventory::{CustomerSegment, FoodCategory};
use crate::prediction::WastePrediction;

/// How strongly a recovery campaign is recommended for today.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Immediate,
    Scheduled,
    Optional,
    None,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Urgency::Immediate => "immediate",
            Urgency::Scheduled => "scheduled",
            Urgency::Optional => "optional",
            Urgency::None => "none",
        };
        f.write_str(label)
    }
}

/// Potential loss aggregated over one food category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryWaste {
    pub category: FoodCategory,
    pub waste_value: Decimal,
    pub count: u32,
}

/// The nested campaign recommendation inside an analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignRecommendation {
    pub should_send: bool,
    pub urgency: Urgency,
    pub target_segment: CustomerSegment,
    /// Expected revenue if the featured items are sold off (EUR, 2 dp).
    pub estimated_recovery: Decimal,
    /// Suggested launch time, "HH:MM".
    pub recommended_send_time: String,
    /// At most 3 predictions, highest risk first.
    pub items_to_feature: Vec<WastePrediction>,
    pub reasoning: String,
}

/// Aggregated view over one prediction run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryAnalysis {
    /// Overall risk score, 0 to 100.
    pub risk_score: u8,
    pub high_risk_items: Vec<WastePrediction>,
    pub medium_risk_items: Vec<WastePrediction>,
    pub low_risk_items: Vec<WastePrediction>,
    pub total_potential_loss: Decimal,
    /// Expected revenue if a campaign recovers the global target share.
    pub recommended_campaign_value: Decimal,
    /// Top 5 categories by potential loss, descending.
    pub top_categories: Vec<CategoryWaste>,
    pub campaign: CampaignRecommendation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn urgency_serialization() {
        assert_eq!(
            serde_json::to_string(&Urgency::Immediate).unwrap(),
            "\"immediate\""
        );
        assert_eq!(serde_json::to_string(&Urgency::None).unwrap(), "\"none\"");
    }

    #[test]
    fn urgency_display_matches_wire_form() {
        assert_eq!(Urgency::Scheduled.to_string(), "scheduled");
        assert_eq!(Urgency::Optional.to_string(), "optional");
    }

    #[test]
    fn roundtrip_analysis() {
        let analysis = InventoryAnalysis {
            risk_score: 42,
            high_risk_items: vec![],
            medium_risk_items: vec![],
            low_risk_items: vec![],
            total_potential_loss: dec!(95.40),
            recommended_campaign_value: dec!(64.87),
            top_categories: vec![CategoryWaste {
                category: FoodCategory::Pesce,
                waste_value: dec!(60.00),
                count: 2,
            }],
            campaign: CampaignRecommendation {
                should_send: true,
                urgency: Urgency::Immediate,
                target_segment: CustomerSegment::All,
                estimated_recovery: dec!(39.00),
                recommended_send_time: "16:00".to_string(),
                items_to_feature: vec![],
                reasoning: "2 high-risk item(s)".to_string(),
            },
        };

        let json = serde_json::to_string(&analysis).unwrap();
        let deserialized: InventoryAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(analysis, deserialized);
    }
}
