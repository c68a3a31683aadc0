use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discretization of waste probability into three bands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

/// Per-item waste forecast for today. Created fresh on every prediction
/// run and never mutated; the caller may persist it keyed by
/// (restaurant, item, date).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WastePrediction {
    pub item_id: Uuid,
    pub item_name: String,
    pub quantity: Decimal,
    pub unit: String,
    /// Quantity expected to go unsold, in the item's unit (1 dp).
    pub predicted_waste_quantity: Decimal,
    /// Probability the stock goes to waste, 0.00 to 0.98.
    pub waste_probability: Decimal,
    /// Money at risk if nothing is sold off, in EUR (2 dp).
    pub potential_loss: Decimal,
    /// Discount tier to offer, one of 20/30/40/55/65 percent.
    pub recommended_discount: u8,
    pub risk_level: RiskLevel,
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn roundtrip_waste_prediction() {
        let prediction = WastePrediction {
            item_id: Uuid::new_v4(),
            item_name: "Branzino".to_string(),
            quantity: dec!(800),
            unit: "g".to_string(),
            predicted_waste_quantity: dec!(403.2),
            waste_probability: dec!(0.50),
            potential_loss: dec!(12.90),
            recommended_discount: 40,
            risk_level: RiskLevel::Medium,
            reasoning: "Sat multiplier: 0.70x · Category base rate: 72%".to_string(),
        };

        let json = serde_json::to_string(&prediction).unwrap();
        let deserialized: WastePrediction = serde_json::from_str(&json).unwrap();
        assert_eq!(prediction, deserialized);
    }

    #[test]
    fn risk_level_serialization() {
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"high\"");
        assert_eq!(
            serde_json::to_string(&RiskLevel::Medium).unwrap(),
            "\"medium\""
        );
        assert_eq!(serde_json::to_string(&RiskLevel::Low).unwrap(), "\"low\"");
    }
}
