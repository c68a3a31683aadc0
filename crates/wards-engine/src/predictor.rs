use std::collections::HashMap;

use chrono::{DateTime, Utc, Weekday};
use chrono::Datelike;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;
use wards_models::{HistoricalSummary, InventoryItem, WastePrediction};

use crate::error::EngineError;
use crate::rates::{
    base_weight, category_base_rate, day_name, discount_for, dow_multiplier, history_weight,
    max_probability, risk_level_for,
};

const SECONDS_PER_HOUR: i64 = 3600;

/// The probability model: pure function from an inventory snapshot plus
/// historical summaries to per-item waste predictions.
///
/// The current time is an explicit input so results are reproducible;
/// identical inputs give bit-identical predictions.
pub struct WastePredictor;

impl WastePredictor {
    pub fn new() -> Self {
        Self
    }

    pub fn predict(
        &self,
        items: &[InventoryItem],
        history: &[HistoricalSummary],
        now: DateTime<Utc>,
    ) -> Result<Vec<WastePrediction>, EngineError> {
        if items.is_empty() {
            return Err(EngineError::EmptyInventory);
        }

        let weekday = now.weekday();
        let multiplier = dow_multiplier(weekday);
        let waste_rates = historical_waste_rates(history);
        debug!(
            items = items.len(),
            history_days = history.len(),
            day = day_name(weekday),
            "Running waste prediction"
        );

        Ok(items
            .iter()
            .map(|item| predict_item(item, &waste_rates, weekday, multiplier, now))
            .collect())
    }
}

impl Default for WastePredictor {
    fn default() -> Self {
        Self::new()
    }
}

/// Sum sold/wasted counts per lowercased item name across all historical
/// days; rate = wasted / (wasted + sold) where the denominator is positive.
fn historical_waste_rates(history: &[HistoricalSummary]) -> HashMap<String, Decimal> {
    let mut totals: HashMap<String, (u64, u64)> = HashMap::new();
    for day in history {
        for item in &day.items {
            let entry = totals.entry(item.name.to_lowercase()).or_insert((0, 0));
            entry.0 += u64::from(item.sold);
            entry.1 += u64::from(item.wasted);
        }
    }

    totals
        .into_iter()
        .filter_map(|(name, (sold, wasted))| {
            let total = sold + wasted;
            if total > 0 {
                Some((name, Decimal::from(wasted) / Decimal::from(total)))
            } else {
                None
            }
        })
        .collect()
}

fn predict_item(
    item: &InventoryItem,
    waste_rates: &HashMap<String, Decimal>,
    weekday: Weekday,
    multiplier: Decimal,
    now: DateTime<Utc>,
) -> WastePrediction {
    let base_rate = category_base_rate(item.category);
    let historical_rate = waste_rates.get(&item.name.to_lowercase()).copied();

    let mut probability = match historical_rate {
        Some(rate) => rate * history_weight() + base_rate * base_weight(),
        None => base_rate,
    };

    probability = (probability * multiplier).min(max_probability());

    // Expiry urgency boost. Strict comparisons: exactly 8.0h falls through
    // to the 16h branch, exactly 16.0h gets no boost.
    let hours_until_expiry = item.expires_at.map(|expires_at| {
        Decimal::from((expires_at - now).num_seconds()) / Decimal::from(SECONDS_PER_HOUR)
    });
    if let Some(hours) = hours_until_expiry {
        if hours < Decimal::from(8) {
            probability += Decimal::new(20, 2);
        } else if hours < Decimal::from(16) {
            probability += Decimal::new(10, 2);
        }
        probability = probability.min(max_probability());
    }

    let predicted_waste_quantity = item.quantity * probability;
    let potential_loss = predicted_waste_quantity * item.cost_per_unit;

    WastePrediction {
        item_id: item.id,
        item_name: item.name.clone(),
        quantity: item.quantity,
        unit: item.unit.clone(),
        predicted_waste_quantity: round_dp(predicted_waste_quantity, 1),
        waste_probability: round_dp(probability, 2),
        potential_loss: round_dp(potential_loss, 2),
        // Tier and band come from the unrounded probability.
        recommended_discount: discount_for(probability),
        risk_level: risk_level_for(probability),
        reasoning: build_reasoning(historical_rate, weekday, multiplier, hours_until_expiry, base_rate),
    }
}

fn build_reasoning(
    historical_rate: Option<Decimal>,
    weekday: Weekday,
    multiplier: Decimal,
    hours_until_expiry: Option<Decimal>,
    base_rate: Decimal,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(rate) = historical_rate {
        parts.push(format!("Historical waste rate: {}%", as_percent(rate)));
    }

    parts.push(format!("{} multiplier: {}x", day_name(weekday), multiplier));

    if let Some(hours) = hours_until_expiry {
        parts.push(format!("Expires in {:.1}h", round_dp(hours, 1)));
    }

    parts.push(format!("Category base rate: {}%", as_percent(base_rate)));

    parts.join(" · ")
}

fn as_percent(rate: Decimal) -> Decimal {
    round_dp(rate * Decimal::ONE_HUNDRED, 0)
}

fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
