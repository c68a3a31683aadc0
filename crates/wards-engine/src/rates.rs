//! Fixed lookup tables for the probability model and recommendation engine.
//!
//! Kept as named mappings rather than inline conditionals so they can be
//! unit-tested and swapped per locale.

use chrono::Weekday;
use rust_decimal::Decimal;
use wards_models::{FoodCategory, RiskLevel};

/// Waste probability is capped here regardless of input magnitude.
pub fn max_probability() -> Decimal {
    Decimal::new(98, 2)
}

/// Weight of the historical waste rate when blending with the category base.
pub fn history_weight() -> Decimal {
    Decimal::new(7, 1)
}

/// Weight of the category base rate when a historical rate exists.
pub fn base_weight() -> Decimal {
    Decimal::new(3, 1)
}

/// Fraction of a featured item's potential loss assumed recoverable.
pub fn featured_recovery_rate() -> Decimal {
    Decimal::new(65, 2)
}

/// Global target recovery rate over the whole prediction set.
pub fn target_recovery_rate() -> Decimal {
    Decimal::new(68, 2)
}

/// Category base waste rates, from Italian restaurant industry data.
pub fn category_base_rate(category: FoodCategory) -> Decimal {
    match category {
        FoodCategory::Pesce => Decimal::new(72, 2),
        FoodCategory::Carne => Decimal::new(45, 2),
        FoodCategory::Verdure => Decimal::new(58, 2),
        FoodCategory::Pasta => Decimal::new(35, 2),
        FoodCategory::Latticini => Decimal::new(48, 2),
        FoodCategory::Dolci => Decimal::new(52, 2),
        FoodCategory::Bevande => Decimal::new(28, 2),
        FoodCategory::Erbe => Decimal::new(65, 2),
        FoodCategory::Pane => Decimal::new(60, 2),
        FoodCategory::Altro => Decimal::new(40, 2),
    }
}

/// Day-of-week waste multipliers. Italians eat out more Fri/Sat/Sun, so
/// busy nights waste less and quiet nights (Monday) waste more.
pub fn dow_multiplier(weekday: Weekday) -> Decimal {
    match weekday {
        Weekday::Sun => Decimal::new(85, 2),
        Weekday::Mon => Decimal::new(115, 2),
        Weekday::Tue => Decimal::new(110, 2),
        Weekday::Wed => Decimal::new(105, 2),
        Weekday::Thu => Decimal::new(95, 2),
        Weekday::Fri => Decimal::new(75, 2),
        Weekday::Sat => Decimal::new(70, 2),
    }
}

/// Short day name used in prediction reasoning strings.
pub fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

/// Discount tier for a waste probability. Ordered thresholds; higher
/// probability never yields a lower discount.
pub fn discount_for(probability: Decimal) -> u8 {
    if probability > Decimal::new(80, 2) {
        65
    } else if probability > Decimal::new(65, 2) {
        55
    } else if probability > Decimal::new(50, 2) {
        40
    } else if probability > Decimal::new(35, 2) {
        30
    } else {
        20
    }
}

/// Risk band for a waste probability.
pub fn risk_level_for(probability: Decimal) -> RiskLevel {
    if probability > Decimal::new(65, 2) {
        RiskLevel::High
    } else if probability > Decimal::new(40, 2) {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
