use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Food categories used by an Italian restaurant's inventory.
///
/// Unknown categories from upstream systems deserialize to `Altro`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FoodCategory {
    Pesce,
    Carne,
    Verdure,
    Pasta,
    Latticini,
    Dolci,
    Bevande,
    Erbe,
    Pane,
    #[serde(other)]
    Altro,
}

impl FoodCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodCategory::Pesce => "Pesce",
            FoodCategory::Carne => "Carne",
            FoodCategory::Verdure => "Verdure",
            FoodCategory::Pasta => "Pasta",
            FoodCategory::Latticini => "Latticini",
            FoodCategory::Dolci => "Dolci",
            FoodCategory::Bevande => "Bevande",
            FoodCategory::Erbe => "Erbe",
            FoodCategory::Pane => "Pane",
            FoodCategory::Altro => "Altro",
        }
    }
}

/// A single inventory item as reported by the restaurant's stock system.
/// Read-only input to the prediction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub quantity: Decimal,
    /// Unit of measure (e.g., "g", "kg", "pz", "portion").
    pub unit: String,
    pub cost_per_unit: Decimal,
    /// Menu price, when known. Used for discount framing in messages.
    pub selling_price: Option<Decimal>,
    pub category: FoodCategory,
    pub expires_at: Option<DateTime<Utc>>,
}

/// One item's sold/wasted counts within a daily summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemDaySummary {
    pub name: String,
    pub sold: u32,
    pub wasted: u32,
}

/// Aggregate of a single past day, used to derive historical waste rates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoricalSummary {
    pub date: NaiveDate,
    pub items: Vec<ItemDaySummary>,
}

/// Customer cohort a campaign can address.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSegment {
    All,
    Vip,
    Regulars,
    Occasional,
}

/// A customer eligible for outbound campaigns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: String,
    /// Whether the customer opted in to receive campaign messages.
    pub opted_in: bool,
    pub segment: CustomerSegment,
    pub visit_count: u32,
    pub total_spent: Decimal,
    pub last_visit: Option<DateTime<Utc>>,
    pub preferred_categories: Vec<FoodCategory>,
}
