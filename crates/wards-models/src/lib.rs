pub mod agent;
pub mod analysis;
pub mod config;
pub mod inventory;
pub mod prediction;

pub use agent::{
    AgentDecision, ChatMessage, ChatRole, ReasoningReply, ToolCallRequest, ToolSpec,
};
pub use analysis::{CampaignRecommendation, CategoryWaste, InventoryAnalysis, Urgency};
pub use config::{AgentConfig, CampaignConfig, WardsConfig};
pub use inventory::{
    Customer, CustomerSegment, FoodCategory, HistoricalSummary, InventoryItem, ItemDaySummary,
};
pub use prediction::{RiskLevel, WastePrediction};
