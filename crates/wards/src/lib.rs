//! WARDS - Waste Analysis & Recovery Decision System
//!
//! Predicts which inventory items a restaurant is likely to waste tonight,
//! recommends a recovery campaign, and can drive an agentic decision loop
//! against an external reasoning service.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use wards::models::{InventoryItem, WastePrediction, WardsConfig};
//! use wards::engine::{WastePredictor, InventoryAnalyzer};
//! use wards::agent::{DecisionAgent, ReasoningClient};
//! use wards::pipeline::{Pipeline, WasteStore, Messenger};
//! ```

pub use wards_agent as agent;
pub use wards_engine as engine;
pub use wards_models as models;

pub mod pipeline;

use std::sync::Arc;
use std::time::Duration;

use wards_agent::{CliReasoning, CliReasoningConfig, DecisionAgent};
use wards_models::WardsConfig;

/// Build a decision agent backed by the `claude` CLI, per configuration.
pub fn build_agent(config: &WardsConfig) -> DecisionAgent {
    let client = Arc::new(CliReasoning::new(CliReasoningConfig {
        model: config.agent.model.clone(),
        timeout: Duration::from_secs(config.agent.call_timeout_seconds),
    }));
    DecisionAgent::new(client, config.agent.clone())
}
