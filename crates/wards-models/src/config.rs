use serde::{Deserialize, Serialize};

/// Top-level configuration for WARDS.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WardsConfig {
    pub agent: AgentConfig,
    pub campaign: CampaignConfig,
}

impl Default for WardsConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            campaign: CampaignConfig::default(),
        }
    }
}

/// Configuration for the agentic decision loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    /// Maximum reasoning rounds before the fallback decision is used.
    pub max_rounds: u32,
    /// Per-round timeout for one reasoning round-trip, in seconds.
    pub call_timeout_seconds: u64,
    /// Overall deadline for a single decision request, in seconds.
    pub deadline_seconds: u64,
    /// Model passed to the reasoning CLI.
    pub model: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_rounds: 5,
            call_timeout_seconds: 45,
            deadline_seconds: 120,
            model: "claude-3-5-haiku-latest".to_string(),
        }
    }
}

/// Configuration for campaign generation and dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignConfig {
    /// Default launch time when no recommendation is available, "HH:MM".
    pub default_send_time: String,
    /// Time the flash-sale offer expires, "HH:MM".
    pub offer_valid_until: String,
    /// Hard cap on recipients per campaign batch.
    pub max_campaign_customers: usize,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            default_send_time: "16:30".to_string(),
            offer_valid_until: "19:30".to_string(),
            max_campaign_customers: 500,
        }
    }
}
