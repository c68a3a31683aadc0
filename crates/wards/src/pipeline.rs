use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};
use wards_agent::DecisionAgent;
use wards_engine::{EngineError, InventoryAnalyzer, WastePredictor};
use wards_models::{
    AgentDecision, CampaignConfig, Customer, CustomerSegment, HistoricalSummary,
    InventoryAnalysis, InventoryItem, WastePrediction,
};

/// Days of history fed into the waste predictor.
const HISTORY_DAYS: u32 = 30;

/// Probability above which an item counts as high risk in the run summary.
fn summary_high_risk_threshold() -> Decimal {
    Decimal::new(7, 1)
}

#[derive(Error, Debug)]
#[error("store error: {0}")]
pub struct StoreError(pub String);

#[derive(Error, Debug)]
#[error("send error: {0}")]
pub struct SendError(pub String);

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("no inventory items for restaurant")]
    EmptyInventory,

    #[error("no opted-in customers for restaurant")]
    NoCustomers,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<EngineError> for PipelineError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::EmptyInventory => PipelineError::EmptyInventory,
        }
    }
}

/// Persistence collaborator. Reads are fatal to the run; write failures
/// are logged by the pipeline and do not invalidate computed results.
#[async_trait]
pub trait WasteStore: Send + Sync {
    async fn fetch_inventory(&self, restaurant_id: &str)
        -> Result<Vec<InventoryItem>, StoreError>;

    async fn fetch_history(
        &self,
        restaurant_id: &str,
        days: u32,
    ) -> Result<Vec<HistoricalSummary>, StoreError>;

    async fn fetch_customers(&self, restaurant_id: &str) -> Result<Vec<Customer>, StoreError>;

    /// Upsert keyed by (restaurant, item, date); a rerun for the same day
    /// replaces that day's rows.
    async fn upsert_predictions(
        &self,
        restaurant_id: &str,
        date: NaiveDate,
        predictions: &[WastePrediction],
    ) -> Result<(), StoreError>;

    async fn save_analysis(
        &self,
        restaurant_id: &str,
        date: NaiveDate,
        analysis: &InventoryAnalysis,
    ) -> Result<(), StoreError>;
}

/// Outbound messaging collaborator.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), SendError>;
}

/// Aggregate counters for one prediction run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub total_items_analysed: usize,
    pub high_risk_items: usize,
    pub estimated_total_loss: Decimal,
    pub recommended_campaign_value: Decimal,
}

/// Full output of one prediction run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionReport {
    pub predictions: Vec<WastePrediction>,
    pub analysis: InventoryAnalysis,
    pub summary: RunSummary,
}

/// Outcome of one campaign send batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Orchestrates prediction, analysis, persistence and the decision loop
/// for one restaurant at a time.
pub struct Pipeline {
    store: Arc<dyn WasteStore>,
    agent: DecisionAgent,
    predictor: WastePredictor,
    analyzer: InventoryAnalyzer,
}

impl Pipeline {
    pub fn new(store: Arc<dyn WasteStore>, agent: DecisionAgent) -> Self {
        Self {
            store,
            agent,
            predictor: WastePredictor::new(),
            analyzer: InventoryAnalyzer::new(),
        }
    }

    /// Predict waste for today's inventory and persist the results.
    ///
    /// Persistence failures are logged and do not fail the run; the
    /// computed report is returned regardless.
    pub async fn run_predictions(
        &self,
        restaurant_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PredictionReport, PipelineError> {
        let items = self.store.fetch_inventory(restaurant_id).await?;
        if items.is_empty() {
            return Err(PipelineError::EmptyInventory);
        }
        let history = self
            .store
            .fetch_history(restaurant_id, HISTORY_DAYS)
            .await?;

        let predictions = self.predictor.predict(&items, &history, now)?;
        let analysis = self.analyzer.analyze(&items, &predictions, now.hour());

        let today = now.date_naive();
        if let Err(e) = self
            .store
            .upsert_predictions(restaurant_id, today, &predictions)
            .await
        {
            error!(restaurant_id, error = %e, "Failed to persist predictions");
        }
        if let Err(e) = self.store.save_analysis(restaurant_id, today, &analysis).await {
            error!(restaurant_id, error = %e, "Failed to persist analysis");
        }

        let threshold = summary_high_risk_threshold();
        let summary = RunSummary {
            total_items_analysed: items.len(),
            high_risk_items: predictions
                .iter()
                .filter(|p| p.waste_probability > threshold)
                .count(),
            estimated_total_loss: predictions.iter().map(|p| p.potential_loss).sum(),
            recommended_campaign_value: analysis.recommended_campaign_value,
        };

        info!(
            restaurant_id,
            items = summary.total_items_analysed,
            high_risk = summary.high_risk_items,
            "Prediction run complete"
        );

        Ok(PredictionReport {
            predictions,
            analysis,
            summary,
        })
    }

    /// Run the agentic decision loop for a restaurant.
    pub async fn decide(
        &self,
        restaurant_id: &str,
        now: DateTime<Utc>,
    ) -> Result<AgentDecision, PipelineError> {
        let items = self.store.fetch_inventory(restaurant_id).await?;
        if items.is_empty() {
            return Err(PipelineError::EmptyInventory);
        }
        let customers = self.store.fetch_customers(restaurant_id).await?;
        if !customers.iter().any(|c| c.opted_in) {
            return Err(PipelineError::NoCustomers);
        }
        let history = self
            .store
            .fetch_history(restaurant_id, HISTORY_DAYS)
            .await?;

        Ok(self.agent.decide(&items, &history, &customers, now).await)
    }
}

/// Send a personalised campaign message to every eligible customer.
///
/// Recipient failures are isolated: one failed send never aborts the
/// batch, it only increments the failure counter.
pub async fn send_campaign(
    messenger: &dyn Messenger,
    customers: &[Customer],
    target_segment: CustomerSegment,
    template: &str,
    config: &CampaignConfig,
) -> SendSummary {
    let recipients: Vec<&Customer> = customers
        .iter()
        .filter(|c| c.opted_in)
        .filter(|c| target_segment == CustomerSegment::All || c.segment == target_segment)
        .take(config.max_campaign_customers)
        .collect();

    let mut sent = 0;
    let mut failed = 0;
    for customer in recipients {
        let name = if customer.first_name.is_empty() {
            "Caro cliente"
        } else {
            customer.first_name.as_str()
        };
        let body = template.replace("{name}", name);

        match messenger.send_text(&customer.phone, &body).await {
            Ok(()) => sent += 1,
            Err(e) => {
                warn!(customer_id = %customer.id, error = %e, "Campaign send failed");
                failed += 1;
            }
        }
    }

    info!(sent, failed, "Campaign batch complete");
    SendSummary { sent, failed }
}
