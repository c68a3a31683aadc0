//! Pipeline integration tests with in-memory collaborator doubles.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;
use uuid::Uuid;
use wards::pipeline::{
    send_campaign, Messenger, Pipeline, PipelineError, SendError, StoreError, WasteStore,
};
use wards_agent::test_support::ScriptedReasoning;
use wards_agent::DecisionAgent;
use wards_models::{
    AgentConfig, CampaignConfig, Customer, CustomerSegment, FoodCategory, HistoricalSummary,
    InventoryAnalysis, InventoryItem, WastePrediction,
};

fn item(name: &str, category: FoodCategory) -> InventoryItem {
    InventoryItem {
        id: Uuid::new_v4(),
        name: name.to_string(),
        quantity: dec!(10),
        unit: "kg".to_string(),
        cost_per_unit: dec!(8),
        selling_price: Some(dec!(20)),
        category,
        expires_at: None,
    }
}

fn customer(name: &str, segment: CustomerSegment, opted_in: bool) -> Customer {
    Customer {
        id: Uuid::new_v4(),
        first_name: name.to_string(),
        last_name: None,
        phone: format!("+39{:010}", name.len()),
        opted_in,
        segment,
        visit_count: 5,
        total_spent: dec!(250),
        last_visit: None,
        preferred_categories: vec![FoodCategory::Pesce],
    }
}

/// Monday: day-of-week multiplier 1.15.
fn monday_noon() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 18, 12, 0, 0).unwrap()
}

#[derive(Default)]
struct InMemoryStore {
    items: Vec<InventoryItem>,
    history: Vec<HistoricalSummary>,
    customers: Vec<Customer>,
    fail_writes: bool,
    saved_predictions: Mutex<Vec<(String, NaiveDate, Vec<WastePrediction>)>>,
    saved_analyses: Mutex<Vec<(String, NaiveDate)>>,
}

#[async_trait]
impl WasteStore for InMemoryStore {
    async fn fetch_inventory(
        &self,
        _restaurant_id: &str,
    ) -> Result<Vec<InventoryItem>, StoreError> {
        Ok(self.items.clone())
    }

    async fn fetch_history(
        &self,
        _restaurant_id: &str,
        _days: u32,
    ) -> Result<Vec<HistoricalSummary>, StoreError> {
        Ok(self.history.clone())
    }

    async fn fetch_customers(&self, _restaurant_id: &str) -> Result<Vec<Customer>, StoreError> {
        Ok(self.customers.clone())
    }

    async fn upsert_predictions(
        &self,
        restaurant_id: &str,
        date: NaiveDate,
        predictions: &[WastePrediction],
    ) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError("disk full".to_string()));
        }
        self.saved_predictions.lock().unwrap().push((
            restaurant_id.to_string(),
            date,
            predictions.to_vec(),
        ));
        Ok(())
    }

    async fn save_analysis(
        &self,
        restaurant_id: &str,
        date: NaiveDate,
        _analysis: &InventoryAnalysis,
    ) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError("disk full".to_string()));
        }
        self.saved_analyses
            .lock()
            .unwrap()
            .push((restaurant_id.to_string(), date));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingMessenger {
    /// Phone numbers that should fail to deliver.
    reject: Vec<String>,
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), SendError> {
        if self.reject.iter().any(|r| r == to) {
            return Err(SendError("delivery rejected".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}

fn pipeline_with(store: Arc<InMemoryStore>) -> (Pipeline, Arc<ScriptedReasoning>) {
    let client = Arc::new(ScriptedReasoning::new());
    let agent = DecisionAgent::new(client.clone(), AgentConfig::default());
    (Pipeline::new(store, agent), client)
}

#[tokio::test]
async fn empty_inventory_rejects_the_run() {
    let store = Arc::new(InMemoryStore::default());
    let (pipeline, _) = pipeline_with(store);

    let result = pipeline.run_predictions("r1", monday_noon()).await;

    assert!(matches!(result, Err(PipelineError::EmptyInventory)));
}

#[tokio::test]
async fn prediction_run_persists_and_summarises() {
    let store = Arc::new(InMemoryStore {
        items: vec![
            item("Branzino", FoodCategory::Pesce),
            item("Acqua frizzante", FoodCategory::Bevande),
        ],
        ..InMemoryStore::default()
    });
    let (pipeline, _) = pipeline_with(store.clone());

    let report = pipeline.run_predictions("r1", monday_noon()).await.unwrap();

    assert_eq!(report.predictions.len(), 2);
    assert_eq!(report.summary.total_items_analysed, 2);
    // Pesce on Monday: 0.72 x 1.15 = 0.828, the only item above 0.7.
    assert_eq!(report.summary.high_risk_items, 1);
    assert_eq!(report.predictions[0].waste_probability, dec!(0.83));
    let expected_loss: rust_decimal::Decimal =
        report.predictions.iter().map(|p| p.potential_loss).sum();
    assert_eq!(report.summary.estimated_total_loss, expected_loss);
    assert_eq!(
        report.summary.recommended_campaign_value,
        report.analysis.recommended_campaign_value
    );

    let saved = store.saved_predictions.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, "r1");
    assert_eq!(saved[0].1, monday_noon().date_naive());
    assert_eq!(saved[0].2.len(), 2);
    assert_eq!(store.saved_analyses.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn write_failures_do_not_fail_the_run() {
    let store = Arc::new(InMemoryStore {
        items: vec![item("Branzino", FoodCategory::Pesce)],
        fail_writes: true,
        ..InMemoryStore::default()
    });
    let (pipeline, _) = pipeline_with(store.clone());

    let report = pipeline.run_predictions("r1", monday_noon()).await.unwrap();

    assert_eq!(report.predictions.len(), 1);
    assert!(store.saved_predictions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn decide_rejects_without_opted_in_customers() {
    let store = Arc::new(InMemoryStore {
        items: vec![item("Branzino", FoodCategory::Pesce)],
        customers: vec![customer("Anna", CustomerSegment::Regulars, false)],
        ..InMemoryStore::default()
    });
    let (pipeline, client) = pipeline_with(store);

    let result = pipeline.decide("r1", monday_noon()).await;

    assert!(matches!(result, Err(PipelineError::NoCustomers)));
    assert!(client.conversations().is_empty());
}

#[tokio::test]
async fn decide_delegates_to_the_agent() {
    let store = Arc::new(InMemoryStore {
        items: vec![item("Branzino", FoodCategory::Pesce)],
        customers: vec![customer("Anna", CustomerSegment::Regulars, true)],
        ..InMemoryStore::default()
    });
    let (pipeline, client) = pipeline_with(store);
    client.push_finish("Campaign for the fish.");

    let decision = pipeline.decide("r1", monday_noon()).await.unwrap();

    assert!(decision.should_send_campaign);
    assert_eq!(decision.reasoning, "Campaign for the fish.");
    assert_eq!(client.conversations().len(), 1);
}

#[tokio::test]
async fn send_campaign_personalises_and_isolates_failures() {
    let anna = customer("Anna", CustomerSegment::Regulars, true);
    let bruno = customer("Bruno", CustomerSegment::Regulars, true);
    let mut nameless = customer("", CustomerSegment::Regulars, true);
    nameless.phone = "+39111".to_string();
    let opted_out = customer("Elena", CustomerSegment::Regulars, false);
    let vip = customer("Franca", CustomerSegment::Vip, true);

    let messenger = RecordingMessenger {
        reject: vec![bruno.phone.clone()],
        ..RecordingMessenger::default()
    };

    let summary = send_campaign(
        &messenger,
        &[anna.clone(), bruno, nameless, opted_out, vip],
        CustomerSegment::Regulars,
        "Ciao {name}! Offerta di stasera.",
        &CampaignConfig::default(),
    )
    .await;

    assert_eq!(summary.sent, 2);
    assert_eq!(summary.failed, 1);

    let sent = messenger.sent.lock().unwrap();
    assert_eq!(sent[0].0, anna.phone);
    assert_eq!(sent[0].1, "Ciao Anna! Offerta di stasera.");
    assert_eq!(sent[1].1, "Ciao Caro cliente! Offerta di stasera.");
}

#[tokio::test]
async fn send_campaign_to_all_ignores_segments_and_respects_cap() {
    let customers: Vec<Customer> = (0..6)
        .map(|i| {
            let mut c = customer(&format!("C{i}"), CustomerSegment::Occasional, true);
            c.phone = format!("+39{i:09}");
            c
        })
        .collect();
    let messenger = RecordingMessenger::default();
    let config = CampaignConfig {
        max_campaign_customers: 4,
        ..CampaignConfig::default()
    };

    let summary = send_campaign(
        &messenger,
        &customers,
        CustomerSegment::All,
        "Ciao {name}!",
        &config,
    )
    .await;

    assert_eq!(summary.sent, 4);
    assert_eq!(summary.failed, 0);
    assert_eq!(messenger.sent.lock().unwrap().len(), 4);
}
