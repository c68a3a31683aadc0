use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use wards::pipeline::{Pipeline, StoreError, WasteStore};
use wards_models::{
    Customer, HistoricalSummary, InventoryAnalysis, InventoryItem, WardsConfig, WastePrediction,
};

#[derive(Parser, Debug)]
#[command(name = "wards", about = "Waste Analysis & Recovery Decision System")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/wards.toml")]
    config: String,

    /// Read the inventory snapshot JSON from a file instead of stdin
    #[arg(short, long)]
    input: Option<String>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,

    /// Also run the agentic decision loop via the reasoning CLI
    #[arg(long)]
    decide: bool,
}

/// One restaurant's state, read from file or stdin.
#[derive(Debug, Clone, Deserialize)]
struct Snapshot {
    #[serde(default = "default_restaurant_id")]
    restaurant_id: String,
    items: Vec<InventoryItem>,
    #[serde(default)]
    history: Vec<HistoricalSummary>,
    #[serde(default)]
    customers: Vec<Customer>,
}

fn default_restaurant_id() -> String {
    "local".to_string()
}

/// Read-only store over an in-process snapshot. Writes are accepted and
/// discarded; the CLI's output is the report itself.
struct SnapshotStore {
    snapshot: Snapshot,
}

#[async_trait]
impl WasteStore for SnapshotStore {
    async fn fetch_inventory(
        &self,
        _restaurant_id: &str,
    ) -> Result<Vec<InventoryItem>, StoreError> {
        Ok(self.snapshot.items.clone())
    }

    async fn fetch_history(
        &self,
        _restaurant_id: &str,
        _days: u32,
    ) -> Result<Vec<HistoricalSummary>, StoreError> {
        Ok(self.snapshot.history.clone())
    }

    async fn fetch_customers(&self, _restaurant_id: &str) -> Result<Vec<Customer>, StoreError> {
        Ok(self.snapshot.customers.clone())
    }

    async fn upsert_predictions(
        &self,
        _restaurant_id: &str,
        _date: NaiveDate,
        _predictions: &[WastePrediction],
    ) -> Result<(), StoreError> {
        Ok(())
    }

    async fn save_analysis(
        &self,
        _restaurant_id: &str,
        _date: NaiveDate,
        _analysis: &InventoryAnalysis,
    ) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config: WardsConfig = match std::fs::read_to_string(&cli.config) {
        Ok(raw) => toml::from_str(&raw).with_context(|| "Failed to parse config")?,
        Err(_) => WardsConfig::default(),
    };

    let snapshot_json = if let Some(input_path) = &cli.input {
        std::fs::read_to_string(input_path)
            .with_context(|| format!("Failed to read input: {input_path}"))?
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    };

    let snapshot: Snapshot =
        serde_json::from_str(&snapshot_json).context("Failed to parse snapshot JSON")?;
    let restaurant_id = snapshot.restaurant_id.clone();

    let agent = wards::build_agent(&config);
    let store = Arc::new(SnapshotStore { snapshot });
    let pipeline = Pipeline::new(store, agent);

    let now = Utc::now();
    let report = pipeline
        .run_predictions(&restaurant_id, now)
        .await
        .map_err(|e| anyhow::anyhow!("Prediction run failed: {e}"))?;

    let output_value = if cli.decide {
        let decision = pipeline
            .decide(&restaurant_id, now)
            .await
            .map_err(|e| anyhow::anyhow!("Decision run failed: {e}"))?;
        serde_json::json!({ "report": report, "decision": decision })
    } else {
        serde_json::to_value(&report)?
    };

    let output = if cli.pretty {
        serde_json::to_string_pretty(&output_value)?
    } else {
        serde_json::to_string(&output_value)?
    };
    println!("{output}");

    Ok(())
}
