pub mod analyzer;
pub mod error;
pub mod predictor;
pub mod rates;

pub use analyzer::InventoryAnalyzer;
pub use error::EngineError;
pub use predictor::WastePredictor;
