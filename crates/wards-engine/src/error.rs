use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no inventory items to analyze")]
    EmptyInventory,
}
