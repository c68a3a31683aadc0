pub mod cli_reasoning;
pub mod decision;
pub mod error;
pub mod messages;
pub mod parser;
pub mod prompts;
pub mod reasoning;
pub mod test_support;
pub mod tools;

pub use cli_reasoning::{check_cli_available, CliReasoning, CliReasoningConfig};
pub use decision::DecisionAgent;
pub use error::AgentError;
pub use messages::{generate_campaign_message, CampaignMessageInput};
pub use reasoning::ReasoningClient;
