pub mod config;
pub mod error;
pub mod types;

pub use config::RulesConfig;
pub use error::{GameError, Result};
