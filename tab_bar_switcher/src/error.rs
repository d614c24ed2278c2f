//! Switcher error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwitchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unusable response: {0}")]
    Parse(String),

    #[error("DOM error: {0}")]
    Dom(String),

    #[error("History error: {0}")]
    History(String),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),
}
