//! Error types for the Aries core

use thiserror::Error;

/// Aries core error type
#[derive(Error, Debug)]
pub enum AriesError {
    /// An object reached the descriptor without both edges set.
    #[error("Object edges not set (right: {right_edge:?}, left: {left_edge:?}), cannot describe")]
    IncompleteObject {
        right_edge: Option<usize>,
        left_edge: Option<usize>,
    },

    #[error("Degenerate scan: {0}")]
    DegenerateScan(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    #[error("Actuator error: {0}")]
    Actuator(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for AriesError {
    fn from(e: toml::de::Error) -> Self {
        AriesError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AriesError>;
