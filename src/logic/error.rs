//! Error types for building and locally evaluating logic expressions.

use thiserror::Error;

/// Errors that can occur while constructing, mutating or evaluating a node
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LogicError {
    /// Malformed construction input
    #[error("Invalid node construction: {0}")]
    Construction(String),

    /// The node kind has no local evaluation
    #[error("Operator '{operator}' cannot be evaluated locally")]
    NotSelfEvaluating { operator: String },

    /// A setter was applied to a node kind without the matching operand slot
    #[error("Operator '{operator}' does not support {operation}")]
    UnsupportedMutation { operator: String, operation: String },
}

impl LogicError {
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }
}

/// Result type for logic operations
pub type LogicResult<T> = Result<T, LogicError>;
