//! Translation error types.

use thiserror::Error;

use crate::logic::LogicError;

/// Errors that can occur while translating constraints
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Unsupported operator '{operator}' in constraint '{constraint}'")]
    UnsupportedOperator { constraint: String, operator: String },

    #[error("Constraint '{name}' cannot be expressed as logic")]
    UnsupportedConstraint { name: String },

    #[error("Constraint '{constraint}' is missing argument {position}")]
    MissingArgument { constraint: String, position: usize },

    #[error("Invalid argument for constraint '{constraint}': {reason}")]
    InvalidArgument { constraint: String, reason: String },

    #[error("Invalid constraint table: {0}")]
    InvalidTable(String),

    #[error(transparent)]
    Logic(#[from] LogicError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for translation
pub type TranslateResult<T> = Result<T, TranslateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TranslateError::UnsupportedOperator {
            constraint: "comparison".to_string(),
            operator: "<>".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported operator '<>' in constraint 'comparison'"
        );

        let err = TranslateError::UnsupportedConstraint {
            name: "email".to_string(),
        };
        assert_eq!(err.to_string(), "Constraint 'email' cannot be expressed as logic");

        let err = TranslateError::MissingArgument {
            constraint: "minLength".to_string(),
            position: 0,
        };
        assert_eq!(err.to_string(), "Constraint 'minLength' is missing argument 0");

        let err = TranslateError::from(LogicError::construction("bad"));
        assert_eq!(err.to_string(), "Invalid node construction: bad");
    }
}
