//! Error types for operation lookup, input validation and registry construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure raised before an operation handler runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("Unknown tool: {name}")]
    UnknownOperation { name: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl OperationError {
    /// Create an unknown operation error.
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }

    /// The failure kind reported to callers.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::UnknownOperation { .. } => FailureKind::UnknownOperation,
            Self::Validation(_) => FailureKind::Validation,
        }
    }
}

/// An input that violates a declared field contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// Field the violation is reported against.
    pub field: String,
    /// The rule that failed.
    pub rule: ViolatedRule,
    /// Human-readable explanation, naming the field.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, rule: ViolatedRule, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule,
            message: message.into(),
        }
    }
}

/// Field contract rules a validation error can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolatedRule {
    Required,
    Type,
    MinLength,
    Prefix,
    Requires,
}

/// Machine-readable classification of a failed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidDirectory,
    Validation,
    UnknownOperation,
    ExecutionFailure,
    Timeout,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::InvalidDirectory => "invalid_directory",
            FailureKind::Validation => "validation",
            FailureKind::UnknownOperation => "unknown_operation",
            FailureKind::ExecutionFailure => "execution_failure",
            FailureKind::Timeout => "timeout",
        };
        f.write_str(label)
    }
}

/// Errors raised while assembling the operation table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate operation name: {name}")]
    DuplicateOperation { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_displays_its_message() {
        let error = OperationError::from(ValidationError::new(
            "curlInput",
            ViolatedRule::Prefix,
            "curlInput must start with 'curl '",
        ));
        assert_eq!(error.to_string(), "curlInput must start with 'curl '");
        assert_eq!(error.kind(), FailureKind::Validation);
    }

    #[test]
    fn failure_kind_serializes_snake_case() {
        let value = serde_json::to_value(FailureKind::InvalidDirectory).expect("serialize");
        assert_eq!(value, serde_json::json!("invalid_directory"));
        assert_eq!(FailureKind::ExecutionFailure.to_string(), "execution_failure");
    }
}
