//! The uniform result shape every operation returns.

use crate::types::FailureKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Outcome of one operation invocation.
///
/// Produced fresh per call and serialized back to the MCP caller as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    pub success: bool,
    /// Captured standard output of a successful run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Failure reason: captured stderr, an error-bearing stdout, or a local diagnosis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FailureKind>,
    /// Echo of the directory the CLI ran in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_dir: Option<String>,
}

impl InvocationResult {
    /// A successful run carrying the captured stdout.
    pub fn succeeded(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            result: Some(stdout.into()),
            ..Default::default()
        }
    }

    /// A failed run of the given kind.
    pub fn failed(kind: FailureKind, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            error_kind: Some(kind),
            ..Default::default()
        }
    }

    /// The result for a working directory that does not exist.
    pub fn invalid_directory(directory: &Path) -> Self {
        Self::failed(
            FailureKind::InvalidDirectory,
            format!("Invalid project directory: {}", directory.display()),
        )
    }

    pub fn with_project_dir(mut self, directory: &Path) -> Self {
        self.project_dir = Some(directory.display().to_string());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_omits_absent_fields() {
        let value = serde_json::to_value(InvocationResult::succeeded("Saved.")).expect("serialize");
        assert_eq!(value, json!({ "success": true, "result": "Saved." }));
    }

    #[test]
    fn invalid_directory_echoes_the_path() {
        let path = Path::new("/does/not/exist");
        let value = serde_json::to_value(InvocationResult::invalid_directory(path).with_project_dir(path)).expect("serialize");
        assert_eq!(
            value,
            json!({
                "success": false,
                "error": "Invalid project directory: /does/not/exist",
                "errorKind": "invalid_directory",
                "projectDir": "/does/not/exist"
            })
        );
    }
}
