//! The built-in operations: `tc_help`, `tc_debug` and `tc_curl`.

use crate::adapter::{CommandAdapter, RecordRequest};
use crate::registry::OperationContract;
use crate::registry::contract::{CrossFieldRule, FieldSpec, InputSchema, ValidatedInput};
use crate::types::{FailureKind, InvocationResult};
use std::path::Path;
use std::sync::Arc;

pub const TC_HELP: &str = "tc_help";
pub const TC_DEBUG: &str = "tc_debug";
pub const TC_CURL: &str = "tc_curl";

pub const PROJECT_DIR: &str = "projectDir";
pub const CURL_INPUT: &str = "curlInput";
pub const NAME: &str = "name";
pub const COLLECTION: &str = "collection";
pub const FOLDER: &str = "folder";

const CURL_PREFIX: &str = "curl ";

const PROJECT_DIR_DESCRIPTION: &str =
    "Full absolute path to the current project directory. Do not use \".\" or \"/\".";

/// Adapts validated input into one adapter call.
#[async_trait::async_trait]
pub trait OperationHandler: Send + Sync {
    async fn handle(&self, adapter: &dyn CommandAdapter, input: ValidatedInput) -> InvocationResult;
}

/// The operations every server exposes, in advertised order.
pub fn builtin_contracts() -> Vec<OperationContract> {
    vec![
        OperationContract::new(
            TC_HELP,
            "Show Thunder Client CLI help using `tc --help` in the given project directory. Useful when the user wants to know the available Thunder Client CLI commands.",
            project_dir_schema(),
            Arc::new(CliFlagOperation::Help),
        ),
        OperationContract::new(
            TC_DEBUG,
            "Run the Thunder Client CLI in debug mode using `tc --debug` in the given project directory. Helpful for diagnosing issues with the Thunder Client CLI.",
            project_dir_schema(),
            Arc::new(CliFlagOperation::Debug),
        ),
        OperationContract::new(
            TC_CURL,
            "Run a full curl command via the Thunder Client CLI to save the request into the Thunder Client VS Code extension, optionally into a collection or a folder of a collection.
Instructions:
  - \"curlInput\" must be a valid curl command string that starts with \"curl \".
  - Example: \"curlInput\": \"curl -X POST https://jsonplaceholder.typicode.com/posts -H 'Content-Type: application/json' -d '{\\\"title\\\":\\\"foo\\\",\\\"userId\\\":1}'\"
  - \"projectDir\" must be the full absolute path to the current project directory; do not use \".\" or \"/\".
  - If \"folder\" is specified, you must also provide the \"collection\" field.
  - Existing collections can be found under the \"thunder-tests\" folder of the project.",
            record_request_schema(),
            Arc::new(RecordRequestOperation),
        ),
    ]
}

fn project_dir_schema() -> InputSchema {
    InputSchema::new().field(FieldSpec::path(PROJECT_DIR, PROJECT_DIR_DESCRIPTION).required())
}

fn record_request_schema() -> InputSchema {
    InputSchema::new()
        .field(
            FieldSpec::text(CURL_INPUT, "Complete curl command, starting with \"curl \".")
                .required()
                .prefix_ignore_case(CURL_PREFIX)
                .min_length(5),
        )
        .field(FieldSpec::text(NAME, "Name of the saved request.").required().min_length(2))
        .field(FieldSpec::text(COLLECTION, "Collection to save the request into."))
        .field(FieldSpec::text(FOLDER, "Folder inside the collection. Requires \"collection\"."))
        .field(FieldSpec::path(PROJECT_DIR, PROJECT_DIR_DESCRIPTION).required())
        .rule(CrossFieldRule::Requires {
            field: FOLDER,
            requires: COLLECTION,
            message: "If 'folder' is provided, you must also provide 'collection'.",
        })
}

/// `tc_help` / `tc_debug`: run the CLI with a single flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliFlagOperation {
    Help,
    Debug,
}

#[async_trait::async_trait]
impl OperationHandler for CliFlagOperation {
    async fn handle(&self, adapter: &dyn CommandAdapter, input: ValidatedInput) -> InvocationResult {
        let directory = match checked_directory(adapter, &input) {
            Ok(directory) => directory,
            Err(result) => return result,
        };

        let command = match self {
            CliFlagOperation::Help => adapter.commands().help(),
            CliFlagOperation::Debug => adapter.commands().debug(),
        };
        adapter.execute(&command, directory).await.with_project_dir(directory)
    }
}

/// `tc_curl`: record a curl request into Thunder Client.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordRequestOperation;

#[async_trait::async_trait]
impl OperationHandler for RecordRequestOperation {
    async fn handle(&self, adapter: &dyn CommandAdapter, input: ValidatedInput) -> InvocationResult {
        let directory = match checked_directory(adapter, &input) {
            Ok(directory) => directory,
            Err(result) => return result,
        };
        let curl_input = match input.require_text(CURL_INPUT) {
            Ok(curl_input) => curl_input,
            Err(error) => return InvocationResult::failed(FailureKind::Validation, error.to_string()),
        };

        let request = RecordRequest {
            curl_args: strip_curl_prefix(curl_input),
            name: input.text(NAME),
            collection: input.text(COLLECTION),
            folder: input.text(FOLDER),
        };
        let command = adapter.commands().build_record(&request);
        tracing::debug!(command = %command, "built record command");
        adapter.execute(&command, directory).await
    }
}

/// The project directory, or the result to return when it cannot be used.
fn checked_directory<'a>(adapter: &dyn CommandAdapter, input: &'a ValidatedInput) -> Result<&'a Path, InvocationResult> {
    let directory = input
        .require_path(PROJECT_DIR)
        .map_err(|error| InvocationResult::failed(FailureKind::Validation, error.to_string()))?;
    if !adapter.check_directory(directory) {
        tracing::info!(directory = %directory.display(), "project directory does not exist");
        return Err(InvocationResult::invalid_directory(directory).with_project_dir(directory));
    }
    Ok(directory)
}

/// Drops the leading `curl ` token (any case) and surrounding whitespace.
fn strip_curl_prefix(curl_input: &str) -> &str {
    let trimmed = curl_input.trim();
    match trimmed.get(..CURL_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(CURL_PREFIX) => trimmed[CURL_PREFIX.len()..].trim(),
        _ => trimmed,
    }
}
