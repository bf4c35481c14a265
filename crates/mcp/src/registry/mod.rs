//! Operation registry: name → input contract → handler.

pub mod contract;
pub mod operations;
mod schema;

pub use contract::{CrossFieldRule, FieldKind, FieldRule, FieldSpec, InputSchema, ValidatedInput};
pub use operations::{OperationHandler, TC_CURL, TC_DEBUG, TC_HELP, builtin_contracts};
pub use schema::to_json_schema;

use crate::adapter::CommandAdapter;
use crate::types::{InvocationResult, OperationError, RegistryError};
use indexmap::IndexMap;
use rmcp::model::JsonObject;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// A named operation with its input contract and handler.
#[derive(Clone)]
pub struct OperationContract {
    name: &'static str,
    description: &'static str,
    schema: InputSchema,
    handler: Arc<dyn OperationHandler>,
}

impl OperationContract {
    pub fn new(
        name: &'static str,
        description: &'static str,
        schema: InputSchema,
        handler: Arc<dyn OperationHandler>,
    ) -> Self {
        Self {
            name,
            description,
            schema,
            handler,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn schema(&self) -> &InputSchema {
        &self.schema
    }

    pub fn summary(&self) -> OperationSummary {
        OperationSummary {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: to_json_schema(&self.schema),
        }
    }
}

impl std::fmt::Debug for OperationContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationContract")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// What `list` reports for one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSummary {
    pub name: String,
    pub description: String,
    pub input_schema: JsonObject,
}

/// Immutable after construction; safe to share across concurrent invocations.
pub struct OperationRegistry {
    contracts: IndexMap<&'static str, OperationContract>,
    adapter: Arc<dyn CommandAdapter>,
}

impl OperationRegistry {
    /// Register `contracts` in order, rejecting duplicate names.
    pub fn new(
        contracts: impl IntoIterator<Item = OperationContract>,
        adapter: Arc<dyn CommandAdapter>,
    ) -> Result<Self, RegistryError> {
        let mut registered = IndexMap::new();
        for contract in contracts {
            if registered.contains_key(contract.name) {
                return Err(RegistryError::DuplicateOperation {
                    name: contract.name.to_string(),
                });
            }
            registered.insert(contract.name, contract);
        }
        Ok(Self {
            contracts: registered,
            adapter,
        })
    }

    /// The registry with `tc_help`, `tc_debug` and `tc_curl`.
    pub fn builtin(adapter: Arc<dyn CommandAdapter>) -> Result<Self, RegistryError> {
        Self::new(builtin_contracts(), adapter)
    }

    /// Every registered operation, in registration order.
    pub fn list(&self) -> Vec<OperationSummary> {
        self.contracts.values().map(OperationContract::summary).collect()
    }

    pub fn get(&self, name: &str) -> Option<&OperationContract> {
        self.contracts.get(name)
    }

    /// Look up, validate, then hand off to the operation's handler.
    ///
    /// Unknown names and contract violations are errors and never reach the
    /// adapter. Everything past validation is reported in the returned
    /// [`InvocationResult`].
    pub async fn invoke(
        &self,
        name: &str,
        arguments: Option<&Map<String, Value>>,
    ) -> Result<InvocationResult, OperationError> {
        let contract = self.get(name).ok_or_else(|| OperationError::unknown_operation(name))?;
        let input = contract.schema.validate(arguments).map_err(|error| {
            tracing::debug!(operation = name, field = %error.field, rule = ?error.rule, "input rejected");
            error
        })?;

        tracing::debug!(operation = name, "invoking operation");
        let result = contract.handler.handle(self.adapter.as_ref(), input).await;
        tracing::debug!(operation = name, success = result.success, "operation finished");
        Ok(result)
    }
}

impl std::fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("operations", &self.contracts.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
