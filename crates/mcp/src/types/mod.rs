pub mod errors;
pub mod result;

pub use errors::{FailureKind, OperationError, RegistryError, ValidationError, ViolatedRule};
pub use result::InvocationResult;
