use async_trait::async_trait;
use serde_json::Value;

use super::{BatchResult, ExecutionError, StatementBatch};

/// Backend adapter for statement batches.
///
/// Implementations submit all statements of a batch as one atomic unit
/// against the target backend (same transaction/session) and return one
/// result set per statement, index-aligned with the batch. A failure in any
/// statement aborts the whole batch and is reported with the zero-based
/// index of the failing statement. The adapter never interprets statement
/// semantics and never retries.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    async fn execute_batch(&self, batch: &StatementBatch) -> Result<BatchResult, ExecutionError>;
}

/// Adapter for function data sources.
///
/// The business logic behind a function data source lives in an external
/// compute function referenced by name; this core only forwards the request
/// payload and returns the function's JSON response verbatim.
#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    async fn invoke(&self, function_name: &str, payload: Value) -> Result<Value, ExecutionError>;
}
