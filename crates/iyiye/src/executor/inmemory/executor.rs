//! In-memory statement executor and function invoker.
//!
//! Test and local-development doubles behind the same traits as the real
//! backends. Scripted results are consumed in FIFO order; with nothing
//! scripted, a batch yields one empty result set per statement, so list
//! shapes come back as `[]` and single-row shapes as `null`.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use iyiye_core::statement::{
    BatchResult, ExecutionError, FunctionInvoker, StatementBatch, StatementExecutor,
};

/// In-memory executor recording every batch it receives.
#[derive(Debug, Default)]
pub struct InMemoryExecutor {
    responses: Mutex<VecDeque<Result<BatchResult, ExecutionError>>>,
    recorded: Mutex<Vec<StatementBatch>>,
}

impl InMemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the result of the next unscripted batch.
    pub fn push_result(&self, result: Result<BatchResult, ExecutionError>) {
        self.responses
            .lock()
            .expect("executor script lock poisoned")
            .push_back(result);
    }

    /// The batches received so far, in submission order.
    pub fn recorded(&self) -> Vec<StatementBatch> {
        self.recorded
            .lock()
            .expect("executor record lock poisoned")
            .clone()
    }
}

#[async_trait]
impl StatementExecutor for InMemoryExecutor {
    async fn execute_batch(&self, batch: &StatementBatch) -> Result<BatchResult, ExecutionError> {
        self.recorded
            .lock()
            .expect("executor record lock poisoned")
            .push(batch.clone());

        self.responses
            .lock()
            .expect("executor script lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(BatchResult::empty_for(batch.len())))
    }
}

/// Function invoker double returning a fixed response.
#[derive(Debug)]
pub struct MockFunctionInvoker {
    response: Value,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockFunctionInvoker {
    pub fn returning(response: Value) -> Self {
        Self {
            response,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The (function name, payload) pairs received so far.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().expect("invoker lock poisoned").clone()
    }
}

impl Default for MockFunctionInvoker {
    fn default() -> Self {
        Self::returning(Value::Null)
    }
}

#[async_trait]
impl FunctionInvoker for MockFunctionInvoker {
    async fn invoke(&self, function_name: &str, payload: Value) -> Result<Value, ExecutionError> {
        self.calls
            .lock()
            .expect("invoker lock poisoned")
            .push((function_name.to_string(), payload));
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iyiye_core::statement::{BoundStatement, ResultSet, VariableMap};
    use serde_json::json;

    fn batch_of(n: usize) -> StatementBatch {
        StatementBatch::new(
            (0..n)
                .map(|i| BoundStatement::new(format!("Select {i}"), VariableMap::new()))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_unscripted_batch_yields_empty_result_sets() {
        let executor = InMemoryExecutor::new();

        let result = executor.execute_batch(&batch_of(2)).await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.get(1).unwrap().rows.is_empty());
    }

    #[tokio::test]
    async fn test_scripted_results_are_consumed_in_order() {
        let executor = InMemoryExecutor::new();
        executor.push_result(Ok(BatchResult::new(vec![ResultSet::empty()])));

        executor.execute_batch(&batch_of(1)).await.unwrap();
        let second = executor.execute_batch(&batch_of(3)).await.unwrap();

        assert_eq!(second.len(), 3);
        assert_eq!(executor.recorded().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_invoker_records_calls() {
        let invoker = MockFunctionInvoker::returning(json!({"id": "u-1"}));

        let value = invoker
            .invoke("userfn", json!({"arguments": {}}))
            .await
            .unwrap();

        assert_eq!(value, json!({"id": "u-1"}));
        assert_eq!(invoker.calls()[0].0, "userfn");
    }
}
