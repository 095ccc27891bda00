//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to the `ExecutionError` taxonomy from
//! `iyiye_core::statement`. Key-value batches hold a single statement, so
//! the failing index is always 0.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::execute_statement::ExecuteStatementError;

use iyiye_core::statement::{ExecutionError, ExecutionErrorKind};

/// Map an ExecuteStatement SDK error to ExecutionError.
pub fn map_execute_statement_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ExecuteStatementError, R>,
) -> ExecutionError {
    match err.into_service_error() {
        ExecuteStatementError::ConditionalCheckFailedException(e) => constraint(
            e.message().unwrap_or("conditional check failed").to_string(),
        ),
        ExecuteStatementError::DuplicateItemException(e) => {
            constraint(e.message().unwrap_or("duplicate item").to_string())
        }
        ExecuteStatementError::ResourceNotFoundException(_) => {
            backend("table not found".to_string())
        }
        ExecuteStatementError::ProvisionedThroughputExceededException(_) => {
            backend("throughput exceeded, please retry".to_string())
        }
        ExecuteStatementError::RequestLimitExceeded(_) => {
            backend("request limit exceeded, please retry".to_string())
        }
        ExecuteStatementError::TransactionConflictException(_) => {
            backend("transaction conflict, please retry".to_string())
        }
        ExecuteStatementError::ItemCollectionSizeLimitExceededException(_) => {
            backend("item collection size limit exceeded".to_string())
        }
        ExecuteStatementError::InternalServerError(_) => {
            backend("DynamoDB internal server error".to_string())
        }
        err => backend(format!("ExecuteStatement failed: {err:?}")),
    }
}

fn constraint(message: String) -> ExecutionError {
    ExecutionError::new(0, ExecutionErrorKind::ConstraintViolation, message)
}

fn backend(message: String) -> ExecutionError {
    ExecutionError::new(0, ExecutionErrorKind::Backend, message)
}
