//! HTTP function invoker.
//!
//! Function data sources point at compute functions living in separate
//! deployments; this invoker forwards the request payload as a JSON POST
//! to the endpoint configured per data source and returns the response
//! body verbatim.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use iyiye_core::statement::{ExecutionError, ExecutionErrorKind, FunctionInvoker};

pub struct HttpFunctionInvoker {
    client: reqwest::Client,
    endpoints: HashMap<String, String>,
}

impl HttpFunctionInvoker {
    /// `endpoints` maps a function data source name to its HTTP endpoint.
    pub fn new(endpoints: HashMap<String, String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints,
        }
    }
}

#[async_trait]
impl FunctionInvoker for HttpFunctionInvoker {
    async fn invoke(&self, function_name: &str, payload: Value) -> Result<Value, ExecutionError> {
        let endpoint = self.endpoints.get(function_name).ok_or_else(|| {
            ExecutionError::new(
                0,
                ExecutionErrorKind::BadRequest,
                format!("no endpoint configured for function data source '{function_name}'"),
            )
        })?;

        let response = self
            .client
            .post(endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExecutionError::new(
                0,
                ExecutionErrorKind::Backend,
                format!("function '{function_name}' returned {status}: {body}"),
            ));
        }

        response.json().await.map_err(map_reqwest_error)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ExecutionError {
    let kind = if err.is_connect() || err.is_timeout() {
        ExecutionErrorKind::ConnectionFailed
    } else {
        ExecutionErrorKind::Backend
    };
    ExecutionError::new(0, kind, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_function_is_a_bad_request() {
        let invoker = HttpFunctionInvoker::new(HashMap::new());

        let err = invoker.invoke("userfn", Value::Null).await.unwrap_err();

        assert_eq!(err.kind, ExecutionErrorKind::BadRequest);
        assert!(err.message.contains("userfn"));
    }
}
