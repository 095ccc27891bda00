use async_trait::async_trait;
use aws_sdk_dynamodb::Client;

use iyiye_core::resolver::render_text;
use iyiye_core::statement::{
    BatchResult, ExecutionError, ExecutionErrorKind, ResultSet, StatementBatch,
    StatementExecutor,
};

use super::conversions::item_to_row;
use super::error::map_execute_statement_error;

/// Key-value statement executor backed by DynamoDB PartiQL.
///
/// Executes exactly one statement per batch; multi-statement batches
/// against a key-value data source are a registry build error and never
/// reach this adapter in a correctly wired service. PartiQL has no named
/// parameter binding, so the statement text is rendered with its variables
/// substituted before submission.
pub struct DynamoDbExecutor {
    client: Client,
}

impl DynamoDbExecutor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates an executor using the AWS SDK default credential chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl StatementExecutor for DynamoDbExecutor {
    async fn execute_batch(&self, batch: &StatementBatch) -> Result<BatchResult, ExecutionError> {
        let statement = match batch.statements() {
            [statement] => statement,
            _ => {
                return Err(ExecutionError::new(
                    0,
                    ExecutionErrorKind::BadRequest,
                    format!(
                        "key-value backend accepts exactly one statement per batch, got {}",
                        batch.len()
                    ),
                ))
            }
        };

        let text = render_text(statement);
        let output = self
            .client
            .execute_statement()
            .statement(text)
            .send()
            .await
            .map_err(map_execute_statement_error)?;

        let rows = output
            .items
            .unwrap_or_default()
            .iter()
            .map(item_to_row)
            .collect();

        Ok(BatchResult::new(vec![ResultSet::new(rows)]))
    }
}
