use async_trait::async_trait;
use tokio_rusqlite::Connection;

use iyiye_core::statement::{
    BatchResult, BoundStatement, ExecutionError, ResultSet, Row, StatementBatch,
    StatementExecutor,
};

use super::conversions::{column_value_to_json, SqlParam};
use super::error::{map_connection_error, map_rusqlite_error};

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Relational statement executor backed by SQLite.
///
/// Each batch runs inside one transaction: statements execute sequentially
/// in submission order, a failure in any statement rolls the whole batch
/// back, and the error carries the failing statement's index. Named
/// `:NAME` parameters bind through rusqlite's native support, so statement
/// text never has values spliced into it.
pub struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    /// Opens a file-based database, creating it and running `schema_sql`
    /// if needed.
    pub async fn open(path: &str, schema_sql: &str) -> anyhow::Result<Self> {
        let conn = Connection::open(path.to_string()).await?;
        Self::init_schema(&conn, schema_sql).await?;
        Ok(Self { conn })
    }

    /// Opens an in-memory database. Useful for testing - data is lost when
    /// the connection is dropped.
    pub async fn open_in_memory(schema_sql: &str) -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init_schema(&conn, schema_sql).await?;
        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection, schema_sql: &str) -> anyhow::Result<()> {
        let schema_sql = schema_sql.to_string();
        conn.call(move |conn| {
            conn.execute_batch(&schema_sql).map_err(wrap_err)?;
            Ok(())
        })
        .await?;
        Ok(())
    }
}

#[async_trait]
impl StatementExecutor for SqliteExecutor {
    async fn execute_batch(&self, batch: &StatementBatch) -> Result<BatchResult, ExecutionError> {
        let batch = batch.clone();

        self.conn
            .call(move |conn| Ok(run_batch(conn, &batch)))
            .await
            .map_err(map_connection_error)?
    }
}

/// Runs a whole batch inside one transaction. The transaction rolls back
/// on drop unless every statement succeeded and the commit went through.
fn run_batch(
    conn: &mut rusqlite::Connection,
    batch: &StatementBatch,
) -> Result<BatchResult, ExecutionError> {
    let tx = conn
        .transaction()
        .map_err(|e| map_rusqlite_error(&e, 0))?;

    let mut result_sets = Vec::with_capacity(batch.len());
    for (index, statement) in batch.iter().enumerate() {
        let result_set =
            run_statement(&tx, statement).map_err(|e| map_rusqlite_error(&e, index))?;
        result_sets.push(result_set);
    }

    tx.commit()
        .map_err(|e| map_rusqlite_error(&e, batch.len().saturating_sub(1)))?;

    Ok(BatchResult::new(result_sets))
}

fn run_statement(
    tx: &rusqlite::Transaction<'_>,
    statement: &BoundStatement,
) -> rusqlite::Result<ResultSet> {
    let mut stmt = tx.prepare(&statement.text)?;

    for (name, value) in &statement.variables {
        if let Some(index) = stmt.parameter_index(&format!(":{name}"))? {
            stmt.raw_bind_parameter(index, SqlParam(value))?;
        }
    }

    // Row-less statements (INSERT, UPDATE, DELETE) contribute an empty
    // result set to keep the batch index-aligned.
    if stmt.column_count() == 0 {
        stmt.raw_execute()?;
        return Ok(ResultSet::empty());
    }

    let column_names: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut rows = stmt.raw_query();
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut object = Row::new();
        for (i, name) in column_names.iter().enumerate() {
            object.insert(name.clone(), column_value_to_json(row.get_ref(i)?));
        }
        out.push(object);
    }

    Ok(ResultSet::new(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use iyiye_core::statement::{ExecutionErrorKind, VariableMap};
    use serde_json::json;

    const TEST_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY,
    owner TEXT NOT NULL,
    body TEXT
);
"#;

    fn statement(text: &str, variables: &[(&str, serde_json::Value)]) -> BoundStatement {
        let mut map = VariableMap::new();
        for (name, value) in variables {
            map.insert((*name).to_string(), value.clone());
        }
        BoundStatement::new(text, map)
    }

    #[tokio::test]
    async fn test_insert_then_select_reads_result_at_index_one() {
        let executor = SqliteExecutor::open_in_memory(TEST_SCHEMA).await.unwrap();

        let batch = StatementBatch::new(vec![
            statement(
                "Insert Into notes (id, owner, body) Values (:ID, :OWNER, :BODY)",
                &[("ID", json!(1)), ("OWNER", json!("alice")), ("BODY", json!("hi"))],
            ),
            statement(
                "Select id, owner, body From notes Where owner = :OWNER",
                &[("OWNER", json!("alice"))],
            ),
        ]);

        let result = executor.execute_batch(&batch).await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.get(0).unwrap().rows.is_empty());
        let row = &result.get(1).unwrap().rows[0];
        assert_eq!(row["id"], json!(1));
        assert_eq!(row["owner"], json!("alice"));
        assert_eq!(row["body"], json!("hi"));
    }

    #[tokio::test]
    async fn test_failing_statement_reports_its_index_and_rolls_back() {
        let executor = SqliteExecutor::open_in_memory(TEST_SCHEMA).await.unwrap();

        let batch = StatementBatch::new(vec![
            statement(
                "Insert Into notes (id, owner) Values (:ID, :OWNER)",
                &[("ID", json!(1)), ("OWNER", json!("alice"))],
            ),
            // Duplicate primary key fails the batch at index 1.
            statement(
                "Insert Into notes (id, owner) Values (:ID, :OWNER)",
                &[("ID", json!(1)), ("OWNER", json!("bob"))],
            ),
        ]);

        let err = executor.execute_batch(&batch).await.unwrap_err();
        assert_eq!(err.statement_index, 1);
        assert_eq!(err.kind, ExecutionErrorKind::ConstraintViolation);

        // The first insert must not survive the rollback.
        let check = StatementBatch::new(vec![statement("Select id From notes", &[])]);
        let result = executor.execute_batch(&check).await.unwrap();
        assert!(result.get(0).unwrap().rows.is_empty());
    }

    #[tokio::test]
    async fn test_zero_row_select_yields_empty_result_set() {
        let executor = SqliteExecutor::open_in_memory(TEST_SCHEMA).await.unwrap();

        let batch = StatementBatch::new(vec![statement(
            "Select id From notes Where owner = :OWNER",
            &[("OWNER", json!("nobody"))],
        )]);

        let result = executor.execute_batch(&batch).await.unwrap();
        assert_eq!(result.len(), 1);
        assert!(result.get(0).unwrap().rows.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_sql_maps_to_bad_request() {
        let executor = SqliteExecutor::open_in_memory(TEST_SCHEMA).await.unwrap();

        let batch = StatementBatch::new(vec![statement("Select banana From", &[])]);

        let err = executor.execute_batch(&batch).await.unwrap_err();
        assert_eq!(err.statement_index, 0);
        assert_eq!(err.kind, ExecutionErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn test_column_aliases_become_row_keys() {
        let executor = SqliteExecutor::open_in_memory(TEST_SCHEMA).await.unwrap();

        let batch = StatementBatch::new(vec![
            statement(
                "Insert Into notes (id, owner) Values (1, 'alice')",
                &[],
            ),
            statement("Select owner As receiverUsername From notes", &[]),
        ]);

        let result = executor.execute_batch(&batch).await.unwrap();
        assert_eq!(
            result.get(1).unwrap().rows[0]["receiverUsername"],
            json!("alice")
        );
    }
}
