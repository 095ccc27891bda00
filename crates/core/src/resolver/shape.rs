//! Response shaping: converting a raw batch result into the API response.
//!
//! Pure functions; no I/O. Shaping never runs against a failed batch — the
//! executor error propagates instead — so these rules only decide how a
//! successful result set becomes a JSON value.

use serde_json::Value;

use super::error::BatchShapeMismatch;
use crate::statement::{BatchResult, ResultSet};

/// How the batch result of an operation becomes its response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeSpec {
    /// All rows of result set 0 as an ordered array; empty array for zero
    /// rows, never `null`.
    List,
    /// First row of result set 0 as an object; `null` for zero rows (the
    /// explicit not-found sentinel), never an error and never `{}`.
    SingleRow,
    /// Single-row rules applied to the result set at `index`; used by
    /// write operations that pair a mutating statement with a trailing
    /// confirmatory select.
    NthStatementResult { index: usize },
}

impl ShapeSpec {
    /// The result-set index this shape reads.
    pub fn result_index(&self) -> usize {
        match self {
            ShapeSpec::List | ShapeSpec::SingleRow => 0,
            ShapeSpec::NthStatementResult { index } => *index,
        }
    }
}

/// Shapes a batch result into the response payload.
///
/// `statement_count` is the number of statements submitted; a result-set
/// count that differs from it is an internal-consistency violation and
/// fails, never truncates.
pub fn shape_response(
    spec: &ShapeSpec,
    result: &BatchResult,
    statement_count: usize,
) -> Result<Value, BatchShapeMismatch> {
    if result.len() != statement_count {
        return Err(BatchShapeMismatch {
            expected: statement_count,
            actual: result.len(),
        });
    }

    let index = spec.result_index();
    let result_set = result.get(index).ok_or(BatchShapeMismatch {
        expected: index + 1,
        actual: result.len(),
    })?;

    Ok(match spec {
        ShapeSpec::List => list(result_set),
        ShapeSpec::SingleRow | ShapeSpec::NthStatementResult { .. } => single_row(result_set),
    })
}

fn list(result_set: &ResultSet) -> Value {
    Value::Array(
        result_set
            .rows
            .iter()
            .map(|row| Value::Object(row.clone()))
            .collect(),
    )
}

fn single_row(result_set: &ResultSet) -> Value {
    match result_set.rows.first() {
        Some(row) => Value::Object(row.clone()),
        None => Value::Null,
    }
}
