use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Resolved variables for one statement, keyed by bare placeholder name
/// (no `:` prefix). Ordered for deterministic iteration.
pub type VariableMap = BTreeMap<String, Value>;

/// One row of a result set, keyed by column name.
pub type Row = serde_json::Map<String, Value>;

/// A statement whose placeholders have been resolved against a request.
///
/// `text` keeps the `:NAME` markers so that backends with native named
/// parameter support can bind `variables` directly; backends that accept
/// only raw statement text render the pair with
/// [`crate::resolver::StatementTemplate::render_text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundStatement {
    pub text: String,
    pub variables: VariableMap,
}

impl BoundStatement {
    pub fn new(text: impl Into<String>, variables: VariableMap) -> Self {
        Self {
            text: text.into(),
            variables,
        }
    }
}

/// An ordered batch of statements executed as one atomic unit.
///
/// Insertion order is execution order: an INSERT always runs before the
/// SELECT that reads the just-inserted row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementBatch {
    statements: Vec<BoundStatement>,
}

impl StatementBatch {
    pub fn new(statements: Vec<BoundStatement>) -> Self {
        Self { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn statements(&self) -> &[BoundStatement] {
        &self.statements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BoundStatement> {
        self.statements.iter()
    }
}

/// The rows produced by a single statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Result set of a statement that returns no rows (INSERT, UPDATE).
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Result sets for a whole batch, index-aligned with the submitted
/// statements: the result of statement `i` is always at index `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    result_sets: Vec<ResultSet>,
}

impl BatchResult {
    pub fn new(result_sets: Vec<ResultSet>) -> Self {
        Self { result_sets }
    }

    /// One empty result set per statement; the neutral response for
    /// backends that executed a batch of row-less statements.
    pub fn empty_for(statement_count: usize) -> Self {
        Self {
            result_sets: vec![ResultSet::empty(); statement_count],
        }
    }

    pub fn len(&self) -> usize {
        self.result_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.result_sets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ResultSet> {
        self.result_sets.get(index)
    }
}
