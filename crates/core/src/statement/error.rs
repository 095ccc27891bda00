use thiserror::Error;

/// Coarse classification of a backend failure, used to map the error onto
/// the HTTP surface without parsing backend-specific message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionErrorKind {
    /// The statement itself was rejected (syntax, unknown column,
    /// unresolvable parameter).
    BadRequest,
    /// A uniqueness/foreign-key/conditional check failed.
    ConstraintViolation,
    /// The backend could not be reached or the connection was lost.
    ConnectionFailed,
    /// Any other backend-side failure.
    Backend,
}

impl ExecutionErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionErrorKind::BadRequest => "bad request",
            ExecutionErrorKind::ConstraintViolation => "constraint violation",
            ExecutionErrorKind::ConnectionFailed => "connection failed",
            ExecutionErrorKind::Backend => "backend failure",
        }
    }
}

impl std::fmt::Display for ExecutionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A backend rejected or failed a statement.
///
/// `statement_index` is the zero-based index of the failing statement in
/// the submitted batch. The message is propagated verbatim from the
/// backend; this core never retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("statement {statement_index} failed ({kind}): {message}")]
pub struct ExecutionError {
    pub statement_index: usize,
    pub kind: ExecutionErrorKind,
    pub message: String,
}

impl ExecutionError {
    pub fn new(
        statement_index: usize,
        kind: ExecutionErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            statement_index,
            kind,
            message: message.into(),
        }
    }
}
