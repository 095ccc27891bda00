mod error;
mod traits;
mod types;

pub use error::{ExecutionError, ExecutionErrorKind};
pub use traits::{FunctionInvoker, StatementExecutor};
pub use types::{BatchResult, BoundStatement, ResultSet, Row, StatementBatch, VariableMap};
