//! Pure functions for mapping resolve errors to HTTP status codes.
//!
//! A data-level "not found" is a successful `null` response and never goes
//! through this mapping; only structured failures do.

use super::error::{ResolveError, TemplateResolutionError};
use crate::statement::ExecutionErrorKind;

/// Maps a [`ResolveError`] to an HTTP status code.
///
/// - missing documented argument -> 400 (Bad Request)
/// - undeclared placeholder (template defect) -> 500 (Internal Server Error)
/// - unregistered operation -> 404 (Not Found)
/// - backend `BadRequest` -> 400, `ConstraintViolation` -> 409,
///   `ConnectionFailed` -> 503, `Backend` -> 502
/// - result-set count mismatch -> 500
pub fn resolve_error_to_status_code(error: &ResolveError) -> u16 {
    match error {
        ResolveError::Template(TemplateResolutionError::MissingArgument(_)) => 400,
        ResolveError::Template(TemplateResolutionError::UndeclaredPlaceholder(_)) => 500,
        ResolveError::ResolverNotFound { .. } => 404,
        ResolveError::Execution(e) => match e.kind {
            ExecutionErrorKind::BadRequest => 400,
            ExecutionErrorKind::ConstraintViolation => 409,
            ExecutionErrorKind::ConnectionFailed => 503,
            ExecutionErrorKind::Backend => 502,
        },
        ResolveError::Shape(_) => 500,
    }
}
