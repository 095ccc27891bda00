use thiserror::Error;

use crate::statement::ExecutionError;

/// A placeholder could not be resolved from the request context.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateResolutionError {
    /// A documented caller argument is missing; a client input error.
    #[error("missing required argument for placeholder :{0}")]
    MissingArgument(String),
    /// The statement text references a placeholder with no declared
    /// binding; an internal template defect, not a caller mistake.
    #[error("placeholder :{0} has no declared binding")]
    UndeclaredPlaceholder(String),
}

impl TemplateResolutionError {
    pub fn placeholder(&self) -> &str {
        match self {
            TemplateResolutionError::MissingArgument(name)
            | TemplateResolutionError::UndeclaredPlaceholder(name) => name,
        }
    }

    /// True when the missing key is a documented caller argument (surfaced
    /// as a client error) rather than an internal template bug.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TemplateResolutionError::MissingArgument(_))
    }
}

/// The backend returned a different number of result sets than statements
/// submitted. A fatal internal-consistency violation; the response shaper
/// fails rather than guessing which result set belongs to which statement.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("batch produced {actual} result sets, expected {expected}")]
pub struct BatchShapeMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// Everything that can go wrong while resolving one operation.
///
/// `ResolverNotFound` is a configuration/deployment defect and must stay
/// distinguishable from a data-level "not found", which is a successful
/// `null` response.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    #[error(transparent)]
    Template(#[from] TemplateResolutionError),

    #[error("no resolver registered for operation {type_name}.{field_name}")]
    ResolverNotFound {
        type_name: String,
        field_name: String,
    },

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Shape(#[from] BatchShapeMismatch),
}

impl ResolveError {
    /// Stable error classification for the wire, so callers can branch
    /// without parsing message text.
    pub fn error_type(&self) -> &'static str {
        match self {
            ResolveError::Template(_) => "TemplateResolutionError",
            ResolveError::ResolverNotFound { .. } => "ResolverNotFoundError",
            ResolveError::Execution(_) => "ExecutionError",
            ResolveError::Shape(_) => "BatchShapeMismatch",
        }
    }
}
