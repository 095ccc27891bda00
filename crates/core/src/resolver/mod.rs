mod engine;
mod error;
mod http_mapping;
mod registry;
mod shape;
mod template;
mod types;

pub use engine::{EngineBuilder, ResolverEngine};
pub use error::{BatchShapeMismatch, ResolveError, TemplateResolutionError};
pub use http_mapping::resolve_error_to_status_code;
pub use registry::{RegistryBuildError, RegistryBuilder, ResolverBinding, ResolverRegistry};
pub use shape::{shape_response, ShapeSpec};
pub use template::{render_text, ParamSpec, StatementTemplate};
pub use types::{DataSourceKind, Identity, Invocation, OperationKey, RequestContext};
