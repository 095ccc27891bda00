//! The resolver engine: lookup, render, execute, shape.
//!
//! The engine owns the registry plus one executor per statement-backed
//! data source and one invoker per function data source. Everything is
//! read-only after construction and shared across concurrent requests.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::error::ResolveError;
use super::registry::{RegistryBuildError, ResolverBinding, ResolverRegistry};
use super::shape::shape_response;
use super::template::StatementTemplate;
use super::types::{DataSourceKind, Invocation, RequestContext};
use crate::statement::{FunctionInvoker, StatementBatch, StatementExecutor};

/// Wires executors and invokers onto a validated registry.
pub struct EngineBuilder {
    registry: ResolverRegistry,
    executors: HashMap<String, Arc<dyn StatementExecutor>>,
    invokers: HashMap<String, Arc<dyn FunctionInvoker>>,
}

impl EngineBuilder {
    pub fn new(registry: ResolverRegistry) -> Self {
        Self {
            registry,
            executors: HashMap::new(),
            invokers: HashMap::new(),
        }
    }

    /// Backs a relational or key-value data source with an executor.
    pub fn executor(mut self, data_source: impl Into<String>, executor: Arc<dyn StatementExecutor>) -> Self {
        self.executors.insert(data_source.into(), executor);
        self
    }

    /// Backs a function data source with an invoker.
    pub fn function_invoker(
        mut self,
        data_source: impl Into<String>,
        invoker: Arc<dyn FunctionInvoker>,
    ) -> Self {
        self.invokers.insert(data_source.into(), invoker);
        self
    }

    /// Verifies every registered data source has a backing implementation.
    pub fn finish(self) -> Result<ResolverEngine, RegistryBuildError> {
        for name in self.registry.data_source_names() {
            let backed = match self.registry.data_source_kind(name) {
                Some(DataSourceKind::Function) => self.invokers.contains_key(name),
                Some(_) => self.executors.contains_key(name),
                None => false,
            };
            if !backed {
                return Err(RegistryBuildError::MissingExecutor {
                    data_source: name.to_string(),
                });
            }
        }

        Ok(ResolverEngine {
            registry: self.registry,
            executors: self.executors,
            invokers: self.invokers,
        })
    }
}

/// Resolves operation invocations against the registered bindings.
pub struct ResolverEngine {
    registry: ResolverRegistry,
    executors: HashMap<String, Arc<dyn StatementExecutor>>,
    invokers: HashMap<String, Arc<dyn FunctionInvoker>>,
}

impl std::fmt::Debug for ResolverEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverEngine")
            .field("registry", &self.registry)
            .field("executors", &self.executors.keys().collect::<Vec<_>>())
            .field("invokers", &self.invokers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ResolverEngine {
    pub fn builder(registry: ResolverRegistry) -> EngineBuilder {
        EngineBuilder::new(registry)
    }

    pub fn registry(&self) -> &ResolverRegistry {
        &self.registry
    }

    /// Resolves one invocation to its JSON response payload.
    pub async fn resolve(&self, invocation: Invocation) -> Result<Value, ResolveError> {
        let key = invocation.operation_key();
        let binding =
            self.registry
                .lookup(&key)
                .ok_or_else(|| ResolveError::ResolverNotFound {
                    type_name: invocation.type_name.clone(),
                    field_name: invocation.field_name.clone(),
                })?;
        let ctx = RequestContext::from(invocation);

        match binding {
            ResolverBinding::Function { data_source } => {
                let invoker = self
                    .invokers
                    .get(data_source)
                    .expect("validated at engine build");
                tracing::debug!(operation = %key, data_source = %data_source, "forwarding to function");
                let payload = function_payload(&ctx);
                Ok(invoker.invoke(data_source, payload).await?)
            }
            ResolverBinding::Statement {
                data_source,
                templates,
                shape,
            } => {
                let executor = self
                    .executors
                    .get(data_source)
                    .expect("validated at engine build");
                let batch = bind_batch(templates, &ctx)?;
                tracing::debug!(
                    operation = %key,
                    data_source = %data_source,
                    statements = batch.len(),
                    "executing statement batch"
                );
                let result = executor.execute_batch(&batch).await.map_err(|e| {
                    tracing::warn!(operation = %key, error = %e, "statement batch failed");
                    e
                })?;
                Ok(shape_response(shape, &result, batch.len())?)
            }
        }
    }
}

fn bind_batch(
    templates: &[StatementTemplate],
    ctx: &RequestContext,
) -> Result<StatementBatch, ResolveError> {
    let statements = templates
        .iter()
        .map(|template| template.bind(ctx))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(StatementBatch::new(statements))
}

/// The payload forwarded to a function data source: caller arguments plus
/// the parent object and principal, mirroring the statement-side context.
fn function_payload(ctx: &RequestContext) -> Value {
    let mut payload = Map::new();
    payload.insert(
        "arguments".to_string(),
        Value::Object(ctx.arguments.clone()),
    );
    if let Some(source) = &ctx.source {
        payload.insert("source".to_string(), Value::Object(source.clone()));
    }
    if let Some(identity) = &ctx.identity {
        payload.insert(
            "identity".to_string(),
            serde_json::to_value(identity).unwrap_or(Value::Null),
        );
    }
    Value::Object(payload)
}
