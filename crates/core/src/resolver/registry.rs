//! The resolver registry: the composition root mapping operations to
//! bindings.
//!
//! Built once at startup through [`RegistryBuilder`], validated in full at
//! build time, immutable afterwards. Lookups are read-only and safe for
//! concurrent access from any number of in-flight requests.

use std::collections::HashMap;

use thiserror::Error;

use super::shape::ShapeSpec;
use super::template::StatementTemplate;
use super::types::{DataSourceKind, OperationKey};

/// The binding behind one operation, created at registry build time and
/// immutable thereafter.
#[derive(Debug, Clone)]
pub enum ResolverBinding {
    /// Statement-backed operation: an ordered template batch against a
    /// relational or key-value data source, plus the response shape.
    Statement {
        data_source: String,
        templates: Vec<StatementTemplate>,
        shape: ShapeSpec,
    },
    /// Forwarded operation: the named function data source receives the
    /// request payload and its JSON response passes through verbatim.
    Function { data_source: String },
}

impl ResolverBinding {
    pub fn statement(
        data_source: impl Into<String>,
        templates: Vec<StatementTemplate>,
        shape: ShapeSpec,
    ) -> Self {
        ResolverBinding::Statement {
            data_source: data_source.into(),
            templates,
            shape,
        }
    }

    pub fn function(data_source: impl Into<String>) -> Self {
        ResolverBinding::Function {
            data_source: data_source.into(),
        }
    }

    pub fn data_source(&self) -> &str {
        match self {
            ResolverBinding::Statement { data_source, .. }
            | ResolverBinding::Function { data_source } => data_source,
        }
    }
}

/// Build-time validation failures. Any of these aborts startup; none of
/// them can surface at request time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryBuildError {
    #[error("operation {0} is bound more than once")]
    DuplicateOperation(OperationKey),

    #[error("operation {operation} references unknown data source '{data_source}'")]
    UnknownDataSource {
        operation: OperationKey,
        data_source: String,
    },

    #[error("operation {operation} has no statement templates")]
    EmptyBatch { operation: OperationKey },

    #[error(
        "operation {operation}: statement {statement_index} references \
         placeholder :{placeholder} without a declared binding"
    )]
    UndeclaredPlaceholder {
        operation: OperationKey,
        statement_index: usize,
        placeholder: String,
    },

    #[error(
        "operation {operation}: key-value data source '{data_source}' \
         cannot execute a batch of {statements} statements"
    )]
    KeyValueBatchTooLarge {
        operation: OperationKey,
        data_source: String,
        statements: usize,
    },

    #[error(
        "operation {operation}: shape reads result set {index} but the \
         batch declares only {statements} statements"
    )]
    ShapeIndexOutOfRange {
        operation: OperationKey,
        index: usize,
        statements: usize,
    },

    #[error(
        "operation {operation}: function data source '{data_source}' \
         cannot carry statement templates"
    )]
    FunctionWithStatements {
        operation: OperationKey,
        data_source: String,
    },

    #[error("data source '{data_source}' has no registered executor")]
    MissingExecutor { data_source: String },
}

/// Builder for [`ResolverRegistry`]. Registration order is irrelevant;
/// all validation happens in [`RegistryBuilder::build`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    data_sources: HashMap<String, DataSourceKind>,
    bindings: Vec<(OperationKey, ResolverBinding)>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named data source.
    pub fn data_source(mut self, name: impl Into<String>, kind: DataSourceKind) -> Self {
        self.data_sources.insert(name.into(), kind);
        self
    }

    /// Registers one binding for an operation key.
    pub fn bind(mut self, key: OperationKey, binding: ResolverBinding) -> Self {
        self.bindings.push((key, binding));
        self
    }

    /// Validates the full configuration and freezes it.
    pub fn build(self) -> Result<ResolverRegistry, RegistryBuildError> {
        let mut bindings = HashMap::with_capacity(self.bindings.len());

        for (key, binding) in self.bindings {
            let kind = *self.data_sources.get(binding.data_source()).ok_or_else(|| {
                RegistryBuildError::UnknownDataSource {
                    operation: key.clone(),
                    data_source: binding.data_source().to_string(),
                }
            })?;

            validate_binding(&key, &binding, kind)?;

            if bindings.insert(key.clone(), binding).is_some() {
                return Err(RegistryBuildError::DuplicateOperation(key));
            }
        }

        Ok(ResolverRegistry {
            data_sources: self.data_sources,
            bindings,
        })
    }
}

fn validate_binding(
    key: &OperationKey,
    binding: &ResolverBinding,
    kind: DataSourceKind,
) -> Result<(), RegistryBuildError> {
    match (binding, kind) {
        (ResolverBinding::Function { .. }, DataSourceKind::Function) => Ok(()),
        (ResolverBinding::Statement { data_source, .. }, DataSourceKind::Function) => {
            Err(RegistryBuildError::FunctionWithStatements {
                operation: key.clone(),
                data_source: data_source.clone(),
            })
        }
        (ResolverBinding::Function { data_source }, _) => {
            // A function binding on a statement-backed data source is the
            // same configuration mistake, reported from the other side.
            Err(RegistryBuildError::FunctionWithStatements {
                operation: key.clone(),
                data_source: data_source.clone(),
            })
        }
        (
            ResolverBinding::Statement {
                data_source,
                templates,
                shape,
            },
            kind,
        ) => {
            if templates.is_empty() {
                return Err(RegistryBuildError::EmptyBatch {
                    operation: key.clone(),
                });
            }

            if kind == DataSourceKind::KeyValue && templates.len() > 1 {
                return Err(RegistryBuildError::KeyValueBatchTooLarge {
                    operation: key.clone(),
                    data_source: data_source.clone(),
                    statements: templates.len(),
                });
            }

            for (statement_index, template) in templates.iter().enumerate() {
                let declared: Vec<&str> = template
                    .params()
                    .iter()
                    .map(|(name, _)| name.as_str())
                    .collect();
                for placeholder in template.placeholders_in_text() {
                    if !declared.contains(&placeholder.as_str()) {
                        return Err(RegistryBuildError::UndeclaredPlaceholder {
                            operation: key.clone(),
                            statement_index,
                            placeholder,
                        });
                    }
                }
            }

            let index = shape.result_index();
            if index >= templates.len() {
                return Err(RegistryBuildError::ShapeIndexOutOfRange {
                    operation: key.clone(),
                    index,
                    statements: templates.len(),
                });
            }

            Ok(())
        }
    }
}

/// Immutable operation-to-binding mapping. Build-then-serve: no mutation
/// and no hot-reload after construction.
#[derive(Debug)]
pub struct ResolverRegistry {
    data_sources: HashMap<String, DataSourceKind>,
    bindings: HashMap<OperationKey, ResolverBinding>,
}

impl ResolverRegistry {
    /// The binding for an operation, or `None` when the operation is not
    /// registered (a configuration defect at the call site).
    pub fn lookup(&self, key: &OperationKey) -> Option<&ResolverBinding> {
        self.bindings.get(key)
    }

    pub fn data_source_kind(&self, name: &str) -> Option<DataSourceKind> {
        self.data_sources.get(name).copied()
    }

    pub fn data_source_names(&self) -> impl Iterator<Item = &str> {
        self.data_sources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::template::ParamSpec;

    fn select_by_id() -> StatementTemplate {
        StatementTemplate::new("Select id From t Where id = :ID Limit 1")
            .param("ID", ParamSpec::required("id"))
    }

    fn builder_with_sources() -> RegistryBuilder {
        RegistryBuilder::new()
            .data_source("notifdb", DataSourceKind::Relational)
            .data_source("kitstore", DataSourceKind::KeyValue)
            .data_source("userfn", DataSourceKind::Function)
    }

    #[test]
    fn test_build_and_lookup() {
        let registry = builder_with_sources()
            .bind(
                OperationKey::new("Query", "inAppNotification"),
                ResolverBinding::statement("notifdb", vec![select_by_id()], ShapeSpec::SingleRow),
            )
            .bind(
                OperationKey::new("Query", "user"),
                ResolverBinding::function("userfn"),
            )
            .build()
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry
            .lookup(&OperationKey::new("Query", "inAppNotification"))
            .is_some());
        assert!(registry
            .lookup(&OperationKey::new("Query", "doesNotExist"))
            .is_none());
        assert_eq!(
            registry.data_source_kind("kitstore"),
            Some(DataSourceKind::KeyValue)
        );
    }

    #[test]
    fn test_unknown_data_source_is_a_build_error() {
        let err = builder_with_sources()
            .bind(
                OperationKey::new("Query", "broken"),
                ResolverBinding::statement("nosuchdb", vec![select_by_id()], ShapeSpec::SingleRow),
            )
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            RegistryBuildError::UnknownDataSource { data_source, .. } if data_source == "nosuchdb"
        ));
    }

    #[test]
    fn test_duplicate_operation_is_a_build_error() {
        let err = builder_with_sources()
            .bind(
                OperationKey::new("Query", "inAppNotification"),
                ResolverBinding::statement("notifdb", vec![select_by_id()], ShapeSpec::SingleRow),
            )
            .bind(
                OperationKey::new("Query", "inAppNotification"),
                ResolverBinding::statement("notifdb", vec![select_by_id()], ShapeSpec::SingleRow),
            )
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            RegistryBuildError::DuplicateOperation(OperationKey::new(
                "Query",
                "inAppNotification"
            ))
        );
    }

    #[test]
    fn test_key_value_rejects_multi_statement_batches_at_build_time() {
        let err = builder_with_sources()
            .bind(
                OperationKey::new("Mutation", "createKit"),
                ResolverBinding::statement(
                    "kitstore",
                    vec![select_by_id(), select_by_id()],
                    ShapeSpec::NthStatementResult { index: 1 },
                ),
            )
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            RegistryBuildError::KeyValueBatchTooLarge { statements: 2, .. }
        ));
    }

    #[test]
    fn test_undeclared_placeholder_is_a_build_error() {
        let template = StatementTemplate::new("Select id From t Where id = :ID");
        let err = builder_with_sources()
            .bind(
                OperationKey::new("Query", "broken"),
                ResolverBinding::statement("notifdb", vec![template], ShapeSpec::SingleRow),
            )
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            RegistryBuildError::UndeclaredPlaceholder { placeholder, statement_index: 0, .. }
                if placeholder == "ID"
        ));
    }

    #[test]
    fn test_shape_index_out_of_range_is_a_build_error() {
        let err = builder_with_sources()
            .bind(
                OperationKey::new("Mutation", "create"),
                ResolverBinding::statement(
                    "notifdb",
                    vec![select_by_id()],
                    ShapeSpec::NthStatementResult { index: 1 },
                ),
            )
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            RegistryBuildError::ShapeIndexOutOfRange {
                index: 1,
                statements: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_batch_is_a_build_error() {
        let err = builder_with_sources()
            .bind(
                OperationKey::new("Query", "empty"),
                ResolverBinding::statement("notifdb", vec![], ShapeSpec::List),
            )
            .build()
            .unwrap_err();

        assert!(matches!(err, RegistryBuildError::EmptyBatch { .. }));
    }

    #[test]
    fn test_function_binding_with_statement_source_is_a_build_error() {
        let err = builder_with_sources()
            .bind(
                OperationKey::new("Query", "user"),
                ResolverBinding::statement("userfn", vec![select_by_id()], ShapeSpec::SingleRow),
            )
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            RegistryBuildError::FunctionWithStatements { .. }
        ));
    }
}
