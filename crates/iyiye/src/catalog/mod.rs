//! The iyiye resolver catalog.
//!
//! Registers every API operation with its data source, statement
//! templates, and response shape. The catalog is declarative and validated
//! in full by the registry builder at startup; nothing here is constructed
//! per request.

pub mod kit;
pub mod notification;

use iyiye_core::resolver::{
    DataSourceKind, OperationKey, RegistryBuildError, RegistryBuilder, ResolverBinding,
    ResolverRegistry, ShapeSpec,
};

/// Relational data source holding the notification database.
pub const NOTIF_DATA_SOURCE: &str = "notifdb";

/// Key-value data source holding the kit and kit-category tables.
pub const KIT_DATA_SOURCE: &str = "kitstore";

/// Function data source backed by the external user function.
pub const USER_FUNCTION_DATA_SOURCE: &str = "userfn";

/// Explicit naming configuration for the catalog.
///
/// Environment and application names are passed in rather than read from
/// ambient process state; table names derive from them.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub environment: String,
    pub application: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            environment: "dev".to_string(),
            application: "iyiye".to_string(),
        }
    }
}

/// Builds the validated registry for the iyiye API surface.
pub fn build_registry(config: &CatalogConfig) -> Result<ResolverRegistry, RegistryBuildError> {
    RegistryBuilder::new()
        .data_source(NOTIF_DATA_SOURCE, DataSourceKind::Relational)
        .data_source(KIT_DATA_SOURCE, DataSourceKind::KeyValue)
        .data_source(USER_FUNCTION_DATA_SOURCE, DataSourceKind::Function)
        // Notifications (relational)
        .bind(
            OperationKey::new("Query", "inAppNotificationList"),
            ResolverBinding::statement(
                NOTIF_DATA_SOURCE,
                vec![notification::list()],
                ShapeSpec::List,
            ),
        )
        .bind(
            OperationKey::new("Query", "inAppNotification"),
            ResolverBinding::statement(
                NOTIF_DATA_SOURCE,
                vec![notification::get()],
                ShapeSpec::SingleRow,
            ),
        )
        .bind(
            OperationKey::new("Mutation", "createInAppNotification"),
            ResolverBinding::statement(
                NOTIF_DATA_SOURCE,
                vec![notification::insert(), notification::select_created()],
                ShapeSpec::NthStatementResult { index: 1 },
            ),
        )
        .bind(
            OperationKey::new("Mutation", "markInAppNotificationAsRead"),
            ResolverBinding::statement(
                NOTIF_DATA_SOURCE,
                vec![notification::mark_read(), notification::select_by_id()],
                ShapeSpec::NthStatementResult { index: 1 },
            ),
        )
        // Kits (key-value)
        .bind(
            OperationKey::new("Query", "kitCategoryList"),
            ResolverBinding::statement(
                KIT_DATA_SOURCE,
                vec![kit::category_list(config)],
                ShapeSpec::List,
            ),
        )
        .bind(
            OperationKey::new("Query", "kit"),
            ResolverBinding::statement(
                KIT_DATA_SOURCE,
                vec![kit::get_kit(config)],
                ShapeSpec::SingleRow,
            ),
        )
        // User profile (forwarded to the user function)
        .bind(
            OperationKey::new("Query", "user"),
            ResolverBinding::function(USER_FUNCTION_DATA_SOURCE),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_builds_and_registers_all_operations() {
        let registry = build_registry(&CatalogConfig::default()).unwrap();

        assert_eq!(registry.len(), 7);
        for (type_name, field_name) in [
            ("Query", "inAppNotificationList"),
            ("Query", "inAppNotification"),
            ("Mutation", "createInAppNotification"),
            ("Mutation", "markInAppNotificationAsRead"),
            ("Query", "kitCategoryList"),
            ("Query", "kit"),
            ("Query", "user"),
        ] {
            assert!(
                registry
                    .lookup(&OperationKey::new(type_name, field_name))
                    .is_some(),
                "missing binding for {type_name}.{field_name}"
            );
        }
    }

    #[test]
    fn test_unknown_operation_is_not_registered() {
        let registry = build_registry(&CatalogConfig::default()).unwrap();

        assert!(registry
            .lookup(&OperationKey::new("Query", "doesNotExist"))
            .is_none());
    }
}
