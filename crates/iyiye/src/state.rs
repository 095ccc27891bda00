//! Application state.
//!
//! The state is one `Arc<ResolverEngine>`: the validated registry wired to
//! the executors selected by feature flags. It is built once at startup
//! and read-only afterwards, so cloning it per request is cheap and safe
//! for any number of concurrent invocations.

use std::sync::Arc;

use iyiye_core::resolver::ResolverEngine;

use crate::catalog;
use crate::config::Config;

/// Shared application state, cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ResolverEngine>,
}

impl AppState {
    /// Builds the registry from the catalog and wires the configured
    /// backends: SQLite for the notification data source, DynamoDB for the
    /// kit data source, the HTTP invoker for the user function. Disabled
    /// backend features fall back to the in-memory doubles.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let registry = catalog::build_registry(&config.catalog_config())?;
        let mut builder = ResolverEngine::builder(registry);

        // Notification data source (relational)
        #[cfg(feature = "sqlite")]
        {
            let executor = crate::executor::SqliteExecutor::open(
                &config.sqlite_path,
                catalog::notification::CREATE_TABLES,
            )
            .await?;
            builder = builder.executor(catalog::NOTIF_DATA_SOURCE, Arc::new(executor));
        }
        #[cfg(all(feature = "inmemory", not(feature = "sqlite")))]
        {
            builder = builder.executor(
                catalog::NOTIF_DATA_SOURCE,
                Arc::new(crate::executor::InMemoryExecutor::new()),
            );
        }

        // Kit data source (key-value)
        #[cfg(feature = "dynamodb")]
        {
            let executor = crate::executor::DynamoDbExecutor::from_env().await;
            builder = builder.executor(catalog::KIT_DATA_SOURCE, Arc::new(executor));
        }
        #[cfg(all(feature = "inmemory", not(feature = "dynamodb")))]
        {
            builder = builder.executor(
                catalog::KIT_DATA_SOURCE,
                Arc::new(crate::executor::InMemoryExecutor::new()),
            );
        }

        // User function data source
        #[cfg(feature = "lambda")]
        {
            let endpoints = std::collections::HashMap::from([(
                catalog::USER_FUNCTION_DATA_SOURCE.to_string(),
                config.user_function_url.clone(),
            )]);
            builder = builder.function_invoker(
                catalog::USER_FUNCTION_DATA_SOURCE,
                Arc::new(crate::executor::HttpFunctionInvoker::new(endpoints)),
            );
        }
        #[cfg(all(feature = "inmemory", not(feature = "lambda")))]
        {
            builder = builder.function_invoker(
                catalog::USER_FUNCTION_DATA_SOURCE,
                Arc::new(crate::executor::MockFunctionInvoker::default()),
            );
        }

        let engine = builder.finish()?;
        tracing::info!(
            operations = engine.registry().len(),
            environment = %config.environment,
            "resolver registry built"
        );

        Ok(Self {
            engine: Arc::new(engine),
        })
    }

    /// State with every data source backed by in-memory doubles.
    #[cfg(all(test, feature = "inmemory"))]
    pub fn for_tests() -> Self {
        use crate::executor::{InMemoryExecutor, MockFunctionInvoker};

        let registry = catalog::build_registry(&catalog::CatalogConfig::default())
            .expect("catalog must build");
        let engine = ResolverEngine::builder(registry)
            .executor(catalog::NOTIF_DATA_SOURCE, Arc::new(InMemoryExecutor::new()))
            .executor(catalog::KIT_DATA_SOURCE, Arc::new(InMemoryExecutor::new()))
            .function_invoker(
                catalog::USER_FUNCTION_DATA_SOURCE,
                Arc::new(MockFunctionInvoker::default()),
            )
            .finish()
            .expect("every data source is backed");

        Self {
            engine: Arc::new(engine),
        }
    }
}
